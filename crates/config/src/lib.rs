//! Configuration loading for Gmail Reader
//!
//! Provides utilities for loading configuration files from the shared
//! config directory (~/.config/gmail-reader/).
//!
//! Call [`init`] at application startup to bootstrap the config directory.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Name of the directory under the platform config dir
const APP_DIR: &str = "gmail-reader";

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "GMAIL_READER_CONFIG_DIR";

/// Create the config directory if needed and return it
///
/// Run once at startup so later saves never race on directory creation.
pub fn init() -> Result<PathBuf> {
    ensure_config_dir()
}

/// Where config files live: `$GMAIL_READER_CONFIG_DIR` if set and non-empty,
/// otherwise `gmail-reader/` under the platform config dir
pub fn config_dir() -> Option<PathBuf> {
    resolve_config_dir(std::env::var_os(CONFIG_DIR_ENV), dirs::config_dir())
}

fn resolve_config_dir(
    override_dir: Option<OsString>,
    platform_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    match override_dir.filter(|d| !d.is_empty()) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => platform_dir.map(|p| p.join(APP_DIR)),
    }
}

pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(filename))
}

/// Deserialize `filename` from the config directory
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let path = config_path(filename).context("No config directory on this platform")?;
    load_json_file(&path)
}

/// Deserialize a JSON file at any path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_some_and(|p| p.is_file())
}

pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir().context("No config directory on this platform")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}

/// Serialize `value` into `filename` in the config directory; returns the path written
pub fn save_json<T: Serialize>(filename: &str, value: &T) -> Result<PathBuf> {
    let path = ensure_config_dir()?.join(filename);
    save_json_file(&path, value)?;
    Ok(path)
}

/// Serialize `value` as pretty JSON to any path
pub fn save_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        rows: usize,
        name: String,
    }

    #[test]
    fn test_config_path_joins_filename() {
        let path = config_path("test.json");
        assert!(path.is_some());
        assert!(path.unwrap().ends_with("test.json"));
    }

    #[test]
    fn test_override_dir_wins() {
        let dir = resolve_config_dir(
            Some(OsString::from("/tmp/reader-config")),
            Some(PathBuf::from("/home/u/.config")),
        );
        assert_eq!(dir, Some(PathBuf::from("/tmp/reader-config")));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let dir = resolve_config_dir(Some(OsString::new()), Some(PathBuf::from("/home/u/.config")));
        assert_eq!(dir, Some(PathBuf::from("/home/u/.config/gmail-reader")));
    }

    #[test]
    fn test_no_platform_dir_without_override() {
        assert_eq!(resolve_config_dir(None, None), None);
        assert_eq!(
            resolve_config_dir(Some(OsString::from("/srv/reader")), None),
            Some(PathBuf::from("/srv/reader"))
        );
    }

    #[test]
    fn test_save_and_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");

        let sample = Sample {
            rows: 10,
            name: "reader".to_string(),
        };
        save_json_file(&path, &sample).unwrap();

        let loaded: Sample = load_json_file(&path).unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn test_load_missing_file_mentions_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = load_json_file::<Sample>(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_json_file::<Sample>(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }
}
