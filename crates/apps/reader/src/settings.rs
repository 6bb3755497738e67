//! Reader preferences stored in `settings.json`

use anyhow::Result;
use log::warn;
use mail::PAGE_SIZE_OPTIONS;
use mail::present::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    /// Rows per page the result table starts with (5, 10 or 25)
    pub default_rows_per_page: usize,
    /// Open deep links in the browser instead of printing them
    pub open_links: bool,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            default_rows_per_page: DEFAULT_PAGE_SIZE,
            open_links: true,
        }
    }
}

impl ReaderSettings {
    /// Load settings from the config directory
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        if !config::config_exists(SETTINGS_FILE) {
            return Self::default();
        }
        match config::load_json::<Self>(SETTINGS_FILE) {
            Ok(settings) => settings.validated(),
            Err(e) => {
                warn!("Ignoring {}: {:#}", SETTINGS_FILE, e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let settings: Self = config::load_json_file(path)?;
        Ok(settings.validated())
    }

    /// Write the default settings file, returning its path
    pub fn write_default() -> Result<PathBuf> {
        config::save_json(SETTINGS_FILE, &Self::default())
    }

    fn validated(mut self) -> Self {
        if !PAGE_SIZE_OPTIONS.contains(&self.default_rows_per_page) {
            warn!(
                "default_rows_per_page {} is not one of {:?}, using {}",
                self.default_rows_per_page, PAGE_SIZE_OPTIONS, DEFAULT_PAGE_SIZE
            );
            self.default_rows_per_page = DEFAULT_PAGE_SIZE;
        }
        self
    }
}
