//! OAuth client credentials for Google sign-in
//!
//! The reader needs an OAuth client registration (ID + secret) to run the
//! browser sign-in flow. Sources, highest priority first:
//! 1. Compile-time `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET`
//! 2. A Google Cloud Console JSON download (`google-credentials.json` in the
//!    config directory)
//! 3. Runtime `GMAIL_CLIENT_ID` / `GMAIL_CLIENT_SECRET`

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::gmail::GmailAuth;

/// Credentials filename in the config directory
pub const CREDENTIALS_FILE: &str = "google-credentials.json";

const ENV_CLIENT_ID: &str = "GMAIL_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "GMAIL_CLIENT_SECRET";

/// Where a set of credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    CompileTime,
    File,
    Environment,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::CompileTime => f.write_str("built-in client"),
            CredentialSource::File => f.write_str(CREDENTIALS_FILE),
            CredentialSource::Environment => f.write_str("environment"),
        }
    }
}

/// OAuth client registration used for the browser sign-in flow
#[derive(Debug, Clone)]
pub struct GmailCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub source: CredentialSource,
}

/// Google Cloud Console download: one of two sections, same shape
#[derive(Deserialize)]
struct ConsoleDownload {
    installed: Option<ClientSection>,
    web: Option<ClientSection>,
}

#[derive(Deserialize)]
struct ClientSection {
    client_id: String,
    client_secret: String,
}

impl GmailCredentials {
    /// Load credentials from the first source that has them
    pub fn load() -> Result<Self> {
        if let Some(creds) = Self::from_compile_time() {
            debug!("Using compile-time OAuth client");
            return Ok(creds);
        }

        if config::config_exists(CREDENTIALS_FILE) {
            let download: ConsoleDownload = config::load_json(CREDENTIALS_FILE)?;
            return Self::from_download(download);
        }

        Self::from_env()
    }

    /// Credentials baked in with
    /// `GOOGLE_CLIENT_ID=xxx GOOGLE_CLIENT_SECRET=yyy cargo build --release`
    pub fn from_compile_time() -> Option<Self> {
        let client_id = option_env!("GOOGLE_CLIENT_ID").filter(|s| !s.is_empty())?;
        let client_secret = option_env!("GOOGLE_CLIENT_SECRET").filter(|s| !s.is_empty())?;

        Some(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            source: CredentialSource::CompileTime,
        })
    }

    /// Load a Google Cloud Console download from an explicit path
    pub fn from_file(path: &Path) -> Result<Self> {
        let download: ConsoleDownload = config::load_json_file(path)?;
        Self::from_download(download)
    }

    /// Parse a Google Cloud Console download held in memory
    pub fn from_json(json: &str) -> Result<Self> {
        let download: ConsoleDownload =
            serde_json::from_str(json).context("Failed to parse credentials JSON")?;
        Self::from_download(download)
    }

    fn from_download(download: ConsoleDownload) -> Result<Self> {
        // Desktop ("installed") clients are preferred; "web" clients work if
        // a localhost redirect URI is registered
        let section = download
            .installed
            .or(download.web)
            .context("Credentials file missing 'installed' or 'web' section")?;

        if section.client_id.trim().is_empty() {
            anyhow::bail!("Credentials file has an empty client_id");
        }

        Ok(Self {
            client_id: section.client_id,
            client_secret: section.client_secret,
            source: CredentialSource::File,
        })
    }

    /// Load credentials from `GMAIL_CLIENT_ID` / `GMAIL_CLIENT_SECRET`
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var(ENV_CLIENT_ID)
            .with_context(|| format!("{} environment variable not set", ENV_CLIENT_ID))?;
        let client_secret = std::env::var(ENV_CLIENT_SECRET)
            .with_context(|| format!("{} environment variable not set", ENV_CLIENT_SECRET))?;

        Ok(Self {
            client_id,
            client_secret,
            source: CredentialSource::Environment,
        })
    }

    /// Where the credentials file is expected
    pub fn default_credentials_path() -> Option<PathBuf> {
        config::config_path(CREDENTIALS_FILE)
    }

    /// Build the browser authorizer for these credentials
    pub fn into_authorizer(self) -> GmailAuth {
        GmailAuth::new(self.client_id, self.client_secret)
    }
}
