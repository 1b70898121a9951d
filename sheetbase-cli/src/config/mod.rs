//! Configuration loading
//!
//! Settings come from `<config dir>/sheetbase/config.toml` (or `--config`),
//! then environment variables (a `.env` file is honored), then command-line
//! flags, later sources winning.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{
    CommandToken, DEFAULT_BASE_URL, ServiceAccountToken, SheetsClient, StaticToken, TokenProvider,
};

pub const ENV_SPREADSHEET_ID: &str = "SHEETBASE_SPREADSHEET_ID";
pub const ENV_ACCESS_TOKEN: &str = "SHEETBASE_ACCESS_TOKEN";
pub const ENV_API_BASE_URL: &str = "SHEETBASE_API_BASE_URL";
pub const ENV_KEY_FILE: &str = "SHEETBASE_KEY_FILE";
/// Standard variable other Google tooling reads a key file path from
pub const ENV_GOOGLE_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Key file picked up from the working directory when nothing else is set
pub const DEFAULT_KEY_FILE: &str = "credentials.json";

const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 50 * 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document ID from the spreadsheet URL
    pub spreadsheet_id: Option<String>,
    /// Sheets API root, overridable for testing against a local stub
    pub api_base_url: Option<String>,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Fixed OAuth access token
    pub access_token: Option<String>,
    /// Service account key JSON
    pub key_file: Option<PathBuf>,
    /// Command printing an access token, e.g. `gcloud auth print-access-token`
    pub token_command: Option<String>,
    /// How long a command-issued token is reused
    pub token_lifetime_secs: Option<u64>,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sheetbase").join("config.toml"))
    }

    /// Load from `path`, or from the default location when none is given.
    ///
    /// A missing default file yields an empty config; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                bail!("Config file does not exist: {}", path.display());
            }
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override settings from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override settings from `lookup`; empty values are ignored
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(id) = get(ENV_SPREADSHEET_ID) {
            self.spreadsheet_id = Some(id);
        }
        if let Some(token) = get(ENV_ACCESS_TOKEN) {
            self.auth.access_token = Some(token);
        }
        if let Some(url) = get(ENV_API_BASE_URL) {
            self.api_base_url = Some(url);
        }
        if let Some(path) = get(ENV_KEY_FILE).or_else(|| get(ENV_GOOGLE_CREDENTIALS)) {
            self.auth.key_file = Some(PathBuf::from(path));
        }
    }

    pub fn spreadsheet_id(&self) -> Result<&str> {
        self.spreadsheet_id.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "No spreadsheet configured. Set spreadsheet_id in the config file, {} or pass --spreadsheet.",
                ENV_SPREADSHEET_ID
            )
        })
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Build the Sheets client this config describes
    pub fn client(&self) -> Result<SheetsClient> {
        let provider = self.auth.token_provider()?;
        Ok(SheetsClient::with_base_url(provider, self.api_base_url()))
    }

    /// Copy safe to print: tokens replaced
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.auth.access_token.is_some() {
            copy.auth.access_token = Some("<redacted>".to_string());
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

impl AuthConfig {
    /// First configured source wins: fixed token, key file, token command,
    /// then `credentials.json` in the working directory
    pub fn token_provider(&self) -> Result<Arc<dyn TokenProvider>> {
        self.token_provider_in(Path::new("."))
    }

    fn token_provider_in(&self, working_dir: &Path) -> Result<Arc<dyn TokenProvider>> {
        if let Some(token) = &self.access_token {
            log::debug!("Using static access token");
            return Ok(Arc::new(StaticToken::new(token.clone())));
        }
        if let Some(path) = &self.key_file {
            log::debug!("Using service account key {}", path.display());
            return Ok(Arc::new(service_account(path)?));
        }
        if let Some(command) = &self.token_command {
            let lifetime = Duration::from_secs(
                self.token_lifetime_secs
                    .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
            );
            log::debug!("Using token command `{}`", command);
            return Ok(Arc::new(CommandToken::new(command.clone(), lifetime)));
        }
        let fallback = working_dir.join(DEFAULT_KEY_FILE);
        if fallback.is_file() {
            log::debug!("Using service account key {}", fallback.display());
            return Ok(Arc::new(service_account(&fallback)?));
        }
        bail!(
            "No credentials configured. Set auth.access_token, auth.key_file or auth.token_command in the config file, set {} or {}, or place {} in the working directory.",
            ENV_ACCESS_TOKEN,
            ENV_KEY_FILE,
            DEFAULT_KEY_FILE
        )
    }
}

fn service_account(path: &Path) -> Result<ServiceAccountToken> {
    ServiceAccountToken::from_file(path)
        .with_context(|| format!("Failed to load service account key {}", path.display()))
}
