//! Client configuration: TOML file, then environment, then CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Service used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://tictactoe.aboutdream.io";

/// Environment variable overriding [`ClientConfig::base_url`].
pub const BASE_URL_ENV: &str = "TICTACTOE_BASE_URL";

/// Environment variable overriding [`ClientConfig::credentials_path`].
pub const CREDENTIALS_ENV: &str = "TICTACTOE_CREDENTIALS";

/// Settings for the client.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the game service.
    base_url: String,

    /// Rows requested per page for games and rankings.
    page_size: u32,

    /// Seconds between automatic refreshes of an unfinished game.
    poll_interval_secs: u64,

    /// Where the login token and username are kept between runs.
    credentials_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 10,
            poll_interval_secs: 7,
            credentials_path: default_credentials_path(),
        }
    }
}

#[instrument]
fn default_credentials_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("tictactoe_client"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("credentials.toml")
}

impl ClientConfig {
    /// Loads configuration from an optional TOML file, then applies
    /// environment overrides.
    ///
    /// A missing file is not an error; defaults are used instead.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                info!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(base_url = %config.base_url, "Config loaded successfully");
        Ok(config)
    }

    /// Applies overrides read through `lookup`, normally the process environment.
    #[instrument(skip(self, lookup))]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            debug!(base_url = %base_url, "Base URL overridden from environment");
            self.base_url = base_url;
        }
        if let Some(path) = lookup(CREDENTIALS_ENV).filter(|v| !v.is_empty()) {
            debug!(path = %path, "Credentials path overridden from environment");
            self.credentials_path = PathBuf::from(path);
        }
        self
    }

    /// Returns the polling period as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[instrument(skip(self))]
    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::new("page_size must be at least 1".to_string()));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::new(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.base_url.is_empty() {
            return Err(ConfigError::new("base_url must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_service_contract() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(*config.page_size(), 10);
        assert_eq!(config.poll_interval(), Duration::from_secs(7));
        assert!(config.credentials_path().ends_with("credentials.toml"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "base_url = \"http://localhost:8000\"\npage_size = 5").expect("write");

        let config = ClientConfig::from_file(file.path()).expect("Load failed");
        assert_eq!(config.base_url(), "http://localhost:8000");
        assert_eq!(*config.page_size(), 5);
        assert_eq!(*config.poll_interval_secs(), 7);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "page_size = 0").expect("write");

        let err = ClientConfig::from_file(file.path()).expect_err("Should reject");
        assert!(err.message.contains("page_size"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ClientConfig::load(Some(Path::new("/definitely/not/here.toml")))
            .expect("Load failed");
        assert_eq!(*config.page_size(), 10);
    }

    #[test]
    fn env_overrides_apply() {
        let config = ClientConfig::default().with_env_overrides(|key| match key {
            BASE_URL_ENV => Some("http://example.test".to_string()),
            CREDENTIALS_ENV => Some("/tmp/creds.toml".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url(), "http://example.test");
        assert_eq!(config.credentials_path(), Path::new("/tmp/creds.toml"));
    }

    #[test]
    fn setters_override_single_fields() {
        let config = ClientConfig::default().with_base_url("http://cli.test".to_string());
        assert_eq!(config.base_url(), "http://cli.test");
    }
}
