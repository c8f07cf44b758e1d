//! Configuration module for docdesk.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{DocdeskError, Result};

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "DOCDESK_API_URL";

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST backend (without the `/api` prefix).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Total request timeout in seconds for file uploads.
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_upload_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("docdesk/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ApiConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Upload timeout as a `Duration`.
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    /// Connect timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            upload_timeout_secs: default_upload_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Local session storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Path to the JSON file holding the logged-in user, token and device id.
    #[serde(default = "default_session_path")]
    pub path: String,
}

fn default_session_path() -> String {
    "data/session.json".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/docdesk.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DocdeskError::Io)?;
        Self::parse(&content)?.with_overrides(std::env::var(API_URL_ENV).ok())
    }

    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        Self::default().with_overrides(std::env::var(API_URL_ENV).ok())
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)
            .map_err(|e| DocdeskError::Config(format!("config parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DOCDESK_API_URL`: Override the backend base URL
    pub fn apply_env_overrides(&mut self) {
        self.override_api_url(std::env::var(API_URL_ENV).ok());
    }

    fn override_api_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.api.base_url = url;
        }
    }

    /// Apply the base URL override and validate the result.
    fn with_overrides(mut self, api_url: Option<String>) -> Result<Self> {
        self.override_api_url(api_url);
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api.base_url)
            .map_err(|e| DocdeskError::Config(format!("invalid api.base_url: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(DocdeskError::Config(format!(
                    "unsupported api.base_url scheme: {scheme}"
                )))
            }
        }
        if self.api.timeout_secs == 0 || self.api.upload_timeout_secs == 0 {
            return Err(DocdeskError::Config(
                "api timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
