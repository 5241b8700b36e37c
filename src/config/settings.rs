use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::util::path::expand_home;

pub const DEFAULT_API_URL: &str = "https://api.medium.com/v1";
pub const DEFAULT_SETTINGS_URL: &str = "https://medium.com/me/settings";
pub const DEFAULT_TOKEN_FILE: &str = "~/.mediumctl";
pub const CONFIG_FILE_NAME: &str = ".mediumctl.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot find the home directory of the current user")]
    HomeDir,

    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Runtime configuration shared by every component of a single invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the publishing API, without a trailing slash
    pub api_url: String,
    /// File holding the integration token
    pub token_path: PathBuf,
    /// Page where the user can generate a new integration token
    pub settings_url: String,
    pub timeout: Duration,
    /// Command used to open URLs instead of the platform default
    pub browser: Option<String>,
}

// On-disk shape of `~/.mediumctl.toml`; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    api_url: Option<String>,
    token_path: Option<String>,
    settings_url: Option<String>,
    timeout_secs: Option<u64>,
    browser: Option<String>,
}

pub fn home_dir() -> Result<PathBuf, ConfigError> {
    resolve_home(dirs::home_dir())
}

pub fn resolve_home(home: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    home.ok_or(ConfigError::HomeDir)
}

impl Config {
    pub fn defaults(home: &Path) -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            token_path: expand_home(DEFAULT_TOKEN_FILE, home),
            settings_url: DEFAULT_SETTINGS_URL.to_string(),
            timeout: Duration::from_secs(30),
            browser: None,
        }
    }

    pub fn default_path(home: &Path) -> PathBuf {
        home.join(CONFIG_FILE_NAME)
    }

    /// Builds the configuration for this invocation: defaults, then
    /// `~/.mediumctl.toml` if present, then environment overrides.
    /// Not validated here; only commands that reach the API call `validate`.
    pub fn load() -> Result<Self, ConfigError> {
        let home = home_dir()?;
        let mut config = Self::from_file(&home, &Self::default_path(&home))?;
        config.apply_env(
            env::var("MEDIUMCTL_API_URL").ok(),
            env::var("BROWSER").ok(),
        );

        log::debug!("token file resolved to {}", config.token_path.display());
        Ok(config)
    }

    pub fn from_file(home: &Path, path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::defaults(home));
        }

        log::debug!("reading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(home, &content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml(home: &Path, content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            message: e.to_string(),
        })?;

        let mut config = Self::defaults(home);
        if let Some(api_url) = file.api_url {
            config.api_url = api_url;
        }
        if let Some(token_path) = file.token_path {
            config.token_path = expand_home(&token_path, home);
        }
        if let Some(settings_url) = file.settings_url {
            config.settings_url = settings_url;
        }
        if let Some(secs) = file.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config.browser = file.browser.filter(|b| !b.trim().is_empty());
        config.api_url = config.api_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Environment values win over the config file. Empty values are ignored.
    pub fn apply_env(&mut self, api_url: Option<String>, browser: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(cmd) = browser.filter(|b| !b.trim().is_empty()) {
            self.browser = Some(cmd);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.is_empty() {
            return Err(ConfigError::Validation(
                "API URL cannot be empty".to_string(),
            ));
        }

        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "API URL must start with http:// or https://, got `{}`",
                self.api_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Validation(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
