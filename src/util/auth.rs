use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::settings::Config;
use crate::util::browser::Browser;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Could not find the token. We have opened your browser for you. Please generate an integration token in your browser window, and use `mediumctl set-token <token>` to add it.")]
    MissingOpened,

    #[error("Could not find the token. We tried to open your browser for you automatically, but it failed. Please manually browse to {settings_url}, generate an integration token, and use the `mediumctl set-token <token>` command to add it.")]
    MissingNotOpened { settings_url: String },

    #[error("The token cannot be empty. Generate an integration token at {settings_url} and pass it to `mediumctl set-token <token>`.")]
    EmptyToken { settings_url: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Single integration token kept in a plain file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
    settings_url: String,
}

impl TokenStore {
    pub fn new(path: PathBuf, settings_url: impl Into<String>) -> Self {
        Self {
            path,
            settings_url: settings_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.token_path.clone(), config.settings_url.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the stored token. The file is readable by its owner only.
    pub fn set(&self, token: &str) -> Result<&Path, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::EmptyToken {
                settings_url: self.settings_url.clone(),
            });
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        // mode() only applies when the file is created
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(token.as_bytes())?;
        file.sync_all()?;

        log::debug!("token written to {}", self.path.display());
        Ok(&self.path)
    }

    /// Reads the stored token verbatim.
    ///
    /// When no token file exists the token-generation page is opened in the
    /// browser and a `Missing*` error explains how to add one.
    pub fn get(&self, browser: &dyn Browser) -> Result<String, AuthError> {
        match fs::read_to_string(&self.path) {
            Ok(token) => Ok(token),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no token at {}", self.path.display());
                match browser.open(&self.settings_url) {
                    Ok(()) => Err(AuthError::MissingOpened),
                    Err(e) => {
                        log::warn!("could not open {}: {}", self.settings_url, e);
                        Err(AuthError::MissingNotOpened {
                            settings_url: self.settings_url.clone(),
                        })
                    }
                }
            }
            Err(e) => Err(AuthError::Io(e)),
        }
    }
}
