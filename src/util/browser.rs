use std::process::Command;

use crate::config::settings::Config;

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {code:?}")]
    Status { command: String, code: Option<i32> },
}

/// Opens URLs for the user.
#[cfg_attr(test, mockall::automock)]
pub trait Browser {
    fn open(&self, url: &str) -> Result<(), BrowserError>;
}

/// Hands URLs to the operating system's default handler, or to the command
/// configured through `browser` / `$BROWSER`.
pub struct SystemBrowser {
    command: Option<String>,
}

impl SystemBrowser {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.browser.clone())
    }

    fn command_for(&self, url: &str) -> (String, Command) {
        if let Some(program) = &self.command {
            let mut cmd = Command::new(program);
            cmd.arg(url);
            return (program.clone(), cmd);
        }

        if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            ("cmd".to_string(), cmd)
        } else if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            ("open".to_string(), cmd)
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            ("xdg-open".to_string(), cmd)
        }
    }
}

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), BrowserError> {
        let (command, mut cmd) = self.command_for(url);
        log::debug!("opening {} with {}", url, command);

        let status = cmd.status().map_err(|source| BrowserError::Launch {
            command: command.clone(),
            source,
        })?;

        if !status.success() {
            return Err(BrowserError::Status {
                command,
                code: status.code(),
            });
        }

        Ok(())
    }
}
