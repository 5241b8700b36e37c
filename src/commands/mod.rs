pub mod info;
pub mod publish;
pub mod set_token;

use crate::api::client::MediumClient;
use crate::config::settings::Config;
use crate::util::auth::TokenStore;
use crate::util::browser::{Browser, SystemBrowser};

/// Collaborators shared by the command handlers of one invocation.
pub struct Context {
    pub config: Config,
    pub tokens: TokenStore,
    pub browser: Box<dyn Browser>,
}

impl Context {
    pub fn new(config: Config) -> Self {
        let browser = Box::new(SystemBrowser::from_config(&config));
        Self::with_browser(config, browser)
    }

    pub fn with_browser(config: Config, browser: Box<dyn Browser>) -> Self {
        Self {
            tokens: TokenStore::from_config(&config),
            config,
            browser,
        }
    }

    /// Client authenticated with the stored token. The configuration is
    /// checked first, so a bad API URL fails before the token is looked up.
    pub fn connect(&self) -> anyhow::Result<MediumClient> {
        self.config.validate()?;
        let token = self.tokens.get(self.browser.as_ref())?;
        Ok(MediumClient::new(&self.config, token)?)
    }
}
