use crate::client::ClientConfig;
use anyhow::Result;

/// Arguments shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            timeout_secs: crate::client::DEFAULT_TIMEOUT.as_secs(),
        }
    }

    pub fn set_timeout(&mut self, seconds: u64) {
        self.timeout_secs = seconds;
    }

    /// # Errors
    /// Returns an error if the API URL is invalid.
    pub fn client_config(&self) -> Result<ClientConfig> {
        Ok(ClientConfig::new(&self.api_url)?.with_timeout_secs(self.timeout_secs))
    }
}
