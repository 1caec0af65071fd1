use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: Url,
    /// `None` disables the timeout; a hung call then leaves the flow busy.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid API base URL: {base_url}"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!("API base URL must use http or https");
        }
        Ok(Self {
            base_url,
            timeout: Some(DEFAULT_TIMEOUT),
        })
    }

    /// Sets the timeout from whole seconds; zero disables it.
    #[must_use]
    pub fn with_timeout_secs(mut self, seconds: u64) -> Self {
        self.timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
        self
    }

    /// Joins `path` onto the base URL, keeping any base path prefix.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim().trim_start_matches('/'))
    }
}
