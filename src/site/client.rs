use ureq::ResponseExt;

use crate::error::{Error, Result};
use crate::site::config::SiteConfig;
use crate::site::page::Page;

/// Capability to fetch a page from the site.
///
/// Resolution and extraction only ever talk to the site through this trait,
/// which is what lets the tests run against canned HTML.
pub trait SiteClient {
    /// Fetch `url`, following redirects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure or a non-success
    /// status. Implementations must not retry.
    fn get(&self, url: &str) -> Result<Page>;
}

impl<T: SiteClient + ?Sized> SiteClient for &T {
    fn get(&self, url: &str) -> Result<Page> {
        (**self).get(url)
    }
}

impl<T: SiteClient + ?Sized> SiteClient for Box<T> {
    fn get(&self, url: &str) -> Result<Page> {
        (**self).get(url)
    }
}

/// Blocking HTTP client backed by `ureq`.
pub struct HttpClient {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpClient {
    pub fn new(config: &SiteConfig) -> Self {
        let agent_config = ureq::config::Config::builder()
            .timeout_global(Some(config.timeout))
            .build();

        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(&SiteConfig::default())
    }
}

impl SiteClient for HttpClient {
    fn get(&self, url: &str) -> Result<Page> {
        tracing::debug!("GET {url}");

        let transport = |message: String| Error::Transport {
            url: url.to_owned(),
            message,
        };

        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .call()
            .map_err(|e| transport(e.to_string()))?;

        let final_url = response.get_uri().to_string();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| transport(format!("failed to read response body: {e}")))?;

        if final_url != url {
            tracing::debug!("{url} redirected to {final_url}");
        }
        Ok(Page::parse(final_url, &body))
    }
}
