use std::time::Duration;

use async_trait::async_trait;

use crate::config::ScrapeConfig;
use crate::error::{FetchError, ScrapeError};

/// Source of listing page bodies.
///
/// The pager only depends on this trait, so tests can drive it with canned
/// HTML instead of a live site.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and return the response body as HTML text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`Fetcher`] backed by a `reqwest` client with a fixed timeout and
/// browser user agent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                millis: self.timeout.as_millis(),
            }
        } else {
            FetchError::Http(err)
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        log::debug!("Fetching: {}", url);

        let url = reqwest::Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| self.classify(url.as_str(), e))
    }
}
