//! Page fetching
//!
//! This module defines the fetch seam the workers call through, and the
//! production HTTP implementation:
//! - A single GET per page, no redirect following
//! - A bounded request timeout, no retries
//! - Error classification into unreachable / timeout / protocol failures

use crate::config::FetchConfig;
use crate::locator::Locator;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Raw response handed from a fetcher to the link extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody {
    /// HTTP status code from the status line
    pub status: u16,

    /// Response body as text
    pub text: String,
}

impl ResponseBody {
    /// Builds a 200 response around `text`
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            status: 200,
            text: text.into(),
        }
    }

    /// Returns true for 4xx status codes
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }
}

/// Retrieves the raw content behind a locator
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, locator: &Locator) -> Result<ResponseBody, FetchError>;
}

/// Builds an HTTP client with the crawler's settings
///
/// Redirects are not followed and HTTPS is not required, since every crawled
/// URL is plain `http://`.
///
/// # Example
///
/// ```no_run
/// use depth_crawl::config::FetchConfig;
/// use depth_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_millis(config.timeout_ms))
        .connect_timeout(Duration::from_millis(config.timeout_ms))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from fetch settings
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetches a page with a single GET
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx | `Ok(ResponseBody)` |
    /// | any other status | `Protocol { status }` |
    /// | timeout | `Timeout` |
    /// | DNS / connect failure | `Unreachable` |
    /// | body cannot be read | `Protocol { status: None }` |
    async fn fetch(&self, locator: &Locator) -> Result<ResponseBody, FetchError> {
        let url = locator.as_str();

        let response = self
            .client
            .get(locator.url().clone())
            .send()
            .await
            .map_err(|e| classify_request_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Protocol {
                url: url.to_string(),
                status: Some(status.as_u16()),
                message: format!("HTTP {}", status),
            });
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Protocol {
                    url: url.to_string(),
                    status: None,
                    message: e.to_string(),
                }
            }
        })?;

        Ok(ResponseBody {
            status: status.as_u16(),
            text,
        })
    }
}

fn classify_request_error(url: &str, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Unreachable {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Unreachable {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
