//! HTTP client for the blog feed
//!
//! Wraps a single `reqwest::Client` configured once at startup with the
//! resolved user agent and a per-request deadline. Redirects are followed
//! transparently (reqwest's default policy); any non-success status is an
//! error.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wodmirror_core::config::FeedConfig;
//! use wodmirror_feed::client::FeedClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = FeedConfig::default();
//! let client = FeedClient::new("Mozilla/5.0 (Windows NT 10.0; Win64; x64)", &config)?;
//! let html = client.get_text(&config.listing_url(1)?).await?;
//! println!("{} bytes", html.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;
use wodmirror_core::config::FeedConfig;
use wodmirror_core::ports::IDocumentFetcher;

use crate::FeedError;

/// HTTP transport for listing and detail pages
///
/// The user agent is fixed at construction; there is no way to change it
/// afterwards, so every request of a run identifies itself the same way.
#[derive(Debug, Clone)]
pub struct FeedClient {
    /// The underlying HTTP client
    client: Client,
    /// Outbound identification header value
    user_agent: String,
    /// Deadline applied to each request
    timeout: Duration,
}

impl FeedClient {
    /// Creates a new FeedClient
    ///
    /// # Arguments
    /// * `user_agent` - Value of the `User-Agent` header for every request
    /// * `config` - Feed settings (request timeout)
    pub fn new(user_agent: impl Into<String>, config: &FeedConfig) -> Result<Self, FeedError> {
        let user_agent = user_agent.into();
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let client = Client::builder()
            .user_agent(user_agent.clone())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            user_agent,
            timeout,
        })
    }

    /// Returns the user agent this client sends
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the per-request deadline
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GETs `url` and returns the response body as text
    ///
    /// # Errors
    /// - [`FeedError::Status`] for any non-2xx final status
    /// - [`FeedError::Network`] for connection failures and timeouts
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_text(&self, url: &Url) -> Result<String, FeedError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await?;

        debug!(
            status = status.as_u16(),
            final_url = %final_url,
            bytes = body.len(),
            "Fetched document"
        );
        Ok(body)
    }
}

#[async_trait::async_trait]
impl IDocumentFetcher for FeedClient {
    async fn fetch(&self, url: &Url) -> anyhow::Result<String> {
        self.get_text(url)
            .await
            .with_context(|| format!("Failed to fetch {url}"))
    }
}
