//! Outbound user agent resolution
//!
//! The feed is crawled with a current desktop browser user agent. It is
//! resolved exactly once per run, before any page is fetched, and then
//! handed to [`FeedClient::new`](crate::client::FeedClient::new) by value.
//!
//! Resolution order:
//! 1. `feed.user_agent` from the configuration, verbatim
//! 2. the first entry of the published list at `feed.user_agent_source`
//!    mentioning both `feed.user_agent_os` and `feed.user_agent_browser`
//!
//! Failing both is fatal at startup.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};
use url::Url;
use wodmirror_core::config::FeedConfig;

use crate::FeedError;

/// Looks up a browser user agent from a published JSON list
#[derive(Debug, Clone)]
pub struct UserAgentResolver {
    client: Client,
    source: Url,
    os: String,
    browser: String,
}

impl UserAgentResolver {
    /// Creates a resolver from the feed settings
    ///
    /// # Errors
    /// Returns an error if `feed.user_agent_source` is not a URL or the
    /// HTTP client cannot be built
    pub fn from_config(config: &FeedConfig) -> Result<Self, FeedError> {
        let source = Url::parse(&config.user_agent_source).map_err(|e| {
            FeedError::InvalidResponse(format!(
                "user agent source '{}' is not a URL: {e}",
                config.user_agent_source
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("wodmirror/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            source,
            os: config.user_agent_os.clone(),
            browser: config.user_agent_browser.clone(),
        })
    }

    /// Downloads the list and returns the first matching user agent
    pub async fn resolve(&self) -> Result<String, FeedError> {
        debug!(source = %self.source, "Fetching user agent list");

        let response = self.client.get(self.source.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: self.source.to_string(),
            });
        }

        let body = response.text().await?;
        let agents: Vec<String> = serde_json::from_str(&body).map_err(|e| {
            FeedError::InvalidResponse(format!("user agent list is not a JSON string array: {e}"))
        })?;

        pick_user_agent(&agents, &self.os, &self.browser)
            .map(str::to_owned)
            .ok_or_else(|| FeedError::NoUserAgent {
                os: self.os.clone(),
                browser: self.browser.clone(),
            })
    }
}

/// First agent containing both `os` and `browser`, compared case-insensitively
pub fn pick_user_agent<'a>(agents: &'a [String], os: &str, browser: &str) -> Option<&'a str> {
    let os = os.to_lowercase();
    let browser = browser.to_lowercase();

    agents
        .iter()
        .map(String::as_str)
        .find(|agent| {
            let lower = agent.to_lowercase();
            lower.contains(&os) && lower.contains(&browser)
        })
}

/// Resolves the user agent for this run
///
/// Uses the configured value when present, otherwise asks a
/// [`UserAgentResolver`].
pub async fn resolve_user_agent(config: &FeedConfig) -> Result<String, FeedError> {
    if let Some(ref configured) = config.user_agent {
        let configured = configured.trim();
        if !configured.is_empty() {
            debug!("Using configured user agent");
            return Ok(configured.to_string());
        }
    }

    let agent = UserAgentResolver::from_config(config)?.resolve().await?;
    info!(user_agent = %agent, "Resolved user agent");
    Ok(agent)
}
