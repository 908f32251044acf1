//! Document fetcher port (driven/secondary port)
//!
//! The sync engine only ever needs "give me the HTML at this URL".
//! Redirect handling, timeouts and the outbound user agent are the
//! adapter's concern.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because transport errors are adapter-specific.
//! - Every error is fatal for the run; callers do not retry.

use url::Url;

/// Port trait for retrieving feed documents
#[async_trait::async_trait]
pub trait IDocumentFetcher: Send + Sync {
    /// Fetches the document at `url` and returns its body as text
    ///
    /// # Errors
    /// Returns an error on network failure, timeout or a non-success status
    async fn fetch(&self, url: &Url) -> anyhow::Result<String>;
}
