//! wodmirror Feed - blog client and HTML extraction
//!
//! Provides:
//! - An HTTP transport for listing and detail pages
//! - One-time resolution of the outbound user agent
//! - Parsing of listing pages into ordered item references
//! - Extraction of a post's detail page into a [`Record`]
//!
//! ## Modules
//!
//! - [`client`] - `reqwest` based [`IDocumentFetcher`] adapter
//! - [`user_agent`] - picks a current browser user agent at startup
//! - [`listing`] - Listing Walker: `<article>` entries in page order
//! - [`article`] - Item Extractor: hero image and body text
//!
//! [`Record`]: wodmirror_core::domain::Record
//! [`IDocumentFetcher`]: wodmirror_core::ports::IDocumentFetcher

pub mod article;
pub mod client;
pub mod listing;
pub mod user_agent;

use thiserror::Error;
use wodmirror_core::domain::DomainError;

/// Errors that can occur while talking to the feed or reading its pages
#[derive(Debug, Error)]
pub enum FeedError {
    /// A network-level error occurred (connection, TLS, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// A required element or attribute is absent from a page
    #[error("Missing {field} in {context}")]
    MissingField {
        /// Which piece of the document was expected
        field: &'static str,
        /// Where it was expected (entry index, page URL)
        context: String,
    },

    /// A response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No user agent in the published list matches the requested platform
    #[error("No user agent found for os '{os}' and browser '{browser}'")]
    NoUserAgent {
        /// Requested operating system
        os: String,
        /// Requested browser
        browser: String,
    },

    /// A CSS selector failed to compile
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// A value read from the page failed domain validation
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// Compiles a CSS selector, mapping failures into [`FeedError`]
pub(crate) fn compile_selector(css: &str) -> Result<scraper::Selector, FeedError> {
    scraper::Selector::parse(css).map_err(|e| FeedError::InvalidSelector(format!("{css}: {e:?}")))
}
