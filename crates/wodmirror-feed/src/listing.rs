//! Listing Walker
//!
//! Turns one listing page into the ordered list of posts it links to.
//! Each `<article>` card contributes one [`ItemReference`]:
//!
//! - link: `href` of the first `<a href>` in the card, joined onto the base
//! - timestamp: `datetime` of the first `.gh-card-date` element in the card
//!
//! Order is document order (newest first on the feed), which the sync
//! engine's stop check relies on. A card missing either field aborts the
//! whole parse: skipping it would let the engine walk past a post it never
//! checked against the store.

use scraper::{ElementRef, Html, Selector};
use url::Url;
use wodmirror_core::domain::{DomainError, ItemReference, PublishedAt};

use crate::{compile_selector, FeedError};

const ARTICLE_SELECTOR: &str = "article";
const LINK_SELECTOR: &str = "a[href]";
const DATE_SELECTOR: &str = ".gh-card-date";
const DATE_ATTR: &str = "datetime";

/// Parser for listing pages
#[derive(Debug)]
pub struct ListingParser {
    base: Url,
    article: Selector,
    link: Selector,
    date: Selector,
}

impl ListingParser {
    /// Creates a parser resolving relative links against `base`
    pub fn new(base: Url) -> Result<Self, FeedError> {
        Ok(Self {
            base,
            article: compile_selector(ARTICLE_SELECTOR)?,
            link: compile_selector(LINK_SELECTOR)?,
            date: compile_selector(DATE_SELECTOR)?,
        })
    }

    /// Extracts item references from a listing page, top to bottom
    ///
    /// An empty result means the page has no posts (end of feed).
    ///
    /// # Errors
    /// Returns [`FeedError::MissingField`] for a card without a link or
    /// timestamp, and [`FeedError::Domain`] for an unusable link or timestamp.
    pub fn parse(&self, html: &str) -> Result<Vec<ItemReference>, FeedError> {
        let document = Html::parse_document(html);

        document
            .select(&self.article)
            .enumerate()
            .map(|(index, article)| self.parse_entry(index + 1, article))
            .collect()
    }

    fn parse_entry(&self, position: usize, article: ElementRef<'_>) -> Result<ItemReference, FeedError> {
        let href = article
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or_else(|| FeedError::MissingField {
                field: "link",
                context: format!("article #{position}"),
            })?;

        let url = self.base.join(href.trim()).map_err(|e| {
            DomainError::InvalidUrl(format!("article #{position} link '{href}': {e}"))
        })?;

        let datetime = article
            .select(&self.date)
            .next()
            .ok_or_else(|| FeedError::MissingField {
                field: "date element",
                context: format!("article #{position}"),
            })?
            .value()
            .attr(DATE_ATTR)
            .ok_or_else(|| FeedError::MissingField {
                field: "datetime attribute",
                context: format!("article #{position}"),
            })?;

        let published_at = PublishedAt::new(datetime.to_string())?;

        Ok(ItemReference::new(url, published_at))
    }
}
