//! Item Extractor
//!
//! Turns a post's detail page into a [`Record`]:
//!
//! - hero image: `src` of the `<img>` inside `.gh-article-image`, made
//!   absolute; empty when the post has none
//! - body: text of the `.is-body` block, with a newline after every
//!   paragraph so that flattening does not glue paragraphs together
//! - `published_at` and `source_url` come from the listing reference,
//!   never from the detail page

use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;
use wodmirror_core::domain::{ItemReference, Record};

use crate::{compile_selector, FeedError};

const IMAGE_CONTAINER_SELECTOR: &str = ".gh-article-image";
const IMAGE_SELECTOR: &str = "img";
const BODY_SELECTOR: &str = ".is-body";

/// Elements whose end is rendered as a line break in the flattened body.
const PARAGRAPH_TAGS: &[&str] = &["p"];

/// Extractor for post detail pages
#[derive(Debug)]
pub struct ArticleExtractor {
    base: Url,
    image_container: Selector,
    image: Selector,
    body: Selector,
}

impl ArticleExtractor {
    /// Creates an extractor resolving relative image sources against `base`
    pub fn new(base: Url) -> Result<Self, FeedError> {
        Ok(Self {
            base,
            image_container: compile_selector(IMAGE_CONTAINER_SELECTOR)?,
            image: compile_selector(IMAGE_SELECTOR)?,
            body: compile_selector(BODY_SELECTOR)?,
        })
    }

    /// Builds the record for `reference` from its detail page
    ///
    /// # Errors
    /// Returns [`FeedError::MissingField`] if the page has no body block
    pub fn extract(&self, html: &str, reference: &ItemReference) -> Result<Record, FeedError> {
        let document = Html::parse_document(html);

        let body = document
            .select(&self.body)
            .next()
            .ok_or_else(|| FeedError::MissingField {
                field: "body",
                context: reference.url.to_string(),
            })?;

        let content = flatten_text(body).trim().to_string();
        let image_url = self.image_url(&document, reference);

        Ok(Record {
            published_at: reference.published_at.clone(),
            content,
            image_url,
            source_url: reference.url.clone(),
        })
    }

    fn image_url(&self, document: &Html, reference: &ItemReference) -> String {
        let Some(src) = document
            .select(&self.image_container)
            .next()
            .and_then(|container| container.select(&self.image).next())
            .and_then(|img| img.value().attr("src"))
        else {
            return String::new();
        };

        match self.base.join(src.trim()) {
            Ok(url) => url.into(),
            Err(e) => {
                warn!(url = %reference.url, src, error = %e, "Ignoring unresolvable image source");
                String::new()
            }
        }
    }
}

/// Concatenates the text below `element`, appending `\n` after each paragraph
pub fn flatten_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_text(element, &mut out);
    out
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            push_text(child_element, out);
            if PARAGRAPH_TAGS.contains(&child_element.value().name()) {
                out.push('\n');
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}
