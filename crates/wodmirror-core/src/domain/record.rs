//! Feed items, persisted records and their identity
//!
//! A post travels through three shapes:
//!
//! 1. [`ItemReference`] - what a listing page tells us (link + timestamp)
//! 2. [`Record`] - what the detail page yields once extracted
//! 3. [`RecordKey`] - the name the record is stored under
//!
//! The key is content-addressed: [`ShortId::derive`] hashes the canonical
//! URL, so re-deriving it from the same URL on another run or machine
//! yields the same artifact name. That is what makes the "already synced"
//! check idempotent.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use url::Url;

use super::errors::DomainError;

// ============================================================================
// PublishedAt
// ============================================================================

/// Publication timestamp exactly as the feed publishes it
///
/// Kept as an opaque string (ISO-8601, date-only values included) because
/// it is only ever echoed into the record and the artifact name. Values
/// that would break a file name are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublishedAt(String);

impl PublishedAt {
    /// Create a new validated PublishedAt
    ///
    /// # Errors
    /// Returns error if the value is blank or contains `/`, `\` or NUL
    pub fn new(value: String) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidTimestamp(
                "Timestamp cannot be empty".to_string(),
            ));
        }
        if trimmed.contains(['/', '\\', '\0']) {
            return Err(DomainError::InvalidTimestamp(format!(
                "Timestamp contains a path separator: {trimmed}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PublishedAt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PublishedAt {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PublishedAt> for String {
    fn from(value: PublishedAt) -> Self {
        value.0
    }
}

// ============================================================================
// ShortId
// ============================================================================

/// Fixed-length, content-addressed identifier of a post
///
/// The first 8 hex characters of the SHA-1 digest of the post URL.
/// This is an identity scheme, not a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortId(String);

impl ShortId {
    /// Number of hex characters kept from the digest
    pub const LEN: usize = 8;

    /// Derive the identifier for a URL
    ///
    /// Hashes the UTF-8 bytes of the exact string, so the result is the
    /// same on every process and machine.
    #[must_use]
    pub fn derive(url: &str) -> Self {
        let digest = Sha1::digest(url.as_bytes());
        let mut hex = hex::encode(digest);
        hex.truncate(Self::LEN);
        Self(hex)
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ItemReference
// ============================================================================

/// One entry of a listing page: where the post lives and when it was published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReference {
    /// Absolute URL of the detail page
    pub url: Url,
    /// Timestamp from the listing entry
    pub published_at: PublishedAt,
}

impl ItemReference {
    pub fn new(url: Url, published_at: PublishedAt) -> Self {
        Self { url, published_at }
    }
}

// ============================================================================
// Record
// ============================================================================

/// A captured post, the unit of persistence
///
/// Field names on disk follow the established artifact layout
/// (`date`, `content`, `image`, `url`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "date")]
    pub published_at: PublishedAt,
    /// Body text with paragraph boundaries kept as newlines
    pub content: String,
    /// Absolute hero image URL, empty when the post has none
    #[serde(rename = "image")]
    pub image_url: String,
    /// Canonical detail page URL
    #[serde(rename = "url")]
    pub source_url: Url,
}

impl Record {
    /// Key this record is stored under
    pub fn key(&self) -> RecordKey {
        RecordKey::for_record(self)
    }
}

// ============================================================================
// RecordKey
// ============================================================================

/// Name of a persisted record: `(published_at, short_id)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    published_at: PublishedAt,
    short_id: ShortId,
}

impl RecordKey {
    pub fn new(published_at: PublishedAt, short_id: ShortId) -> Self {
        Self {
            published_at,
            short_id,
        }
    }

    /// Derive the key of a record from its timestamp and source URL
    pub fn for_record(record: &Record) -> Self {
        Self::new(
            record.published_at.clone(),
            ShortId::derive(record.source_url.as_str()),
        )
    }

    /// Artifact file name, e.g. `2024-01-15T06:00:00.000Z_a9993e36.json`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_{}.json", self.published_at, self.short_id)
    }
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.published_at, self.short_id)
    }
}
