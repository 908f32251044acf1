//! Feed synchronization engine
//!
//! The [`SyncEngine`] mirrors the blog into the record store, newest post
//! first, one request at a time.
//!
//! ## Sync Flow
//!
//! For page = 1, 2, ... up to `feed.max_pages`:
//!
//! 1. **Listing**: fetch `{base}/page/{page}/` and parse it into item
//!    references, in document order. No references means end of feed.
//! 2. **Items**: for each reference, fetch the detail page, extract the
//!    record and derive its key.
//! 3. **Stop check**: in incremental mode, the first key already in the
//!    store ends the run. Everything older was captured by an earlier run.
//! 4. **Persist**: write the record. The store never overwrites, so in full
//!    mode existing records are left as they are.
//!
//! Every error is fatal: there is no retry and no partial-page recovery.
//! The store itself is the checkpoint, so re-running resumes naturally.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use wodmirror_core::config::{Config, FeedConfig};
use wodmirror_core::domain::{ItemReference, Record, RecordKey};
use wodmirror_core::ports::{IDocumentFetcher, IRecordStore, WriteOutcome};
use wodmirror_feed::article::ArticleExtractor;
use wodmirror_feed::listing::ListingParser;

// ============================================================================
// SyncMode
// ============================================================================

/// How a run treats records that are already in the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Stop at the first record that already exists
    #[default]
    Incremental,
    /// Walk the whole feed; existing records are kept, new ones added
    Full,
}

impl SyncMode {
    /// Maps the CLI's `--full` flag to a mode
    pub fn from_full_flag(full: bool) -> Self {
        if full {
            Self::Full
        } else {
            Self::Incremental
        }
    }

    /// Whether finding an existing record ends the run
    pub fn stops_at_existing(self) -> bool {
        matches!(self, Self::Incremental)
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incremental => write!(f, "incremental"),
            Self::Full => write!(f, "full"),
        }
    }
}

// ============================================================================
// SyncReport
// ============================================================================

/// Why a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Incremental mode met a record captured by an earlier run
    CaughtUp {
        /// Key of the existing record
        key: RecordKey,
        /// Listing page it was found on
        page: u32,
    },
    /// A listing page had no entries
    EndOfFeed {
        /// The empty page
        page: u32,
    },
    /// The page ceiling was reached
    PageLimit {
        /// Configured ceiling
        max_pages: u32,
    },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CaughtUp { key, page } => {
                write!(f, "caught up at {key} (page {page})")
            }
            Self::EndOfFeed { page } => write!(f, "end of feed (page {page} was empty)"),
            Self::PageLimit { max_pages } => write!(f, "page limit of {max_pages} reached"),
        }
    }
}

/// Summary of a completed synchronization run
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Mode the run used
    pub mode: SyncMode,
    /// Listing pages fetched
    pub pages_visited: u32,
    /// Records newly persisted
    pub records_written: u32,
    /// Records extracted but left alone because their key was taken
    pub records_skipped: u32,
    /// Terminal condition
    pub stop_reason: StopReason,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,
}

/// Counters accumulated while a run is in progress
#[derive(Debug, Default)]
struct Progress {
    pages_visited: u32,
    records_written: u32,
    records_skipped: u32,
}

/// Result of handling one listing page
enum PageOutcome {
    /// Move on to the next page
    Continue,
    /// End the run
    Stop(StopReason),
}

// ============================================================================
// SyncEngine
// ============================================================================

/// Incremental mirror of a paginated blog feed
///
/// ## Dependencies
///
/// - `fetcher`: retrieves listing and detail pages
/// - `store`: write-once record persistence, also the sync checkpoint
/// - `listing` / `extractor`: HTML parsing, built from the feed base URL
pub struct SyncEngine {
    fetcher: Arc<dyn IDocumentFetcher>,
    store: Arc<dyn IRecordStore>,
    feed: FeedConfig,
    listing: ListingParser,
    extractor: ArticleExtractor,
}

impl SyncEngine {
    /// Creates a new `SyncEngine` with the given dependencies
    ///
    /// # Errors
    /// Returns an error if `feed.base_url` is not a valid URL
    pub fn new(
        fetcher: Arc<dyn IDocumentFetcher>,
        store: Arc<dyn IRecordStore>,
        config: &Config,
    ) -> Result<Self> {
        let base = config.feed.base_url()?;
        Ok(Self {
            fetcher,
            store,
            feed: config.feed.clone(),
            listing: ListingParser::new(base.clone())?,
            extractor: ArticleExtractor::new(base)?,
        })
    }

    /// Runs one synchronization pass
    ///
    /// # Returns
    /// A [`SyncReport`] describing what was written and why the run ended
    ///
    /// # Errors
    /// Any transport, extraction or storage failure aborts the run. Records
    /// persisted before the failure stay in the store.
    #[tracing::instrument(skip(self))]
    pub async fn sync(&self, mode: SyncMode) -> Result<SyncReport> {
        let start = std::time::Instant::now();
        let started_at = Utc::now();

        info!(
            %mode,
            base_url = %self.feed.base_url,
            max_pages = self.feed.max_pages,
            "Starting sync"
        );

        let mut progress = Progress::default();
        let stop_reason = self.walk(mode, &mut progress).await?;

        let report = SyncReport {
            mode,
            pages_visited: progress.pages_visited,
            records_written: progress.records_written,
            records_skipped: progress.records_skipped,
            stop_reason,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            pages = report.pages_visited,
            written = report.records_written,
            skipped = report.records_skipped,
            stop = %report.stop_reason,
            duration_ms = report.duration_ms,
            "Sync finished"
        );

        Ok(report)
    }

    async fn walk(&self, mode: SyncMode, progress: &mut Progress) -> Result<StopReason> {
        for page in 1..=self.feed.max_pages {
            progress.pages_visited += 1;
            if let PageOutcome::Stop(reason) = self.sync_page(page, mode, progress).await? {
                return Ok(reason);
            }
        }

        info!(max_pages = self.feed.max_pages, "Reached page limit");
        Ok(StopReason::PageLimit {
            max_pages: self.feed.max_pages,
        })
    }

    async fn sync_page(
        &self,
        page: u32,
        mode: SyncMode,
        progress: &mut Progress,
    ) -> Result<PageOutcome> {
        let listing_url = self.feed.listing_url(page)?;
        info!(page, url = %listing_url, "Crawling listing page");

        let html = self
            .fetcher
            .fetch(&listing_url)
            .await
            .with_context(|| format!("Failed to fetch listing page {page}"))?;
        let references = self
            .listing
            .parse(&html)
            .with_context(|| format!("Failed to parse listing page {page}"))?;

        if references.is_empty() {
            info!(page, "Listing page is empty, reached end of feed");
            return Ok(PageOutcome::Stop(StopReason::EndOfFeed { page }));
        }

        debug!(page, items = references.len(), "Listing page parsed");

        for reference in &references {
            let record = self.capture(reference).await?;
            let key = record.key();

            if mode.stops_at_existing()
                && self
                    .store
                    .exists(&key)
                    .await
                    .with_context(|| format!("Failed to check store for {key}"))?
            {
                info!(page, key = %key, "Record already exists, sync caught up");
                return Ok(PageOutcome::Stop(StopReason::CaughtUp { key, page }));
            }

            match self
                .store
                .write(&key, &record)
                .await
                .with_context(|| format!("Failed to save record {key}"))?
            {
                WriteOutcome::Written => {
                    progress.records_written += 1;
                    info!(url = %record.source_url, key = %key, "Saved record");
                }
                WriteOutcome::AlreadyExists => {
                    progress.records_skipped += 1;
                    debug!(key = %key, "Record already exists, left untouched");
                }
            }
        }

        Ok(PageOutcome::Continue)
    }

    /// Fetches a post's detail page and extracts its record
    async fn capture(&self, reference: &ItemReference) -> Result<Record> {
        let html = self
            .fetcher
            .fetch(&reference.url)
            .await
            .with_context(|| format!("Failed to fetch post {}", reference.url))?;

        let record = self
            .extractor
            .extract(&html, reference)
            .with_context(|| format!("Failed to extract post {}", reference.url))?;

        Ok(record)
    }
}
