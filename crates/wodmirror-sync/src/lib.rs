//! wodmirror Sync - incremental feed synchronization
//!
//! Provides:
//! - Page-by-page, item-by-item traversal of the feed, newest first
//! - Incremental stop at the first already-captured record
//! - Full mode that walks everything without overwriting
//! - A write-once JSON store, one artifact per record
//!
//! ## Modules
//!
//! - [`engine`] - Sync engine orchestrating fetch, extract and persist
//! - [`store`] - JSON file adapter for the record store port

pub mod engine;
pub mod store;

use thiserror::Error;

/// Errors that can occur during synchronization operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error occurred during file operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A record could not be serialized or read back
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
