//! Record store port (driven/secondary port)
//!
//! This module defines the interface for persisting captured records.
//! The store is write-once: a key that exists is never overwritten or
//! deleted. It doubles as the sync checkpoint, since there is no separate
//! cursor between runs.

use crate::domain::{Record, RecordKey};

/// Result of a [`IRecordStore::write`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The record was persisted under a new key
    Written,
    /// An artifact already existed for the key and was left untouched
    AlreadyExists,
}

/// Port trait for persistent record storage
///
/// ## Implementation Notes
///
/// - `write` must not overwrite; check-and-create has to be atomic per key
///   so that a concurrent writer can never clobber an existing artifact.
/// - `write` creates whatever container (directory, table) it needs.
#[async_trait::async_trait]
pub trait IRecordStore: Send + Sync {
    /// Returns true if an artifact exists for `key`
    async fn exists(&self, key: &RecordKey) -> anyhow::Result<bool>;

    /// Persists `record` under `key` unless the key is already taken
    async fn write(&self, key: &RecordKey, record: &Record) -> anyhow::Result<WriteOutcome>;
}
