//! JSON record store (secondary/driven adapter)
//!
//! Implements [`IRecordStore`] as a flat directory with one JSON file per
//! [`RecordKey`], named by [`RecordKey::file_name`].
//!
//! ## Design Decisions
//!
//! - **Write-once**: the record is written to a hidden temporary file and
//!   then hard-linked to its final name. Linking fails if the name is
//!   taken, so an existing artifact is never replaced and a crash never
//!   leaves a half-written artifact under a real name.
//! - **No hard links** (exFAT, some network and FUSE mounts): the artifact
//!   is created in place with `create_new`, which still refuses to replace
//!   an existing file.
//! - **Layout**: 4-space indented JSON, UTF-8 kept verbatim, no trailing
//!   newline, matching artifacts produced by earlier tooling.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};
use wodmirror_core::domain::{Record, RecordKey};
use wodmirror_core::ports::{IRecordStore, WriteOutcome};

use crate::SyncError;

/// Adapter that bridges the [`IRecordStore`] port to a directory of JSON files.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    root: PathBuf,
}

impl JsonRecordStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the artifacts.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the artifact for `key` lives (whether or not it exists).
    pub fn artifact_path(&self, key: &RecordKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn temp_path(&self, key: &RecordKey) -> PathBuf {
        self.root.join(format!(".{}.tmp", key.file_name()))
    }

    /// Serialize a record in the on-disk layout.
    pub fn to_bytes(record: &Record) -> Result<Vec<u8>, SyncError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        record.serialize(&mut serializer)?;
        Ok(buf)
    }

    /// Read back the record stored under `key`, if any.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn read(&self, key: &RecordKey) -> Result<Option<Record>, SyncError> {
        match tokio::fs::read(self.artifact_path(key)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_new(&self, key: &RecordKey, record: &Record) -> Result<WriteOutcome, SyncError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let bytes = Self::to_bytes(record)?;
        let target = self.artifact_path(key);
        let tmp_path = self.temp_path(key);

        debug!(?tmp_path, bytes = bytes.len(), "writing to temporary file");
        tokio::fs::write(&tmp_path, &bytes).await?;

        let linked = tokio::fs::hard_link(&tmp_path, &target).await;
        let cleanup = tokio::fs::remove_file(&tmp_path).await;

        let outcome = match linked {
            Ok(()) => WriteOutcome::Written,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => WriteOutcome::AlreadyExists,
            Err(e) => {
                debug!(error = %e, "hard link unavailable, creating artifact in place");
                create_new(&target, &bytes).await?
            }
        };
        cleanup?;

        debug!(?outcome, "write complete");
        Ok(outcome)
    }
}

/// Writes `bytes` to `path` only if nothing is there yet
async fn create_new(path: &Path, bytes: &[u8]) -> Result<WriteOutcome, SyncError> {
    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(WriteOutcome::AlreadyExists),
        Err(e) => return Err(e.into()),
    };

    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(WriteOutcome::Written)
}

#[async_trait::async_trait]
impl IRecordStore for JsonRecordStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn exists(&self, key: &RecordKey) -> anyhow::Result<bool> {
        let exists = tokio::fs::try_exists(self.artifact_path(key)).await?;
        Ok(exists)
    }

    #[instrument(skip(self, record), fields(key = %key))]
    async fn write(&self, key: &RecordKey, record: &Record) -> anyhow::Result<WriteOutcome> {
        Ok(self.write_new(key, record).await?)
    }
}
