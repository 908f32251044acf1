//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IDocumentFetcher`] - Retrieves listing and detail pages over HTTP
//! - [`IRecordStore`] - Persistent, write-once storage for captured records

pub mod document_fetcher;
pub mod record_store;

pub use document_fetcher::IDocumentFetcher;
pub use record_store::{IRecordStore, WriteOutcome};
