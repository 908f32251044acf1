//! Domain entities and business logic
//!
//! This module contains the core domain types for wodmirror:
//! - The validated `PublishedAt` timestamp and the derived `ShortId`
//! - Feed item references and the persisted `Record`
//! - The `RecordKey` naming scheme
//! - Domain-specific error types

pub mod errors;
pub mod record;

// Re-export commonly used types
pub use errors::DomainError;
pub use record::{ItemReference, PublishedAt, Record, RecordKey, ShortId};
