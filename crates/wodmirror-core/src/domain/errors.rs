//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! mostly validation failures of values that end up in artifact names.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Published timestamp is empty or cannot be used in a file name
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// URL could not be parsed or resolved
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
