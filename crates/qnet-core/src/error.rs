//! # Core Error Types
//!
//! Errors for the foundational types. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Errors produced by qnet-core primitives.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timestamp input was malformed or not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Identifier string could not be parsed as a UUID.
    #[error("invalid identifier {kind}: {value}")]
    InvalidIdentifier {
        /// Identifier kind (e.g. "question", "answer", "user").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}
