//! Core error types for `outagesync`.

use thiserror::Error;

/// Core error type raised at the parse boundary of domain records.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A timestamp field could not be parsed.
    #[error("Invalid timestamp in '{field}': {value:?} ({reason})")]
    InvalidTimestamp {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value received.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// A record was structurally valid JSON but semantically invalid.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
