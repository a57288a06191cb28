//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating or reading credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No credential file could be found.
    #[error("Credential file not found (searched: {})", display_paths(.searched))]
    NotFound {
        /// Paths that were checked, in order.
        searched: Vec<PathBuf>,
    },

    /// The credential file exists but could not be read.
    #[error("Failed to read credential file {}: {source}", .path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The credential file is not valid JSON of the expected shape.
    #[error("Invalid credential file {}: {source}", .path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A required key is absent.
    #[error("'{key}' is required in credential file: {}", .path.display())]
    MissingKey {
        /// Missing key.
        key: &'static str,
        /// File path.
        path: PathBuf,
    },

    /// A key is present but its value is unusable.
    #[error("Invalid '{key}' in credential file {}: {reason}", .path.display())]
    InvalidValue {
        /// Offending key.
        key: &'static str,
        /// File path.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
