//! Error types for cellbench.

use std::io;
use thiserror::Error;

/// Error type for every fallible cellbench operation.
#[derive(Debug, Error)]
pub enum CellbenchError {
    /// A chemistry name that is not one of the known profiles.
    #[error("unknown cell chemistry '{0}' (expected one of LFP, NMC, LTO, LiCoO2)")]
    InvalidChemistry(String),

    /// A bench configuration value outside its allowed range.
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidConfig {
        /// The offending configuration key.
        key: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// Filesystem error while loading a config or writing an export.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON in a config file or export.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for cellbench operations.
pub type Result<T> = std::result::Result<T, CellbenchError>;
