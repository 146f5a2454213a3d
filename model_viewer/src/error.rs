//! Error types for the model viewer
//!
//! This module defines the error types used throughout the crate,
//! including scene decoding, path addressing, and camera construction.

use std::fmt;

/// Result type for model viewer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Model viewer errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The scene buffer ended before a field could be read
    TruncatedInput {
        /// Cursor position of the failed read
        offset: usize,
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the buffer at `offset`
        available: usize,
    },

    /// A patch or lookup referenced a path that does not exist
    PathNotFound(String),

    /// Camera parameters are inconsistent (e.g. radius below the minimum)
    InvalidCameraConfiguration(String),

    /// The scene tree is nested deeper than the decoder allows
    NestingTooDeep {
        /// Configured depth limit
        limit: usize,
    },

    /// A model identifier does not index into the geometry table
    ModelOutOfRange {
        /// Offending model identifier
        model_id: u32,
        /// Number of models in the geometry table
        model_count: u32,
    },

    /// Error reported by the rendering backend (GPU upload, draw submission)
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TruncatedInput { offset, needed, available } => write!(
                f,
                "Truncated input: needed {} bytes at offset {}, {} available",
                needed, offset, available
            ),
            Error::PathNotFound(path) => write!(f, "Path not found: '{}'", path),
            Error::InvalidCameraConfiguration(msg) => {
                write!(f, "Invalid camera configuration: {}", msg)
            }
            Error::NestingTooDeep { limit } => {
                write!(f, "Scene nesting exceeds the limit of {} levels", limit)
            }
            Error::ModelOutOfRange { model_id, model_count } => write!(
                f,
                "Model {} is out of range (model table holds {})",
                model_id, model_count
            ),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
