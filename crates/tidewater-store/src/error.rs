//! Error types for the storage layer.
//!
//! All errors are propagated via [`StoreError`] which wraps the underlying
//! I/O and `serde_json` errors with the path that was being touched.

use std::path::PathBuf;

/// Errors that can occur while reading or writing save files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A serialization or deserialization error.
    #[error("serialization error in {path}: {source}")]
    Serialization {
        /// The file being encoded or decoded.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Build an [`StoreError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`StoreError::Serialization`] for `path`.
    pub fn serialization(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Serialization {
            path: path.into(),
            source,
        }
    }
}
