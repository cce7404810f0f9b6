//! Error types for persistence operations.

use thiserror::Error;

/// Errors that can occur while loading or saving snapshots.
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot was written by a newer, incompatible version
    #[error("Snapshot version {found} is newer than supported version {supported}")]
    VersionTooNew {
        /// Version found in the file
        found: String,
        /// Version this build writes
        supported: String,
    },

    /// Backend refused the write
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
