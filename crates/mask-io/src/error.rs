//! Error types for maskmesh I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while loading volumes or writing surfaces.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// The volume file decoded, but its shape or metadata is unusable.
    #[error("invalid volume: {message}")]
    InvalidVolume {
        /// Description of what was invalid.
        message: String,
    },

    /// Invalid mesh file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// NIfTI decoding error.
    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Create an `InvalidVolume` error with the given message.
    #[must_use]
    pub fn invalid_volume(message: impl Into<String>) -> Self {
        Self::InvalidVolume {
            message: message.into(),
        }
    }
}
