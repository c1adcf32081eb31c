//! Error types for reconstruction and export.

use mask_io::IoError;
use thiserror::Error;

/// Result type for reconstruction.
pub type ReconstructResult<T> = Result<T, ReconstructError>;

/// Errors that abort a reconstruction before or during the build.
///
/// A label producing empty geometry is *not* an error: that label is simply
/// absent from the result and the build continues.
#[derive(Debug, Error)]
pub enum ReconstructError {
    /// The input volume is unusable (no voxels). Detected before any
    /// concurrent work starts; nothing is built.
    #[error("invalid input volume: {reason}")]
    InvalidInput {
        /// Why the volume was rejected.
        reason: String,
    },

    /// The volume is valid but contains no positive labels; nothing to
    /// reconstruct.
    #[error("no positive labels found in mask")]
    NoLabelsFound,

    /// The build was cancelled via its [`CancelToken`](crate::CancelToken)
    /// before all labels were processed.
    #[error("reconstruction cancelled")]
    Cancelled,
}

impl ReconstructError {
    /// Create an `InvalidInput` error with the given reason.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Errors raised by the exporters.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Export was requested with no reconstructed surfaces; no file is
    /// written.
    #[error("mesh collection is empty; nothing to export")]
    EmptyCollection,

    /// The underlying writer failed. No retry is attempted and a partial
    /// file may remain.
    #[error("write failed: {0}")]
    Write(#[from] IoError),
}
