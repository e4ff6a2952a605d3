//! Error types for pixel operations.

use thiserror::Error;

/// Pixel operation error.
#[derive(Debug, Error)]
pub enum OpsError {
    /// The transform reads channels 0/1/2 of each pixel, so a pixel must be
    /// at least three bytes wide.
    #[error("pixel stride {stride} too small, the transform needs 3 color channels")]
    StrideTooSmall {
        /// The stride that was supplied.
        stride: usize,
    },
}

/// Result type for pixel operations.
pub type OpsResult<T> = Result<T, OpsError>;
