//! Error types for raster I/O.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error.
    #[error("decode error: {0}")]
    Decode(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    Encode(String),

    /// Unsupported bit depth.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(String),

    /// Unsupported color layout.
    #[error("unsupported color type: {0}")]
    UnsupportedColorType(String),

    /// Pixel data does not match the declared layout.
    #[error("buffer length {got} does not match layout ({expected} bytes)")]
    BufferMismatch {
        /// Bytes the layout requires.
        expected: usize,
        /// Bytes actually supplied.
        got: usize,
    },

    /// Invalid buffer layout.
    #[error(transparent)]
    Layout(#[from] huemill_core::Error),
}

/// Result type for raster I/O.
pub type IoResult<T> = Result<T, IoError>;
