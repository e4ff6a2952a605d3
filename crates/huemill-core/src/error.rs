//! Error types for huemill-core operations.
//!
//! Covers the failure modes of buffer layout and partition construction.
//! Higher-level crates wrap [`Error`] into their own error enums.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while describing or partitioning an image buffer.
#[derive(Debug, Error)]
pub enum Error {
    /// A partition was requested for an empty participant group.
    ///
    /// Zero-byte buffers are fine (every span comes out empty), but zero
    /// participants leaves nowhere to place the bytes.
    #[error("cannot partition across zero participants")]
    NoParticipants,

    /// Image dimensions overflow the addressable byte range.
    ///
    /// Returned when `width * height * channels` does not fit in `usize`.
    #[error("image dimensions {width}x{height}x{channels} overflow the buffer size")]
    DimensionOverflow {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
        /// Channel count per pixel.
        channels: u8,
    },

    /// A pixel needs at least one channel byte.
    #[error("invalid channel count: 0")]
    NoChannels,

    /// A rank outside `[0, participant_count)` was used to index a table.
    #[error("rank {rank} out of range for {ranks} participants")]
    RankOutOfRange {
        /// The offending rank index.
        rank: usize,
        /// Number of participants the table was built for.
        ranks: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_inputs() {
        let err = Error::DimensionOverflow {
            width: 1 << 31,
            height: 1 << 31,
            channels: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("2147483648"));
        assert!(msg.contains('4'));

        let err = Error::RankOutOfRange { rank: 7, ranks: 4 };
        assert!(err.to_string().contains('7'));
    }
}
