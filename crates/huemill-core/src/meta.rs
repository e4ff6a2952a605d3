//! Image buffer layout and participant identity.
//!
//! [`ImageMeta`] describes an interleaved 8-bit raster buffer without owning
//! its bytes; it is the value the coordinator broadcasts to the group so every
//! rank can derive the same partition table. [`Rank`] is a participant's fixed
//! identity within the group.

use crate::{Error, Result};
use std::fmt;

/// Layout of an interleaved 8-bit image buffer.
///
/// Pixels are stored row-major, `channels` bytes per pixel, channel order
/// (blue, green, red\[, alpha\]). The recolor transform reads channel indices
/// 0/1/2 as (b, g, r); the io layer is responsible for producing buffers in
/// this order.
///
/// # Example
///
/// ```
/// use huemill_core::ImageMeta;
///
/// let meta = ImageMeta::new(640, 480, 3).unwrap();
/// assert_eq!(meta.total_pixels(), 640 * 480);
/// assert_eq!(meta.total_bytes(), 640 * 480 * 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMeta {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bytes per pixel (channel count), at least 1.
    pub channels: u8,
}

impl ImageMeta {
    /// Creates a layout description, validating that the buffer size is
    /// addressable.
    pub fn new(width: u32, height: u32, channels: u8) -> Result<Self> {
        if channels == 0 {
            return Err(Error::NoChannels);
        }
        let overflow = Error::DimensionOverflow {
            width,
            height,
            channels,
        };
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(channels as usize))
            .ok_or(overflow)?;
        Ok(Self {
            width,
            height,
            channels,
        })
    }

    /// Bytes occupied by one pixel.
    #[inline]
    pub fn pixel_stride(&self) -> usize {
        self.channels as usize
    }

    /// Total pixel count.
    #[inline]
    pub fn total_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Total buffer length in bytes.
    #[inline]
    pub fn total_bytes(&self) -> usize {
        self.total_pixels() * self.pixel_stride()
    }
}

/// Identity of one participant in the fixed worker group.
///
/// Ranks are dense integers in `[0, participant_count)`, fixed for a
/// participant's lifetime. Rank 0 is the designated coordinator: the only
/// participant that decodes input, receives the gathered buffer, and encodes
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(
    /// Zero-based rank index.
    pub usize,
);

impl Rank {
    /// The designated coordinator rank.
    pub const COORDINATOR: Rank = Rank(0);

    /// Returns `true` for the coordinator.
    #[inline]
    pub fn is_coordinator(self) -> bool {
        self == Self::COORDINATOR
    }

    /// The rank as a table index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rank {}", self.0)
    }
}
