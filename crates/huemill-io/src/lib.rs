//! # huemill-io
//!
//! Raster image I/O for the huemill pipeline.
//!
//! Reads and writes the formats the recolor tool accepts:
//!
//! - **PNG** - 8-bit RGB/RGBA and grayscale variants; 16-bit narrowed to 8
//! - **JPEG** - 8-bit RGB and grayscale
//!
//! # Channel Order
//!
//! Decoded buffers are interleaved 8-bit **BGR(A)**: channel indices 0/1/2
//! carry (blue, green, red), which is the order the recolor transform reads.
//! Codecs that produce RGB are swapped at decode and swapped back at encode.
//! Grayscale inputs are promoted to 3-channel color so every buffer handed to
//! the pipeline carries the three channels the transform classifies on.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use huemill_io::{read, write};
//!
//! // Read any supported format (detected by extension)
//! let image = read("input.png")?;
//!
//! // Write to a different format
//! write("output.jpg", &image)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod format;
pub mod jpeg;
pub mod png;

pub use error::{IoError, IoResult};
pub use format::Format;

use huemill_core::ImageMeta;
use std::path::Path;
use tracing::debug;

/// A decoded raster: layout plus interleaved BGR(A) pixel bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Buffer layout.
    pub meta: ImageMeta,
    /// Interleaved pixel bytes, `meta.total_bytes()` long.
    pub data: Vec<u8>,
}

impl Raster {
    /// Wraps pixel bytes with their layout, validating the length.
    pub fn new(meta: ImageMeta, data: Vec<u8>) -> IoResult<Self> {
        if data.len() != meta.total_bytes() {
            return Err(IoError::BufferMismatch {
                expected: meta.total_bytes(),
                got: data.len(),
            });
        }
        Ok(Self { meta, data })
    }

    /// Consumes the raster, returning the pixel bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Reads an image from a file, detecting the format by extension.
///
/// # Errors
///
/// [`IoError::UnsupportedFormat`] for unknown extensions, [`IoError::Io`] /
/// [`IoError::Decode`] for unreadable or corrupt files.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading image");
    match Format::from_extension(path) {
        Format::Png => png::read(path),
        Format::Jpeg => jpeg::read(path),
        Format::Unknown => Err(IoError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Writes a raster to a file, detecting the format by extension.
pub fn write<P: AsRef<Path>>(path: P, raster: &Raster) -> IoResult<()> {
    let path = path.as_ref();
    debug!(
        path = %path.display(),
        width = raster.meta.width,
        height = raster.meta.height,
        "writing image"
    );
    match Format::from_extension(path) {
        Format::Png => png::write(path, raster),
        Format::Jpeg => jpeg::write(path, raster),
        Format::Unknown => Err(IoError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Swaps the red and blue bytes of every whole pixel in place.
pub(crate) fn swap_red_blue(data: &mut [u8], pixel_stride: usize) {
    if pixel_stride < 3 {
        return;
    }
    for px in data.chunks_exact_mut(pixel_stride) {
        px.swap(0, 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_validates_length() {
        let meta = ImageMeta::new(2, 2, 3).unwrap();
        assert!(Raster::new(meta, vec![0; 12]).is_ok());
        assert!(matches!(
            Raster::new(meta, vec![0; 11]),
            Err(IoError::BufferMismatch {
                expected: 12,
                got: 11
            })
        ));
    }

    #[test]
    fn test_swap_red_blue_leaves_middle_channels() {
        let mut data = vec![1u8, 2, 3, 4, 10, 20, 30, 40];
        swap_red_blue(&mut data, 4);
        assert_eq!(data, [3, 2, 1, 4, 30, 20, 10, 40]);
    }

    #[test]
    fn test_swap_red_blue_is_an_involution() {
        let original = vec![9u8, 8, 7, 6, 5, 4];
        let mut data = original.clone();
        swap_red_blue(&mut data, 3);
        swap_red_blue(&mut data, 3);
        assert_eq!(data, original);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(matches!(
            read("input.tiff"),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
