//! Yellow-range blue suppression.
//!
//! Classifies each pixel by the ratios of its red channel to its green and
//! blue channels, and multiplicatively scales the blue channel down for
//! pixels in the yellow range. Wide ratio windows with gentler factors smooth
//! the transition at the edges of the selection.
//!
//! Pixels are interleaved (blue, green, red\[, alpha\]); only the blue byte is
//! ever written, and channels past the first three are never read.

use crate::{OpsError, OpsResult};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

/// Returns the blue-scale factor a pixel's classification earns, if any.
///
/// A zero blue or green channel makes the ratios undefined; such pixels fail
/// every classification and are left unmodified rather than producing NaN or
/// infinity downstream.
///
/// # Example
///
/// ```
/// use huemill_ops::scale_factor;
///
/// assert_eq!(scale_factor(10, 100, 110), Some(0.25));
/// assert_eq!(scale_factor(200, 100, 90), None); // blue not low enough
/// ```
#[inline]
pub fn scale_factor(b: u8, g: u8, r: u8) -> Option<f32> {
    if b == 0 || g == 0 {
        return None;
    }
    let rb = f32::from(r) / f32::from(b);
    if rb <= 0.5 {
        return None;
    }
    let rg = f32::from(r) / f32::from(g);
    if rg > 0.75 && rg < 1.50 {
        Some(0.25)
    } else if rg > 0.50 && rg < 1.75 {
        Some(0.75)
    } else if rg > 0.25 && rg < 2.50 {
        Some(0.95)
    } else {
        None
    }
}

#[inline]
fn recolor_pixel(px: &mut [u8]) {
    if let Some(factor) = scale_factor(px[0], px[1], px[2]) {
        // Truncates toward zero; factor <= 1 keeps the result in range.
        px[0] = (f32::from(px[0]) * factor) as u8;
    }
}

/// Applies the yellow-range blue suppression to `chunk` in place.
///
/// `chunk` holds interleaved pixels of `pixel_stride` bytes each. A trailing
/// partial pixel is left untouched rather than read out of bounds; an empty
/// chunk is a no-op. With the `parallel` feature the pixels are processed on
/// the rayon thread pool with byte-identical results.
///
/// # Errors
///
/// [`OpsError::StrideTooSmall`] if `pixel_stride < 3`.
///
/// # Example
///
/// ```
/// use huemill_ops::suppress_yellow;
///
/// let mut chunk = vec![200u8, 100, 150, 200, 100, 90];
/// suppress_yellow(&mut chunk, 3).unwrap();
/// assert_eq!(chunk, [150, 100, 150, 200, 100, 90]);
/// ```
pub fn suppress_yellow(chunk: &mut [u8], pixel_stride: usize) -> OpsResult<()> {
    if pixel_stride < 3 {
        return Err(OpsError::StrideTooSmall {
            stride: pixel_stride,
        });
    }
    trace!(len = chunk.len(), pixel_stride, "suppress_yellow");

    #[cfg(feature = "parallel")]
    chunk
        .par_chunks_exact_mut(pixel_stride)
        .for_each(recolor_pixel);

    #[cfg(not(feature = "parallel"))]
    chunk.chunks_exact_mut(pixel_stride).for_each(recolor_pixel);

    Ok(())
}
