//! # huemill-ops
//!
//! Pixel operations for the huemill recoloring pipeline.
//!
//! The one operation this crate ships is the in-place yellow-range blue
//! suppression applied by every worker to its own chunk of the image buffer.
//! It is a pure per-pixel map: each pixel's result depends only on its own
//! channel bytes, so chunks can be processed in any order and, with the
//! `parallel` feature (default), the pixels within a chunk are processed on
//! the rayon thread pool.
//!
//! # Example
//!
//! ```
//! use huemill_ops::suppress_yellow;
//!
//! // One yellow-ish BGR pixel: low blue, red and green close together.
//! let mut chunk = vec![10u8, 100, 110];
//! suppress_yellow(&mut chunk, 3).unwrap();
//! assert_eq!(chunk, [2, 100, 110]);
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` - Process pixels within a chunk on the rayon thread pool
//!   (enabled by default). Output is byte-identical to the serial path.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod recolor;

pub use error::{OpsError, OpsResult};
pub use recolor::{scale_factor, suppress_yellow};
