//! # huemill-core
//!
//! Core types for the huemill distributed recoloring pipeline.
//!
//! This crate provides the foundational types shared by every other huemill
//! crate:
//!
//! - [`ImageMeta`] - Image buffer layout (dimensions, channel count)
//! - [`Rank`] - Participant identity within the fixed worker group
//! - [`PartitionTable`] - Deterministic, pixel-aligned split of a buffer
//!   across ranks
//!
//! ## Design Philosophy
//!
//! Every participant in the worker group must be able to compute the exact
//! same partition table from the same inputs with no communication, because
//! the collective scatter/gather operations trust each rank's self-reported
//! chunk size and offset to match what every other participant expects. All
//! types here are therefore plain values with deterministic constructors.
//!
//! ## Crate Structure
//!
//! This crate is the foundation of huemill and has no internal dependencies.
//! All other huemill crates depend on `huemill-core`:
//!
//! ```text
//! huemill-core (this crate)
//!    ^
//!    |
//!    +-- huemill-ops (pixel transform)
//!    +-- huemill-comm (collective substrate)
//!    +-- huemill-io (decode/encode)
//!    +-- huemill-pipeline (orchestration)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod meta;
pub mod partition;

pub use error::{Error, Result};
pub use meta::{ImageMeta, Rank};
pub use partition::{split_even, PartitionTable, Span};
