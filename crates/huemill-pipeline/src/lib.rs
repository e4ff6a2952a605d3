//! # huemill-pipeline
//!
//! Orchestration of the distributed recolor.
//!
//! The pipeline is SPMD: every participant runs [`process_image`] from the
//! top over its own [`Collective`](huemill_comm::Collective) handle. Rank 0
//! (the coordinator) decodes the input and encodes the output; every rank
//! computes the same partition table, receives its own chunk, transforms it
//! in place, and hands it back to the gather.
//!
//! Failure never strands the group: each fallible step that precedes a
//! blocking transfer (decode, transform) is followed by an all-agree status
//! exchange, so a rank that failed reports its error while the rest abort
//! cleanly instead of waiting forever at the next collective.
//!
//! [`run`] is the whole program for one image: it wraps [`process_image`] in
//! a thread-backed group and reduces the per-rank results to a single
//! [`Outcome`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod pipeline;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{process_image, run, Outcome};
