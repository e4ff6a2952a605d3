//! # huemill-comm
//!
//! Collective communication substrate for the huemill worker group.
//!
//! The pipeline runs as a fixed SPMD group: every participant executes the
//! same sequential code over its own [`Collective`] handle, and the handles
//! meet at collective operations that all participants must call together.
//! The substrate provides:
//!
//! - rank identity and group size
//! - broadcast of image metadata from a root rank
//! - an all-agree exchange (logical AND of per-rank status flags), used as a
//!   go/no-go gate before any blocking transfer
//! - variable-length scatter and gather keyed by a
//!   [`PartitionTable`](huemill_core::PartitionTable)
//! - a full-group barrier
//!
//! [`ThreadGroup::run`] is the in-process implementation: one scoped OS
//! thread per rank, wired with a full mesh of mpsc channels and a shared
//! barrier. Collective calls match tagged messages against what the caller
//! expects and park out-of-order arrivals in a pending queue, so interleaved
//! collectives cannot steal each other's traffic.
//!
//! # Example
//!
//! ```
//! use huemill_comm::{Collective, ThreadGroup};
//!
//! let ranks = ThreadGroup::run(3, |comm| comm.rank().index()).unwrap();
//! assert_eq!(ranks, [0, 1, 2]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod collective;
mod error;
mod group;

pub use collective::Collective;
pub use error::{CommError, CommResult};
pub use group::{ThreadCollective, ThreadGroup};
