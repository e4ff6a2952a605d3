//! Error types for collective operations.

use huemill_core::Rank;
use thiserror::Error;

/// Collective operation error.
#[derive(Debug, Error)]
pub enum CommError {
    /// A group of zero participants was requested.
    #[error("participant group must have at least one rank")]
    EmptyGroup,

    /// A participant's closure panicked.
    #[error("participant {rank} panicked")]
    Panicked {
        /// The rank whose thread panicked.
        rank: Rank,
    },

    /// The peer side of a channel went away mid-collective.
    ///
    /// Surfaces when the rest of the group has torn down while this rank was
    /// still waiting on a collective.
    #[error("group disconnected while {rank} waited for {waiting}")]
    Disconnected {
        /// The rank that observed the disconnect.
        rank: Rank,
        /// What the rank was waiting to receive.
        waiting: &'static str,
    },

    /// The root rank called a rooted collective without its payload.
    #[error("root called collective without {what}")]
    MissingRootPayload {
        /// The payload the root failed to supply.
        what: &'static str,
    },

    /// A partition table built for a different group size was supplied.
    #[error("partition table covers {table_ranks} ranks but the group has {participants}")]
    TableMismatch {
        /// Ranks the table was built for.
        table_ranks: usize,
        /// Actual participant count.
        participants: usize,
    },

    /// A chunk's length disagrees with the partition table.
    #[error("{rank} supplied {got} bytes where the partition table expects {expected}")]
    ChunkMismatch {
        /// The rank that owns the span.
        rank: Rank,
        /// Span length per the table.
        expected: usize,
        /// Bytes actually supplied.
        got: usize,
    },

    /// The same rank contributed twice to one gather.
    #[error("{rank} contributed more than one chunk to a gather")]
    DuplicateChunk {
        /// The rank that double-contributed.
        rank: Rank,
    },

    /// A rank addressed a message to itself.
    #[error("{rank} attempted to message itself")]
    SelfMessage {
        /// The offending rank.
        rank: Rank,
    },

    /// Invalid rank or table indexing.
    #[error(transparent)]
    Core(#[from] huemill_core::Error),
}

/// Result type for collective operations.
pub type CommResult<T> = Result<T, CommError>;
