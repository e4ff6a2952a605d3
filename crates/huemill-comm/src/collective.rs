//! The collective operations contract.

use crate::CommResult;
use huemill_core::{ImageMeta, PartitionTable, Rank};

/// One participant's handle into the group's collective operations.
///
/// Every method except [`rank`](Collective::rank) and
/// [`participants`](Collective::participants) is a collective: all ranks must
/// call it together, in the same order, and a call blocks until the whole
/// group has arrived at it. Rooted collectives take the root rank explicitly;
/// the root supplies the payload (`Some`) and the other ranks pass `None`.
pub trait Collective {
    /// This participant's identity, fixed for the handle's lifetime.
    fn rank(&self) -> Rank;

    /// Number of participants in the group.
    fn participants(&self) -> usize;

    /// Broadcasts image metadata from `root` to every rank.
    ///
    /// Returns the metadata on every rank, the root included.
    fn broadcast_meta(&mut self, root: Rank, meta: Option<ImageMeta>) -> CommResult<ImageMeta>;

    /// All-reduce AND over per-rank status flags.
    ///
    /// Every rank contributes `local_ok` and every rank learns whether the
    /// whole group succeeded. Call this after any fallible step that precedes
    /// a blocking transfer, so one rank's failure cannot strand the rest of
    /// the group at the next collective.
    fn agree(&mut self, local_ok: bool) -> CommResult<bool>;

    /// Distributes a buffer from `root`, one table span per rank.
    ///
    /// The root supplies the full buffer; every rank (root included) receives
    /// ownership of exactly the bytes of its own span.
    fn scatterv(
        &mut self,
        root: Rank,
        buffer: Option<Vec<u8>>,
        table: &PartitionTable,
    ) -> CommResult<Vec<u8>>;

    /// Reassembles per-rank chunks on `root`, in rank order.
    ///
    /// Blocks until every rank has contributed. On the root, returns a fresh
    /// buffer of `table.total_bytes()` where span `r` holds rank r's chunk
    /// regardless of arrival order. On every other rank returns `None` —
    /// absence, not an error.
    fn gatherv(
        &mut self,
        root: Rank,
        chunk: Vec<u8>,
        table: &PartitionTable,
    ) -> CommResult<Option<Vec<u8>>>;

    /// Blocks until every rank has reached the barrier.
    fn barrier(&mut self) -> CommResult<()>;
}
