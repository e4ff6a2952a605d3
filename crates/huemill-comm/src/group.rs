//! Thread-backed SPMD participant group.
//!
//! [`ThreadGroup::run`] spawns one scoped OS thread per rank, all executing
//! the same closure over their own [`ThreadCollective`] handle. The handles
//! are wired as a full mesh of mpsc channels (no sender to self) plus one
//! shared barrier. Each collective matches the message variants it expects
//! and parks anything else in a pending queue, preserving per-sender order
//! while tolerating cross-sender interleaving.

use crate::{Collective, CommError, CommResult};
use huemill_core::{ImageMeta, PartitionTable, Rank};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Barrier};
use std::thread;

/// Wire traffic between ranks. Chunk tags name the span owner: the recipient
/// for a scatter, the sender for a gather.
#[derive(Debug)]
enum Message {
    Meta(ImageMeta),
    Flag(bool),
    Verdict(bool),
    Chunk { rank: Rank, bytes: Vec<u8> },
}

/// One rank's endpoint in a [`ThreadGroup`].
pub struct ThreadCollective {
    rank: Rank,
    /// Senders to every peer, indexed by rank; the self slot is empty so a
    /// torn-down group is observable as a disconnect rather than a hang.
    peers: Vec<Option<Sender<Message>>>,
    inbox: Receiver<Message>,
    pending: VecDeque<Message>,
    barrier: Arc<Barrier>,
}

impl ThreadCollective {
    fn send(&self, to: Rank, msg: Message) -> CommResult<()> {
        let sender = self
            .peers
            .get(to.index())
            .ok_or(huemill_core::Error::RankOutOfRange {
                rank: to.index(),
                ranks: self.peers.len(),
            })?
            .as_ref()
            .ok_or(CommError::SelfMessage { rank: self.rank })?;
        sender.send(msg).map_err(|_| CommError::Disconnected {
            rank: self.rank,
            waiting: "a live peer to send to",
        })
    }

    /// Receives the next message `pick` accepts, parking everything else.
    fn recv_where<T>(
        &mut self,
        waiting: &'static str,
        mut pick: impl FnMut(Message) -> Result<T, Message>,
    ) -> CommResult<T> {
        let mut index = 0;
        while index < self.pending.len() {
            let Some(msg) = self.pending.remove(index) else {
                break;
            };
            match pick(msg) {
                Ok(value) => return Ok(value),
                Err(msg) => {
                    self.pending.insert(index, msg);
                    index += 1;
                }
            }
        }
        loop {
            let msg = self.inbox.recv().map_err(|_| CommError::Disconnected {
                rank: self.rank,
                waiting,
            })?;
            match pick(msg) {
                Ok(value) => return Ok(value),
                Err(msg) => self.pending.push_back(msg),
            }
        }
    }

    fn check_table(&self, table: &PartitionTable) -> CommResult<()> {
        if table.ranks() != self.peers.len() {
            return Err(CommError::TableMismatch {
                table_ranks: table.ranks(),
                participants: self.peers.len(),
            });
        }
        Ok(())
    }

    fn other_ranks(&self) -> impl Iterator<Item = Rank> + '_ {
        (0..self.peers.len()).map(Rank).filter(|r| *r != self.rank)
    }
}

impl Collective for ThreadCollective {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn participants(&self) -> usize {
        self.peers.len()
    }

    fn broadcast_meta(&mut self, root: Rank, meta: Option<ImageMeta>) -> CommResult<ImageMeta> {
        if self.rank == root {
            let meta = meta.ok_or(CommError::MissingRootPayload {
                what: "image metadata",
            })?;
            for peer in self.other_ranks().collect::<Vec<_>>() {
                self.send(peer, Message::Meta(meta))?;
            }
            Ok(meta)
        } else {
            self.recv_where("image metadata", |msg| match msg {
                Message::Meta(meta) => Ok(meta),
                other => Err(other),
            })
        }
    }

    fn agree(&mut self, local_ok: bool) -> CommResult<bool> {
        let root = Rank::COORDINATOR;
        if self.rank == root {
            let mut verdict = local_ok;
            for _ in 1..self.participants() {
                let ok = self.recv_where("status flags", |msg| match msg {
                    Message::Flag(ok) => Ok(ok),
                    other => Err(other),
                })?;
                verdict = verdict && ok;
            }
            for peer in self.other_ranks().collect::<Vec<_>>() {
                self.send(peer, Message::Verdict(verdict))?;
            }
            Ok(verdict)
        } else {
            self.send(root, Message::Flag(local_ok))?;
            self.recv_where("the group verdict", |msg| match msg {
                Message::Verdict(verdict) => Ok(verdict),
                other => Err(other),
            })
        }
    }

    fn scatterv(
        &mut self,
        root: Rank,
        buffer: Option<Vec<u8>>,
        table: &PartitionTable,
    ) -> CommResult<Vec<u8>> {
        self.check_table(table)?;
        let my_span = table.span(self.rank)?;

        if self.rank == root {
            let buffer = buffer.ok_or(CommError::MissingRootPayload {
                what: "the scatter buffer",
            })?;
            if buffer.len() != table.total_bytes() {
                return Err(CommError::ChunkMismatch {
                    rank: root,
                    expected: table.total_bytes(),
                    got: buffer.len(),
                });
            }
            for peer in self.other_ranks().collect::<Vec<_>>() {
                let span = table.span(peer)?;
                let bytes = buffer[span.offset..span.end()].to_vec();
                self.send(peer, Message::Chunk { rank: peer, bytes })?;
            }
            Ok(buffer[my_span.offset..my_span.end()].to_vec())
        } else {
            let bytes = self.recv_where("a scattered chunk", |msg| match msg {
                Message::Chunk { bytes, .. } => Ok(bytes),
                other => Err(other),
            })?;
            if bytes.len() != my_span.len {
                return Err(CommError::ChunkMismatch {
                    rank: self.rank,
                    expected: my_span.len,
                    got: bytes.len(),
                });
            }
            Ok(bytes)
        }
    }

    fn gatherv(
        &mut self,
        root: Rank,
        chunk: Vec<u8>,
        table: &PartitionTable,
    ) -> CommResult<Option<Vec<u8>>> {
        self.check_table(table)?;
        let my_span = table.span(self.rank)?;
        if chunk.len() != my_span.len {
            return Err(CommError::ChunkMismatch {
                rank: self.rank,
                expected: my_span.len,
                got: chunk.len(),
            });
        }

        if self.rank != root {
            self.send(
                root,
                Message::Chunk {
                    rank: self.rank,
                    bytes: chunk,
                },
            )?;
            return Ok(None);
        }

        let mut gathered = vec![0u8; table.total_bytes()];
        gathered[my_span.offset..my_span.end()].copy_from_slice(&chunk);
        let mut seen = vec![false; table.ranks()];
        seen[self.rank.index()] = true;

        for _ in 1..table.ranks() {
            let (rank, bytes) = self.recv_where("gathered chunks", |msg| match msg {
                Message::Chunk { rank, bytes } => Ok((rank, bytes)),
                other => Err(other),
            })?;
            let span = table.span(rank)?;
            if seen[rank.index()] {
                return Err(CommError::DuplicateChunk { rank });
            }
            if bytes.len() != span.len {
                return Err(CommError::ChunkMismatch {
                    rank,
                    expected: span.len,
                    got: bytes.len(),
                });
            }
            gathered[span.offset..span.end()].copy_from_slice(&bytes);
            seen[rank.index()] = true;
        }
        Ok(Some(gathered))
    }

    fn barrier(&mut self) -> CommResult<()> {
        self.barrier.wait();
        Ok(())
    }
}

/// Spawner for thread-backed SPMD groups.
pub struct ThreadGroup;

impl ThreadGroup {
    /// Runs `f` once per rank on its own scoped thread and returns the
    /// per-rank results in rank order.
    ///
    /// The closure is the whole SPMD program: every rank executes it from the
    /// top, branching on [`Collective::rank`] where roles differ. Panics in a
    /// participant surface as [`CommError::Panicked`] once the group winds
    /// down.
    pub fn run<T, F>(participants: usize, f: F) -> CommResult<Vec<T>>
    where
        F: Fn(&mut ThreadCollective) -> T + Send + Sync,
        T: Send,
    {
        if participants == 0 {
            return Err(CommError::EmptyGroup);
        }

        let mut txs = Vec::with_capacity(participants);
        let mut rxs = Vec::with_capacity(participants);
        for _ in 0..participants {
            let (tx, rx) = mpsc::channel();
            txs.push(tx);
            rxs.push(rx);
        }
        let barrier = Arc::new(Barrier::new(participants));

        let handles: Vec<ThreadCollective> = rxs
            .into_iter()
            .enumerate()
            .map(|(i, inbox)| ThreadCollective {
                rank: Rank(i),
                peers: txs
                    .iter()
                    .enumerate()
                    .map(|(j, tx)| (i != j).then(|| tx.clone()))
                    .collect(),
                inbox,
                pending: VecDeque::new(),
                barrier: Arc::clone(&barrier),
            })
            .collect();
        drop(txs);

        thread::scope(|s| {
            let joins: Vec<_> = handles
                .into_iter()
                .map(|mut comm| {
                    let f = &f;
                    s.spawn(move || f(&mut comm))
                })
                .collect();
            joins
                .into_iter()
                .enumerate()
                .map(|(i, join)| join.join().map_err(|_| CommError::Panicked { rank: Rank(i) }))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn meta() -> ImageMeta {
        ImageMeta::new(5, 2, 3).unwrap()
    }

    #[test]
    fn test_every_rank_sees_its_own_identity() {
        let ranks = ThreadGroup::run(4, |comm| (comm.rank().index(), comm.participants())).unwrap();
        assert_eq!(ranks, [(0, 4), (1, 4), (2, 4), (3, 4)]);
    }

    #[test]
    fn test_broadcast_reaches_every_rank() {
        let results = ThreadGroup::run(4, |comm| {
            let payload = comm.rank().is_coordinator().then(meta);
            comm.broadcast_meta(Rank::COORDINATOR, payload)
        })
        .unwrap();
        for result in results {
            assert_eq!(result.unwrap(), meta());
        }
    }

    #[test]
    fn test_agree_is_unanimous_and() {
        let all_true = ThreadGroup::run(3, |comm| comm.agree(true).unwrap()).unwrap();
        assert_eq!(all_true, [true, true, true]);

        let one_false =
            ThreadGroup::run(3, |comm| comm.agree(comm.rank() != Rank(1)).unwrap()).unwrap();
        assert_eq!(one_false, [false, false, false]);
    }

    #[test]
    fn test_gather_is_a_left_inverse_of_scatter() {
        for ranks in [1usize, 2, 3, 5] {
            let original: Vec<u8> = (0..10 * 3).map(|i| i as u8).collect();
            let table = PartitionTable::from_counts(10, 3, ranks).unwrap();

            let results = ThreadGroup::run(ranks, |comm| {
                let buffer = comm.rank().is_coordinator().then(|| original.clone());
                let chunk = comm.scatterv(Rank::COORDINATOR, buffer, &table)?;
                comm.gatherv(Rank::COORDINATOR, chunk, &table)
            })
            .unwrap();

            for (i, result) in results.into_iter().enumerate() {
                match result.unwrap() {
                    Some(gathered) => {
                        assert_eq!(i, 0);
                        assert_eq!(gathered, original);
                    }
                    None => assert_ne!(i, 0),
                }
            }
        }
    }

    #[test]
    fn test_gather_reorders_late_arrivals() {
        // Low ranks sleep longest, so chunks arrive in roughly reverse rank
        // order; the gathered buffer must still be in rank order.
        let table = PartitionTable::from_counts(8, 3, 4).unwrap();
        let results = ThreadGroup::run(4, |comm| {
            let span = table.span(comm.rank()).unwrap();
            let chunk = vec![comm.rank().index() as u8; span.len];
            if !comm.rank().is_coordinator() {
                thread::sleep(Duration::from_millis(
                    10 * (4 - comm.rank().index()) as u64,
                ));
            }
            comm.gatherv(Rank::COORDINATOR, chunk, &table)
        })
        .unwrap();

        let gathered = results[0].as_ref().unwrap().as_ref().unwrap().clone();
        let mut expected = Vec::new();
        for (rank, span) in table.iter().enumerate() {
            expected.extend(std::iter::repeat_n(rank as u8, span.len));
        }
        assert_eq!(gathered, expected);
    }

    #[test]
    fn test_single_rank_collectives_are_local() {
        let results = ThreadGroup::run(1, |comm| {
            let m = comm.broadcast_meta(Rank::COORDINATOR, Some(meta()))?;
            assert!(comm.agree(true)?);
            let table = PartitionTable::new(&m, 1)?;
            let buffer: Vec<u8> = (0..m.total_bytes()).map(|i| i as u8).collect();
            let chunk = comm.scatterv(Rank::COORDINATOR, Some(buffer.clone()), &table)?;
            assert_eq!(chunk, buffer);
            comm.barrier()?;
            comm.gatherv(Rank::COORDINATOR, chunk, &table)
        })
        .unwrap();
        assert!(results[0].as_ref().unwrap().is_some());
    }

    #[test]
    fn test_wrong_sized_chunk_is_rejected_locally() {
        let table = PartitionTable::from_counts(8, 3, 2).unwrap();
        let results = ThreadGroup::run(2, |comm| {
            let chunk = vec![0u8; 1]; // table expects 12 bytes per rank
            comm.gatherv(Rank::COORDINATOR, chunk, &table)
        })
        .unwrap();
        for result in results {
            assert!(matches!(result, Err(CommError::ChunkMismatch { .. })));
        }
    }

    #[test]
    fn test_table_for_wrong_group_size_is_rejected() {
        let table = PartitionTable::from_counts(9, 3, 3).unwrap();
        let results = ThreadGroup::run(2, |comm| {
            let chunk = vec![0u8; 0];
            comm.gatherv(Rank::COORDINATOR, chunk, &table)
        })
        .unwrap();
        for result in results {
            assert!(matches!(result, Err(CommError::TableMismatch { .. })));
        }
    }

    #[test]
    fn test_missing_root_payload_does_not_hang_the_peer() {
        let results = ThreadGroup::run(2, |comm| {
            comm.broadcast_meta(Rank::COORDINATOR, None)
        })
        .unwrap();
        assert!(matches!(
            results[0],
            Err(CommError::MissingRootPayload { .. })
        ));
        assert!(matches!(results[1], Err(CommError::Disconnected { .. })));
    }

    #[test]
    fn test_empty_group_is_rejected() {
        assert!(matches!(
            ThreadGroup::run(0, |comm| comm.rank()),
            Err(CommError::EmptyGroup)
        ));
    }
}
