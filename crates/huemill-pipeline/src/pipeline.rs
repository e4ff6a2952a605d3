//! The SPMD recolor sequence and its group runner.

use crate::PipelineResult;
use huemill_comm::{Collective, CommError, ThreadGroup};
use huemill_core::{PartitionTable, Rank};
use huemill_io::Raster;
use huemill_ops::suppress_yellow;
use std::num::NonZeroUsize;
use std::path::Path;
use std::thread;
use tracing::{debug, info};

/// What one participant's run of the pipeline produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Coordinator: the recolored image was encoded to the output path.
    Written {
        /// Pixel bytes written.
        bytes: usize,
    },
    /// Worker: chunk transformed and handed to the gather.
    Worker,
    /// The group agreed to stop; the rank that caused it reports the error.
    Aborted,
}

/// Drives one image through the group. Every participant calls this, SPMD.
///
/// The sequence is: decode on the coordinator, agree on go/no-go, broadcast
/// the layout, compute the partition table redundantly per rank, scatter,
/// transform in place, agree again, gather, barrier, encode on the
/// coordinator.
///
/// A rank that observes a local failure returns its error only after the
/// corresponding agree exchange has told the rest of the group to abort, so
/// no participant is ever left blocking on a collective the failing rank
/// will not reach.
pub fn process_image<C: Collective>(
    comm: &mut C,
    input: &Path,
    output: &Path,
) -> PipelineResult<Outcome> {
    let root = Rank::COORDINATOR;
    let rank = comm.rank();

    let decoded = rank.is_coordinator().then(|| huemill_io::read(input));
    let decode_ok = !matches!(decoded, Some(Err(_)));
    if !comm.agree(decode_ok)? {
        debug!(%rank, "aborting before scatter");
        return match decoded {
            Some(Err(e)) => Err(e.into()),
            _ => Ok(Outcome::Aborted),
        };
    }
    let raster = match decoded {
        Some(Ok(raster)) => Some(raster),
        _ => None,
    };

    let meta = comm.broadcast_meta(root, raster.as_ref().map(|r| r.meta))?;
    let table = PartitionTable::new(&meta, comm.participants())?;
    debug!(
        %rank,
        participants = comm.participants(),
        total_bytes = meta.total_bytes(),
        "partition table computed"
    );

    let mut chunk = comm.scatterv(root, raster.map(Raster::into_data), &table)?;

    let transformed = suppress_yellow(&mut chunk, meta.pixel_stride());
    if !comm.agree(transformed.is_ok())? {
        debug!(%rank, "aborting before gather");
        return match transformed {
            Err(e) => Err(e.into()),
            Ok(()) => Ok(Outcome::Aborted),
        };
    }

    let gathered = comm.gatherv(root, chunk, &table)?;
    comm.barrier()?;

    match gathered {
        Some(data) => {
            let raster = Raster::new(meta, data)?;
            huemill_io::write(output, &raster)?;
            info!(
                path = %output.display(),
                bytes = raster.data.len(),
                "wrote recolored image"
            );
            Ok(Outcome::Written {
                bytes: raster.data.len(),
            })
        }
        None => Ok(Outcome::Worker),
    }
}

/// Recolors one image file across a thread-backed group.
///
/// `participants == 0` picks one rank per available CPU core. Returns the
/// coordinator's outcome; the first per-rank error wins over abort noise
/// from the ranks that stopped on its behalf.
pub fn run(input: &Path, output: &Path, participants: usize) -> PipelineResult<Outcome> {
    let participants = if participants == 0 {
        thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    } else {
        participants
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        participants,
        "starting recolor"
    );

    let results = ThreadGroup::run(participants, |comm| process_image(comm, input, output))?;

    let mut results = results.into_iter();
    let coordinator = results.next().ok_or(CommError::EmptyGroup)?;
    let outcome = coordinator?;
    for result in results {
        result?;
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineError;
    use huemill_io::IoError;

    #[test]
    fn test_missing_input_aborts_the_whole_group() {
        // The decode fails on the coordinator; the agree exchange must let
        // every worker return instead of blocking at the scatter.
        let input = Path::new("no/such/input.png");
        let output = Path::new("never/written.png");
        let result = run(input, output, 4);
        assert!(matches!(
            result,
            Err(PipelineError::Io(IoError::Io(_)))
        ));
    }

    #[test]
    fn test_unsupported_input_surfaces_the_decode_error() {
        let input = Path::new("input.gif");
        let output = Path::new("never/written.png");
        let result = run(input, output, 2);
        assert!(matches!(
            result,
            Err(PipelineError::Io(IoError::UnsupportedFormat(_)))
        ));
    }
}
