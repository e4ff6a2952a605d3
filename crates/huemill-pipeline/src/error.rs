//! Error types for pipeline orchestration.

use thiserror::Error;

/// Pipeline error: any failure in the crates the orchestrator wires together.
///
/// All of these are fatal to the run; there is no retry and no
/// partial-result mode.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Buffer layout or partition failure.
    #[error(transparent)]
    Core(#[from] huemill_core::Error),

    /// Pixel transform failure.
    #[error(transparent)]
    Ops(#[from] huemill_ops::OpsError),

    /// Collective substrate failure.
    #[error(transparent)]
    Comm(#[from] huemill_comm::CommError),

    /// Decode or encode failure.
    #[error(transparent)]
    Io(#[from] huemill_io::IoError),
}

/// Result type for pipeline orchestration.
pub type PipelineResult<T> = Result<T, PipelineError>;
