//! Typed error definitions for merge_move.
//! Provides a small set of well-known failure modes for better logs, exit codes and tests.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a root path was rejected before any work started.
#[derive(Debug)]
pub enum RootProblem {
    /// lstat failed (usually ENOENT).
    Missing(io::Error),
    NotADirectory,
    Symlink,
    /// Target lies inside the source tree.
    InsideSource(PathBuf),
}

impl fmt::Display for RootProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootProblem::Missing(e) => write!(f, "cannot access path: {e}"),
            RootProblem::NotADirectory => f.write_str("not a directory"),
            RootProblem::Symlink => f.write_str("must not be a symlink"),
            RootProblem::InsideSource(src) => {
                write!(f, "lies inside the source tree '{}'", src.display())
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum MergeMoveError {
    #[error("Invalid source '{path}': {problem}")]
    InvalidSource { path: PathBuf, problem: RootProblem },

    #[error("Invalid target '{path}': {problem}")]
    InvalidTarget { path: PathBuf, problem: RootProblem },

    #[error("completed with {0} errors")]
    CompletedWithErrors(u64),

    #[error("Failed to start worker thread: {0}")]
    WorkerSpawn(#[source] io::Error),

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl MergeMoveError {
    /// Process exit code for this failure.
    pub fn code(&self) -> u8 {
        match self {
            MergeMoveError::CompletedWithErrors(_) => 1,
            MergeMoveError::InvalidSource { .. } | MergeMoveError::InvalidTarget { .. } => 2,
            MergeMoveError::WorkerSpawn(_) => 1,
            MergeMoveError::Interrupted => 130,
        }
    }

    /// Short machine-friendly label used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MergeMoveError::InvalidSource { .. } => "invalid_source",
            MergeMoveError::InvalidTarget { .. } => "invalid_target",
            MergeMoveError::CompletedWithErrors(_) => "completed_with_errors",
            MergeMoveError::WorkerSpawn(_) => "worker_spawn",
            MergeMoveError::Interrupted => "interrupted",
        }
    }
}
