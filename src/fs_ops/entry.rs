use std::io;
use std::path::Path;
use tracing::trace;

use super::atomic::rename_no_replace;
use super::helpers::io_error_with_help;

/// What kind of filesystem object a job resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Any non-directory, non-symlink object (regular file, fifo, socket, device).
    File,
    Directory,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }
}

/// Result of asking the executor to move one entry.
#[derive(Debug)]
pub enum MoveOutcome {
    /// The rename happened.
    Moved,
    /// Dry-run: the rename was skipped but counts as planned.
    Planned,
    /// The rename failed; the error message carries op, path and a hint.
    Failed(io::Error),
}

/// Move one entry whose target path was just probed as absent.
///
/// Never retries and never falls back to copying. A failure is returned as
/// [`MoveOutcome::Failed`] so the caller can record it and carry on.
pub fn move_entry(source: &Path, target: &Path, kind: EntryKind, dry_run: bool) -> MoveOutcome {
    if dry_run {
        trace!(
            src = %source.display(),
            dest = %target.display(),
            kind = kind.label(),
            "dry-run: would move"
        );
        return MoveOutcome::Planned;
    }

    match rename_no_replace(source, target) {
        Ok(()) => {
            trace!(
                src = %source.display(),
                dest = %target.display(),
                kind = kind.label(),
                "renamed"
            );
            MoveOutcome::Moved
        }
        Err(e) => MoveOutcome::Failed(io_error_with_help("move", source)(e)),
    }
}
