//! Filesystem operations: the move executor and its helpers.

mod atomic;
mod entry;
mod helpers;

pub use atomic::rename_no_replace;
pub use entry::{EntryKind, MoveOutcome, move_entry};
pub use helpers::io_error_with_help;
