//! Core library for `merge_move`.
//!
//! Merges a source directory tree into a target tree by moving every entry the
//! target lacks. Nothing in the target is ever overwritten, symlinks are never
//! followed or moved, and directories present on both sides are merged
//! recursively by a pool of worker threads.
//!
//! ```no_run
//! use merge_move::{Options, merge};
//! use std::path::Path;
//!
//! let options = Options::default();
//! let report = merge(Path::new("/data/incoming"), Path::new("/data/library"), &options)?;
//! println!("moved {} entries", report.stats.moved());
//! # Ok::<(), merge_move::MergeMoveError>(())
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod progress;
pub mod shutdown;
pub mod stats;
pub mod validate;

pub use config::{
    CONFIG_ENV, Config, DEFAULT_BUFFER, LogLevel, Options, default_config_path, default_workers,
    load_config, path_has_symlink_ancestor,
};
pub use engine::{MergeReport, Merger, merge};
pub use errors::{MergeMoveError, RootProblem};
pub use stats::{Statistics, StatsSnapshot, format_duration};
pub use validate::validate_roots;
