//! Core configuration types.
//! - Config holds user-facing settings (XML + CLI) with sensible defaults.
//! - Options is the immutable snapshot the merge engine reads during one run.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::{DEFAULT_BUFFER, DEFAULT_PROGRESS_INTERVAL};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors (default; a normal run stays silent)
    #[default]
    Quiet,
    /// Warnings, including per-entry failures
    Normal,
    /// Run-level progress events
    Info,
    /// Debug/trace, one event per job
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Settings merged from defaults, the XML file and CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Worker threads; 0 means "use host parallelism"
    pub workers: usize,
    /// Work queue capacity; 0 means the default
    pub buffer: usize,
    /// Periodic progress line plus final summary
    pub stats: bool,
    /// One line per move/skip/error decision
    pub verbose: bool,
    /// Decide and count, but never rename
    pub dry_run: bool,
    /// Console verbosity of the tracing logs
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: 0,
            buffer: DEFAULT_BUFFER,
            stats: false,
            verbose: false,
            dry_run: false,
            log_level: LogLevel::default(),
            log_file: None,
        }
    }
}

impl Config {
    /// Resolve the engine options for one run.
    pub fn options(&self) -> Options {
        Options {
            workers: if self.workers == 0 { default_workers() } else { self.workers },
            queue_capacity: if self.buffer == 0 { DEFAULT_BUFFER } else { self.buffer },
            dry_run: self.dry_run,
            verbose: self.verbose,
            live_stats: self.stats,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Immutable run options read by the merge engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub workers: usize,
    pub queue_capacity: usize,
    pub dry_run: bool,
    pub verbose: bool,
    /// Run the progress reporter for the duration of the merge
    pub live_stats: bool,
    pub progress_interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Config::default().options()
    }
}

/// Host parallelism, or 1 when it cannot be determined.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
