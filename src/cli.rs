//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Flags override values from the XML config; unset flags leave them alone.
//! - Boolean flags can only switch a feature on.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// Merge SOURCE into TARGET by moving every entry that TARGET lacks.
/// Existing target entries are never overwritten; directories present on both
/// sides are merged recursively.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Merge two directory trees by moving source-only entries")]
pub struct Args {
    /// Directory whose entries are moved.
    #[arg(
        value_name = "SOURCE",
        value_hint = ValueHint::DirPath,
        required_unless_present = "print_config"
    )]
    pub source: Option<PathBuf>,

    /// Directory receiving the entries.
    #[arg(
        value_name = "TARGET",
        value_hint = ValueHint::DirPath,
        required_unless_present = "print_config"
    )]
    pub target: Option<PathBuf>,

    /// Number of worker threads (default: available CPUs).
    #[arg(short = 'w', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Capacity of the work queue.
    #[arg(short = 'b', long, value_name = "N")]
    pub buffer: Option<usize>,

    /// Show a live progress line and a final summary.
    #[arg(short = 's', long)]
    pub stats: bool,

    /// Print one line per move, skip or error.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Decide and count, but do not move anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, value_name = "LEVEL", help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<LogLevel>,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where merge_move looks for its config file (or MERGE_MOVE_CONFIG if set), then exit.
    #[arg(long, help = "Print the config file location used by merge_move and exit")]
    pub print_config: bool,
}

impl Args {
    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(w) = self.workers {
            cfg.workers = w;
        }
        if let Some(b) = self.buffer {
            cfg.buffer = b;
        }
        if self.stats {
            cfg.stats = true;
        }
        if self.verbose {
            cfg.verbose = true;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if let Some(level) = self.log_level {
            cfg.log_level = level;
        }
        if let Some(path) = &self.log_file {
            cfg.log_file = Some(path.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("merge_move").chain(args.iter().copied()))
    }

    #[test]
    fn short_flags_parse() {
        let a = parse_from(&["-w", "3", "-b", "10", "-s", "-v", "-n", "/a", "/b"]).unwrap();
        assert_eq!(a.workers, Some(3));
        assert_eq!(a.buffer, Some(10));
        assert!(a.stats && a.verbose && a.dry_run);
        assert_eq!(a.source, Some(PathBuf::from("/a")));
        assert_eq!(a.target, Some(PathBuf::from("/b")));
    }

    #[test]
    fn positionals_are_required() {
        assert!(parse_from(&["/only-one"]).is_err());
        assert!(parse_from(&[]).is_err());
        assert!(parse_from(&["/a", "/b", "/c"]).is_err());
    }

    #[test]
    fn print_config_needs_no_paths() {
        let a = parse_from(&["--print-config"]).unwrap();
        assert!(a.print_config);
        assert!(a.source.is_none());
    }

    #[test]
    fn log_level_value_is_validated() {
        let a = parse_from(&["--log-level", "DEBUG", "/a", "/b"]).unwrap();
        assert_eq!(a.log_level, Some(LogLevel::Debug));
        assert!(parse_from(&["--log-level", "loud", "/a", "/b"]).is_err());
    }

    #[test]
    fn overrides_only_touch_set_flags() {
        let mut cfg = Config {
            workers: 5,
            buffer: 9,
            stats: true,
            ..Config::default()
        };
        parse_from(&["/a", "/b"]).unwrap().apply_overrides(&mut cfg);
        assert_eq!(cfg.workers, 5);
        assert_eq!(cfg.buffer, 9);
        assert!(cfg.stats);

        parse_from(&["-w", "2", "--log-file", "/tmp/x.log", "/a", "/b"])
            .unwrap()
            .apply_overrides(&mut cfg);
        assert_eq!(cfg.workers, 2);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/x.log")));
    }
}
