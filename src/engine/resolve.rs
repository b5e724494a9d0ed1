//! Per-job merge decision.
//!
//! Given one (source, target) pair, decide between skip, move and merge,
//! perform the move, and record the outcome. Errors never propagate out of
//! here: they are counted, reported, and the job resolves as terminal.

use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use tracing::{debug, trace, warn};

use super::job::{Job, Resolution};
use crate::config::Options;
use crate::fs_ops::{EntryKind, MoveOutcome, io_error_with_help, move_entry};
use crate::output;
use crate::shutdown;
use crate::stats::Statistics;

/// Resolve one job. Children of a merged directory are returned, not queued.
pub fn resolve(job: &Job, options: &Options, stats: &Statistics) -> Resolution {
    if shutdown::is_requested() {
        stats.job_cancelled();
        trace!(src = %job.source.display(), "shutdown requested; job dropped");
        return Resolution::Terminal;
    }

    // Same-path guard for a merge of a directory into itself.
    if job.source == job.target {
        trace!(path = %job.source.display(), "source and target are the same path");
        return Resolution::Terminal;
    }

    let meta = match fs::symlink_metadata(&job.source) {
        Ok(m) => m,
        Err(e) => {
            report_error(stats, options, io_error_with_help("stat", &job.source)(e));
            return Resolution::Terminal;
        }
    };

    if meta.file_type().is_symlink() {
        stats.symlink_skipped();
        debug!(src = %job.source.display(), "skipping symlink");
        if options.verbose {
            output::print_user(&format!("Skipping symlink: {}", job.source.display()));
        }
        return Resolution::Terminal;
    }

    let target_exists = match probe_target(&job.target) {
        Ok(exists) => exists,
        Err(e) => {
            report_error(stats, options, io_error_with_help("stat", &job.target)(e));
            return Resolution::Terminal;
        }
    };

    if meta.is_dir() {
        stats.dir_checked();
        if target_exists {
            stats.dir_skipped();
            expand_directory(job, options, stats)
        } else {
            move_and_record(job, EntryKind::Directory, &meta, options, stats);
            Resolution::Terminal
        }
    } else {
        stats.file_checked();
        if target_exists {
            stats.file_skipped();
            debug!(dest = %job.target.display(), "target exists; skipping file");
            if options.verbose {
                output::print_user(&format!("Skipping existing file: {}", job.target.display()));
            }
        } else {
            move_and_record(job, EntryKind::File, &meta, options, stats);
        }
        Resolution::Terminal
    }
}

/// Whether anything occupies `target`. A symlink counts, even a dangling one.
fn probe_target(target: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(target) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn move_and_record(
    job: &Job,
    kind: EntryKind,
    meta: &Metadata,
    options: &Options,
    stats: &Statistics,
) {
    if options.verbose {
        let verb = if options.dry_run { "Would move" } else { "Moving" };
        output::print_user(&format!(
            "{verb} {}: {} -> {}",
            kind.label(),
            job.source.display(),
            job.target.display()
        ));
    }

    let outcome = move_entry(&job.source, &job.target, kind, options.dry_run);
    if let MoveOutcome::Failed(e) = outcome {
        report_error(stats, options, e);
        return;
    }

    match kind {
        EntryKind::Directory => stats.dir_moved(),
        EntryKind::File => stats.file_moved(meta.len()),
    }
    debug!(
        src = %job.source.display(),
        dest = %job.target.display(),
        kind = kind.label(),
        dry_run = options.dry_run,
        "moved"
    );
}

/// List a directory present on both sides and fan out one job per entry.
fn expand_directory(job: &Job, options: &Options, stats: &Statistics) -> Resolution {
    let listing_error = |e: io::Error| io_error_with_help("read directory", &job.source)(e);
    let entries = match fs::read_dir(&job.source) {
        Ok(rd) => rd,
        Err(e) => {
            report_error(stats, options, listing_error(e));
            return Resolution::Terminal;
        }
    };

    let mut children = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => children.push(job.child(&entry.file_name())),
            // Keep whatever was listed before the failure.
            Err(e) => report_error(stats, options, listing_error(e)),
        }
    }

    trace!(src = %job.source.display(), children = children.len(), "merging directory");
    Resolution::Expanded(children)
}

fn report_error(stats: &Statistics, options: &Options, err: io::Error) {
    stats.error();
    warn!(error = %err, "entry failed");
    if options.verbose {
        output::print_error(&err.to_string());
    }
}
