//! Live progress line and final run summary.

use crossbeam_channel::{Sender, bounded, select, tick};
use humansize::{BINARY, format_size};
use std::io::{self, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::engine::WorkTracker;
use crate::output;
use crate::stats::{Statistics, StatsSnapshot, format_duration};

/// One status line: elapsed, moved/checked counts, data, rate, errors, outstanding jobs.
pub fn render_progress(snap: &StatsSnapshot, pending: u64, elapsed: Duration) -> String {
    format!(
        "[{}] Dirs: {}/{}, Files: {}/{}, Symlinks skipped: {}, Data: {}, Rate: {}/s, Errors: {}, Pending: {}",
        format_duration(elapsed),
        snap.dirs_moved,
        snap.dirs_checked,
        snap.files_moved,
        snap.files_checked,
        snap.symlinks_skipped,
        format_size(snap.bytes_moved, BINARY),
        format_size(snap.byte_rate(elapsed) as u64, BINARY),
        snap.errors,
        pending
    )
}

/// Summary printed once the run is over. Optional lines only appear when non-zero.
pub fn render_summary(snap: &StatsSnapshot, elapsed: Duration) -> Vec<String> {
    let mut lines = vec![
        format!("Operation completed in {}", format_duration(elapsed)),
        format!(
            "Directories: {} moved, {} skipped, {} checked",
            snap.dirs_moved, snap.dirs_skipped, snap.dirs_checked
        ),
        format!(
            "Files: {} moved, {} skipped, {} checked",
            snap.files_moved, snap.files_skipped, snap.files_checked
        ),
    ];
    if snap.symlinks_skipped > 0 {
        lines.push(format!("Symlinks skipped: {}", snap.symlinks_skipped));
    }
    if snap.bytes_moved > 0 {
        lines.push(format!(
            "Total data moved: {} (file data only)",
            format_size(snap.bytes_moved, BINARY)
        ));
        if !elapsed.is_zero() {
            lines.push(format!(
                "Average rate: {}/s",
                format_size(snap.byte_rate(elapsed) as u64, BINARY)
            ));
        }
    }
    if snap.cancelled > 0 {
        lines.push(format!("Cancelled: {}", snap.cancelled));
    }
    if snap.errors > 0 {
        lines.push(format!("Errors: {}", snap.errors));
    }
    lines
}

/// Print the final summary, separated from any live progress line.
pub fn print_final_stats(snap: &StatsSnapshot, elapsed: Duration) {
    output::print_user("");
    for line in render_summary(snap, elapsed) {
        output::print_user(&line);
    }
}

/// Background thread redrawing the progress line on a fixed interval.
pub struct ProgressReporter {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    pub fn start(
        stats: Arc<Statistics>,
        tracker: Arc<WorkTracker>,
        interval: Duration,
        started: Instant,
    ) -> io::Result<Self> {
        let (stop, stopped) = bounded::<()>(0);
        let ticker = tick(interval);

        let handle = thread::Builder::new()
            .name("merge-progress".to_string())
            .spawn(move || {
                loop {
                    select! {
                        recv(stopped) -> _ => break,
                        recv(ticker) -> _ => {
                            let line = render_progress(
                                &stats.snapshot(),
                                tracker.pending(),
                                started.elapsed(),
                            );
                            let mut out = io::stdout().lock();
                            let _ = write!(out, "\r{line}");
                            let _ = out.flush();
                        }
                    }
                }
            })?;

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for its last redraw to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
