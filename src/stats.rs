//! Run statistics.
//!
//! A flat set of independent counters shared by every worker through an `Arc`.
//! Increments are relaxed: readers only need an eventually-consistent view,
//! and the final read happens after all workers have been joined.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters for one merge run.
#[derive(Debug, Default)]
pub struct Statistics {
    pub dirs_checked: AtomicU64,
    /// Directories that already existed in the target and were merged entry by entry.
    pub dirs_skipped: AtomicU64,
    pub dirs_moved: AtomicU64,
    pub files_checked: AtomicU64,
    pub files_skipped: AtomicU64,
    pub files_moved: AtomicU64,
    pub bytes_moved: AtomicU64,
    pub symlinks_skipped: AtomicU64,
    pub errors: AtomicU64,
    /// Jobs drained without processing after a shutdown request.
    pub cancelled: AtomicU64,
}

/// Point-in-time copy of [`Statistics`]. Not linearized across fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub dirs_checked: u64,
    pub dirs_skipped: u64,
    pub dirs_moved: u64,
    pub files_checked: u64,
    pub files_skipped: u64,
    pub files_moved: u64,
    pub bytes_moved: u64,
    pub symlinks_skipped: u64,
    pub errors: u64,
    pub cancelled: u64,
}

#[inline]
fn bump(counter: &AtomicU64, n: u64) {
    counter.fetch_add(n, Ordering::Relaxed);
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dir_checked(&self) {
        bump(&self.dirs_checked, 1);
    }

    pub fn dir_skipped(&self) {
        bump(&self.dirs_skipped, 1);
    }

    pub fn dir_moved(&self) {
        bump(&self.dirs_moved, 1);
    }

    pub fn file_checked(&self) {
        bump(&self.files_checked, 1);
    }

    pub fn file_skipped(&self) {
        bump(&self.files_skipped, 1);
    }

    /// Record a moved file and the size captured before the rename.
    pub fn file_moved(&self, bytes: u64) {
        bump(&self.files_moved, 1);
        bump(&self.bytes_moved, bytes);
    }

    pub fn symlink_skipped(&self) {
        bump(&self.symlinks_skipped, 1);
    }

    pub fn error(&self) {
        bump(&self.errors, 1);
    }

    pub fn job_cancelled(&self) {
        bump(&self.cancelled, 1);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            dirs_checked: self.dirs_checked.load(Ordering::Relaxed),
            dirs_skipped: self.dirs_skipped.load(Ordering::Relaxed),
            dirs_moved: self.dirs_moved.load(Ordering::Relaxed),
            files_checked: self.files_checked.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            files_moved: self.files_moved.load(Ordering::Relaxed),
            bytes_moved: self.bytes_moved.load(Ordering::Relaxed),
            symlinks_skipped: self.symlinks_skipped.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Entries moved (files plus whole directories).
    pub fn moved(&self) -> u64 {
        self.files_moved + self.dirs_moved
    }

    /// Bytes per second over `elapsed`; zero for an empty interval.
    pub fn byte_rate(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.bytes_moved as f64 / secs
        } else {
            0.0
        }
    }
}

/// Format a duration as `1h02m03s`, `4m05s` or `6s`.
pub fn format_duration(d: Duration) -> String {
    let total = d.as_secs();
    let h = total / 3600;
    let m = (total / 60) % 60;
    let s = total % 60;

    if h > 0 {
        format!("{h}h{m:02}m{s:02}s")
    } else if m > 0 {
        format!("{m}m{s:02}s")
    } else {
        format!("{s}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn concurrent_increments_are_not_lost() {
        let stats = Arc::new(Statistics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        stats.file_checked();
                        stats.file_moved(3);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let snap = stats.snapshot();
        assert_eq!(snap.files_checked, 8000);
        assert_eq!(snap.files_moved, 8000);
        assert_eq!(snap.bytes_moved, 24_000);
        assert_eq!(snap.errors, 0);
    }

    #[test]
    fn snapshot_counts_moved_entries() {
        let stats = Statistics::new();
        stats.dir_moved();
        stats.file_moved(10);
        stats.file_moved(0);
        assert_eq!(stats.snapshot().moved(), 3);
    }

    #[test]
    fn byte_rate_handles_zero_elapsed() {
        let snap = StatsSnapshot {
            bytes_moved: 1024,
            ..Default::default()
        };
        assert_eq!(snap.byte_rate(Duration::ZERO), 0.0);
        assert!((snap.byte_rate(Duration::from_secs(2)) - 512.0).abs() < f64::EPSILON);
    }

    #[test]
    fn format_duration_picks_largest_unit() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(6)), "6s");
        assert_eq!(format_duration(Duration::from_secs(245)), "4m05s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h02m03s");
        assert_eq!(format_duration(Duration::from_millis(59_999)), "59s");
    }
}
