//! Parallel merge engine.
//!
//! Coordinates one run: seeds the root job, starts a fixed pool of workers
//! over a bounded queue, waits until the outstanding-work tracker drains,
//! then closes the queue and joins everything.
//!
//! ```text
//!                 ┌──────────────┐
//!   seed job ───▶ │  WorkQueue   │ ◀── children (try_send)
//!                 └──────┬───────┘          │
//!                        │ recv             │ full: kept on the
//!          ┌─────────────┼─────────────┐    │ worker's own stack
//!          ▼             ▼             ▼    │
//!      worker 0      worker 1  ...  worker N┘
//!          │             │             │
//!          └──── WorkTracker (add / done) ───▶ coordinator wait()
//! ```

mod job;
mod queue;
mod resolve;
mod tracker;
mod worker;

pub use job::{Job, Resolution};
pub use queue::{QueueSnapshot, QueueStats, WorkQueue};
pub use resolve::resolve;
pub use tracker::WorkTracker;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Options;
use crate::errors::MergeMoveError;
use crate::progress::ProgressReporter;
use crate::shutdown;
use crate::stats::{Statistics, StatsSnapshot};
use crate::validate::validate_roots;
use worker::{Worker, WorkerContext};

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeReport {
    pub stats: StatsSnapshot,
    pub elapsed: Duration,
    /// A shutdown request arrived before the run drained.
    pub interrupted: bool,
    pub queue: QueueSnapshot,
    pub workers: usize,
}

impl MergeReport {
    pub fn is_success(&self) -> bool {
        self.stats.errors == 0 && !self.interrupted
    }

    /// Map the report onto the run's error, if any. Interruption wins over errors.
    pub fn into_result(self) -> Result<Self, MergeMoveError> {
        if self.interrupted {
            Err(MergeMoveError::Interrupted)
        } else if self.stats.errors > 0 {
            Err(MergeMoveError::CompletedWithErrors(self.stats.errors))
        } else {
            Ok(self)
        }
    }
}

/// One merge run. Statistics start at zero and are not shared between runs.
pub struct Merger {
    options: Options,
    stats: Arc<Statistics>,
}

impl Merger {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            stats: Arc::new(Statistics::new()),
        }
    }

    /// Live counters for this run; safe to read while [`run`](Self::run) executes.
    pub fn stats(&self) -> Arc<Statistics> {
        Arc::clone(&self.stats)
    }

    /// Merge `source` into `target`. Both roots must already be validated.
    ///
    /// Per-entry failures never abort the run; they are counted in the report.
    /// Only a failure to start any worker is returned as an error.
    pub fn run(self, source: PathBuf, target: PathBuf) -> Result<MergeReport, MergeMoveError> {
        let started = Instant::now();
        let Merger { options, stats } = self;
        let options = Arc::new(options);
        let workers_wanted = options.workers.max(1);

        let tracker = Arc::new(WorkTracker::new());
        let mut queue = WorkQueue::new(options.queue_capacity);

        info!(
            src = %source.display(),
            dest = %target.display(),
            workers = workers_wanted,
            buffer = queue.capacity(),
            dry_run = options.dry_run,
            "merge started"
        );

        let reporter = if options.live_stats {
            match ProgressReporter::start(
                Arc::clone(&stats),
                Arc::clone(&tracker),
                options.progress_interval,
                started,
            ) {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!(error = %e, "could not start progress reporter");
                    None
                }
            }
        } else {
            None
        };

        // The queue is empty and holds at least one job, so the seed always fits.
        tracker.add(1);
        if queue.sender().try_send(Job::new(source, target)).is_err() {
            tracker.done();
        }

        let mut workers = Vec::with_capacity(workers_wanted);
        let mut spawn_error = None;
        for id in 0..workers_wanted {
            let ctx = WorkerContext {
                options: Arc::clone(&options),
                stats: Arc::clone(&stats),
                tracker: Arc::clone(&tracker),
                sender: queue.sender(),
                receiver: queue.receiver(),
            };
            match Worker::spawn(id, ctx) {
                Ok(w) => workers.push(w),
                Err(e) => {
                    warn!(worker = id, error = %e, "failed to spawn worker");
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        if workers.is_empty() {
            queue.close();
            drop(reporter);
            return Err(MergeMoveError::WorkerSpawn(
                spawn_error.unwrap_or_else(|| std::io::Error::other("no worker threads")),
            ));
        }
        if workers.len() < workers_wanted {
            warn!(
                running = workers.len(),
                wanted = workers_wanted,
                "continuing with fewer workers"
            );
        }

        tracker.wait();
        queue.close();

        let running = workers.len();
        for w in workers {
            let id = w.id();
            if !w.join() {
                warn!(worker = id, "worker thread panicked");
            }
        }
        if let Some(r) = reporter {
            r.stop();
        }

        let snapshot = stats.snapshot();
        let queue_stats = queue.stats().snapshot();
        let elapsed = started.elapsed();
        let interrupted = shutdown::is_requested();

        debug!(
            enqueued = queue_stats.enqueued,
            dequeued = queue_stats.dequeued,
            inline = queue_stats.inline_processed,
            "queue statistics"
        );
        info!(
            moved = snapshot.moved(),
            dirs_moved = snapshot.dirs_moved,
            files_moved = snapshot.files_moved,
            bytes_moved = snapshot.bytes_moved,
            errors = snapshot.errors,
            cancelled = snapshot.cancelled,
            interrupted,
            elapsed_ms = elapsed.as_millis() as u64,
            "merge finished"
        );

        Ok(MergeReport {
            stats: snapshot,
            elapsed,
            interrupted,
            queue: queue_stats,
            workers: running,
        })
    }
}

/// Validate both roots, then run a merge with `options`.
pub fn merge(
    source: &Path,
    target: &Path,
    options: &Options,
) -> Result<MergeReport, MergeMoveError> {
    let (source, target) = validate_roots(source, target)?;
    Merger::new(options.clone()).run(source, target)
}
