//! Worker thread implementation
//!
//! Each worker pulls jobs from the shared queue, resolves them, and feeds any
//! children back. Children that do not fit in the queue stay on a private
//! overflow stack. Before each job the worker offers parked children to the
//! queue again, and only processes one itself when the queue is still full.

use std::io::{self, Write};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{trace, warn};

use super::job::{Job, Resolution};
use super::queue::{JobReceiver, JobSender};
use super::resolve::resolve;
use super::tracker::WorkTracker;
use crate::config::Options;
use crate::stats::Statistics;

/// Everything a worker needs, cloned per thread.
#[derive(Clone)]
pub struct WorkerContext {
    pub options: Arc<Options>,
    pub stats: Arc<Statistics>,
    pub tracker: Arc<WorkTracker>,
    pub sender: JobSender,
    pub receiver: JobReceiver,
}

/// Handle to a running worker thread
pub struct Worker {
    id: usize,
    handle: JoinHandle<()>,
}

impl Worker {
    /// Spawn a named worker thread.
    pub fn spawn(id: usize, ctx: WorkerContext) -> std::io::Result<Self> {
        let handle = thread::Builder::new()
            .name(format!("merge-worker-{id}"))
            .spawn(move || ctx.run(id))?;
        Ok(Self { id, handle })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Wait for the worker to finish; false if the thread died from a panic.
    pub fn join(self) -> bool {
        self.handle.join().is_ok()
    }
}

impl WorkerContext {
    fn run(self, id: usize) {
        trace!(worker = id, "worker started");
        let mut overflow: Vec<Job> = Vec::new();
        let mut processed: u64 = 0;

        loop {
            self.requeue_overflow(&mut overflow);

            let job = match overflow.pop() {
                Some(job) => {
                    self.sender.record_inline();
                    job
                }
                None => match self.receiver.recv() {
                    Some(job) => job,
                    None => break,
                },
            };

            let children = self.resolve_guarded(&job).into_children();
            // Children are registered before this job is released.
            self.tracker.add(children.len() as u64);
            overflow.extend(children);
            self.tracker.done();
            processed += 1;
        }

        trace!(worker = id, processed, "worker finished");
    }

    /// Hand parked jobs back to the queue until it is full again.
    fn requeue_overflow(&self, overflow: &mut Vec<Job>) {
        while let Some(job) = overflow.pop() {
            if let Err(job) = self.sender.try_send(job) {
                overflow.push(job);
                break;
            }
        }
    }

    /// Resolve a job, turning a panic into a recorded error.
    fn resolve_guarded(&self, job: &Job) -> Resolution {
        match catch_unwind(AssertUnwindSafe(|| resolve(job, &self.options, &self.stats))) {
            Ok(resolution) => resolution,
            Err(_) => {
                self.stats.error();
                warn!(src = %job.source.display(), "panic while processing entry");
                if self.options.verbose {
                    write_panic_notice(io::stderr().lock(), &job.source);
                }
                Resolution::Terminal
            }
        }
    }
}

// Must not panic itself: the job still has to be released afterwards.
fn write_panic_notice(mut sink: impl Write, source: &Path) {
    let _ = writeln!(sink, "error: internal error while processing {}", source.display());
}
