//! Outstanding-work tracker.
//!
//! Counts jobs that exist but have not resolved yet: queued, in flight, or
//! parked on a worker's overflow stack. A run is complete exactly when the
//! count returns to zero after the seed job was added. Queue emptiness is not
//! used for this because an in-flight directory may still produce children.
//!
//! Callers must `add` a job's children before calling `done` for the job
//! itself, so the count cannot touch zero while an expansion is in progress.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
#[cfg(test)]
use std::time::Duration;

#[derive(Debug, Default)]
pub struct WorkTracker {
    pending: Mutex<u64>,
    drained: Condvar,
}

impl WorkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the counter half-updated.
    fn lock(&self) -> MutexGuard<'_, u64> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `n` new jobs.
    pub fn add(&self, n: u64) {
        if n == 0 {
            return;
        }
        *self.lock() += n;
    }

    /// Mark one job as resolved; wakes waiters when nothing is left.
    pub fn done(&self) {
        let mut pending = self.lock();
        debug_assert!(*pending > 0, "done() without matching add()");
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.drained.notify_all();
        }
    }

    /// Current number of unresolved jobs (for display only).
    pub fn pending(&self) -> u64 {
        *self.lock()
    }

    /// Block until every registered job has resolved.
    pub fn wait(&self) {
        let mut pending = self.lock();
        while *pending != 0 {
            pending = self
                .drained
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`; returns true when drained.
    #[cfg(test)]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let pending = self.lock();
        let (pending, _) = self
            .drained
            .wait_timeout_while(pending, timeout, |p| *p != 0)
            .unwrap_or_else(PoisonError::into_inner);
        *pending == 0
    }
}
