//! Work queue with backpressure support
//!
//! A bounded crossbeam channel carrying [`Job`]s between workers. Workers are
//! both producers and consumers, so sending never blocks: when the queue is
//! full the job is handed back and the worker parks it, offering it again
//! once slots free up. That avoids the self-deadlock of every worker waiting
//! on a full queue that nobody drains.
//!
//! Closing is separate from the job channel: the coordinator closes the queue
//! once the tracker reports zero outstanding jobs, which wakes idle workers.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, select};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::job::Job;

/// Statistics for the work queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total jobs enqueued
    pub enqueued: AtomicU64,

    /// Total jobs dequeued
    pub dequeued: AtomicU64,

    /// Parked jobs the producing worker ended up processing itself
    pub inline_processed: AtomicU64,
}

/// Plain copy of [`QueueStats`] for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub enqueued: u64,
    pub dequeued: u64,
    pub inline_processed: u64,
}

impl QueueStats {
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dequeued: self.dequeued.load(Ordering::Relaxed),
            inline_processed: self.inline_processed.load(Ordering::Relaxed),
        }
    }
}

/// Bounded job queue shared by all workers of one run.
pub struct WorkQueue {
    sender: Sender<Job>,
    receiver: Receiver<Job>,
    closed: Receiver<()>,
    /// Dropping this sender disconnects `closed`, which is how idle workers learn the run is over.
    close_handle: Option<Sender<()>>,
    capacity: usize,
    stats: Arc<QueueStats>,
}

impl WorkQueue {
    /// Create a queue; a capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        let (close_handle, closed) = bounded(0);

        Self {
            sender,
            receiver,
            closed,
            close_handle: Some(close_handle),
            capacity,
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Get a sender for this queue (clone for each worker)
    pub fn sender(&self) -> JobSender {
        JobSender {
            sender: self.sender.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get a receiver for this queue (clone for each worker)
    pub fn receiver(&self) -> JobReceiver {
        JobReceiver {
            receiver: self.receiver.clone(),
            closed: self.closed.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Release all workers blocked in [`JobReceiver::recv`]. Idempotent.
    pub fn close(&mut self) {
        self.close_handle.take();
    }
}

/// Handle for sending jobs to the queue
#[derive(Clone)]
pub struct JobSender {
    sender: Sender<Job>,
    stats: Arc<QueueStats>,
}

impl JobSender {
    /// Try to enqueue without blocking; the job comes back when the queue is full.
    pub fn try_send(&self, job: Job) -> Result<(), Job> {
        match self.sender.try_send(job) {
            Ok(()) => {
                self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(job)) | Err(TrySendError::Disconnected(job)) => Err(job),
        }
    }

    /// Record that a job was processed by its producer (for stats)
    pub fn record_inline(&self) {
        self.stats.inline_processed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Handle for receiving jobs from the queue
#[derive(Clone)]
pub struct JobReceiver {
    receiver: Receiver<Job>,
    closed: Receiver<()>,
    stats: Arc<QueueStats>,
}

impl JobReceiver {
    /// Block until a job is available; `None` once the queue has been closed.
    pub fn recv(&self) -> Option<Job> {
        select! {
            recv(self.receiver) -> msg => {
                let job = msg.ok()?;
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(job)
            }
            recv(self.closed) -> _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn queue_basic() {
        let queue = WorkQueue::new(10);
        queue.sender().try_send(Job::new("/s", "/t")).unwrap();
        assert_eq!(queue.len(), 1);

        let job = queue.receiver().recv().unwrap();
        assert_eq!(job, Job::new("/s", "/t"));
        assert!(queue.is_empty());
    }

    #[test]
    fn full_queue_hands_job_back() {
        let queue = WorkQueue::new(2);
        let sender = queue.sender();

        assert!(sender.try_send(Job::new("/a", "/x/a")).is_ok());
        assert!(sender.try_send(Job::new("/b", "/x/b")).is_ok());
        let back = sender.try_send(Job::new("/c", "/x/c")).unwrap_err();
        assert_eq!(back.source, std::path::Path::new("/c"));

        sender.record_inline();
        let snap = queue.stats().snapshot();
        assert_eq!(snap.enqueued, 2);
        assert_eq!(snap.inline_processed, 1);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let queue = WorkQueue::new(0);
        assert_eq!(queue.capacity(), 1);
        assert!(queue.sender().try_send(Job::new("/a", "/b")).is_ok());
    }

    #[test]
    fn close_releases_blocked_receivers() {
        let mut queue = WorkQueue::new(4);
        let receivers: Vec<_> = (0..3)
            .map(|_| {
                let rx = queue.receiver();
                thread::spawn(move || rx.recv())
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        queue.close();
        for r in receivers {
            assert!(r.join().unwrap().is_none());
        }
    }

    #[test]
    fn stats_count_dequeues() {
        let queue = WorkQueue::new(10);
        let sender = queue.sender();
        let receiver = queue.receiver();

        sender.try_send(Job::new("/a", "/b")).unwrap();
        sender.try_send(Job::new("/c", "/d")).unwrap();
        receiver.recv().unwrap();
        receiver.recv().unwrap();

        let snap = queue.stats().snapshot();
        assert_eq!(snap.enqueued, 2);
        assert_eq!(snap.dequeued, 2);
    }
}
