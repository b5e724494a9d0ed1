use std::ffi::OsStr;
use std::path::PathBuf;

/// One (source, target) pair awaiting reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl Job {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Job for the entry `name` inside this directory job.
    pub fn child(&self, name: &OsStr) -> Self {
        Self {
            source: self.source.join(name),
            target: self.target.join(name),
        }
    }
}

/// How a job was resolved by a worker.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing further to do for this job.
    Terminal,
    /// Directory merge: replaced by one job per source entry (possibly none).
    Expanded(Vec<Job>),
}

impl Resolution {
    pub fn into_children(self) -> Vec<Job> {
        match self {
            Resolution::Terminal => Vec::new(),
            Resolution::Expanded(children) => children,
        }
    }
}
