//! Jobs: one rendering request and its observable lifecycle.
//!
//! A job moves strictly forward through its statuses:
//!
//! ```text
//! queued ──► running ──┬──► done
//!                      ├──► error
//!                      └──► canceled
//! ```
//!
//! A queued job may also be canceled before a worker picks it up.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sweep::SweepConfig;

/// Opaque, never-reused job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(uuid::Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Error,
    Canceled,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
            JobStatus::Canceled => "canceled",
        }
    }

    /// Terminal statuses have no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Done | JobStatus::Error | JobStatus::Canceled
        )
    }

    /// Whether moving from `self` to `next` respects the forward-only lifecycle.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        match (self, next) {
            (JobStatus::Queued, JobStatus::Running) => true,
            (JobStatus::Queued, JobStatus::Canceled) => true,
            (JobStatus::Running, next) => next.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(completed, total)` pair, rendered as `"completed/total"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub const fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

impl From<Progress> for String {
    fn from(progress: Progress) -> Self {
        progress.to_string()
    }
}

impl TryFrom<String> for Progress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (completed, total) = value
            .split_once('/')
            .ok_or_else(|| format!("progress '{value}' is not of the form k/N"))?;
        let completed = completed
            .trim()
            .parse()
            .map_err(|e| format!("bad completed count in '{value}': {e}"))?;
        let total = total
            .trim()
            .parse()
            .map_err(|e| format!("bad total count in '{value}': {e}"))?;
        Ok(Self { completed, total })
    }
}

/// One rendering request.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,

    /// Uploaded source file. Read-only for the job.
    pub source_path: PathBuf,

    /// Directory dedicated to this job's `Hnn.png` outputs.
    pub output_dir: PathBuf,

    pub sweep: SweepConfig,

    /// Names of successfully rendered variants, in sweep order. Append-only.
    pub generated: Vec<String>,

    pub progress: Progress,

    /// Present only when `status` is [`JobStatus::Error`].
    pub error: Option<String>,

    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a queued job.
    pub fn new(id: JobId, source_path: PathBuf, output_dir: PathBuf, sweep: SweepConfig) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            source_path,
            output_dir,
            sweep,
            generated: Vec::new(),
            progress: Progress::default(),
            error: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Move to `next` if the lifecycle allows it. Returns whether the
    /// status changed.
    pub fn transition(&mut self, next: JobStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        let now = Utc::now();
        if next == JobStatus::Running {
            self.started_at = Some(now);
        }
        if next.is_terminal() {
            self.finished_at = Some(now);
        }
        true
    }

    /// Replace the partial results with a longer snapshot.
    ///
    /// Snapshots that would shrink `generated` or exceed the sweep count are
    /// ignored.
    pub fn publish_generated(&mut self, generated: &[String]) -> bool {
        if generated.len() < self.generated.len() || generated.len() > self.sweep.count {
            return false;
        }
        self.generated = generated.to_vec();
        self.progress = Progress::new(self.generated.len(), self.sweep.count);
        true
    }

    /// Poller-facing view of the job.
    pub fn report(&self) -> StatusReport {
        StatusReport {
            status: self.status,
            progress: self.progress,
            generated: self.generated.clone(),
            error: self.error.clone(),
        }
    }
}

/// What a poller sees for a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: JobStatus,
    pub progress: Progress,
    pub generated: Vec<String>,
    pub error: Option<String>,
}
