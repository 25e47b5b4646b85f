//! Concurrency-safe job store.

use std::collections::HashMap;
use std::sync::Arc;

use halation_job_model::{Job, JobId, JobStatus, StatusReport};
use parking_lot::RwLock;

/// Errors returned by [`JobRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("job {0} already exists")]
    DuplicateId(JobId),

    #[error("job {0} not found")]
    NotFound(JobId),
}

/// Shared map from job id to job state.
///
/// Cloning yields another handle to the same map. Every read hands out a
/// copy; every write runs under the exclusive lock.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new job. Entries are never evicted.
    pub fn insert(&self, job: Job) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write();
        if jobs.contains_key(&job.id) {
            return Err(RegistryError::DuplicateId(job.id));
        }
        jobs.insert(job.id, job);
        Ok(())
    }

    /// Apply `mutate` to the job under exclusive access.
    ///
    /// Returns `None` without calling `mutate` when the id is unknown.
    pub fn update<R>(&self, id: JobId, mutate: impl FnOnce(&mut Job) -> R) -> Option<R> {
        let mut jobs = self.jobs.write();
        jobs.get_mut(&id).map(mutate)
    }

    /// Copy of the job's current state.
    pub fn snapshot(&self, id: JobId) -> Result<Job, RegistryError> {
        self.jobs
            .read()
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    /// Poller view of the job.
    pub fn report(&self, id: JobId) -> Result<StatusReport, RegistryError> {
        self.jobs
            .read()
            .get(&id)
            .map(Job::report)
            .ok_or(RegistryError::NotFound(id))
    }

    /// Mark the job canceled unless it already finished.
    ///
    /// Idempotent. Returns the status after the request.
    pub fn cancel(&self, id: JobId) -> Result<JobStatus, RegistryError> {
        self.update(id, |job| {
            if job.transition(JobStatus::Canceled) {
                tracing::info!(job_id = %id, "Cancellation requested");
            }
            job.status
        })
        .ok_or(RegistryError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }
}
