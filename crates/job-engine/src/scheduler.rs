//! Bounded worker pool for job execution.

use std::sync::Arc;

use halation_common::error::{HalationError, HalationResult};
use halation_job_model::{JobId, JobStatus};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::executor::JobExecutor;

/// A claimed slot in the scheduler queue.
///
/// Obtained before a job is created so a full queue rejects the request
/// without leaving a half-registered job behind.
pub struct QueueSlot<'a> {
    permit: mpsc::Permit<'a, JobId>,
}

impl QueueSlot<'_> {
    /// Hand the job to the worker pool.
    pub fn enqueue(self, job_id: JobId) {
        self.permit.send(job_id);
    }
}

/// Fixed-size pool of workers pulling job ids from a bounded queue.
///
/// Each worker runs one job at a time on the blocking thread pool; jobs
/// beyond `workers` wait in the queue.
pub struct Scheduler {
    queue: mpsc::Sender<JobId>,
    queue_depth: usize,
    workers: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawn `workers` worker tasks. Must be called inside a Tokio runtime.
    pub fn start(executor: Arc<JobExecutor>, workers: usize, queue_depth: usize) -> Self {
        let workers = workers.max(1);
        let queue_depth = queue_depth.max(1);
        let (queue, receiver) = mpsc::channel::<JobId>(queue_depth);
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..workers)
            .map(|worker| {
                let executor = Arc::clone(&executor);
                let receiver = Arc::clone(&receiver);
                tokio::spawn(worker_loop(worker, executor, receiver))
            })
            .collect();

        tracing::info!(queue_depth, "Scheduler started");

        Self {
            queue,
            queue_depth,
            workers,
        }
    }

    /// Claim a queue slot without blocking.
    pub fn reserve(&self) -> HalationResult<QueueSlot<'_>> {
        match self.queue.try_reserve() {
            Ok(permit) => Ok(QueueSlot { permit }),
            Err(mpsc::error::TrySendError::Full(())) => Err(HalationError::QueueFull {
                depth: self.queue_depth,
            }),
            Err(mpsc::error::TrySendError::Closed(())) => {
                Err(HalationError::job("Scheduler is shut down"))
            }
        }
    }

    /// Stop accepting work and wait for queued and running jobs to finish.
    pub async fn shutdown(self) {
        drop(self.queue);
        for worker in self.workers {
            worker.await.ok();
        }
        tracing::info!("Scheduler stopped");
    }
}

async fn worker_loop(
    worker: usize,
    executor: Arc<JobExecutor>,
    receiver: Arc<Mutex<mpsc::Receiver<JobId>>>,
) {
    tracing::debug!(worker, "Worker ready");
    loop {
        let next = { receiver.lock().await.recv().await };
        let Some(job_id) = next else {
            break;
        };

        let task_executor = Arc::clone(&executor);
        let outcome = tokio::task::spawn_blocking(move || task_executor.run(job_id)).await;

        if let Err(join_err) = outcome {
            tracing::error!(worker, job_id = %job_id, error = %join_err, "Job execution panicked");
            executor.registry().update(job_id, |job| {
                if job.transition(JobStatus::Error) {
                    job.error = Some(format!("job execution aborted: {join_err}"));
                }
            });
        }
    }
    tracing::debug!(worker, "Worker exiting");
}
