//! The job-facing API consumed by outer layers: submit, poll, cancel.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use halation_common::config::{AppConfig, SchedulerConfig};
use halation_common::error::{HalationError, HalationResult};
use halation_job_model::{Job, JobId, JobStatus, StatusReport, SweepConfig};
use halation_render_engine::probe::{FfprobeProber, MediaProber};
use halation_render_engine::render::{FfmpegRenderer, FrameRenderer};

use crate::executor::JobExecutor;
use crate::registry::JobRegistry;
use crate::scheduler::Scheduler;

/// Owns the registry and worker pool for one process.
pub struct HalationService {
    results_dir: PathBuf,
    registry: JobRegistry,
    scheduler: Scheduler,
}

impl HalationService {
    /// Start a service backed by ffmpeg/ffprobe as configured.
    /// Must be called inside a Tokio runtime.
    pub fn start(config: &AppConfig) -> Self {
        let renderer = FfmpegRenderer::new(&config.tools.ffmpeg)
            .with_timeout(config.tools.render_timeout_secs.map(Duration::from_secs));
        let prober = FfprobeProber::new(&config.tools.ffprobe);
        Self::with_backends(
            config.results_dir.clone(),
            &config.scheduler,
            Arc::new(renderer),
            Arc::new(prober),
        )
    }

    /// Start a service with explicit render and probe backends.
    pub fn with_backends(
        results_dir: PathBuf,
        scheduler: &SchedulerConfig,
        renderer: Arc<dyn FrameRenderer>,
        prober: Arc<dyn MediaProber>,
    ) -> Self {
        let registry = JobRegistry::new();
        let executor = Arc::new(JobExecutor::new(registry.clone(), renderer, prober));
        let scheduler = Scheduler::start(executor, scheduler.workers, scheduler.queue_depth);
        Self {
            results_dir,
            registry,
            scheduler,
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Create a job for `source` and queue it. Never waits on execution.
    ///
    /// Rejected requests (missing source, invalid sweep, full queue) issue
    /// no job id.
    pub fn submit(&self, source: impl Into<PathBuf>, sweep: SweepConfig) -> HalationResult<JobId> {
        let source = source.into();
        let sweep = sweep.normalized();
        sweep.validate()?;
        if !source.is_file() {
            return Err(HalationError::FileNotFound { path: source });
        }

        let slot = self.scheduler.reserve()?;

        let id = JobId::new();
        let output_dir = self.results_dir.join(id.to_string());
        std::fs::create_dir_all(&output_dir)?;

        let job = Job::new(id, source, output_dir, sweep);
        tracing::info!(
            job_id = %id,
            source = %job.source_path.display(),
            count = job.sweep.count,
            "Job submitted"
        );
        self.registry
            .insert(job)
            .map_err(|e| HalationError::job(e.to_string()))?;
        slot.enqueue(id);

        Ok(id)
    }

    /// Current status, progress and partial results, or `None` for an
    /// unknown id.
    pub fn status(&self, id: JobId) -> Option<StatusReport> {
        self.registry.report(id).ok()
    }

    /// Full copy of the job, or `None` for an unknown id.
    pub fn snapshot(&self, id: JobId) -> Option<Job> {
        self.registry.snapshot(id).ok()
    }

    /// Ask the job to stop after its current variant. No-op on finished
    /// jobs. Returns the resulting status, or `None` for an unknown id.
    pub fn request_cancel(&self, id: JobId) -> Option<JobStatus> {
        self.registry.cancel(id).ok()
    }

    /// Poll until the job reaches a terminal status.
    pub async fn wait_for(&self, id: JobId, poll_interval: Duration) -> Option<StatusReport> {
        loop {
            let report = self.status(id)?;
            if report.status.is_terminal() {
                return Some(report);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Stop accepting jobs and wait for in-flight ones.
    pub async fn shutdown(self) {
        self.scheduler.shutdown().await;
    }
}
