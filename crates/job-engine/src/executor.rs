//! Runs one job: plan the sweep, render each variant in order, publish
//! partial results, and honor cancellation between variants.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use halation_common::error::{HalationError, HalationResult};
use halation_job_model::{JobId, JobStatus, SweepConfig};
use halation_processing_core::{plan_variants, Variant};
use halation_render_engine::filter::build_filter;
use halation_render_engine::probe::{
    classify, probe_duration_or_zero, representative_timestamp, MediaKind, MediaProber,
    FALLBACK_TIMESTAMP,
};
use halation_render_engine::render::{output_is_nonempty, FrameRenderer, RenderRequest};

use crate::registry::JobRegistry;

/// What happened to a single variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantOutcome {
    Rendered,
    /// Dropped from the job's results; never fatal to the job.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantResult {
    pub name: String,
    pub outcome: VariantOutcome,
}

/// Result of one [`JobExecutor::run`] call.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    pub job_id: JobId,

    /// Status the job held when the executor let go of it.
    pub status: JobStatus,

    /// Every variant attempted, in sweep order.
    pub variants: Vec<VariantResult>,
}

impl ExecutionSummary {
    pub fn rendered(&self) -> usize {
        self.variants
            .iter()
            .filter(|v| v.outcome == VariantOutcome::Rendered)
            .count()
    }
}

enum LoopExit {
    Completed,
    Canceled,
    /// The registry entry disappeared mid-run.
    Vanished,
}

/// Executes jobs against a render backend and a prober.
pub struct JobExecutor {
    registry: JobRegistry,
    renderer: Arc<dyn FrameRenderer>,
    prober: Arc<dyn MediaProber>,
}

impl JobExecutor {
    pub fn new(
        registry: JobRegistry,
        renderer: Arc<dyn FrameRenderer>,
        prober: Arc<dyn MediaProber>,
    ) -> Self {
        Self {
            registry,
            renderer,
            prober,
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Run the job to a terminal state. Blocks for the duration of every
    /// render invocation.
    ///
    /// Returns `None` if the job is unknown or was no longer queued.
    pub fn run(&self, job_id: JobId) -> Option<ExecutionSummary> {
        let claimed = self.registry.update(job_id, |job| {
            job.transition(JobStatus::Running).then(|| {
                (
                    job.source_path.clone(),
                    job.output_dir.clone(),
                    job.sweep.clone(),
                )
            })
        });
        let Some(Some((source, output_dir, sweep))) = claimed else {
            tracing::debug!(job_id = %job_id, "Job not runnable, skipping");
            return None;
        };

        let started = Instant::now();
        tracing::info!(
            job_id = %job_id,
            source = %source.display(),
            count = sweep.count,
            tint = %sweep.tint,
            "Job started"
        );

        let mut variants = Vec::with_capacity(sweep.count);
        let result = self.execute(job_id, &source, &output_dir, &sweep, &mut variants);

        let status = match result {
            Ok(LoopExit::Completed) => self
                .registry
                .update(job_id, |job| {
                    job.transition(JobStatus::Done);
                    job.status
                })
                .unwrap_or(JobStatus::Done),
            Ok(LoopExit::Canceled) => JobStatus::Canceled,
            Ok(LoopExit::Vanished) => {
                tracing::warn!(job_id = %job_id, "Job disappeared from registry mid-run");
                JobStatus::Canceled
            }
            Err(err) => {
                tracing::error!(job_id = %job_id, error = %err, "Job failed");
                self.registry
                    .update(job_id, |job| {
                        if job.transition(JobStatus::Error) {
                            job.error = Some(err.to_string());
                        }
                        job.status
                    })
                    .unwrap_or(JobStatus::Error)
            }
        };

        let summary = ExecutionSummary {
            job_id,
            status,
            variants,
        };
        tracing::info!(
            job_id = %job_id,
            status = %summary.status,
            rendered = summary.rendered(),
            attempted = summary.variants.len(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Job finished"
        );
        Some(summary)
    }

    fn execute(
        &self,
        job_id: JobId,
        source: &Path,
        output_dir: &Path,
        sweep: &SweepConfig,
        results: &mut Vec<VariantResult>,
    ) -> HalationResult<LoopExit> {
        let variants = plan_variants(sweep).map_err(|e| HalationError::job(e.to_string()))?;
        std::fs::create_dir_all(output_dir)?;

        let kind = classify(source);
        let seek = match kind {
            MediaKind::Image => None,
            MediaKind::Video => Some(representative_timestamp(probe_duration_or_zero(
                self.prober.as_ref(),
                source,
            ))),
            MediaKind::Unknown => Some(FALLBACK_TIMESTAMP.to_string()),
        };
        tracing::debug!(job_id = %job_id, kind = kind.as_str(), ?seek, "Source classified");

        let mut generated: Vec<String> = Vec::with_capacity(variants.len());
        for variant in &variants {
            let outcome = self.render_variant(variant, source, seek.as_deref(), output_dir);
            match &outcome {
                VariantOutcome::Rendered => generated.push(variant.name.clone()),
                VariantOutcome::Failed { reason } => {
                    tracing::warn!(
                        job_id = %job_id,
                        variant = %variant.name,
                        reason = %reason,
                        "Variant failed, skipping"
                    );
                }
            }
            results.push(VariantResult {
                name: variant.name.clone(),
                outcome,
            });

            let published = self.registry.update(job_id, |job| {
                if job.status == JobStatus::Canceled {
                    return false;
                }
                job.publish_generated(&generated);
                true
            });
            match published {
                Some(true) => {}
                Some(false) => {
                    tracing::info!(job_id = %job_id, after = %variant.name, "Job canceled");
                    return Ok(LoopExit::Canceled);
                }
                None => return Ok(LoopExit::Vanished),
            }
        }

        Ok(LoopExit::Completed)
    }

    fn render_variant(
        &self,
        variant: &Variant,
        source: &Path,
        seek: Option<&str>,
        output_dir: &Path,
    ) -> VariantOutcome {
        let filter = build_filter(
            variant.threshold,
            variant.sigma,
            variant.opacity,
            variant.tint,
        );
        let output = output_dir.join(format!("{}.png", variant.name));
        let request = RenderRequest {
            source,
            seek,
            filter: &filter,
            output: &output,
        };

        match self.renderer.render_frame(&request) {
            Ok(()) if output_is_nonempty(&output) => VariantOutcome::Rendered,
            Ok(()) => VariantOutcome::Failed {
                reason: format!("{} wrote no output to {}", self.renderer.name(), output.display()),
            },
            Err(err) => VariantOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }
}
