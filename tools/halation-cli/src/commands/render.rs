//! Render a sweep of halation variants.

use std::path::PathBuf;
use std::time::Duration;

use halation_common::config::AppConfig;
use halation_job_engine::HalationService;
use halation_job_model::{JobId, JobStatus, StatusReport};

use super::sweep_args::SweepArgs;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub async fn run(
    mut config: AppConfig,
    source: PathBuf,
    sweep: SweepArgs,
    results_dir: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(dir) = results_dir {
        config.results_dir = dir;
    }
    let sweep = sweep.apply(config.sweep.clone());

    let service = HalationService::start(&config);
    let id = service.submit(&source, sweep.clone())?;
    let output_dir = service.results_dir().join(id.to_string());

    if !json {
        println!("Rendering halation sweep: {}", source.display());
        println!("  Job: {id}");
        println!("  Variants: {}", sweep.count);
        println!(
            "  Threshold: {}..{}  Sigma: {}..{}  Opacity: {}..{}  Tint: {}",
            sweep.threshold.min,
            sweep.threshold.max,
            sweep.sigma.min,
            sweep.sigma.max,
            sweep.opacity.min,
            sweep.opacity.max,
            sweep.tint,
        );
        println!("  Output: {}", output_dir.display());
        println!();
        println!("Press Ctrl+C to cancel after the current variant...");
    }

    let report = tokio::select! {
        report = watch(&service, id, json) => report,
        _ = tokio::signal::ctrl_c() => {
            if !json {
                println!();
                println!("Cancel requested, finishing current variant...");
            }
            service.request_cancel(id);
            watch(&service, id, json).await
        }
    };
    service.shutdown().await;

    let report =
        report.ok_or_else(|| anyhow::anyhow!("Job {id} disappeared before finishing"))?;

    if json {
        let payload = serde_json::json!({
            "job_id": id.to_string(),
            "output_dir": output_dir,
            "status": report.status,
            "progress": report.progress,
            "generated": report.generated,
            "error": report.error,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!();
        match report.status {
            JobStatus::Done => println!(
                "Render complete: {} of {} variants in {}",
                report.progress.completed,
                report.progress.total,
                output_dir.display()
            ),
            JobStatus::Canceled => println!(
                "Render canceled: kept {} variant(s) in {}",
                report.generated.len(),
                output_dir.display()
            ),
            _ => {}
        }
    }

    if report.status == JobStatus::Error {
        return Err(anyhow::anyhow!(
            "Render failed: {}",
            report.error.unwrap_or_else(|| "unknown error".to_string())
        ));
    }

    Ok(())
}

/// Poll the job until it finishes, printing each newly rendered variant.
async fn watch(service: &HalationService, id: JobId, quiet: bool) -> Option<StatusReport> {
    let mut shown = 0;
    loop {
        let report = service.status(id)?;
        if !quiet {
            for name in report.generated.iter().skip(shown) {
                println!("  [{}] {name}.png", report.progress);
            }
        }
        shown = report.generated.len();

        if report.status.is_terminal() {
            return Some(report);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
