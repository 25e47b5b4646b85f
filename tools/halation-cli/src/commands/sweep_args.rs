//! Sweep flags shared by `render` and `filter`.

use clap::Args;
use halation_job_model::{SweepConfig, Tint};

/// Overrides for the configured default sweep. Unset flags keep the
/// configured value.
#[derive(Debug, Clone, Default, Args)]
pub struct SweepArgs {
    /// Number of variants (clamped to 1..=36)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Lowest luma threshold
    #[arg(long)]
    pub thr_min: Option<i64>,

    /// Highest luma threshold
    #[arg(long)]
    pub thr_max: Option<i64>,

    /// Smallest blur sigma
    #[arg(long)]
    pub sig_min: Option<i64>,

    /// Largest blur sigma
    #[arg(long)]
    pub sig_max: Option<i64>,

    /// Lowest blend opacity
    #[arg(long)]
    pub op_min: Option<f64>,

    /// Highest blend opacity
    #[arg(long)]
    pub op_max: Option<f64>,

    /// Glow tint: neutral|warm|cool (anything else is neutral)
    #[arg(long)]
    pub tint: Option<String>,
}

impl SweepArgs {
    /// Apply the flags on top of `base`, clamping the count.
    pub fn apply(&self, base: SweepConfig) -> SweepConfig {
        let mut sweep = base;
        if let Some(count) = self.count {
            sweep.count = count;
        }
        if let Some(v) = self.thr_min {
            sweep.threshold.min = v;
        }
        if let Some(v) = self.thr_max {
            sweep.threshold.max = v;
        }
        if let Some(v) = self.sig_min {
            sweep.sigma.min = v;
        }
        if let Some(v) = self.sig_max {
            sweep.sigma.max = v;
        }
        if let Some(v) = self.op_min {
            sweep.opacity.min = v;
        }
        if let Some(v) = self.op_max {
            sweep.opacity.max = v;
        }
        if let Some(tint) = &self.tint {
            sweep.tint = Tint::parse_lenient(tint);
        }
        sweep.normalized()
    }
}
