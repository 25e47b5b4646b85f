//! Variant planning: one render per sweep index.

use halation_job_model::{SweepConfig, Tint};

use crate::sweep::spaced_values;

/// Smallest blur radius the render tool accepts.
pub const MIN_SIGMA: i64 = 1;

/// Opacity bounds applied after rounding to two decimals.
pub const MIN_OPACITY: f64 = 0.01;
pub const MAX_OPACITY: f64 = 0.95;

/// One `(threshold, sigma, opacity)` tuple, already clamped for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Zero-based sweep position.
    pub index: usize,

    /// `H01`, `H02`, ...
    pub name: String,

    pub threshold: i64,
    pub sigma: i64,
    pub opacity: f64,
    pub tint: Tint,
}

/// The sweep itself could not be computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("opacity range {min}..{max} is not finite")]
    NonFiniteOpacity { min: f64, max: f64 },
}

/// Output name for the variant at `index`.
pub fn variant_name(index: usize) -> String {
    format!("H{:02}", index + 1)
}

pub fn clamp_sigma(sigma: i64) -> i64 {
    sigma.max(MIN_SIGMA)
}

/// Round to two decimals, then clamp into `[MIN_OPACITY, MAX_OPACITY]`.
pub fn clamp_opacity(opacity: f64) -> f64 {
    round_to_hundredths(opacity).clamp(MIN_OPACITY, MAX_OPACITY)
}

// Decimal rounding of the exact binary value, ties to even.
fn round_to_hundredths(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Expand a sweep into its variants, in index order.
pub fn plan_variants(sweep: &SweepConfig) -> Result<Vec<Variant>, PlanError> {
    if !sweep.opacity.min.is_finite() || !sweep.opacity.max.is_finite() {
        return Err(PlanError::NonFiniteOpacity {
            min: sweep.opacity.min,
            max: sweep.opacity.max,
        });
    }

    let count = sweep.count.max(1);
    let thresholds = spaced_values(sweep.threshold.min, sweep.threshold.max, count);
    let sigmas = spaced_values(sweep.sigma.min, sweep.sigma.max, count);
    let opacities = spaced_values(sweep.opacity.min, sweep.opacity.max, count);

    let variants = thresholds
        .into_iter()
        .zip(sigmas)
        .zip(opacities)
        .enumerate()
        .map(|(index, ((threshold, sigma), opacity))| Variant {
            index,
            name: variant_name(index),
            threshold,
            sigma: clamp_sigma(sigma),
            opacity: clamp_opacity(opacity),
            tint: sweep.tint,
        })
        .collect();

    Ok(variants)
}
