//! Print the filter graph of each variant in a sweep.

use halation_common::config::AppConfig;
use halation_processing_core::plan_variants;
use halation_render_engine::build_filter;

use super::sweep_args::SweepArgs;

pub fn run(config: &AppConfig, sweep: SweepArgs) -> anyhow::Result<()> {
    let sweep = sweep.apply(config.sweep.clone());
    sweep.validate()?;
    let variants = plan_variants(&sweep)?;

    for variant in &variants {
        println!(
            "{}  threshold={} sigma={} opacity={} tint={}",
            variant.name, variant.threshold, variant.sigma, variant.opacity, variant.tint
        );
        println!(
            "     {}",
            build_filter(variant.threshold, variant.sigma, variant.opacity, variant.tint)
        );
    }

    Ok(())
}
