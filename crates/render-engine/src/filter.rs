//! Halation filter-graph construction.
//!
//! The builder does no clamping; callers pass sigma >= 1 and opacity
//! already rounded into `[0.01, 0.95]`.

use halation_job_model::Tint;

/// Label of the graph's final output pad, passed to `-map`.
pub const OUTPUT_LABEL: &str = "[v]";

const WARM_TINT: &str = "colorchannelmixer=rr=1.05:gg=1.00:bb=0.98";
const COOL_TINT: &str = "colorchannelmixer=rr=0.99:gg=1.00:bb=1.04";
const DESATURATE: &str = "hue=s=0";

/// Tint sub-expression applied to the blurred highlight layer.
pub fn tint_stage(tint: Tint) -> &'static str {
    match tint {
        Tint::Warm => WARM_TINT,
        Tint::Cool => COOL_TINT,
        Tint::Neutral => DESATURATE,
    }
}

/// Build the `-filter_complex` expression for one variant.
pub fn build_filter(threshold: i64, sigma: i64, opacity: f64, tint: Tint) -> String {
    format!(
        "[0:v]format=yuv444p,split=2[b][h];\
         [h]lut=y='if(gte(val,{threshold}),val,0)',gblur=sigma={sigma}[soft];\
         [soft]{tint}[hal];\
         [b][hal]blend=all_mode=screen:all_opacity={opacity}{OUTPUT_LABEL}",
        tint = tint_stage(tint),
    )
}
