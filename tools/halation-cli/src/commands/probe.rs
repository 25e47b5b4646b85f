//! Show how a source would be sampled.

use std::path::PathBuf;

use halation_common::config::AppConfig;
use halation_render_engine::probe::{
    classify, representative_timestamp, FfprobeProber, MediaKind, MediaProber, FALLBACK_TIMESTAMP,
};

pub fn run(config: &AppConfig, path: PathBuf) -> anyhow::Result<()> {
    if !path.is_file() {
        return Err(anyhow::anyhow!("No such file: {}", path.display()));
    }

    let kind = classify(&path);
    println!("Source: {}", path.display());
    println!("  Kind: {}", kind.as_str());

    match kind {
        MediaKind::Image => println!("  Sample: whole image"),
        MediaKind::Unknown => println!("  Sample: frame at {FALLBACK_TIMESTAMP} (unrecognized extension)"),
        MediaKind::Video => {
            let prober = FfprobeProber::new(&config.tools.ffprobe);
            match prober.duration_secs(&path) {
                Ok(duration) => {
                    println!("  Duration: {duration:.3}s");
                    println!("  Sample: frame at {}", representative_timestamp(duration));
                }
                Err(e) => {
                    println!("  [WARN] {e}");
                    println!("  Sample: frame at {FALLBACK_TIMESTAMP}");
                }
            }
        }
    }

    Ok(())
}
