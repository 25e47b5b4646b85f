//! Check that the media tools are available.

use halation_common::config::{config_file_path, AppConfig};
use halation_render_engine::tool_available;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Halation System Check");
    println!("{}", "=".repeat(50));

    let mut missing = Vec::new();
    for (role, binary) in [
        ("Renderer", &config.tools.ffmpeg),
        ("Prober", &config.tools.ffprobe),
    ] {
        if tool_available(binary) {
            println!("[OK] {role}: {}", binary.display());
        } else {
            println!("[MISSING] {role}: {}", binary.display());
            missing.push(binary.display().to_string());
        }
    }

    println!();
    println!("Config file: {}", config_file_path().display());
    println!("Results directory: {}", config.results_dir.display());
    println!(
        "Workers: {} (queue depth {})",
        config.scheduler.workers, config.scheduler.queue_depth
    );
    if let Some(secs) = config.tools.render_timeout_secs {
        println!("Render timeout: {secs}s");
    }

    println!();
    if missing.is_empty() {
        println!("All required tools are available. Halation is ready.");
        Ok(())
    } else {
        Err(anyhow::anyhow!("Missing tools: {}", missing.join(", ")))
    }
}
