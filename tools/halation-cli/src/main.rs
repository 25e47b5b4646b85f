//! Halation CLI: render halation variant sweeps from the command line.
//!
//! Usage:
//!   halation render <SOURCE> [OPTIONS]   Render a sweep of halation variants
//!   halation probe <PATH>                Show how a source would be sampled
//!   halation filter [OPTIONS]            Print the filter graph of each variant
//!   halation check                       Check that ffmpeg and ffprobe are available

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use halation_common::config::AppConfig;

mod commands;

use commands::sweep_args::SweepArgs;

#[derive(Parser)]
#[command(
    name = "halation",
    about = "Batch halation (highlight glow) renders with ffmpeg",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the XDG config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a sweep of halation variants for an image or video
    Render {
        /// Image or video to render from
        source: PathBuf,

        #[command(flatten)]
        sweep: SweepArgs,

        /// Directory receiving one sub-directory per job
        #[arg(short, long)]
        results_dir: Option<PathBuf>,

        /// Print the final job report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the media kind, duration and sample timestamp of a source
    Probe {
        /// Path to the media file
        path: PathBuf,
    },

    /// Print the filter graph each variant of a sweep would use
    Filter {
        #[command(flatten)]
        sweep: SweepArgs,
    },

    /// Check that the configured media tools are available
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    halation_common::logging::init_logging(&logging);
    tracing::debug!(results_dir = %config.results_dir.display(), "Configuration loaded");

    match cli.command {
        Commands::Render {
            source,
            sweep,
            results_dir,
            json,
        } => commands::render::run(config, source, sweep, results_dir, json).await,
        Commands::Probe { path } => commands::probe::run(&config, path),
        Commands::Filter { sweep } => commands::filter::run(&config, sweep),
        Commands::Check => commands::check::run(&config),
    }
}
