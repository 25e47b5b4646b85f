//! Application configuration.

use std::path::{Path, PathBuf};

use halation_job_model::SweepConfig;
use serde::{Deserialize, Serialize};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory under which each job gets its own output directory.
    pub results_dir: PathBuf,

    /// Worker pool settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// External tool settings.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Sweep used when a request leaves parameters unspecified.
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Worker pool sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of jobs rendered concurrently.
    pub workers: usize,

    /// Maximum number of jobs waiting for a worker before `submit` rejects.
    pub queue_depth: usize,
}

/// External media tool locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Render binary (name on PATH or absolute path).
    pub ffmpeg: PathBuf,

    /// Probe binary (name on PATH or absolute path).
    pub ffprobe: PathBuf,

    /// Kill a single render invocation after this many seconds.
    /// A timed-out variant is dropped like any other failed variant.
    #[serde(default)]
    pub render_timeout_secs: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "halation=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            scheduler: SchedulerConfig::default(),
            tools: ToolsConfig::default(),
            sweep: SweepConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            queue_depth: 64,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            render_timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("halation").join("config.json")
}

/// Default results directory.
fn default_results_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("halation").join("results")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_matches_two_workers() {
        let config = AppConfig::default();
        assert_eq!(config.scheduler.workers, 2);
        assert!(config.scheduler.queue_depth > 0);
        assert_eq!(config.tools.ffmpeg, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.scheduler.workers = 4;
        config.tools.render_timeout_secs = Some(30);
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.scheduler.workers, 4);
        assert_eq!(loaded.tools.render_timeout_secs, Some(30));
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "results_dir": "/srv/out" }"#).unwrap();
        assert_eq!(config.results_dir, PathBuf::from("/srv/out"));
        assert_eq!(config.scheduler.workers, 2);
        assert_eq!(config.sweep.count, 12);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unparseable_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.scheduler.workers, 2);
    }
}
