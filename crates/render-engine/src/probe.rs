//! Source classification and video duration probing.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use halation_common::error::{HalationError, HalationResult};

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp", "gif", "heic", "heif",
];

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "m4v", "avi", "mkv", "webm", "mxf", "mpg", "mpeg", "3gp",
];

/// Timestamp used when a video's duration cannot be determined.
pub const FALLBACK_TIMESTAMP: &str = "00:00:01.000";

/// What kind of media a source file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    /// Neither list nor MIME guess matched. Rendered like a video.
    Unknown,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Unknown => "unknown",
        }
    }
}

fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn mime_top_level_is(path: &Path, top: &str) -> bool {
    mime_guess::from_path(path)
        .iter()
        .any(|mime| mime.type_().as_str() == top)
}

pub fn is_image(path: &Path) -> bool {
    match extension_lowercase(path) {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => true,
        _ => mime_top_level_is(path, "image"),
    }
}

pub fn is_video(path: &Path) -> bool {
    match extension_lowercase(path) {
        Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => true,
        _ => mime_top_level_is(path, "video"),
    }
}

/// Classify a source by extension, falling back to a MIME guess.
pub fn classify(path: &Path) -> MediaKind {
    if is_image(path) {
        MediaKind::Image
    } else if is_video(path) {
        MediaKind::Video
    } else {
        MediaKind::Unknown
    }
}

/// Source of stream durations.
pub trait MediaProber: Send + Sync {
    /// Container duration in seconds.
    fn duration_secs(&self, path: &Path) -> HalationResult<f64>;
}

/// Queries durations with `ffprobe`.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    binary: PathBuf,
}

impl FfprobeProber {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl MediaProber for FfprobeProber {
    fn duration_secs(&self, path: &Path) -> HalationResult<f64> {
        let output = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=nw=1:nk=1",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| HalationError::probe(format!("Failed to start ffprobe: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HalationError::probe(format!(
                "ffprobe failed (status {}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        raw.trim()
            .parse::<f64>()
            .map_err(|e| HalationError::probe(format!("Unparseable duration '{}': {e}", raw.trim())))
    }
}

/// Duration in seconds, or `0.0` when probing fails for any reason.
pub fn probe_duration_or_zero(prober: &dyn MediaProber, path: &Path) -> f64 {
    match prober.duration_secs(path) {
        Ok(secs) if secs.is_finite() && secs > 0.0 => secs,
        Ok(secs) => {
            tracing::warn!(path = %path.display(), secs, "Probe returned unusable duration");
            0.0
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Duration probe failed");
            0.0
        }
    }
}

/// Frame position used for every variant of a video: the midpoint of its
/// duration, never earlier than one second.
pub fn representative_timestamp(duration_secs: f64) -> String {
    format_timestamp((duration_secs / 2.0).max(1.0))
}

/// `HH:MM:SS.000`, truncated to whole seconds.
pub fn format_timestamp(secs: f64) -> String {
    let whole = if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}.000",
        whole / 3600,
        (whole % 3600) / 60,
        whole % 60
    )
}
