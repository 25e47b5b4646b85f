//! Single-frame rendering through ffmpeg.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use halation_common::error::{HalationError, HalationResult};

use crate::filter::OUTPUT_LABEL;

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// One render-tool invocation: a filtered single frame written as PNG.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub source: &'a Path,

    /// Seek position for video sources (`HH:MM:SS.mmm`).
    pub seek: Option<&'a str>,

    pub filter: &'a str,

    /// Overwritten if present.
    pub output: &'a Path,
}

impl RenderRequest<'_> {
    /// ffmpeg argument vector for this request.
    pub fn ffmpeg_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "warning", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(self.source.as_os_str().to_owned());
        if let Some(seek) = self.seek {
            args.push("-ss".into());
            args.push(seek.into());
        }
        args.extend(
            [
                "-filter_complex",
                self.filter,
                "-map",
                OUTPUT_LABEL,
                "-frames:v",
                "1",
                "-update",
                "1",
                "-y",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(self.output.as_os_str().to_owned());
        args
    }
}

/// Trait for frame render backends.
pub trait FrameRenderer: Send + Sync {
    /// Run one invocation. `Ok` means the tool exited zero; the caller
    /// still checks the output file.
    fn render_frame(&self, request: &RenderRequest<'_>) -> HalationResult<()>;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Renders frames by spawning ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegRenderer {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegRenderer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Kill invocations that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for FfmpegRenderer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FrameRenderer for FfmpegRenderer {
    fn render_frame(&self, request: &RenderRequest<'_>) -> HalationResult<()> {
        let args = request.ffmpeg_args();
        tracing::debug!(binary = %self.binary.display(), ?args, "Running ffmpeg");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| HalationError::render(format!("Failed to start ffmpeg: {e}")))?;

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| HalationError::render("Failed to capture ffmpeg stderr"))?;

        // Drain stderr concurrently to avoid ffmpeg blocking on a full stderr pipe.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut output = String::new();
            match stderr.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|e| HalationError::render(format!("Failed to wait on ffmpeg: {e}")))?
            {
                break status;
            }
            if let Some(limit) = self.timeout {
                if started.elapsed() >= limit {
                    child.kill().ok();
                    child.wait().ok();
                    stderr_task.join().ok();
                    return Err(HalationError::render(format!(
                        "ffmpeg timed out after {:.1}s",
                        limit.as_secs_f64()
                    )));
                }
            }
            std::thread::sleep(WAIT_POLL_INTERVAL);
        };

        let stderr_output = stderr_task
            .join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            let detail = stderr_output.trim();
            return Err(HalationError::render(if detail.is_empty() {
                format!("ffmpeg error (status {status})")
            } else {
                format!("ffmpeg failed (status {status}): {detail}")
            }));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Whether `path` exists and holds at least one byte.
pub fn output_is_nonempty(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

/// Whether `binary` can be executed: an existing path, or a name on PATH.
pub fn tool_available(binary: &Path) -> bool {
    if binary.components().count() > 1 {
        return binary.is_file();
    }
    Command::new("sh")
        .arg("-c")
        .arg("command -v \"$1\" >/dev/null 2>&1")
        .arg("sh")
        .arg(binary)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
