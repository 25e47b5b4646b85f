//! Scripted render and probe backends shared by the job-engine tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use halation_common::error::{HalationError, HalationResult};
use halation_job_model::{Job, JobId, SweepConfig, Tint, ValueRange};
use halation_render_engine::probe::MediaProber;
use halation_render_engine::render::{FrameRenderer, RenderRequest};
use parking_lot::{Condvar, Mutex};

/// Arguments of one recorded render invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub name: String,
    pub source: PathBuf,
    pub seek: Option<String>,
    pub filter: String,
    pub output: PathBuf,
}

/// Blocks renders until opened.
#[derive(Default)]
pub struct Gate {
    open: Mutex<bool>,
    opened: Condvar,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn wait(&self) {
        let mut open = self.open.lock();
        while !*open {
            self.opened.wait(&mut open);
        }
    }

    pub fn open(&self) {
        *self.open.lock() = true;
        self.opened.notify_all();
    }
}

type RenderHook = Box<dyn Fn(&str) + Send + Sync>;

/// Writes a small file for every variant unless told otherwise.
#[derive(Default)]
pub struct ScriptedRenderer {
    failing: HashSet<String>,
    empty: HashSet<String>,
    fail_all: bool,
    gate: Option<Arc<Gate>>,
    delay: Option<Duration>,
    on_render: Option<RenderHook>,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit non-zero for these variant names.
    pub fn failing(mut self, names: &[&str]) -> Self {
        self.failing = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Exit non-zero for every variant.
    pub fn failing_always(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Exit zero but leave an empty output file for these variant names.
    pub fn empty_output(mut self, names: &[&str]) -> Self {
        self.empty = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Called with the variant name before each render.
    pub fn on_render(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_render = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_names(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.name.clone()).collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl FrameRenderer for ScriptedRenderer {
    fn render_frame(&self, request: &RenderRequest<'_>) -> HalationResult<()> {
        let name = request
            .output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        self.calls.lock().push(RecordedCall {
            name: name.clone(),
            source: request.source.to_path_buf(),
            seek: request.seek.map(str::to_string),
            filter: request.filter.to_string(),
            output: request.output.to_path_buf(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(hook) = &self.on_render {
            hook(&name);
        }
        if let Some(gate) = &self.gate {
            gate.wait();
        }
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let result = if self.fail_all || self.failing.contains(&name) {
            Err(HalationError::render("scripted failure (status 1)"))
        } else if self.empty.contains(&name) {
            std::fs::write(request.output, b"").map_err(HalationError::from)
        } else {
            std::fs::write(request.output, b"\x89PNG").map_err(HalationError::from)
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Returns a fixed duration, or fails, and counts calls.
pub struct FakeProber {
    duration: Option<f64>,
    calls: AtomicUsize,
}

impl FakeProber {
    pub fn with_duration(secs: f64) -> Self {
        Self {
            duration: Some(secs),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            duration: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MediaProber for FakeProber {
    fn duration_secs(&self, path: &Path) -> HalationResult<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.duration.ok_or_else(|| {
            HalationError::probe(format!("{}: Invalid data found when processing input", path.display()))
        })
    }
}

/// Sweep with every range collapsed to a single value.
pub fn flat_sweep(count: usize, threshold: i64, sigma: i64, opacity: f64, tint: Tint) -> SweepConfig {
    SweepConfig {
        count,
        threshold: ValueRange::new(threshold, threshold),
        sigma: ValueRange::new(sigma, sigma),
        opacity: ValueRange::new(opacity, opacity),
        tint,
    }
}

/// A queued job whose source is a (not necessarily existing) file in `dir`.
pub fn queued_job(dir: &Path, source_name: &str, sweep: SweepConfig) -> Job {
    let id = JobId::new();
    Job::new(
        id,
        dir.join(source_name),
        dir.join("results").join(id.to_string()),
        sweep,
    )
}

/// Poll `condition` until it holds or five seconds pass.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
