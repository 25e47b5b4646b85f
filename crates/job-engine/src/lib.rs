//! Halation Job Engine
//!
//! Runs halation renders as asynchronous, cancelable jobs.
//!
//! # Architecture
//!
//! ```text
//! submit ──► JobRegistry (queued) ──► Scheduler queue ──► worker (x2)
//!                 ▲                                          │
//!                 │ status / progress / generated            ▼
//!   pollers ──────┤                                     JobExecutor
//!                 │                                          │ per variant:
//!   cancel ───────┘◄──── checkpoint after each variant ──────┘ ffmpeg ─► Hnn.png
//! ```
//!
//! The registry is the only state shared between threads. Cancellation
//! is a status change the executor notices between variants; a running
//! ffmpeg invocation is never interrupted.

pub mod executor;
pub mod registry;
pub mod scheduler;
pub mod service;

pub use executor::{ExecutionSummary, JobExecutor, VariantOutcome, VariantResult};
pub use registry::{JobRegistry, RegistryError};
pub use scheduler::Scheduler;
pub use service::HalationService;
