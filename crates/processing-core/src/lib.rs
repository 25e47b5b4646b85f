//! Halation Processing Core
//!
//! Turns a job's sweep configuration into concrete render variants:
//! - **Sweep:** evenly spaced values across each parameter's range
//! - **Variants:** per-index `(threshold, sigma, opacity)` tuples named
//!   `H01..HNN`, with the clamps the render tool requires
//!
//! This crate is pure computation. It does no I/O.

pub mod sweep;
pub mod variant;

pub use sweep::{spaced_values, SweepValue};
pub use variant::{plan_variants, PlanError, Variant};
