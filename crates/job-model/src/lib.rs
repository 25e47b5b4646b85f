//! Halation Job Model
//!
//! Defines the data types shared by every stage of a halation render:
//!
//! - [`job`]: a rendering request, its lifecycle status and progress
//! - [`sweep`]: the parameter ranges and tint that define a job's variants

pub mod job;
pub mod sweep;

pub use job::*;
pub use sweep::*;
