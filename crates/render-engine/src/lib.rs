//! Halation Render Engine
//!
//! Everything that touches the external media tools. Each variant is a
//! single ffmpeg invocation over a fixed four-stage filter graph:
//!
//! ```text
//! source ─► format, split ─┬─► [b] ──────────────────────────────┐
//!                          │                                     ├─► screen blend ─► [v] ─► Hnn.png
//!                          └─► [h] ─► threshold, blur ─► tint ─► [hal]
//! ```
//!
//! Videos contribute one frame, taken at a representative timestamp
//! found with ffprobe.

pub mod filter;
pub mod probe;
pub mod render;

pub use filter::build_filter;
pub use probe::{classify, representative_timestamp, FfprobeProber, MediaKind, MediaProber};
pub use render::{output_is_nonempty, tool_available, FfmpegRenderer, FrameRenderer, RenderRequest};
