//! Refresh-driven frame loop.
//!
//! The loop never blocks or spins on its own. A host (the winit runtime, or a
//! test) resumes it once per refresh signal; each resume runs at most one
//! tick to completion. Stopping happens only between ticks.

mod frame_loop;

pub use frame_loop::{CancelToken, FrameLoop, LoopState, StopReason, TickControl};
