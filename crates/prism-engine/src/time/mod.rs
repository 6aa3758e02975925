//! Frame timing.
//!
//! One `FrameClock` per frame loop; call `tick()` once per presented frame.
//! A fixed-step clock produces identical timings on every run, which is what
//! bounded test harnesses want.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
