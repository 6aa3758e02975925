//! Contracts between the window runtime and applications.
//!
//! Applications see targets, the shared device and frame timing through
//! [`FrameCtx`]; windowing details stay inside the runtime.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
