//! Windows + refresh-driven runtime.
//!
//! Owns the `winit` event loop and one window per render target, and drives
//! the [`FrameLoop`](crate::schedule::FrameLoop) from the primary window's
//! redraw signal.

mod runtime;

pub use runtime::{grid_position, Runtime, RuntimeConfig, RuntimeCtx, PRIMARY_TARGET};
