//! Prism engine crate.
//!
//! Builds render frames for one or more window targets: mesh geometry,
//! per-frame transforms, batched clear passes, and the loop that drives them.

pub mod batch;
pub mod core;
pub mod device;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod schedule;
pub mod time;
pub mod transform;
pub mod window;
