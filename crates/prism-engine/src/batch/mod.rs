//! Attachment-limited batching of render targets.
//!
//! A render pass accepts a bounded number of color attachments. Clearing many
//! surfaces in one frame therefore means splitting them into groups of at most
//! `max_per_pass`, one pass per group, while the per-target color sequence
//! keeps running across group boundaries.
//!
//! Everything here is GPU-agnostic; `render::ClearPass` is the wgpu-backed
//! [`BatchSink`].

mod color;
mod partition;

pub use color::{color_sample, ColorSample, DampingSeries, DAMPING_GROWTH};
pub use partition::{
    partition, partition_and_emit, Batch, BatchEntry, BatchSink, MAX_TARGETS_PER_PASS,
};
