//! GPU passes.
//!
//! - [`ClearPass`]: grouped multi-target clears, one render pass per batch
//! - [`MeshPass`]: textured indexed mesh drawn with a per-tick MVP uniform
//!
//! Passes own their GPU resources and create them lazily on first use, so
//! they can be constructed before a device exists.

mod clear;
mod ctx;
mod mesh_pass;
mod texture;

pub use clear::{equal_extent_runs, ClearPass};
pub use ctx::RenderCtx;
pub use mesh_pass::{MeshPass, MESH_CLEAR_COLOR};
pub use texture::{TextureImage, TextureSource};
