//! Procedural geometry.
//!
//! Meshes are built once on the CPU at startup and uploaded unchanged; nothing
//! in here touches the GPU beyond describing the vertex layout.

mod icosphere;
mod mesh;

pub use icosphere::{build_icosphere, icosphere_uv, ICOSAHEDRON_INDICES};
pub use mesh::{Mesh, MeshVertex};
