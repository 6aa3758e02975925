//! Camera + model transform pipeline.
//!
//! Column-major matrices (`glam::Mat4`), matching WGSL `mat4x4<f32>`.

mod composer;

pub use composer::{
    MvpUniform, TransformComposer, CAMERA_EYE, FOV_Y, ROTATION_STEP, Z_FAR, Z_NEAR,
};
