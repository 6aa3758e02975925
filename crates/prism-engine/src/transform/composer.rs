use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// Vertical field of view (radians).
pub const FOV_Y: f32 = std::f32::consts::FRAC_PI_2;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Camera position; the camera looks at the origin with +Y up.
pub const CAMERA_EYE: Vec3 = Vec3::new(1.5, 1.5, 1.5);

/// Per-tick model rotation about X, Y, Z (radians), applied in that order.
pub const ROTATION_STEP: [f32; 3] = [0.01, 0.003, 0.008];

/// GPU-visible transform: one column-major 4×4 f32 matrix (64 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MvpUniform {
    pub mvp: [[f32; 4]; 4],
}

impl MvpUniform {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    #[inline]
    pub fn from_mat4(m: Mat4) -> Self {
        Self {
            mvp: m.to_cols_array_2d(),
        }
    }
}

/// Owns projection, view and model matrices.
///
/// Projection and view are fixed after construction (projection is rebuilt
/// only by [`set_aspect`](Self::set_aspect)). Each [`advance`](Self::advance)
/// right-multiplies the model by `Rx · Ry · Rz`, so rotations accumulate in
/// the model's local frame and the mesh precesses instead of spinning about
/// fixed axes.
///
/// The orientation is kept as a normalized quaternion; `model` is rebuilt from
/// it every step. This is the same product as multiplying matrices in place,
/// without the slow loss of orthogonality repeated f32 matrix products cause
/// over a long-running loop.
#[derive(Debug, Clone)]
pub struct TransformComposer {
    projection: Mat4,
    view: Mat4,
    model: Mat4,
    orientation: Quat,
    step: Quat,
    ticks: u64,
}

impl TransformComposer {
    /// Perspective (π/2, `aspect`, 0.1, 100), camera at (1.5, 1.5, 1.5)
    /// looking at the origin, identity model.
    pub fn new(aspect: f32) -> Self {
        let [rx, ry, rz] = ROTATION_STEP;
        let step = Quat::from_rotation_x(rx) * Quat::from_rotation_y(ry) * Quat::from_rotation_z(rz);

        Self {
            projection: projection(aspect),
            view: Mat4::look_at_rh(CAMERA_EYE, Vec3::ZERO, Vec3::Y),
            model: Mat4::IDENTITY,
            orientation: Quat::IDENTITY,
            step,
            ticks: 0,
        }
    }

    /// Applies one tick of rotation to the model.
    pub fn advance(&mut self) {
        self.orientation = (self.orientation * self.step).normalize();
        self.model = Mat4::from_quat(self.orientation);
        self.ticks += 1;
    }

    /// `projection × view × model`, recomputed on every call.
    pub fn composed_matrix(&self) -> Mat4 {
        self.projection * self.view * self.model
    }

    /// Composed matrix in uniform-buffer layout.
    pub fn uniform(&self) -> MvpUniform {
        MvpUniform::from_mat4(self.composed_matrix())
    }

    /// Rebuilds the projection for a new target aspect ratio.
    ///
    /// Non-finite or non-positive ratios (a minimized window) are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.projection = projection(aspect);
        }
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn model(&self) -> Mat4 {
        self.model
    }

    /// Number of `advance` calls so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

// wgpu clip space has z in [0, 1]; `perspective_rh` targets that range.
fn projection(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(FOV_Y, aspect, Z_NEAR, Z_FAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn step_matrix() -> Mat4 {
        let [rx, ry, rz] = ROTATION_STEP;
        Mat4::from_rotation_x(rx) * Mat4::from_rotation_y(ry) * Mat4::from_rotation_z(rz)
    }

    #[test]
    fn starts_with_identity_model() {
        let t = TransformComposer::new(1.0);
        assert_eq!(t.model(), Mat4::IDENTITY);
        assert_eq!(t.ticks(), 0);
        assert!(t.composed_matrix().abs_diff_eq(t.projection() * t.view(), 1e-6));
    }

    #[test]
    fn single_advance_is_x_then_y_then_z() {
        let mut t = TransformComposer::new(1.0);
        t.advance();
        assert!(t.model().abs_diff_eq(step_matrix(), 1e-6));
    }

    #[test]
    fn rotation_accumulates_by_right_multiplication() {
        let mut t = TransformComposer::new(16.0 / 9.0);
        let mut expected = Mat4::IDENTITY;
        for _ in 0..250 {
            t.advance();
            expected = expected * Mat4::from_rotation_x(ROTATION_STEP[0]);
            expected = expected * Mat4::from_rotation_y(ROTATION_STEP[1]);
            expected = expected * Mat4::from_rotation_z(ROTATION_STEP[2]);
        }
        assert!(t.model().abs_diff_eq(expected, 1e-4));
        let mvp = t.projection() * t.view() * expected;
        assert!(t.composed_matrix().abs_diff_eq(mvp, 1e-3));
    }

    #[test]
    fn composition_order_matters() {
        let mut t = TransformComposer::new(1.0);
        for _ in 0..300 {
            t.advance();
        }
        // Independent per-axis angles applied once give a different matrix.
        let k = 300.0;
        let independent = Mat4::from_rotation_z(ROTATION_STEP[2] * k)
            * Mat4::from_rotation_y(ROTATION_STEP[1] * k)
            * Mat4::from_rotation_x(ROTATION_STEP[0] * k);
        assert!(!t.model().abs_diff_eq(independent, 1e-3));
    }

    #[test]
    fn model_stays_orthonormal_over_long_runs() {
        let mut t = TransformComposer::new(1.0);
        for _ in 0..100_000 {
            t.advance();
        }
        let m = t.model();
        assert!((m.determinant() - 1.0).abs() < 1e-4);
        assert!((m * m.transpose()).abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn deterministic_given_call_count() {
        let mut a = TransformComposer::new(1.5);
        let mut b = TransformComposer::new(1.5);
        for _ in 0..37 {
            a.advance();
            b.advance();
        }
        assert_eq!(a.uniform(), b.uniform());
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let mut t = TransformComposer::new(1.0);
        t.advance();
        let clip = t.composed_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn view_places_camera_at_eye() {
        let t = TransformComposer::new(1.0);
        let eye_in_view = t.view() * CAMERA_EYE.extend(1.0);
        assert!(eye_in_view.truncate().length() < 1e-5);
    }

    #[test]
    fn set_aspect_rebuilds_projection() {
        let mut t = TransformComposer::new(1.0);
        let before = t.projection();
        t.set_aspect(2.0);
        assert!((t.projection().x_axis.x - before.x_axis.x / 2.0).abs() < 1e-6);
        t.set_aspect(0.0);
        t.set_aspect(f32::NAN);
        assert!((t.projection().x_axis.x - before.x_axis.x / 2.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_is_64_bytes_column_major() {
        assert_eq!(MvpUniform::SIZE, 64);
        let t = TransformComposer::new(1.0);
        let u = t.uniform();
        assert_eq!(u.mvp[3], t.composed_matrix().w_axis.to_array());
    }
}
