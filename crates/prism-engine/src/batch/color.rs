/// Straight-alpha RGBA clear value; every channel lies in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorSample {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl ColorSample {
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque_black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub fn is_normalized(self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r,
            g: self.g,
            b: self.b,
            a: self.a,
        }
    }
}

/// Multiplier applied to the damping factor once per target.
pub const DAMPING_GROWTH: f64 = 1.1;

/// Per-target damping factors: `1.1, 1.1², 1.1³, …`.
///
/// The factor grows per target, not per batch, so the n-th target in
/// presentation order always cycles at the same rate regardless of how the
/// targets are grouped.
#[derive(Debug, Clone)]
pub struct DampingSeries {
    current: f64,
}

impl DampingSeries {
    pub fn new() -> Self {
        Self { current: 1.0 }
    }
}

impl Default for DampingSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for DampingSeries {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.current *= DAMPING_GROWTH;
        Some(self.current)
    }
}

/// Clear color for one target at `t` seconds with damping factor `d`:
/// `(|sin(t/d)|, |sin(t/2d)|, |sin(t/3d)|, 1)`.
#[inline]
pub fn color_sample(t: f64, d: f64) -> ColorSample {
    ColorSample::new(
        (t / d).sin().abs(),
        (t / (d * 2.0)).sin().abs(),
        (t / (d * 3.0)).sin().abs(),
        1.0,
    )
}
