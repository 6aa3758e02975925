use crate::batch::MAX_TARGETS_PER_PASS;

/// Initialization parameters for the device and every surface configured
/// against it.
#[derive(Debug, Clone)]
pub struct DeviceInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// Off by default: clear colors are then stored as given, the way an
    /// 8-bit unorm canvas stores them.
    pub prefer_srgb: bool,

    /// Present mode. FIFO is vsync-paced, which is what makes one tick per
    /// display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Requested compositing mode. Falls back to the first supported mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// Upper bound on color attachments per clear pass.
    ///
    /// Clamped to `[1, max_color_attachments]` of the created device.
    pub max_targets_per_pass: usize,
}

impl Default for DeviceInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: Some(wgpu::CompositeAlphaMode::Opaque),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            max_targets_per_pass: MAX_TARGETS_PER_PASS,
        }
    }
}
