use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use super::{choose_alpha_mode, choose_surface_format, DeviceInit};

/// Adapter, device and queue shared by every surface target.
///
/// Also fixes the surface configuration policy (format, alpha mode, present
/// mode) so all targets are configured identically; grouped clear passes
/// require every attachment in a pass to share one format.
pub struct GpuDevice {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    surface_format: wgpu::TextureFormat,
    alpha_mode: wgpu::CompositeAlphaMode,
    present_mode: wgpu::PresentMode,
    desired_maximum_frame_latency: u32,

    max_targets_per_pass: NonZeroUsize,
}

impl GpuDevice {
    /// Acquires an adapter able to present to `compatible`, then the device.
    ///
    /// A missing adapter or device is fatal; there is no retry.
    pub async fn new(
        instance: &wgpu::Instance,
        compatible: &wgpu::Surface<'_>,
        init: &DeviceInit,
    ) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(compatible),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter `{}` ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("prism device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = compatible.get_capabilities(&adapter);
        let surface_format = choose_surface_format(&caps.formats, init.prefer_srgb)
            .context("no supported surface formats")?;
        let alpha_mode = choose_alpha_mode(&caps.alpha_modes, init.alpha_mode);

        if init.alpha_mode.is_some_and(|requested| requested != alpha_mode) {
            log::warn!("requested alpha mode {:?} unsupported; using {alpha_mode:?}", init.alpha_mode);
        }

        let max_targets_per_pass =
            clamp_targets_per_pass(init.max_targets_per_pass, &device.limits(), surface_format);
        if max_targets_per_pass.get() != init.max_targets_per_pass {
            log::warn!(
                "max_targets_per_pass {} clamped to {max_targets_per_pass}",
                init.max_targets_per_pass
            );
        }

        log::debug!(
            "surface policy: format={surface_format:?} alpha={alpha_mode:?} present={:?}",
            init.present_mode
        );

        Ok(Self {
            adapter,
            device,
            queue,
            surface_format,
            alpha_mode,
            present_mode: init.present_mode,
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
            max_targets_per_pass,
        })
    }

    #[inline]
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    #[inline]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Color attachments allowed in one grouped clear pass.
    #[inline]
    pub fn max_targets_per_pass(&self) -> NonZeroUsize {
        self.max_targets_per_pass
    }

    /// Surface configuration every target uses, sized for one target.
    pub fn surface_config(&self, size: PhysicalSize<u32>) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: self.present_mode,
            alpha_mode: self.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: self.desired_maximum_frame_latency,
        }
    }
}

/// Bounds the attachments per pass by the attachment count limit and by the
/// per-sample byte budget, all attachments sharing `format`.
fn clamp_targets_per_pass(
    requested: usize,
    limits: &wgpu::Limits,
    format: wgpu::TextureFormat,
) -> NonZeroUsize {
    let by_count = limits.max_color_attachments as usize;
    let by_bytes = match format.target_pixel_byte_cost() {
        Some(cost) if cost > 0 => (limits.max_color_attachment_bytes_per_sample / cost) as usize,
        _ => by_count,
    };
    let limit = by_count.min(by_bytes).max(1);
    NonZeroUsize::new(requested.clamp(1, limit)).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    use wgpu::TextureFormat;

    fn limits(attachments: u32, bytes_per_sample: u32) -> wgpu::Limits {
        wgpu::Limits {
            max_color_attachments: attachments,
            max_color_attachment_bytes_per_sample: bytes_per_sample,
            ..wgpu::Limits::default()
        }
    }

    #[test]
    fn clamp_keeps_values_inside_device_limit() {
        assert_eq!(clamp_targets_per_pass(4, &limits(8, 32), TextureFormat::Bgra8Unorm).get(), 4);
        assert_eq!(clamp_targets_per_pass(2, &limits(8, 32), TextureFormat::Rgba8Unorm).get(), 2);
    }

    #[test]
    fn clamp_caps_at_attachment_count() {
        assert_eq!(clamp_targets_per_pass(24, &limits(8, 64), TextureFormat::R8Unorm).get(), 8);
    }

    #[test]
    fn clamp_caps_at_bytes_per_sample() {
        // 8 bytes per sample for both the 8-bit and 16-bit float swapchain formats.
        assert_eq!(clamp_targets_per_pass(8, &limits(8, 32), TextureFormat::Rgba16Float).get(), 4);
        assert_eq!(clamp_targets_per_pass(8, &limits(8, 32), TextureFormat::Bgra8UnormSrgb).get(), 4);
        assert_eq!(clamp_targets_per_pass(8, &limits(8, 32), TextureFormat::Rgba32Float).get(), 2);
    }

    #[test]
    fn clamp_with_default_limits_fits_a_pass() {
        let defaults = wgpu::Limits::default();
        for format in [
            TextureFormat::Bgra8Unorm,
            TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Rgba16Float,
            TextureFormat::Rgb10a2Unorm,
        ] {
            let n = clamp_targets_per_pass(usize::MAX, &defaults, format).get() as u32;
            let cost = format.target_pixel_byte_cost().unwrap_or(0);
            assert!(n * cost <= defaults.max_color_attachment_bytes_per_sample, "{format:?}");
            assert!(n <= defaults.max_color_attachments);
        }
    }

    #[test]
    fn clamp_never_returns_zero() {
        assert_eq!(clamp_targets_per_pass(0, &limits(8, 32), TextureFormat::Bgra8Unorm).get(), 1);
        assert_eq!(clamp_targets_per_pass(4, &limits(0, 32), TextureFormat::Bgra8Unorm).get(), 1);
        assert_eq!(clamp_targets_per_pass(4, &limits(8, 4), TextureFormat::Rgba16Float).get(), 1);
    }
}
