use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::{AcquireError, GpuDevice, SurfaceErrorAction, TargetFrame, TargetSlot};

/// One presentable surface bound to a window.
///
/// Lifecycle: created unconfigured, configured once against the shared
/// [`GpuDevice`], then asked for a fresh drawable every tick. Views are never
/// kept across ticks.
pub struct SurfaceTarget<'w> {
    index: usize,

    /// Surface lifetime is tied to the window via `'w`.
    surface: wgpu::Surface<'w>,

    /// `None` until [`configure`](Self::configure) succeeds.
    config: Option<wgpu::SurfaceConfiguration>,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,
}

impl<'w> SurfaceTarget<'w> {
    /// Creates an unconfigured surface for `window`.
    pub fn new(index: usize, instance: &wgpu::Instance, window: &'w Window) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window {index} has zero size");

        let surface = instance
            .create_surface(window)
            .with_context(|| format!("failed to create wgpu surface for target {index}"))?;

        Ok(Self {
            index,
            surface,
            config: None,
            size,
        })
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    #[inline]
    pub fn surface(&self) -> &wgpu::Surface<'w> {
        &self.surface
    }

    #[inline]
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Configures the surface with the device's format and opaque compositing.
    ///
    /// Fails if this surface cannot present the format chosen for the device
    /// (e.g. a window on a different adapter's output).
    pub fn configure(&mut self, gpu: &GpuDevice) -> Result<()> {
        let caps = self.surface.get_capabilities(gpu.adapter());
        anyhow::ensure!(
            caps.formats.contains(&gpu.surface_format()),
            "surface target {} does not support format {:?}",
            self.index,
            gpu.surface_format()
        );

        let config = gpu.surface_config(self.size);
        self.surface.configure(gpu.device(), &config);
        log::debug!(
            "configured target {} at {}x{} ({:?})",
            self.index,
            config.width,
            config.height,
            config.format
        );

        self.config = Some(config);
        Ok(())
    }

    /// Reconfigures after a resize.
    ///
    /// A 0×0 surface cannot be configured; only the size is recorded and the
    /// target is skipped until it becomes visible again.
    pub fn resize(&mut self, gpu: &GpuDevice, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        if let Some(config) = self.config.as_mut() {
            config.width = new_size.width;
            config.height = new_size.height;
            self.surface.configure(gpu.device(), config);
        }
    }

    /// Requests this tick's drawable.
    pub fn acquire(&self) -> Result<TargetFrame, AcquireError> {
        if !self.is_configured() {
            return Err(AcquireError::Unconfigured { index: self.index });
        }

        let surface_texture = self
            .surface
            .get_current_texture()
            .map_err(|source| AcquireError::Surface {
                index: self.index,
                source,
            })?;

        Ok(TargetFrame::new(surface_texture))
    }

    /// Acquires into a slot, recovering from transient surface errors.
    ///
    /// A zero-sized target yields an empty slot without touching the surface.
    /// Errors here are only the unrecoverable ones: an unconfigured target
    /// or a fatal surface error.
    pub fn acquire_slot(&mut self, gpu: &GpuDevice) -> Result<TargetSlot, AcquireError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Ok(TargetSlot::new(self.index, self.size, None));
        }

        match self.acquire() {
            Ok(frame) => Ok(TargetSlot::new(self.index, self.size, Some(frame))),
            Err(AcquireError::Surface { index, source }) => {
                log::warn!("target {index}: {source}");
                match self.handle_surface_error(gpu, &source) {
                    SurfaceErrorAction::Fatal => Err(AcquireError::Surface { index, source }),
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        Ok(TargetSlot::new(self.index, self.size, None))
                    }
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Maps a surface error to an action, reconfiguring when the surface was
    /// lost or went stale.
    pub fn handle_surface_error(
        &mut self,
        gpu: &GpuDevice,
        err: &wgpu::SurfaceError,
    ) -> SurfaceErrorAction {
        let action = map_surface_error(err);
        if action == SurfaceErrorAction::Reconfigured && self.size.width > 0 && self.size.height > 0 {
            if let Some(config) = self.config.as_ref() {
                self.surface.configure(gpu.device(), config);
            }
        }
        action
    }
}

pub(crate) fn map_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = *formats.first()?;

    let preferred = formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() == prefer_srgb && is_bgra_or_rgba8(*f));

    Some(preferred.unwrap_or(first))
}

fn is_bgra_or_rgba8(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm
            | wgpu::TextureFormat::Bgra8UnormSrgb
            | wgpu::TextureFormat::Rgba8Unorm
            | wgpu::TextureFormat::Rgba8UnormSrgb
    )
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, TextureFormat};

    #[test]
    fn format_prefers_unorm_when_srgb_not_wanted() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats, false), Some(TextureFormat::Bgra8Unorm));
        assert_eq!(choose_surface_format(&formats, true), Some(TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn format_falls_back_to_first() {
        let formats = [TextureFormat::Rgba16Float];
        assert_eq!(choose_surface_format(&formats, false), Some(TextureFormat::Rgba16Float));
    }

    #[test]
    fn format_none_when_empty() {
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn alpha_mode_uses_request_when_supported() {
        let modes = [CompositeAlphaMode::PreMultiplied, CompositeAlphaMode::Opaque];
        assert_eq!(
            choose_alpha_mode(&modes, Some(CompositeAlphaMode::Opaque)),
            CompositeAlphaMode::Opaque
        );
    }

    #[test]
    fn alpha_mode_falls_back_to_first_supported() {
        let modes = [CompositeAlphaMode::Inherit];
        assert_eq!(
            choose_alpha_mode(&modes, Some(CompositeAlphaMode::Opaque)),
            CompositeAlphaMode::Inherit
        );
        assert_eq!(choose_alpha_mode(&[], None), CompositeAlphaMode::Auto);
    }

    #[test]
    fn surface_errors_map_to_actions() {
        assert_eq!(map_surface_error(&wgpu::SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(map_surface_error(&wgpu::SurfaceError::Outdated), SurfaceErrorAction::Reconfigured);
        assert_eq!(map_surface_error(&wgpu::SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(map_surface_error(&wgpu::SurfaceError::Other), SurfaceErrorAction::SkipFrame);
        assert_eq!(map_surface_error(&wgpu::SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
    }
}
