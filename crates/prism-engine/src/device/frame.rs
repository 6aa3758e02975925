use winit::dpi::PhysicalSize;

/// Drawable acquired from one surface for the current tick.
///
/// Short-lived: holding it blocks acquisition of the next texture. Dropping
/// without [`present`](Self::present) discards the frame.
pub struct TargetFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl TargetFrame {
    pub(crate) fn new(surface_texture: wgpu::SurfaceTexture) -> Self {
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            surface_texture,
            view,
        }
    }

    /// Queues the texture for presentation. Call after the tick's submit.
    pub fn present(self) {
        drop(self.view);
        self.surface_texture.present();
    }
}

/// One target's state for a single tick.
///
/// The slot list always has one entry per target in creation order, so a
/// target whose acquisition was skipped keeps its position (and its color).
pub struct TargetSlot {
    index: usize,
    size: PhysicalSize<u32>,
    frame: Option<TargetFrame>,
}

impl TargetSlot {
    pub fn new(index: usize, size: PhysicalSize<u32>, frame: Option<TargetFrame>) -> Self {
        Self { index, size, frame }
    }

    /// Position in the target list.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Surface size in physical pixels at acquisition time.
    #[inline]
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// This tick's view, if the target could be acquired.
    #[inline]
    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.frame.as_ref().map(|f| &f.view)
    }

    /// Width / height, or `None` for a zero-sized (minimized) target.
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.size.width > 0 && self.size.height > 0)
            .then(|| self.size.width as f32 / self.size.height as f32)
    }

    pub(crate) fn into_frame(self) -> Option<TargetFrame> {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_has_no_view() {
        let slot = TargetSlot::new(3, PhysicalSize::new(300, 300), None);
        assert_eq!(slot.index(), 3);
        assert!(slot.view().is_none());
    }

    #[test]
    fn aspect_ratio_of_zero_size_is_none() {
        assert_eq!(TargetSlot::new(0, PhysicalSize::new(0, 300), None).aspect_ratio(), None);
        assert_eq!(TargetSlot::new(0, PhysicalSize::new(600, 300), None).aspect_ratio(), Some(2.0));
    }
}
