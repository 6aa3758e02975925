use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

use crate::device::GpuDevice;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the runtime.
///
/// Targets are addressed by their index in creation order.
pub trait App {
    /// Called once after the device exists and every target is configured,
    /// before the first tick. An error aborts the run.
    fn on_setup(&mut self, gpu: &GpuDevice) -> anyhow::Result<()> {
        let _ = gpu;
        Ok(())
    }

    /// Called for every window event, before the runtime's own handling.
    fn on_window_event(&mut self, target: usize, event: &WindowEvent) -> AppControl {
        let _ = (target, event);
        AppControl::Continue
    }

    /// Called after a target's surface was reconfigured for a new size.
    fn on_resize(&mut self, target: usize, size: PhysicalSize<u32>) {
        let _ = (target, size);
    }

    /// Called once per tick with every target's fresh drawable.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
