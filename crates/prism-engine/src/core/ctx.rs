use std::num::NonZeroUsize;

use crate::batch::partition_and_emit;
use crate::device::{GpuDevice, TargetSlot};
use crate::render::{ClearPass, RenderCtx};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Per-tick context passed to [`App::on_frame`](super::App::on_frame).
///
/// Everything recorded into `encoder` is submitted once, after the callback
/// returns, and every acquired target is presented right after.
pub struct FrameCtx<'a> {
    pub gpu: &'a GpuDevice,
    pub targets: &'a [TargetSlot],
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a> FrameCtx<'a> {
    #[inline]
    pub fn render_ctx(&self) -> RenderCtx<'a> {
        RenderCtx::from_gpu(self.gpu)
    }

    /// Device-clamped attachment limit for grouped clears.
    #[inline]
    pub fn max_targets_per_pass(&self) -> NonZeroUsize {
        self.gpu.max_targets_per_pass()
    }

    /// Clears `targets` to their time-varying colors, one render pass per
    /// batch of at most `max_per_pass`. Returns the number of batches.
    ///
    /// `targets` is normally `self.targets` or a sub-slice of it; damping
    /// follows order within the slice.
    pub fn clear_batched(&mut self, targets: &[TargetSlot], max_per_pass: NonZeroUsize) -> usize {
        let mut sink = ClearPass::new(&mut *self.encoder);
        let batches = partition_and_emit(targets, self.time.elapsed, max_per_pass, &mut sink);

        if self.time.frame_index == 0 {
            log::debug!(
                "{} targets -> {batches} batches, {} passes (max {max_per_pass} per pass)",
                targets.len(),
                sink.passes()
            );
        }

        batches
    }
}
