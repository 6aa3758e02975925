use std::ops::Range;

use crate::batch::{Batch, BatchSink};
use crate::device::TargetSlot;

/// GPU [`BatchSink`]: records one clear-only render pass per batch, with one
/// color attachment per acquired target, into the tick's command encoder.
///
/// Nothing is submitted here; the frame loop submits the encoder once per tick.
pub struct ClearPass<'a> {
    encoder: &'a mut wgpu::CommandEncoder,
    passes: usize,
}

impl<'a> ClearPass<'a> {
    pub fn new(encoder: &'a mut wgpu::CommandEncoder) -> Self {
        Self { encoder, passes: 0 }
    }

    /// Render passes recorded so far.
    #[inline]
    pub fn passes(&self) -> usize {
        self.passes
    }
}

impl BatchSink<TargetSlot> for ClearPass<'_> {
    fn emit(&mut self, batch: &Batch<'_, TargetSlot>) {
        let acquired: Vec<_> = batch
            .entries()
            .iter()
            .filter_map(|e| e.target.view().map(|view| (e, view)))
            .collect();

        // Attachments in one pass must share an extent. Targets normally
        // have identical sizes; a resized one splits the batch into runs.
        let sizes: Vec<(u32, u32)> = acquired
            .iter()
            .map(|(e, _)| (e.target.size().width, e.target.size().height))
            .collect();

        for run in equal_extent_runs(&sizes) {
            let attachments: Vec<Option<wgpu::RenderPassColorAttachment<'_>>> = acquired[run]
                .iter()
                .map(|&(entry, view)| {
                    Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(entry.color.to_wgpu()),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })
                })
                .collect();

            let _rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("prism batch clear"),
                color_attachments: &attachments,
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            self.passes += 1;
        }
    }
}

/// Splits a sequence of extents into maximal contiguous runs of equal extent.
pub fn equal_extent_runs(sizes: &[(u32, u32)]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=sizes.len() {
        if i == sizes.len() || sizes[i] != sizes[start] {
            if start < i {
                runs.push(start..i);
            }
            start = i;
        }
    }
    runs
}
