use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{DeviceInit, GpuDevice, SurfaceTarget};
use crate::schedule::{CancelToken, FrameLoop, LoopState, TickControl};
use crate::time::FrameClock;

/// Target whose redraw signal paces the frame loop while it is visible.
pub const PRIMARY_TARGET: usize = 0;

/// Gap around each target window when several are tiled, in logical pixels.
const TILE_MARGIN: f64 = 8.0;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,

    /// Inner size of every target window.
    pub target_size: LogicalSize<f64>,

    /// Number of target windows to open.
    pub targets: usize,

    /// Tiling columns when `targets > 1`.
    pub columns: usize,

    pub resizable: bool,

    /// Stop after this many ticks. `None` runs until a window closes.
    pub tick_limit: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "prism".to_string(),
            target_size: LogicalSize::new(300.0, 300.0),
            targets: 1,
            columns: 6,
            resizable: true,
            tick_limit: None,
        }
    }
}

/// Runtime requests an app can make from inside a tick.
///
/// Applied after the callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    /// Stops the loop after the current tick is submitted.
    pub fn exit(&mut self) {
        self.exit = true;
    }

    #[inline]
    pub fn is_exit_requested(&self) -> bool {
        self.exit
    }
}

/// Entry point for the runtime.
///
/// One tick runs per redraw of the pacing target: the primary target while
/// it is visible, otherwise the first target that is neither occluded nor
/// minimized. Platforms that stop redrawing hidden windows then keep ticking
/// as long as any target is on screen; with every target hidden the loop
/// waits.
pub struct Runtime {
    config: RuntimeConfig,
    device_init: DeviceInit,
    cancel: CancelToken,
}

impl Runtime {
    pub fn new(config: RuntimeConfig, device_init: DeviceInit) -> Self {
        Self {
            config,
            device_init,
            cancel: CancelToken::new(),
        }
    }

    /// Stops the loop at the next tick boundary; usable from any thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Opens the targets, acquires the device, then ticks until a window
    /// closes, the app exits, the tick limit is hit or the token is cancelled.
    ///
    /// Returns the first fatal error (setup or unrecoverable surface error).
    pub fn run<A>(self, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        anyhow::ensure!(self.config.targets > 0, "at least one render target is required");

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(self, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Top-left corner of target `index` when tiling `columns` per row.
pub fn grid_position(index: usize, columns: usize, size: LogicalSize<f64>) -> LogicalPosition<f64> {
    let columns = columns.max(1);
    let (col, row) = (index % columns, index / columns);
    LogicalPosition::new(
        TILE_MARGIN + col as f64 * (size.width + 2.0 * TILE_MARGIN),
        TILE_MARGIN + row as f64 * (size.height + 2.0 * TILE_MARGIN),
    )
}

/// First visible target, or the primary one when none is.
fn pacing_target(visible: &[bool]) -> usize {
    visible.iter().position(|&v| v).unwrap_or(PRIMARY_TARGET)
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    target: SurfaceTarget<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    device_init: DeviceInit,
    app: A,

    instance: wgpu::Instance,
    gpu: Option<GpuDevice>,

    /// In target order; index == target index.
    windows: Vec<WindowEntry>,

    /// Per target, from `WindowEvent::Occluded`.
    occluded: Vec<bool>,

    frame_loop: FrameLoop,
    cancel: CancelToken,

    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(runtime: Runtime, app: A) -> Self {
        let Runtime {
            config,
            device_init,
            cancel,
        } = runtime;

        let frame_loop = FrameLoop::new(FrameClock::new())
            .with_tick_limit(config.tick_limit)
            .with_cancel_token(cancel.clone());

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        Self {
            config,
            device_init,
            app,
            instance,
            gpu: None,
            windows: Vec::new(),
            occluded: Vec::new(),
            frame_loop,
            cancel,
            fatal: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, err: anyhow::Error, event_loop: &ActiveEventLoop) {
        log::error!("{err:#}");
        self.fatal.get_or_insert(err);
        self.cancel.cancel();
        self.request_exit(event_loop);
    }

    fn target_index(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|e| e.borrow_window().id() == id)
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop, index: usize) -> Result<WindowEntry> {
        let config = &self.config;
        let title = if config.targets > 1 {
            format!("{} [{index}]", config.title)
        } else {
            config.title.clone()
        };

        let mut attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(config.target_size)
            .with_resizable(config.resizable);
        if config.targets > 1 {
            attrs = attrs.with_position(grid_position(index, config.columns, config.target_size));
        }

        let window = event_loop
            .create_window(attrs)
            .with_context(|| format!("failed to create window for target {index}"))?;

        let instance = &self.instance;
        WindowEntryTryBuilder {
            window,
            target_builder: |w| SurfaceTarget::new(index, instance, w),
        }
        .try_build()
    }

    /// Opens every target, acquires the shared device against the primary
    /// surface, then configures all surfaces. Nothing ticks before this
    /// succeeds.
    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        for index in 0..self.config.targets {
            let entry = self.create_window_entry(event_loop, index)?;
            self.windows.push(entry);
            self.occluded.push(false);
        }

        let primary = self
            .windows
            .get(PRIMARY_TARGET)
            .context("no primary target window")?;
        let gpu = pollster::block_on(GpuDevice::new(
            &self.instance,
            primary.borrow_target().surface(),
            &self.device_init,
        ))?;

        for entry in &mut self.windows {
            entry.with_target_mut(|t| t.configure(&gpu))?;
        }

        log::info!(
            "{} target(s) configured as {:?}, up to {} per pass",
            self.windows.len(),
            gpu.surface_format(),
            gpu.max_targets_per_pass()
        );

        self.app.on_setup(&gpu).context("application setup failed")?;

        self.gpu = Some(gpu);
        Ok(())
    }

    fn pacing_target(&self) -> usize {
        let visible: Vec<bool> = self
            .windows
            .iter()
            .zip(&self.occluded)
            .map(|(entry, &occluded)| {
                let size = entry.borrow_target().size();
                !occluded && size.width > 0 && size.height > 0
            })
            .collect();
        pacing_target(&visible)
    }

    fn request_pacing_redraw(&self) {
        if let Some(entry) = self.windows.get(self.pacing_target()) {
            entry.borrow_window().request_redraw();
        }
    }

    fn resize_target(&mut self, index: usize, size: PhysicalSize<u32>) {
        let Some(gpu) = self.gpu.as_ref() else { return };
        let Some(entry) = self.windows.get_mut(index) else { return };
        entry.with_target_mut(|t| t.resize(gpu, size));
        self.app.on_resize(index, size);
    }

    /// One frame-loop iteration: acquire every target, run the app, submit
    /// once, present.
    fn tick(&mut self, event_loop: &ActiveEventLoop) {
        if self.frame_loop.poll_stop() != LoopState::Running {
            self.request_exit(event_loop);
            return;
        }
        let Some(gpu) = self.gpu.as_ref() else { return };

        let mut slots = Vec::with_capacity(self.windows.len());
        let mut failure = None;
        for entry in &mut self.windows {
            match entry.with_target_mut(|t| t.acquire_slot(gpu)) {
                Ok(slot) => slots.push(slot),
                Err(err) => {
                    failure = Some(anyhow::Error::new(err).context("frame acquisition failed"));
                    break;
                }
            }
        }
        if let Some(err) = failure {
            self.fail(err, event_loop);
            return;
        }

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("prism frame encoder"),
            });

        let app = &mut self.app;
        let state = self.frame_loop.resume(|time| {
            let mut runtime = RuntimeCtx::default();
            let mut ctx = FrameCtx {
                gpu,
                targets: &slots,
                encoder: &mut encoder,
                time,
                runtime: &mut runtime,
            };

            let control = app.on_frame(&mut ctx);
            if control == AppControl::Exit || runtime.is_exit_requested() {
                TickControl::Stop
            } else {
                TickControl::Continue
            }
        });

        for entry in &self.windows {
            entry.borrow_window().pre_present_notify();
        }
        gpu.queue().submit(std::iter::once(encoder.finish()));

        for frame in slots.into_iter().filter_map(|s| s.into_frame()) {
            frame.present();
        }

        if state != LoopState::Running {
            self.request_exit(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }

        if let Err(err) = self.setup(event_loop) {
            self.fail(err.context("startup failed"), event_loop);
            return;
        }

        self.request_pacing_redraw();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw. With FIFO presentation, acquiring the next
        // drawable blocks until vsync, which paces ticks to the display.
        event_loop.set_control_flow(ControlFlow::Wait);
        self.request_pacing_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(index) = self.target_index(window_id) else {
            return;
        };

        if self.app.on_window_event(index, &event) == AppControl::Exit {
            self.cancel.cancel();
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("target {index} closed");
                self.cancel.cancel();
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => self.resize_target(index, *new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = self.windows[index].borrow_window().inner_size();
                self.resize_target(index, new_size);
            }

            WindowEvent::Occluded(occluded) => {
                if let Some(slot) = self.occluded.get_mut(index) {
                    *slot = *occluded;
                }
            }

            WindowEvent::RedrawRequested if index == self.pacing_target() => self.tick(event_loop),

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_fills_rows_left_to_right() {
        let size = LogicalSize::new(300.0, 300.0);
        assert_eq!(grid_position(0, 6, size), LogicalPosition::new(8.0, 8.0));
        assert_eq!(grid_position(1, 6, size), LogicalPosition::new(324.0, 8.0));
        assert_eq!(grid_position(6, 6, size), LogicalPosition::new(8.0, 324.0));
        assert_eq!(grid_position(23, 6, size), LogicalPosition::new(8.0 + 5.0 * 316.0, 8.0 + 3.0 * 316.0));
    }

    #[test]
    fn grid_with_zero_columns_is_one_column() {
        let size = LogicalSize::new(100.0, 50.0);
        assert_eq!(grid_position(2, 0, size), LogicalPosition::new(8.0, 8.0 + 2.0 * 66.0));
    }

    #[test]
    fn pacing_prefers_primary_target() {
        assert_eq!(pacing_target(&[true, true, true]), PRIMARY_TARGET);
    }

    #[test]
    fn pacing_falls_back_to_first_visible_target() {
        assert_eq!(pacing_target(&[false, false, true, true]), 2);
    }

    #[test]
    fn pacing_with_nothing_visible_stays_on_primary() {
        assert_eq!(pacing_target(&[false, false]), PRIMARY_TARGET);
        assert_eq!(pacing_target(&[]), PRIMARY_TARGET);
    }

    #[test]
    fn runtime_ctx_records_exit() {
        let mut ctx = RuntimeCtx::default();
        assert!(!ctx.is_exit_requested());
        ctx.exit();
        assert!(ctx.is_exit_requested());
    }

    #[test]
    fn default_config_is_single_target() {
        let config = RuntimeConfig::default();
        assert_eq!(config.targets, 1);
        assert!(config.tick_limit.is_none());
    }
}
