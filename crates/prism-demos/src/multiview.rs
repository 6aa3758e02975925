use anyhow::Result;
use clap::Args;
use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::window::Runtime;
use winit::event::WindowEvent;

use crate::common::{device_init, escape_exits, runtime_config, LoopArgs};

#[derive(Args, Debug, Clone)]
pub struct MultiviewArgs {
    /// Number of target windows
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u16).range(1..))]
    pub targets: u16,

    /// Color attachments per clear pass (clamped to the device limit)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_per_pass: Option<u16>,

    #[command(flatten)]
    pub run: LoopArgs,
}

/// Clears every target to its damped color each tick.
struct Multiview;

impl App for Multiview {
    fn on_window_event(&mut self, _target: usize, event: &WindowEvent) -> AppControl {
        escape_exits(event)
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let max = ctx.max_targets_per_pass();
        ctx.clear_batched(ctx.targets, max);
        AppControl::Continue
    }
}

pub fn run(args: MultiviewArgs) -> Result<()> {
    let config = runtime_config("prism multiview", usize::from(args.targets), &args.run);
    let init = device_init(args.max_per_pass.map(usize::from));

    log::info!(
        "multiview: {} targets, up to {} per pass",
        config.targets,
        init.max_targets_per_pass
    );

    Runtime::new(config, init).run(Multiview)
}
