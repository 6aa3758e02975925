use anyhow::Result;
use clap::Args;
use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::GpuDevice;
use prism_engine::window::{Runtime, PRIMARY_TARGET};
use winit::event::WindowEvent;

use crate::common::{device_init, escape_exits, runtime_config, LoopArgs, TextureArgs};
use crate::texmesh::MeshScene;

#[derive(Args, Debug, Clone)]
pub struct CombinedArgs {
    /// Number of target windows, including the mesh target
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u16).range(2..))]
    pub targets: u16,

    /// Color attachments per clear pass (clamped to the device limit)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_per_pass: Option<u16>,

    #[command(flatten)]
    pub texture: TextureArgs,

    #[command(flatten)]
    pub run: LoopArgs,
}

struct Combined {
    scene: MeshScene,
}

impl App for Combined {
    fn on_window_event(&mut self, _target: usize, event: &WindowEvent) -> AppControl {
        escape_exits(event)
    }

    fn on_setup(&mut self, gpu: &GpuDevice) -> Result<()> {
        self.scene.prepare(gpu)
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        self.scene.draw(ctx, PRIMARY_TARGET);

        // Damping restarts at the first cleared target.
        let targets = ctx.targets;
        let rest = targets.get(PRIMARY_TARGET + 1..).unwrap_or_default();
        let max = ctx.max_targets_per_pass();
        ctx.clear_batched(rest, max);

        AppControl::Continue
    }
}

pub fn run(args: CombinedArgs) -> Result<()> {
    let image = args.texture.source().load()?;
    let config = runtime_config("prism combined", usize::from(args.targets), &args.run);
    let init = device_init(args.max_per_pass.map(usize::from));
    let aspect = (config.target_size.width / config.target_size.height) as f32;

    log::info!(
        "combined: mesh on target {PRIMARY_TARGET}, {} cleared targets",
        config.targets - 1
    );

    Runtime::new(config, init).run(Combined {
        scene: MeshScene::new(image, aspect),
    })
}
