use anyhow::Result;
use clap::Args;
use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::GpuDevice;
use prism_engine::geometry::build_icosphere;
use prism_engine::render::{MeshPass, RenderCtx, TextureImage};
use prism_engine::transform::TransformComposer;
use prism_engine::window::{Runtime, PRIMARY_TARGET};
use winit::event::WindowEvent;

use crate::common::{device_init, escape_exits, runtime_config, LoopArgs, TextureArgs};

#[derive(Args, Debug, Clone)]
pub struct TexmeshArgs {
    #[command(flatten)]
    pub texture: TextureArgs,

    #[command(flatten)]
    pub run: LoopArgs,
}

/// Rotating icosphere on one target.
pub struct MeshScene {
    composer: TransformComposer,
    pass: MeshPass,
}

impl MeshScene {
    pub fn new(image: TextureImage, aspect: f32) -> Self {
        Self {
            composer: TransformComposer::new(aspect),
            pass: MeshPass::new(build_icosphere(), image),
        }
    }

    /// Uploads the mesh and texture; fails if the texture is too large.
    pub fn prepare(&mut self, gpu: &GpuDevice) -> Result<()> {
        self.pass.prepare(&RenderCtx::from_gpu(gpu))
    }

    /// Advances the rotation and draws into `target` if it was acquired.
    pub fn draw(&mut self, ctx: &mut FrameCtx<'_>, target: usize) {
        self.composer.advance();

        let targets = ctx.targets;
        let Some(slot) = targets.get(target) else { return };
        if let Some(aspect) = slot.aspect_ratio() {
            self.composer.set_aspect(aspect);
        }
        let Some(view) = slot.view() else { return };
        let render = ctx.render_ctx();
        let uniform = self.composer.uniform();
        self.pass.draw(&render, &mut *ctx.encoder, view, &uniform);
    }
}

struct Texmesh {
    scene: MeshScene,
}

impl App for Texmesh {
    fn on_window_event(&mut self, _target: usize, event: &WindowEvent) -> AppControl {
        escape_exits(event)
    }

    fn on_setup(&mut self, gpu: &GpuDevice) -> Result<()> {
        self.scene.prepare(gpu)
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        self.scene.draw(ctx, PRIMARY_TARGET);
        AppControl::Continue
    }
}

pub fn run(args: TexmeshArgs) -> Result<()> {
    // Decode before any window opens; a bad file is a setup failure.
    let image = args.texture.source().load()?;
    let config = runtime_config("prism texmesh", 1, &args.run);
    let aspect = (config.target_size.width / config.target_size.height) as f32;

    log::info!("texmesh: texture {}x{}", image.width(), image.height());

    Runtime::new(config, device_init(None)).run(Texmesh {
        scene: MeshScene::new(image, aspect),
    })
}
