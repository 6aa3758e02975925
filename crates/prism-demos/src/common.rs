use std::path::PathBuf;

use clap::Args;
use prism_engine::core::AppControl;
use prism_engine::device::DeviceInit;
use prism_engine::render::TextureSource;
use prism_engine::window::RuntimeConfig;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Options shared by every demo.
#[derive(Args, Debug, Clone)]
pub struct LoopArgs {
    /// Stop after this many frames (runs until a window closes otherwise)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Open non-resizable windows
    #[arg(long)]
    pub fixed_size: bool,
}

/// Options for demos that draw the textured mesh.
#[derive(Args, Debug, Clone)]
pub struct TextureArgs {
    /// Image file for the mesh texture (checkerboard when omitted)
    #[arg(long, value_name = "PATH")]
    pub texture: Option<PathBuf>,
}

impl TextureArgs {
    pub fn source(&self) -> TextureSource {
        match &self.texture {
            Some(path) => TextureSource::File(path.clone()),
            None => TextureSource::Checkerboard,
        }
    }
}

pub fn runtime_config(title: &str, targets: usize, args: &LoopArgs) -> RuntimeConfig {
    RuntimeConfig {
        title: title.to_string(),
        targets,
        resizable: !args.fixed_size,
        tick_limit: args.frames,
        ..Default::default()
    }
}

pub fn device_init(max_per_pass: Option<usize>) -> DeviceInit {
    let mut init = DeviceInit::default();
    if let Some(max) = max_per_pass {
        init.max_targets_per_pass = max;
    }
    init
}

/// Escape on any target ends the run.
pub fn escape_exits(event: &WindowEvent) -> AppControl {
    match event {
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    logical_key: Key::Named(NamedKey::Escape),
                    state: ElementState::Pressed,
                    ..
                },
            ..
        } => AppControl::Exit,
        _ => AppControl::Continue,
    }
}
