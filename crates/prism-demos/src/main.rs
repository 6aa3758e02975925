//! Prism demos.
//!
//! # Commands
//!
//! - `prism-demos multiview` - Tiled targets cleared in batched render passes
//! - `prism-demos texmesh` - Rotating textured icosphere in one target
//! - `prism-demos combined` - Mesh on the first target, batched clears on the rest
//!
//! # Usage
//!
//! ```bash
//! # 24 targets, 4 per pass, stop after 600 ticks
//! prism-demos multiview --targets 24 --max-per-pass 4 --frames 600
//!
//! # Textured mesh with a custom image
//! prism-demos texmesh --texture assets/earth.png
//! ```

mod combined;
mod common;
mod multiview;
mod texmesh;

use anyhow::Result;
use clap::{Parser, Subcommand};
use prism_engine::logging::{init_logging, LoggingConfig};

/// Render-frame composition demos
#[derive(Parser)]
#[command(name = "prism-demos")]
#[command(about = "Render-frame composition demos")]
#[command(version)]
struct Cli {
    /// Log filter (env_logger syntax); overrides RUST_LOG
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tiled targets cleared to time-varying colors, batched per pass
    Multiview(multiview::MultiviewArgs),

    /// Rotating textured icosphere
    Texmesh(texmesh::TexmeshArgs),

    /// Textured mesh on target 0, batched clears on the other targets
    Combined(combined::CombinedArgs),
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.log.map(LoggingConfig::with_filter).unwrap_or_default());

    if let Err(err) = run(cli.command) {
        log::error!("{err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Multiview(args) => multiview::run(args),
        Commands::Texmesh(args) => texmesh::run(args),
        Commands::Combined(args) => combined::run(args),
    }
}
