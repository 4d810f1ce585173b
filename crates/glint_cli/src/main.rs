//! glint CLI - parse a scene file, render it, save the image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glint_render::{render, RenderOptions, ShadowPolicy};
use glint_scene::load_scene;

#[derive(Parser)]
#[command(name = "glint")]
#[command(about = "Whitted ray tracer for plain-text scene files", long_about = None)]
struct Cli {
    /// Scene description file
    scene: PathBuf,

    /// Output image (format chosen by extension, e.g. .png)
    output: PathBuf,

    /// Output width in pixels
    #[arg(default_value_t = 500)]
    width: u32,

    /// Output height in pixels
    #[arg(default_value_t = 500)]
    height: u32,

    /// Base seed for soft-shadow jitter
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// What a blocked light contributes to the point it cannot reach
    #[arg(long, value_enum, default_value_t = ShadowArg::Skip)]
    shadow_policy: ShadowArg,

    /// Number of render threads (default: one per core)
    #[arg(long)]
    jobs: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShadowArg {
    /// Nothing: hard cutoff
    Skip,
    /// Its soft-shadow attenuated value
    Attenuate,
}

impl From<ShadowArg> for ShadowPolicy {
    fn from(arg: ShadowArg) -> Self {
        match arg {
            ShadowArg::Skip => ShadowPolicy::Skip,
            ShadowArg::Attenuate => ShadowPolicy::Attenuate,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to size the render thread pool")?;
    }

    let scene = load_scene(&cli.scene)
        .with_context(|| format!("failed to load scene {}", cli.scene.display()))?;

    let options = RenderOptions {
        width: cli.width,
        height: cli.height,
        shadow_policy: cli.shadow_policy.into(),
        seed: cli.seed,
    };
    let frame = render(&scene, &options)?;

    frame
        .to_rgb_image()
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    log::info!("wrote {}", cli.output.display());

    Ok(())
}
