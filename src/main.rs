mod grid;
mod output;
mod raycast;
mod scene;

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use glimmer_lighting::{CellKey, LightingOptions};
use hashbrown::HashMap;

use crate::output::Format;
use crate::scene::Scene;

#[derive(Parser, Debug)]
#[command(name = "glimmer", about = "Coloured multi-pass 2D lighting for a TOML scene")]
struct Args {
    /// Scene file (TOML)
    scene: PathBuf,
    /// Override `lighting.passes`
    #[arg(long)]
    passes: Option<u32>,
    /// Override `lighting.range`
    #[arg(long)]
    range: Option<i32>,
    /// Override `lighting.emission_threshold`
    #[arg(long)]
    threshold: Option<f64>,
    #[arg(long, value_enum, default_value_t = Format::Grid)]
    format: Format,
}

impl Args {
    fn apply(&self, mut options: LightingOptions) -> LightingOptions {
        if let Some(p) = self.passes {
            options.passes = p;
        }
        if let Some(r) = self.range {
            options.range = r;
        }
        if let Some(t) = self.threshold {
            options.emission_threshold = t;
        }
        options
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let scene = Scene::load(&args.scene)?;
    let options = args.apply(scene.options);
    log::info!(
        "scene {:?}: {}x{} tiles, {} light(s), passes={} range={} threshold={}",
        args.scene,
        scene.grid.width,
        scene.grid.height,
        scene.lights.len(),
        options.passes,
        options.range,
        options.emission_threshold
    );

    let mut engine = scene.build_engine(options);
    let mut lit = HashMap::new();
    let stats = engine.compute(|x, y, color| {
        lit.insert(CellKey::new(x, y), color);
    });
    let cache = engine.cache_stats();
    log::info!(
        "lit {} cell(s) in {} pass(es), {} emitter(s); fov cache {} entries",
        stats.lit_cells,
        stats.passes_run,
        stats.emitters,
        cache.fov_entries
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    output::write_lighting(&mut out, args.format, &scene.grid, &lit)?;
    out.flush()?;
    Ok(())
}
