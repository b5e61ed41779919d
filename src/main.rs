use std::path::{Path, PathBuf};

use clap::Parser;

use island_generator::catalog::AssetCatalog;
use island_generator::export;
use island_generator::generator::{self, GeneratorConfig};
use island_generator::masks;
use island_generator::placement::PlacementKind;
use island_generator::sampler;
use island_generator::spawn::FlatGround;

#[derive(Parser, Debug)]
#[command(name = "island_generator")]
#[command(about = "Generate terrain placements from a drawn map image")]
struct Args {
    /// Path to the map image (PNG)
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Directory of saved drawings; the most recently modified PNG is used
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Pixels per block edge
    #[arg(short, long, default_value = "32")]
    block_size: u32,

    /// World units per block edge
    #[arg(short, long, default_value = "100.0")]
    world_unit: f32,

    /// Uniform XZ scale for per-block placements
    #[arg(long, default_value = "1.0")]
    block_scale: f32,

    /// Random seed for variant selection (random if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Asset catalog JSON (the built-in demo catalog if not specified)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Write the classified block grid as a PNG
    #[arg(long)]
    export_blocks: Option<PathBuf>,

    /// Sample blocks in parallel
    #[arg(long)]
    parallel: bool,

    /// Flat ground height assumed for the spawn probe
    #[arg(long, default_value = "0.0")]
    ground_height: f32,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let image_path = resolve_image_path(args)?;
    println!("Loading map image: {}", image_path.display());
    let image = image::open(&image_path)?.to_rgba8();
    println!("Image loaded: {} x {}", image.width(), image.height());

    let catalog = match &args.catalog {
        Some(path) => {
            println!("Loading catalog: {}", path.display());
            serde_json::from_str(&std::fs::read_to_string(path)?)?
        }
        None => AssetCatalog::demo(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = GeneratorConfig {
        block_size: args.block_size,
        world_unit_per_block: args.world_unit,
        block_scale_factor: args.block_scale,
        seed,
        parallel_sampling: args.parallel,
        ..GeneratorConfig::default()
    };

    println!("Generating layout with seed: {}", seed);
    let probe = FlatGround { height: args.ground_height };
    let layout = generator::generate_layout(&image, &catalog, &config, &probe)?;

    let count = |pred: fn(&PlacementKind) -> bool| {
        layout.placements.iter().filter(|p| pred(&p.kind)).count()
    };
    let blocks = count(|k| matches!(k, PlacementKind::Block(_)));
    let regions = count(|k| matches!(k, PlacementKind::Region(_)));
    let beach = count(|k| matches!(k, PlacementKind::BeachRing));
    let ocean = count(|k| matches!(k, PlacementKind::OceanRing));

    println!("Block grid: {} x {}", layout.blocks_x, layout.blocks_y);
    println!("Placements: {} total", layout.placements.len());
    println!("  {} blocks, {} merged regions", blocks, regions);
    println!("  {} beach ring, {} ocean ring", beach, ocean);
    println!(
        "Player spawn: ({:.1}, {:.1}, {:.1})",
        layout.player_spawn.x, layout.player_spawn.y, layout.player_spawn.z
    );
    match layout.npc_spawn {
        Some(p) => println!("NPC spawn: ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z),
        None => println!("NPC spawn: none (no forest on the map)"),
    }
    for diagnostic in &layout.diagnostics {
        println!("warning: {}", diagnostic);
    }

    if let Some(path) = &args.export_blocks {
        // Classification is deterministic, so resampling for the debug view
        // matches what the run saw.
        let samples = sampler::sample_blocks(&image, config.block_size, &config.classifier);
        let block_masks = masks::build_masks(&samples, &config.classifier);
        let path_str = path.to_str().ok_or("export path is not valid UTF-8")?;
        export::export_block_map(&block_masks, path_str)?;
        println!("Wrote block map: {}", path.display());
    }

    Ok(())
}

fn resolve_image_path(args: &Args) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = &args.image {
        return Ok(path.clone());
    }
    let dir = args
        .image_dir
        .as_ref()
        .ok_or("pass --image <file> or --image-dir <dir>")?;
    latest_png_in(dir)
}

/// Most recently modified PNG in a directory of saved drawings.
fn latest_png_in(dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_png = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));
        if !is_png {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
            newest = Some((modified, path));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| format!("no PNG files in {}", dir.display()).into())
}
