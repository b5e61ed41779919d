//! Generation pipeline
//!
//! Runs the whole image-to-placements pipeline in one synchronous pass:
//! sampling, classification, mask building, flood fill, placement planning,
//! boundary rings, spawn location. Configuration problems abort before any
//! placement is emitted; per-region problems become diagnostics and the run
//! continues. A run owns all of its intermediate state, so rerunning with the
//! same inputs and seed yields an identical placement list.

use image::RgbaImage;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::boundary::{ring_placements, RingOffsets};
use crate::catalog::{AssetCatalog, ObjectDescriptor, TerrainCategory};
use crate::color::ClassifierConfig;
use crate::masks;
use crate::placement::{self, Diagnostic, Placement, PlacementKind, Vec3};
use crate::regions;
use crate::sampler;
use crate::spawn::{self, GroundProbe, SpawnConfig};

/// All tunables for one generation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Pixels per block edge.
    pub block_size: u32,
    /// World units per block edge.
    pub world_unit_per_block: f32,
    /// Uniform XZ scale applied to per-block placements.
    pub block_scale_factor: f32,
    /// Ocean backdrop plane extent as a multiple of the grid extent.
    pub ocean_size_multiplier: f32,
    pub classifier: ClassifierConfig,
    pub ring_offsets: RingOffsets,
    pub spawn: SpawnConfig,
    /// Seed for variant selection, the only randomized stage.
    pub seed: u64,
    /// Sample blocks on the rayon pool instead of sequentially.
    pub parallel_sampling: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            block_size: 32,
            world_unit_per_block: 100.0,
            block_scale_factor: 1.0,
            ocean_size_multiplier: 3.0,
            classifier: ClassifierConfig::default(),
            ring_offsets: RingOffsets::default(),
            spawn: SpawnConfig::default(),
            seed: 0,
            parallel_sampling: false,
        }
    }
}

/// Fatal configuration problems. Nothing is emitted when one of these fires.
#[derive(Debug, PartialEq, Eq)]
pub enum GenerationError {
    InvalidBlockSize {
        block_size: u32,
    },
    /// The image is smaller than one block in at least one axis.
    ImageTooSmall {
        width: u32,
        height: u32,
        block_size: u32,
    },
    /// The catalog has no placeable object for a required category.
    MissingCategory {
        category: &'static str,
    },
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::InvalidBlockSize { block_size } => {
                write!(f, "block size must be positive, got {}", block_size)
            }
            GenerationError::ImageTooSmall { width, height, block_size } => {
                write!(
                    f,
                    "image {}x{} holds no full {}-pixel block",
                    width, height, block_size
                )
            }
            GenerationError::MissingCategory { category } => {
                write!(f, "catalog has no object for required category '{}'", category)
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// Everything a generation run produces. The block grid and masks are
/// discarded once this is built; the placement list is ordered and stable for
/// a given input and seed.
#[derive(Clone, Debug)]
pub struct MapLayout {
    pub blocks_x: usize,
    pub blocks_y: usize,
    pub placements: Vec<Placement>,
    pub diagnostics: Vec<Diagnostic>,
    pub player_spawn: Vec3,
    pub npc_spawn: Option<Vec3>,
}

/// Check the five category lists and fetch the ring objects.
fn ring_objects(
    catalog: &AssetCatalog,
) -> Result<(&ObjectDescriptor, &ObjectDescriptor), GenerationError> {
    for category in TerrainCategory::all() {
        if catalog.variants(category).is_empty() {
            return Err(GenerationError::MissingCategory {
                category: category.display_name(),
            });
        }
    }
    let beach = catalog
        .beach
        .as_ref()
        .ok_or(GenerationError::MissingCategory { category: "beach" })?;
    let ocean = catalog
        .ocean
        .as_ref()
        .ok_or(GenerationError::MissingCategory { category: "ocean" })?;
    Ok((beach, ocean))
}

/// Backdrop placements: the ocean plane under everything and the optional
/// island base at the grid center.
fn backdrop_placements(
    catalog: &AssetCatalog,
    ocean: &ObjectDescriptor,
    blocks_x: usize,
    blocks_y: usize,
    world_unit: f32,
    multiplier: f32,
) -> Vec<Placement> {
    let total_width = blocks_x as f32 * world_unit;
    let total_depth = blocks_y as f32 * world_unit;
    let center = Vec3::new(total_width / 2.0, 0.0, total_depth / 2.0);

    let mut placements = vec![Placement {
        object: ocean.id.clone(),
        kind: PlacementKind::OceanBackdrop,
        position: center + Vec3::new(0.0, ocean.y_offset, 0.0),
        scale: Vec3::new(total_width * multiplier, 1.0, total_depth * multiplier),
    }];

    if let Some(island) = &catalog.island {
        placements.push(Placement {
            object: island.id.clone(),
            kind: PlacementKind::IslandBase,
            position: center + Vec3::new(0.0, island.y_offset, 0.0),
            scale: Vec3::new(1.0, 1.0, 1.0),
        });
    }

    placements
}

/// Run the full pipeline on one image.
///
/// Stage order: sample blocks, build masks, extract regions, plan the
/// backdrop, merged regions (water then rock), unit placements, beach and
/// ocean rings, then locate spawns. Fatal errors return before any placement
/// exists; region skips land in `diagnostics` and the rest of the layout is
/// still produced.
pub fn generate_layout(
    image: &RgbaImage,
    catalog: &AssetCatalog,
    config: &GeneratorConfig,
    probe: &dyn GroundProbe,
) -> Result<MapLayout, GenerationError> {
    if config.block_size == 0 {
        return Err(GenerationError::InvalidBlockSize { block_size: 0 });
    }

    let (blocks_x, blocks_y) = sampler::grid_dims(image, config.block_size);
    if blocks_x == 0 || blocks_y == 0 {
        return Err(GenerationError::ImageTooSmall {
            width: image.width(),
            height: image.height(),
            block_size: config.block_size,
        });
    }

    let (beach, ocean) = ring_objects(catalog)?;

    let samples = if config.parallel_sampling {
        sampler::sample_blocks_parallel(image, config.block_size, &config.classifier)
    } else {
        sampler::sample_blocks(image, config.block_size, &config.classifier)
    };

    let masks = masks::build_masks(&samples, &config.classifier);
    let water_regions = regions::extract_regions(&masks.water);
    let rock_regions = regions::extract_regions(&masks.rock);

    let unit = config.world_unit_per_block;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut diagnostics = Vec::new();

    let mut placements = backdrop_placements(
        catalog,
        ocean,
        blocks_x,
        blocks_y,
        unit,
        config.ocean_size_multiplier,
    );

    for (category, region_list) in [
        (TerrainCategory::Pond, &water_regions),
        (TerrainCategory::Mountain, &rock_regions),
    ] {
        for region in region_list {
            let descriptor = placement::pick_variant(catalog.variants(category), &mut rng);
            match placement::plan_region_placement(region, category, descriptor, unit) {
                Ok(p) => placements.push(p),
                Err(d) => diagnostics.push(d),
            }
        }
    }

    placements.extend(placement::plan_unit_placements(
        &masks,
        catalog,
        unit,
        config.block_scale_factor,
        &mut rng,
    ));

    placements.extend(ring_placements(
        blocks_x,
        blocks_y,
        1,
        beach,
        PlacementKind::BeachRing,
        unit,
        &config.ring_offsets,
    ));
    placements.extend(ring_placements(
        blocks_x,
        blocks_y,
        2,
        ocean,
        PlacementKind::OceanRing,
        unit,
        &config.ring_offsets,
    ));

    let player_spawn =
        spawn::locate_player_spawn(blocks_x, blocks_y, unit, &config.spawn, probe);
    let npc_spawn = spawn::locate_npc_spawn(&masks, unit, &config.spawn);

    Ok(MapLayout {
        blocks_x,
        blocks_y,
        placements,
        diagnostics,
        player_spawn,
        npc_spawn,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::{FlatGround, NoGround};
    use image::{Rgba, RgbaImage};

    const GREEN: [u8; 4] = [30, 200, 40, 255];
    const BLUE: [u8; 4] = [40, 80, 230, 255];
    const GRAY: [u8; 4] = [120, 120, 120, 255];

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(rgba))
    }

    fn paint_block(img: &mut RgbaImage, bx: u32, by: u32, rgba: [u8; 4]) {
        for dy in 0..32 {
            for dx in 0..32 {
                img.put_pixel(bx * 32 + dx, by * 32 + dy, Rgba(rgba));
            }
        }
    }

    fn config() -> GeneratorConfig {
        GeneratorConfig::default()
    }

    fn kind_count(layout: &MapLayout, want: fn(&PlacementKind) -> bool) -> usize {
        layout.placements.iter().filter(|p| want(&p.kind)).count()
    }

    #[test]
    fn test_rejects_zero_block_size() {
        let img = solid(64, 64, GREEN);
        let mut cfg = config();
        cfg.block_size = 0;
        let err = generate_layout(&img, &AssetCatalog::demo(), &cfg, &NoGround).unwrap_err();
        assert_eq!(err, GenerationError::InvalidBlockSize { block_size: 0 });
    }

    #[test]
    fn test_rejects_image_smaller_than_a_block() {
        let img = solid(20, 64, GREEN);
        let err = generate_layout(&img, &AssetCatalog::demo(), &config(), &NoGround).unwrap_err();
        assert_eq!(
            err,
            GenerationError::ImageTooSmall { width: 20, height: 64, block_size: 32 }
        );
    }

    #[test]
    fn test_rejects_catalog_without_required_category() {
        let img = solid(64, 64, GREEN);
        let mut catalog = AssetCatalog::demo();
        catalog.forest.clear();
        let err = generate_layout(&img, &catalog, &config(), &NoGround).unwrap_err();
        assert_eq!(err, GenerationError::MissingCategory { category: "forest" });
    }

    #[test]
    fn test_all_green_image_yields_forest_blocks() {
        // 64x64 at block size 32: a 2x2 grid, every block forest.
        let img = solid(64, 64, GREEN);
        let layout =
            generate_layout(&img, &AssetCatalog::demo(), &config(), &NoGround).unwrap();

        assert_eq!((layout.blocks_x, layout.blocks_y), (2, 2));
        assert_eq!(
            kind_count(&layout, |k| matches!(k, PlacementKind::Block(TerrainCategory::Forest))),
            4
        );
        assert_eq!(kind_count(&layout, |k| matches!(k, PlacementKind::Region(_))), 0);
        assert!(layout.diagnostics.is_empty());
        // The forest map also anchors an NPC.
        assert!(layout.npc_spawn.is_some());
    }

    #[test]
    fn test_pond_region_is_merged() {
        // Two horizontally adjacent blue blocks in a green 2x2 map: one pond
        // region spanning both, two forest blocks for the rest.
        let mut img = solid(64, 64, GREEN);
        paint_block(&mut img, 0, 0, BLUE);
        paint_block(&mut img, 1, 0, BLUE);

        let layout =
            generate_layout(&img, &AssetCatalog::demo(), &config(), &NoGround).unwrap();

        let ponds: Vec<_> = layout
            .placements
            .iter()
            .filter(|p| p.kind == PlacementKind::Region(TerrainCategory::Pond))
            .collect();
        assert_eq!(ponds.len(), 1);
        assert_eq!(
            kind_count(&layout, |k| matches!(k, PlacementKind::Block(TerrainCategory::Forest))),
            2
        );

        // Bounding box spans two blocks on X, one on Z; the demo pond mesh is
        // 10x10, so the scale stretches 200/10 by 100/10.
        let pond = ponds[0];
        assert!((pond.scale.x - 20.0).abs() < 1e-4);
        assert!((pond.scale.z - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_ring_counts() {
        let img = solid(64, 64, GREEN);
        let layout =
            generate_layout(&img, &AssetCatalog::demo(), &config(), &NoGround).unwrap();

        // 2x2 grid: beach ring 2*2 + 2*2 + 4 = 12 cells, ocean ring one block
        // further out on a 4x4 footprint: 2*4 + 2*4 + 4 = 20.
        assert_eq!(kind_count(&layout, |k| matches!(k, PlacementKind::BeachRing)), 12);
        assert_eq!(kind_count(&layout, |k| matches!(k, PlacementKind::OceanRing)), 20);
        assert_eq!(kind_count(&layout, |k| matches!(k, PlacementKind::OceanBackdrop)), 1);
    }

    #[test]
    fn test_spawns() {
        let img = solid(64, 64, GREEN);
        let probe = FlatGround { height: 0.0 };
        let layout =
            generate_layout(&img, &AssetCatalog::demo(), &config(), &probe).unwrap();

        // Grid center at (100, 100), flat ground at 0 plus clearance 2.
        assert_eq!(layout.player_spawn, Vec3::new(100.0, 2.0, 100.0));

        let miss = generate_layout(&img, &AssetCatalog::demo(), &config(), &NoGround).unwrap();
        assert_eq!(miss.player_spawn.y, 2.0);

        let probe_high = FlatGround { height: 30.0 };
        let hit = generate_layout(&img, &AssetCatalog::demo(), &config(), &probe_high).unwrap();
        assert_eq!(hit.player_spawn.y, 32.0);
    }

    #[test]
    fn test_skipped_region_keeps_rest_of_layout() {
        let mut img = solid(128, 64, GREEN);
        paint_block(&mut img, 0, 0, GRAY);
        paint_block(&mut img, 3, 1, BLUE);

        let mut catalog = AssetCatalog::demo();
        // Break the mountain mesh: its region must be skipped, not fatal.
        catalog.mountain[0].mesh_size = Vec3::ZERO;

        let layout = generate_layout(&img, &catalog, &config(), &NoGround).unwrap();

        assert_eq!(layout.diagnostics.len(), 1);
        match &layout.diagnostics[0] {
            Diagnostic::RegionSkipped { category, cell_count, .. } => {
                assert_eq!(*category, TerrainCategory::Mountain);
                assert_eq!(*cell_count, 1);
            }
        }
        // The pond region still made it through.
        assert_eq!(
            kind_count(&layout, |k| matches!(k, PlacementKind::Region(TerrainCategory::Pond))),
            1
        );
    }

    #[test]
    fn test_every_cell_accounted_exactly_once() {
        let mut img = solid(128, 128, GREEN);
        paint_block(&mut img, 0, 0, GRAY);
        paint_block(&mut img, 1, 0, GRAY);
        paint_block(&mut img, 3, 1, BLUE);
        paint_block(&mut img, 3, 2, BLUE);
        paint_block(&mut img, 2, 2, BLUE);

        let mut catalog = AssetCatalog::demo();
        catalog.mountain[0].mesh_size = Vec3::ZERO; // force one skip

        let layout = generate_layout(&img, &catalog, &config(), &NoGround).unwrap();
        let total_cells = layout.blocks_x * layout.blocks_y;

        let unit_cells = kind_count(&layout, |k| matches!(k, PlacementKind::Block(_)));
        // Three blue blocks were painted as one connected component.
        let pond_cells = 3;
        let skipped_cells: usize = layout
            .diagnostics
            .iter()
            .map(|d| match d {
                Diagnostic::RegionSkipped { cell_count, .. } => *cell_count,
            })
            .sum();

        assert_eq!(unit_cells + pond_cells + skipped_cells, total_cells);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut img = solid(128, 128, GREEN);
        paint_block(&mut img, 2, 2, BLUE);
        paint_block(&mut img, 0, 3, GRAY);

        let catalog = AssetCatalog::demo();
        let mut cfg = config();
        cfg.seed = 1234;

        let a = generate_layout(&img, &catalog, &cfg, &NoGround).unwrap();
        let b = generate_layout(&img, &catalog, &cfg, &NoGround).unwrap();

        assert_eq!(a.placements, b.placements);
        assert_eq!(a.diagnostics, b.diagnostics);
    }

    #[test]
    fn test_parallel_sampling_matches_sequential() {
        let mut img = solid(128, 128, GREEN);
        paint_block(&mut img, 1, 1, BLUE);
        paint_block(&mut img, 2, 3, GRAY);

        let catalog = AssetCatalog::demo();
        let mut cfg = config();
        cfg.seed = 42;

        let seq = generate_layout(&img, &catalog, &cfg, &NoGround).unwrap();
        cfg.parallel_sampling = true;
        let par = generate_layout(&img, &catalog, &cfg, &NoGround).unwrap();

        assert_eq!(seq.placements, par.placements);
    }
}
