//! Placement planning
//!
//! Converts classified blocks and extracted regions into world-space placement
//! records. Non-grouped categories get one placement per block; grouped
//! categories get one merged placement per region, stretched over the region's
//! bounding box with a correction for the reference mesh's pivot offset.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{AssetCatalog, ObjectDescriptor, TerrainCategory};
use crate::masks::TypeMasks;
use crate::regions::Region;

/// Smallest mesh extent that can still be stretched over a region.
const MIN_MESH_EXTENT: f32 = 1e-4;

/// World-space vector. Y is up; the map plane is XZ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise product.
    pub fn scaled(self, s: Vec3) -> Vec3 {
        Vec3::new(self.x * s.x, self.y * s.y, self.z * s.z)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, o: Self) -> Self {
        Vec3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

/// What a placement represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementKind {
    /// One block of a non-grouped category.
    Block(TerrainCategory),
    /// A merged connected region of a grouped category.
    Region(TerrainCategory),
    /// Beach ring cell just outside the map edge.
    BeachRing,
    /// Ocean ring cell one block beyond the beach ring.
    OceanRing,
    /// Ocean backdrop plane under the whole map.
    OceanBackdrop,
    /// Island base centered under the map.
    IslandBase,
}

/// One instruction for the world-building side: instantiate `object` at
/// `position` with `scale`. Rotation is always identity and not carried.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub object: String,
    pub kind: PlacementKind,
    pub position: Vec3,
    pub scale: Vec3,
}

/// Non-fatal problems collected while planning. The run continues; the caller
/// decides whether to log them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    RegionSkipped {
        category: TerrainCategory,
        cell_count: usize,
        reason: String,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::RegionSkipped { category, cell_count, reason } => {
                write!(
                    f,
                    "skipped {} region of {} blocks: {}",
                    category.display_name(),
                    cell_count,
                    reason
                )
            }
        }
    }
}

/// World-space center of a block.
pub fn block_center(x: usize, y: usize, world_unit: f32) -> Vec3 {
    Vec3::new(
        x as f32 * world_unit + world_unit / 2.0,
        0.0,
        y as f32 * world_unit + world_unit / 2.0,
    )
}

/// Pick a concrete variant for a category. A single-entry list is picked
/// deterministically; otherwise the choice is uniform from the seeded RNG.
/// Catalog validation guarantees the list is non-empty before planning runs.
pub fn pick_variant<'a>(
    variants: &'a [ObjectDescriptor],
    rng: &mut ChaCha8Rng,
) -> &'a ObjectDescriptor {
    if variants.len() == 1 {
        &variants[0]
    } else {
        &variants[rng.gen_range(0..variants.len())]
    }
}

/// Emit one unit placement per block not claimed by a grouped mask.
/// Iterates rows outer, columns inner, so the output order is stable.
pub fn plan_unit_placements(
    masks: &TypeMasks,
    catalog: &AssetCatalog,
    world_unit: f32,
    block_scale: f32,
    rng: &mut ChaCha8Rng,
) -> Vec<Placement> {
    let mut placements = Vec::new();

    for y in 0..masks.regular.height {
        for x in 0..masks.regular.width {
            if masks.is_claimed(x, y) {
                continue;
            }

            let category = *masks.regular.get(x, y);
            let descriptor = pick_variant(catalog.variants(category), rng);
            let position = block_center(x, y, world_unit) + Vec3::new(0.0, descriptor.y_offset, 0.0);

            placements.push(Placement {
                object: descriptor.id.clone(),
                kind: PlacementKind::Block(category),
                position,
                scale: Vec3::new(block_scale, 1.0, block_scale),
            });
        }
    }

    placements
}

/// Plan one merged placement covering a region's bounding box.
///
/// The reference mesh is stretched on X and Z so its local bounds cover the
/// box exactly; vertical scale is left alone. The mesh pivot is not guaranteed
/// to sit at the bottom-left of its bounds, so the position subtracts the
/// scaled pivot offset or the merged object lands visibly misaligned.
///
/// A mesh with no usable extent cannot be stretched; the region is skipped
/// with a diagnostic and the run continues.
pub fn plan_region_placement(
    region: &Region,
    category: TerrainCategory,
    descriptor: &ObjectDescriptor,
    world_unit: f32,
) -> Result<Placement, Diagnostic> {
    let size = descriptor.mesh_size;
    if size.x <= MIN_MESH_EXTENT || size.z <= MIN_MESH_EXTENT {
        return Err(Diagnostic::RegionSkipped {
            category,
            cell_count: region.cell_count(),
            reason: format!("object '{}' has no usable mesh bounds", descriptor.id),
        });
    }

    let (min_x, min_y, max_x, max_y) = region.bounds;
    let target_width = (max_x - min_x + 1) as f32 * world_unit;
    let target_depth = (max_y - min_y + 1) as f32 * world_unit;

    let scale = Vec3::new(target_width / size.x, 1.0, target_depth / size.z);

    let bottom_left = Vec3::new(min_x as f32 * world_unit, 0.0, min_y as f32 * world_unit);
    let pivot_offset = descriptor.mesh_center - Vec3::new(size.x / 2.0, 0.0, size.z / 2.0);
    let position =
        bottom_left - pivot_offset.scaled(scale) + Vec3::new(0.0, descriptor.y_offset, 0.0);

    Ok(Placement {
        object: descriptor.id.clone(),
        kind: PlacementKind::Region(category),
        position,
        scale,
    })
}
