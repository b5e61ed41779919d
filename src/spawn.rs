//! Spawn location
//!
//! Picks world entry points once the layout is planned. The player spawns at
//! the grid's geometric center via a downward ground probe answered by the
//! world's physics; the NPC spawns above the first forest block. The core
//! never intersects geometry itself.

use serde::{Deserialize, Serialize};

use crate::catalog::TerrainCategory;
use crate::masks::TypeMasks;
use crate::placement::{block_center, Vec3};

/// External downward ground-intersection query: the ground height directly
/// below `(x, start_y, z)` within `max_distance`, or `None` when nothing is
/// there to land on.
pub trait GroundProbe {
    fn ground_height(&self, x: f32, start_y: f32, z: f32, max_distance: f32) -> Option<f32>;
}

/// Flat ground at a fixed height. Used by tests and by the CLI, which has no
/// physics world to ask.
pub struct FlatGround {
    pub height: f32,
}

impl GroundProbe for FlatGround {
    fn ground_height(&self, _x: f32, start_y: f32, _z: f32, max_distance: f32) -> Option<f32> {
        if self.height <= start_y && start_y - self.height <= max_distance {
            Some(self.height)
        } else {
            None
        }
    }
}

/// A probe that never hits anything.
pub struct NoGround;

impl GroundProbe for NoGround {
    fn ground_height(&self, _x: f32, _start_y: f32, _z: f32, _max_distance: f32) -> Option<f32> {
        None
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Height the probe starts from; must clear any plausible terrain.
    pub probe_height: f32,
    /// Lift above the hit point so the spawned body does not clip the ground.
    pub clearance: f32,
    /// Height used when the probe misses.
    pub fallback_height: f32,
    /// Vertical offset of the NPC above its anchor block.
    pub npc_y_offset: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            probe_height: 100.0,
            clearance: 2.0,
            fallback_height: 2.0,
            npc_y_offset: 80.0,
        }
    }
}

/// Player spawn over the grid center: probe hit plus clearance, or the
/// fallback height on a miss.
pub fn locate_player_spawn(
    blocks_x: usize,
    blocks_y: usize,
    world_unit: f32,
    config: &SpawnConfig,
    probe: &dyn GroundProbe,
) -> Vec3 {
    let cx = blocks_x as f32 / 2.0 * world_unit;
    let cz = blocks_y as f32 / 2.0 * world_unit;

    match probe.ground_height(cx, config.probe_height, cz, config.probe_height * 2.0) {
        Some(ground) => Vec3::new(cx, ground + config.clearance, cz),
        None => Vec3::new(cx, config.fallback_height, cz),
    }
}

/// NPC spawn above the first unclaimed forest block in row-major order, or
/// `None` when the map has no forest.
pub fn locate_npc_spawn(masks: &TypeMasks, world_unit: f32, config: &SpawnConfig) -> Option<Vec3> {
    for y in 0..masks.regular.height {
        for x in 0..masks.regular.width {
            if masks.is_claimed(x, y) {
                continue;
            }
            if *masks.regular.get(x, y) == TerrainCategory::Forest {
                let center = block_center(x, y, world_unit);
                return Some(center + Vec3::new(0.0, config.npc_y_offset, 0.0));
            }
        }
    }
    None
}
