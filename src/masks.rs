//! Type mask building
//!
//! Turns block samples into one boolean mask per grouped category (water,
//! rock) and a regular category per cell. Water and rock are thresholded
//! independently; where both trigger, water wins and the rock bit is cleared,
//! so a cell is claimed by at most one grouped mask.

use crate::catalog::TerrainCategory;
use crate::color::ClassifierConfig;
use crate::sampler::BlockSample;
use crate::tilemap::Tilemap;

/// Grouped-category masks plus the regular classification grid.
pub struct TypeMasks {
    pub water: Tilemap<bool>,
    pub rock: Tilemap<bool>,
    /// Regular (per-block) category for every cell. Only read for cells not
    /// claimed by a grouped mask.
    pub regular: Tilemap<TerrainCategory>,
}

impl TypeMasks {
    /// Whether a grouped mask claims this cell.
    pub fn is_claimed(&self, x: usize, y: usize) -> bool {
        *self.water.get(x, y) || *self.rock.get(x, y)
    }
}

/// Build all masks from the sampled grid. Pure and deterministic: the same
/// samples always produce the same masks.
pub fn build_masks(samples: &Tilemap<BlockSample>, config: &ClassifierConfig) -> TypeMasks {
    let width = samples.width;
    let height = samples.height;

    let mut water = Tilemap::new_with(width, height, false);
    let mut rock = Tilemap::new_with(width, height, false);
    let mut regular = Tilemap::new_with(width, height, TerrainCategory::Grass);

    for (x, y, sample) in samples.iter() {
        let is_water = sample.water_ratio > config.water_threshold;
        let is_rock = sample.rock_ratio > config.rock_threshold && !is_water;

        water.set(x, y, is_water);
        rock.set(x, y, is_rock);
        regular.set(
            x,
            y,
            config.classify_block(sample.forest_ratio, sample.sand_ratio),
        );
    }

    TypeMasks { water, rock, regular }
}
