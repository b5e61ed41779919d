//! Block grid sampling
//!
//! Downsamples the source image into a coarse grid of block samples, one per
//! `block_size`-pixel square. Each sample carries the block's mean color and
//! the fraction of its pixels matching every classifier predicate, so later
//! stages never touch the image again.
//!
//! Remainder pixels past the last full block are ignored (integer division
//! sets the grid dimensions). Within a block, pixels outside the image are
//! skipped and the average divides by the sampled count only.

use image::RgbaImage;
use rayon::prelude::*;

use crate::color::{ClassifierConfig, ColorF};
use crate::tilemap::Tilemap;

/// Per-block evidence: mean color plus predicate pixel ratios.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlockSample {
    pub avg: ColorF,
    pub forest_ratio: f32,
    pub sand_ratio: f32,
    pub water_ratio: f32,
    pub rock_ratio: f32,
}

/// Grid dimensions for an image at a given block size (integer division;
/// remainder pixels are dropped).
pub fn grid_dims(image: &RgbaImage, block_size: u32) -> (usize, usize) {
    (
        (image.width() / block_size) as usize,
        (image.height() / block_size) as usize,
    )
}

/// Sample one block. Averages over the in-bounds pixels of the block's rect
/// `[bx·bs, (bx+1)·bs) × [by·bs, (by+1)·bs)` and counts predicate matches.
pub fn sample_block(
    image: &RgbaImage,
    block_size: u32,
    bx: usize,
    by: usize,
    config: &ClassifierConfig,
) -> BlockSample {
    let start_x = bx as u32 * block_size;
    let start_y = by as u32 * block_size;

    let mut sum = ColorF::default();
    let mut total = 0u32;
    let mut forest = 0u32;
    let mut sand = 0u32;
    let mut water = 0u32;
    let mut rock = 0u32;

    for dy in 0..block_size {
        for dx in 0..block_size {
            let px = start_x + dx;
            let py = start_y + dy;
            if px >= image.width() || py >= image.height() {
                continue;
            }

            let c = ColorF::from_rgba8(image.get_pixel(px, py).0);
            sum = sum + c;
            total += 1;

            let flags = config.classify_pixel(c);
            if flags.forest {
                forest += 1;
            }
            if flags.sand {
                sand += 1;
            }
            if flags.water {
                water += 1;
            }
            if flags.rock {
                rock += 1;
            }
        }
    }

    if total == 0 {
        return BlockSample::default();
    }

    let inv = 1.0 / total as f32;
    BlockSample {
        avg: sum * inv,
        forest_ratio: forest as f32 * inv,
        sand_ratio: sand as f32 * inv,
        water_ratio: water as f32 * inv,
        rock_ratio: rock as f32 * inv,
    }
}

/// Sample every block of the grid sequentially.
pub fn sample_blocks(
    image: &RgbaImage,
    block_size: u32,
    config: &ClassifierConfig,
) -> Tilemap<BlockSample> {
    let (blocks_x, blocks_y) = grid_dims(image, block_size);
    let mut grid = Tilemap::new(blocks_x, blocks_y);

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            grid.set(bx, by, sample_block(image, block_size, bx, by, config));
        }
    }

    grid
}

/// Sample every block in parallel. Blocks are independent, so this is a plain
/// fan-out over block indices; the result is identical to the sequential path.
pub fn sample_blocks_parallel(
    image: &RgbaImage,
    block_size: u32,
    config: &ClassifierConfig,
) -> Tilemap<BlockSample> {
    let (blocks_x, blocks_y) = grid_dims(image, block_size);

    let samples: Vec<BlockSample> = (0..blocks_x * blocks_y)
        .into_par_iter()
        .map(|i| sample_block(image, block_size, i % blocks_x, i / blocks_x, config))
        .collect();

    let mut grid = Tilemap::new(blocks_x, blocks_y);
    for (i, sample) in samples.into_iter().enumerate() {
        grid.set(i % blocks_x, i / blocks_x, sample);
    }

    grid
}
