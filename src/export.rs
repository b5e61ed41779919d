//! Debug export of the classified block grid
//!
//! Writes one pixel per block, colored by the cell's classification, so a
//! generation run can be eyeballed against the drawing it came from. Grouped
//! masks draw over the regular categories.

use image::{ImageBuffer, Rgb, RgbImage};

use crate::catalog::TerrainCategory;
use crate::masks::TypeMasks;

fn cell_color(masks: &TypeMasks, x: usize, y: usize) -> [u8; 3] {
    if *masks.water.get(x, y) {
        return [64, 120, 255];
    }
    if *masks.rock.get(x, y) {
        return [150, 150, 150];
    }
    match masks.regular.get(x, y) {
        TerrainCategory::Forest => [34, 139, 34],
        TerrainCategory::Sand => [237, 201, 110],
        TerrainCategory::Grass => [110, 180, 110],
        // The regular pass never produces grouped categories; fall back to
        // their mask colors anyway.
        TerrainCategory::Pond => [64, 120, 255],
        TerrainCategory::Mountain => [150, 150, 150],
    }
}

/// Export the classified block grid as a PNG, one pixel per block.
pub fn export_block_map(masks: &TypeMasks, path: &str) -> Result<(), image::ImageError> {
    let mut img: RgbImage = ImageBuffer::new(
        masks.regular.width as u32,
        masks.regular.height as u32,
    );

    for y in 0..masks.regular.height {
        for x in 0..masks.regular.width {
            img.put_pixel(x as u32, y as u32, Rgb(cell_color(masks, x, y)));
        }
    }

    img.save(path)
}
