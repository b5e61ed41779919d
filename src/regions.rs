//! Connected-region extraction
//!
//! Groups contiguous true cells of one boolean mask into regions with a
//! 4-directional BFS flood fill. Every true cell ends up in exactly one
//! region; visited state is local to a single call, so running over two
//! different masks never interferes.

use std::collections::VecDeque;

use crate::tilemap::Tilemap;

/// One 4-connected component of a mask.
#[derive(Clone, Debug)]
pub struct Region {
    /// Member cells in BFS discovery order.
    pub cells: Vec<(usize, usize)>,
    /// Inclusive bounding box (min_x, min_y, max_x, max_y).
    pub bounds: (usize, usize, usize, usize),
}

impl Region {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            bounds: (usize::MAX, usize::MAX, 0, 0),
        }
    }

    pub fn add_cell(&mut self, x: usize, y: usize) {
        self.cells.push((x, y));
        self.bounds.0 = self.bounds.0.min(x);
        self.bounds.1 = self.bounds.1.min(y);
        self.bounds.2 = self.bounds.2.max(x);
        self.bounds.3 = self.bounds.3.max(y);
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Bounding box width in blocks.
    pub fn width(&self) -> usize {
        if self.bounds.2 >= self.bounds.0 {
            self.bounds.2 - self.bounds.0 + 1
        } else {
            0
        }
    }

    /// Bounding box height in blocks.
    pub fn height(&self) -> usize {
        if self.bounds.3 >= self.bounds.1 {
            self.bounds.3 - self.bounds.1 + 1
        } else {
            0
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract all 4-connected components of a mask, in row-major discovery
/// order. A lone true cell forms a singleton region. O(width · height):
/// each cell is enqueued at most once.
pub fn extract_regions(mask: &Tilemap<bool>) -> Vec<Region> {
    let mut visited = Tilemap::new_with(mask.width, mask.height, false);
    let mut regions = Vec::new();

    for y in 0..mask.height {
        for x in 0..mask.width {
            if !*mask.get(x, y) || *visited.get(x, y) {
                continue;
            }

            let mut region = Region::new();
            let mut queue = VecDeque::new();

            queue.push_back((x, y));
            visited.set(x, y, true);

            while let Some((cx, cy)) = queue.pop_front() {
                region.add_cell(cx, cy);

                for (nx, ny) in mask.neighbors(cx, cy) {
                    if *mask.get(nx, ny) && !*visited.get(nx, ny) {
                        visited.set(nx, ny, true);
                        queue.push_back((nx, ny));
                    }
                }
            }

            regions.push(region);
        }
    }

    regions
}
