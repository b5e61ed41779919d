//! Boundary ring generation
//!
//! Surrounds the sampled grid with a beach ring one block outside its edges
//! and an ocean ring one block beyond that. Only perimeter cells are
//! enumerated, so the cost stays linear in the grid perimeter instead of
//! quadratic in its area. Each edge can be pushed out independently to shape
//! an asymmetric shoreline.

use serde::{Deserialize, Serialize};

use crate::catalog::ObjectDescriptor;
use crate::placement::{Placement, PlacementKind, Vec3};

/// Extra push-out per edge, in block units.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RingOffsets {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for RingOffsets {
    fn default() -> Self {
        Self {
            top: 0.1,
            bottom: 0.1,
            left: 0.1,
            right: 0.1,
        }
    }
}

/// Perimeter cells of the ring `distance` blocks outside a
/// `blocks_x` x `blocks_y` grid, corners included exactly once.
pub fn ring_cells(blocks_x: usize, blocks_y: usize, distance: i32) -> Vec<(i32, i32)> {
    let lo_x = -distance;
    let hi_x = blocks_x as i32 - 1 + distance;
    let lo_y = -distance;
    let hi_y = blocks_y as i32 - 1 + distance;

    let mut cells = Vec::new();

    for x in lo_x..=hi_x {
        cells.push((x, lo_y));
        cells.push((x, hi_y));
    }
    // Side columns, excluding the corners already emitted above.
    for y in (lo_y + 1)..hi_y {
        cells.push((lo_x, y));
        cells.push((hi_x, y));
    }

    cells
}

/// Placements for one ring. Cells beyond an edge are pushed out by that
/// edge's offset; corner cells sit beyond two edges and get both.
pub fn ring_placements(
    blocks_x: usize,
    blocks_y: usize,
    distance: i32,
    descriptor: &ObjectDescriptor,
    kind: PlacementKind,
    world_unit: f32,
    offsets: &RingOffsets,
) -> Vec<Placement> {
    let half = world_unit / 2.0;
    let mut placements = Vec::new();

    for (x, y) in ring_cells(blocks_x, blocks_y, distance) {
        let mut position = Vec3::new(
            x as f32 * world_unit + half,
            descriptor.y_offset,
            y as f32 * world_unit + half,
        );

        if x < 0 {
            position.x -= world_unit * offsets.left;
        }
        if x >= blocks_x as i32 {
            position.x += world_unit * offsets.right;
        }
        if y < 0 {
            position.z -= world_unit * offsets.bottom;
        }
        if y >= blocks_y as i32 {
            position.z += world_unit * offsets.top;
        }

        placements.push(Placement {
            object: descriptor.id.clone(),
            kind,
            position,
            scale: Vec3::new(1.0, 1.0, 1.0),
        });
    }

    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn zero_offsets() -> RingOffsets {
        RingOffsets { top: 0.0, bottom: 0.0, left: 0.0, right: 0.0 }
    }

    #[test]
    fn test_inner_ring_cell_count() {
        // A ring one block out around bx x by has 2*bx + 2*by + 4 cells.
        for &(bx, by) in &[(2usize, 2usize), (5, 3), (1, 1), (10, 1)] {
            let cells = ring_cells(bx, by, 1);
            assert_eq!(cells.len(), 2 * bx + 2 * by + 4, "{}x{}", bx, by);
        }
    }

    #[test]
    fn test_ring_has_no_duplicates() {
        for distance in 1..=2 {
            let cells = ring_cells(4, 3, distance);
            let unique: HashSet<_> = cells.iter().copied().collect();
            assert_eq!(unique.len(), cells.len());
        }
    }

    #[test]
    fn test_ring_cells_sit_outside_the_grid() {
        let cells = ring_cells(3, 2, 1);
        for &(x, y) in &cells {
            let outside = x == -1 || x == 3 || y == -1 || y == 2;
            assert!(outside, "({}, {}) is not on the ring", x, y);
        }
    }

    #[test]
    fn test_edge_offsets_push_outward() {
        let descriptor = ObjectDescriptor::new(
            "ocean_tile",
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::ZERO,
            0.0,
        );
        let offsets = RingOffsets { top: 0.5, bottom: 0.25, left: 1.0, right: 0.0 };
        let placements =
            ring_placements(2, 2, 1, &descriptor, PlacementKind::BeachRing, 100.0, &offsets);

        // Left column cell (-1, 0): base center -50, pushed left by 100.
        let left = placements
            .iter()
            .find(|p| p.position.z == 50.0 && p.position.x < 0.0)
            .unwrap();
        assert_eq!(left.position.x, -150.0);

        // Top-left corner (-1, 2) gets both the left and top pushes.
        let corner = placements
            .iter()
            .find(|p| p.position.x == -150.0 && p.position.z > 200.0)
            .unwrap();
        assert_eq!(corner.position.z, 250.0 + 50.0);
    }

    #[test]
    fn test_ring_placements_carry_descriptor() {
        let descriptor = ObjectDescriptor::new(
            "beach_strip",
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::ZERO,
            0.75,
        );
        let placements = ring_placements(
            2,
            2,
            1,
            &descriptor,
            PlacementKind::BeachRing,
            100.0,
            &zero_offsets(),
        );

        assert_eq!(placements.len(), 12);
        for p in &placements {
            assert_eq!(p.object, "beach_strip");
            assert_eq!(p.kind, PlacementKind::BeachRing);
            assert_eq!(p.position.y, 0.75);
        }
    }
}
