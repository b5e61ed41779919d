//! Terrain categories and the placeable-object catalog
//!
//! The catalog is owned by the world-building side: it maps each terrain
//! category to one or more placeable object descriptors, each carrying the
//! local-space mesh bounds needed to stretch merged regions over their
//! bounding boxes.

use serde::{Deserialize, Serialize};

use crate::placement::Vec3;

/// Terrain category for one block of the drawn map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainCategory {
    Forest,
    Sand,
    #[default]
    Grass,
    Pond,
    Mountain,
}

impl TerrainCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            TerrainCategory::Forest => "forest",
            TerrainCategory::Sand => "sand",
            TerrainCategory::Grass => "grass",
            TerrainCategory::Pond => "pond",
            TerrainCategory::Mountain => "mountain",
        }
    }

    /// Grouped categories are merged into connected regions and placed as one
    /// scaled object; the rest are placed per block.
    pub fn is_grouped(&self) -> bool {
        matches!(self, TerrainCategory::Pond | TerrainCategory::Mountain)
    }

    pub fn all() -> [TerrainCategory; 5] {
        [
            TerrainCategory::Forest,
            TerrainCategory::Sand,
            TerrainCategory::Grass,
            TerrainCategory::Pond,
            TerrainCategory::Mountain,
        ]
    }
}

/// A placeable object the world side can instantiate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// Stable identifier handed back in placements.
    pub id: String,
    /// Local-space bounding box size of the reference mesh.
    pub mesh_size: Vec3,
    /// Local-space bounding box center of the reference mesh.
    pub mesh_center: Vec3,
    /// Vertical offset applied to every placement of this object. Compensates
    /// for where the model sits relative to its pivot.
    #[serde(default)]
    pub y_offset: f32,
}

impl ObjectDescriptor {
    pub fn new(id: &str, mesh_size: Vec3, mesh_center: Vec3, y_offset: f32) -> Self {
        Self {
            id: id.to_string(),
            mesh_size,
            mesh_center,
            y_offset,
        }
    }
}

/// Placeable objects per terrain category, plus the ring and backdrop objects.
///
/// The five category lists must be non-empty for a generation run to start;
/// the backdrop entries are optional and simply omitted when absent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AssetCatalog {
    pub forest: Vec<ObjectDescriptor>,
    pub sand: Vec<ObjectDescriptor>,
    pub grass: Vec<ObjectDescriptor>,
    pub pond: Vec<ObjectDescriptor>,
    pub mountain: Vec<ObjectDescriptor>,
    /// Beach object for the inner boundary ring.
    pub beach: Option<ObjectDescriptor>,
    /// Ocean object for the outer boundary ring and the backdrop plane.
    pub ocean: Option<ObjectDescriptor>,
    /// Island base centered under the map (optional backdrop).
    #[serde(default)]
    pub island: Option<ObjectDescriptor>,
}

impl AssetCatalog {
    /// Variant list for a terrain category.
    pub fn variants(&self, category: TerrainCategory) -> &[ObjectDescriptor] {
        match category {
            TerrainCategory::Forest => &self.forest,
            TerrainCategory::Sand => &self.sand,
            TerrainCategory::Grass => &self.grass,
            TerrainCategory::Pond => &self.pond,
            TerrainCategory::Mountain => &self.mountain,
        }
    }

    /// A small built-in catalog with plausible mesh bounds, used by the CLI
    /// when no catalog file is given and by tests.
    pub fn demo() -> Self {
        let unit_block = |id: &str, y_offset: f32| {
            ObjectDescriptor::new(
                id,
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(0.0, 0.5, 0.0),
                y_offset,
            )
        };

        Self {
            forest: vec![
                unit_block("forest_pines", 0.0),
                unit_block("forest_oaks", 0.0),
                unit_block("forest_mixed", 0.0),
            ],
            sand: vec![unit_block("sand_flat", 0.0)],
            grass: vec![unit_block("grass_plain", 0.0), unit_block("grass_flowers", 0.0)],
            pond: vec![ObjectDescriptor::new(
                "pond_basic",
                Vec3::new(10.0, 2.0, 10.0),
                Vec3::new(0.0, -0.5, 0.0),
                -1.5,
            )],
            mountain: vec![ObjectDescriptor::new(
                "mountain_rocky",
                Vec3::new(8.0, 12.0, 8.0),
                Vec3::new(0.0, 6.0, 0.0),
                0.0,
            )],
            beach: Some(unit_block("beach_strip", 0.0)),
            ocean: Some(ObjectDescriptor::new(
                "ocean_tile",
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::ZERO,
                -2.0,
            )),
            island: Some(ObjectDescriptor::new(
                "island_base",
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::ZERO,
                0.0,
            )),
        }
    }
}
