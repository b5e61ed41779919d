//! Drawn-map terrain layout library
//!
//! Converts a 2D map image (player-drawn or pre-authored) into an ordered
//! list of typed terrain placements for a 3D world: one object per block for
//! forest/sand/grass, one merged scaled object per connected pond or mountain
//! region, beach and ocean rings around the map, and spawn points.
//!
//! Re-exports modules for use by binaries and tools.

pub mod boundary;
pub mod catalog;
pub mod color;
pub mod export;
pub mod generator;
pub mod masks;
pub mod placement;
pub mod regions;
pub mod sampler;
pub mod spawn;
pub mod tilemap;
