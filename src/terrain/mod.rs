//! Terrain displacement and cloud generation.
//!
//! Terrain moves every vertex outward along its direction by a multiplier
//! derived from three blended noise octaves, optionally suppressed away from
//! randomly placed island centres. Clouds are a separate face set selected
//! by a cutoff on a dedicated noise channel.

mod clouds;
mod config;
mod heightmap;

pub use clouds::{generate_clouds, CloudLayer};
pub use config::{CloudConfig, IslandConfig, OctaveConfig, TerrainConfig};
pub use heightmap::{apply_terrain, island_proximity, place_islands, Island, TerrainParams};
