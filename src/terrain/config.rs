//! Terrain, island and cloud configuration.

use serde::{Deserialize, Serialize};

use crate::biomes::Rgba;

/// One noise octave of the terrain blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OctaveConfig {
    /// Weight of this octave in the blended height.
    pub weight: f32,
    /// Noise wavelength as a fraction of the body diameter.
    pub period_ratio: f32,
}

/// Random "island" centres that concentrate terrain near themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IslandConfig {
    /// Minimum number of islands (inclusive).
    pub min_count: u32,
    /// Maximum number of islands (inclusive).
    pub max_count: u32,
    /// Smallest island radius as a fraction of the body diameter.
    pub min_size_ratio: f32,
    /// Largest island radius as a fraction of the body diameter.
    pub max_size_ratio: f32,
}

/// Configuration for radial terrain displacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    pub large: OctaveConfig,
    pub medium: OctaveConfig,
    pub small: OctaveConfig,
    /// Highest allowed vertex distance as a multiple of the radius (> 1).
    pub max_height_ratio: f32,
    /// Island suppression; `None` uses the raw octave blend everywhere.
    pub islands: Option<IslandConfig>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            large: OctaveConfig {
                weight: 1.0,
                period_ratio: 0.2,
            },
            medium: OctaveConfig {
                weight: 0.9,
                period_ratio: 0.1,
            },
            small: OctaveConfig {
                weight: 0.5,
                period_ratio: 0.05,
            },
            max_height_ratio: 1.16,
            islands: Some(IslandConfig {
                min_count: 7,
                max_count: 14,
                min_size_ratio: 0.2,
                max_size_ratio: 2.0 / 3.0,
            }),
        }
    }
}

impl TerrainConfig {
    /// Sum of the three octave weights.
    pub fn weight_sum(&self) -> f32 {
        self.large.weight + self.medium.weight + self.small.weight
    }

    /// Shared octave amplitude so the blend tops out at `max_height_ratio`.
    pub fn amplitude(&self) -> f32 {
        let sum = self.weight_sum();
        if sum > 0.0 {
            (self.max_height_ratio - 1.0) / sum
        } else {
            0.0
        }
    }
}

/// Optional cloud layer drawn above the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Noise wavelength as a fraction of the body diameter.
    pub period_ratio: f32,
    /// Normalized noise value in `(0, 1)` a face must exceed to be clouded.
    pub cutoff: f32,
    /// Cloud shell radius as a multiple of the body radius.
    pub altitude_ratio: f32,
    pub color: Rgba,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            period_ratio: 0.15,
            cutoff: 0.7,
            altitude_ratio: 1.2,
            color: [255, 255, 255, 255],
        }
    }
}
