//! Biome table and moisture configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Rgba;

/// Errors raised while compiling a [`BiomeTableConfig`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BiomeTableError {
    #[error("Biome table needs at least one elevation and one moisture level (got {0}x{1})")]
    ZeroLevels(u32, u32),
    #[error("Biome table grid of {0}x{1} levels is too large")]
    TooManyLevels(u32, u32),
    #[error("Biome table has no assignments and no fallback biome")]
    EmptyWithoutFallback,
    #[error("Biome table has no fallback biome")]
    MissingFallback,
    #[error("Unknown biome '{0}'")]
    UnknownBiome(String),
    #[error("Assignment ({0}, {1}) lies outside the {2}x{3} level grid")]
    AssignmentOutOfRange(u32, u32, u32, u32),
    #[error("Assignment ({0}, {1}) is listed more than once")]
    DuplicateAssignment(u32, u32),
}

/// One `(elevation level, moisture level) -> biome` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeAssignment {
    /// Elevation level, starting at 1.
    pub elevation: u32,
    /// Moisture level, starting at 1.
    pub moisture: u32,
    /// Name of a biome in the palette.
    pub biome: String,
}

/// Declarative biome table: a named palette plus a level grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeTableConfig {
    /// Number of elevation bands above the base surface.
    pub elevation_levels: u32,
    /// Number of moisture bands.
    pub moisture_levels: u32,
    /// Biome name to RGBA colour.
    pub palette: BTreeMap<String, Rgba>,
    pub assignments: Vec<BiomeAssignment>,
    /// Biome used for every unassigned combination, conventionally ocean.
    pub fallback: Option<String>,
}

impl BiomeTableConfig {
    /// Earth-like table: 4 elevation bands by 6 moisture bands over an ocean.
    pub fn terrestrial() -> Self {
        let palette = [
            ("snow", [248, 248, 248, 255]),
            ("tundra", [221, 221, 187, 255]),
            ("bare", [187, 187, 187, 255]),
            ("scorched", [153, 153, 153, 255]),
            ("taiga", [204, 212, 187, 255]),
            ("shrubland", [196, 204, 187, 255]),
            ("temperate_desert", [228, 232, 202, 255]),
            ("temperate_rain_forest", [164, 196, 168, 255]),
            ("temperate_deciduous_forest", [180, 196, 169, 255]),
            ("grassland", [196, 212, 170, 255]),
            ("tropical_rain_forest", [156, 187, 169, 255]),
            ("tropical_seasonal_forest", [169, 204, 164, 255]),
            ("subtropical_desert", [233, 221, 199, 255]),
            ("ocean", [63, 156, 255, 255]),
        ];

        // Rows are elevation 4..=1, columns moisture 1..=6.
        let grid: [[&str; 6]; 4] = [
            ["scorched", "bare", "tundra", "snow", "snow", "snow"],
            ["temperate_desert", "temperate_desert", "shrubland", "shrubland", "taiga", "taiga"],
            [
                "temperate_desert",
                "grassland",
                "grassland",
                "temperate_deciduous_forest",
                "temperate_deciduous_forest",
                "temperate_rain_forest",
            ],
            [
                "subtropical_desert",
                "grassland",
                "tropical_seasonal_forest",
                "tropical_seasonal_forest",
                "tropical_rain_forest",
                "tropical_rain_forest",
            ],
        ];

        Self::from_grid(&palette, &grid, "ocean")
    }

    /// Airless grey table: 2 elevation bands by 2 moisture bands.
    pub fn lunar() -> Self {
        let palette = [
            ("grey1", [200, 200, 200, 255]),
            ("grey2", [180, 180, 180, 255]),
            ("grey3", [187, 180, 160, 255]),
            ("grey4", [153, 153, 153, 255]),
            ("grey5", [204, 212, 187, 255]),
        ];
        let grid: [[&str; 2]; 2] = [["grey3", "grey1"], ["grey4", "grey2"]];

        Self::from_grid(&palette, &grid, "grey5")
    }

    /// Builds a config from a grid whose first row is the highest elevation band.
    fn from_grid<const M: usize, const E: usize>(
        palette: &[(&str, Rgba)],
        grid: &[[&str; M]; E],
        fallback: &str,
    ) -> Self {
        let mut assignments = Vec::with_capacity(M * E);
        for (row, names) in grid.iter().enumerate() {
            let elevation = (E - row) as u32;
            for (col, name) in names.iter().enumerate() {
                assignments.push(BiomeAssignment {
                    elevation,
                    moisture: col as u32 + 1,
                    biome: (*name).to_string(),
                });
            }
        }

        Self {
            elevation_levels: E as u32,
            moisture_levels: M as u32,
            palette: palette
                .iter()
                .map(|&(name, color)| (name.to_string(), color))
                .collect(),
            assignments,
            fallback: Some(fallback.to_string()),
        }
    }
}

/// Latitude-dependent pull of moisture toward a fixed extreme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatitudeBias {
    /// Blend weight at the poles (0 disables, 1 fully replaces).
    pub strength: f32,
    /// Target moisture as a fraction of the total moisture levels.
    pub target: f32,
}

impl Default for LatitudeBias {
    fn default() -> Self {
        Self {
            strength: 0.6,
            target: 1.0,
        }
    }
}

/// Moisture noise configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoistureConfig {
    /// Noise wavelength as a fraction of the body diameter.
    pub period_ratio: f32,
    /// Optional polar bias.
    pub latitude_bias: Option<LatitudeBias>,
}

impl Default for MoistureConfig {
    fn default() -> Self {
        Self {
            period_ratio: 0.2,
            latitude_bias: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrestrial_grid_is_complete() {
        let cfg = BiomeTableConfig::terrestrial();
        assert_eq!(cfg.elevation_levels, 4);
        assert_eq!(cfg.moisture_levels, 6);
        assert_eq!(cfg.assignments.len(), 24);
        for a in &cfg.assignments {
            assert!(cfg.palette.contains_key(&a.biome), "Missing palette entry {}", a.biome);
        }
    }

    #[test]
    fn test_grid_row_order() {
        let cfg = BiomeTableConfig::terrestrial();
        let top = cfg
            .assignments
            .iter()
            .find(|a| a.elevation == 4 && a.moisture == 6)
            .unwrap();
        assert_eq!(top.biome, "snow");
        let low = cfg
            .assignments
            .iter()
            .find(|a| a.elevation == 1 && a.moisture == 1)
            .unwrap();
        assert_eq!(low.biome, "subtropical_desert");
    }

    #[test]
    fn test_lunar_fallback() {
        let cfg = BiomeTableConfig::lunar();
        assert_eq!(cfg.fallback.as_deref(), Some("grey5"));
        assert_eq!(cfg.assignments.len(), 4);
    }
}
