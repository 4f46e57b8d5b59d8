//! Body configuration record and presets.

use serde::{Deserialize, Serialize};

use crate::biomes::{BiomeTableConfig, LatitudeBias, MoistureConfig, Rgba};
use crate::orientation::AxisDefinition;
use crate::terrain::{CloudConfig, IslandConfig, OctaveConfig, TerrainConfig};
use super::BodyError;

/// Highest accepted subdivision level (20·4⁸ ≈ 1.3M faces).
pub const MAX_SUBDIVISION: u32 = 8;

/// Atmospheric fog applied at render time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereConfig {
    /// Fog density; 0 disables fog.
    pub strength: f32,
    /// Colour faces are blended toward at the limb.
    pub color: Rgba,
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            strength: 0.0,
            color: [255, 255, 255, 255],
        }
    }
}

impl AtmosphereConfig {
    pub fn is_enabled(&self) -> bool {
        self.strength > 0.0
    }
}

/// Rotation axis selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisConfig {
    Fixed(AxisDefinition),
    /// Drawn from the body's feature generator.
    Random,
}

impl Default for AxisConfig {
    fn default() -> Self {
        AxisConfig::Fixed(AxisDefinition::default())
    }
}

/// Everything needed to generate one body.
///
/// Periods and sizes inside the sub-records are ratios of `diameter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    /// Undisplaced sphere diameter in world units (pixels when rendered).
    pub diameter: f32,
    /// Number of icosahedron subdivision passes.
    pub subdivision: u32,
    pub terrain: TerrainConfig,
    /// `None` skips moisture sampling.
    pub moisture: Option<MoistureConfig>,
    pub biomes: BiomeTableConfig,
    /// `None` skips the cloud layer.
    pub clouds: Option<CloudConfig>,
    pub atmosphere: AtmosphereConfig,
    pub axis: AxisConfig,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self::terrestrial_oceans(375.0)
    }
}

impl BodyConfig {
    /// Ocean world with 7 to 14 continents, clouds and a thin atmosphere.
    pub fn terrestrial_oceans(diameter: f32) -> Self {
        Self {
            diameter,
            subdivision: 3,
            terrain: TerrainConfig::default(),
            moisture: Some(MoistureConfig::default()),
            biomes: BiomeTableConfig::terrestrial(),
            clouds: Some(CloudConfig::default()),
            atmosphere: AtmosphereConfig {
                strength: 0.5,
                ..Default::default()
            },
            axis: AxisConfig::default(),
        }
    }

    /// Grey, low-relief cratered moon without clouds or atmosphere.
    pub fn classic_moon(diameter: f32) -> Self {
        Self {
            diameter,
            subdivision: 3,
            terrain: TerrainConfig {
                large: OctaveConfig {
                    weight: 1.0,
                    period_ratio: 0.2,
                },
                medium: OctaveConfig {
                    weight: 0.4,
                    period_ratio: 0.1,
                },
                small: OctaveConfig {
                    weight: 0.3,
                    period_ratio: 0.05,
                },
                max_height_ratio: 1.02,
                islands: Some(IslandConfig {
                    min_count: 30,
                    max_count: 35,
                    min_size_ratio: 0.1,
                    max_size_ratio: 0.6,
                }),
            },
            moisture: Some(MoistureConfig {
                period_ratio: 1.0 / 3.0,
                latitude_bias: None,
            }),
            biomes: BiomeTableConfig::lunar(),
            clouds: None,
            atmosphere: AtmosphereConfig::default(),
            axis: AxisConfig::default(),
        }
    }

    /// Enables the default latitude bias, pushing the poles toward wet biomes.
    pub fn with_polar_moisture(mut self) -> Self {
        if let Some(moisture) = &mut self.moisture {
            moisture.latitude_bias = Some(LatitudeBias::default());
        }
        self
    }

    pub fn radius(&self) -> f32 {
        self.diameter * 0.5
    }

    /// Checks every field; generation refuses configs that fail here.
    pub fn validate(&self) -> Result<(), BodyError> {
        if !self.diameter.is_finite() || self.diameter <= 0.0 {
            return Err(BodyError::InvalidDiameter(self.diameter));
        }
        if self.subdivision > MAX_SUBDIVISION {
            return Err(BodyError::SubdivisionTooHigh(self.subdivision, MAX_SUBDIVISION));
        }

        let t = &self.terrain;
        for (name, octave) in [("large", t.large), ("medium", t.medium), ("small", t.small)] {
            if !octave.weight.is_finite() || octave.weight < 0.0 {
                return Err(BodyError::InvalidWeight(name, octave.weight));
            }
            check_period(name, octave.period_ratio)?;
        }
        if !t.max_height_ratio.is_finite() || t.max_height_ratio <= 1.0 {
            return Err(BodyError::InvalidHeightRatio(t.max_height_ratio));
        }
        if let Some(islands) = &t.islands {
            if islands.min_count > islands.max_count {
                return Err(BodyError::InvalidIslandCount(islands.min_count, islands.max_count));
            }
            let sizes_ok = islands.min_size_ratio.is_finite()
                && islands.max_size_ratio.is_finite()
                && islands.min_size_ratio > 0.0
                && islands.min_size_ratio <= islands.max_size_ratio;
            if !sizes_ok {
                return Err(BodyError::InvalidIslandSize(
                    islands.min_size_ratio,
                    islands.max_size_ratio,
                ));
            }
        }

        if let Some(moisture) = &self.moisture {
            check_period("moisture", moisture.period_ratio)?;
        }

        if let Some(clouds) = &self.clouds {
            check_period("cloud", clouds.period_ratio)?;
            if !clouds.altitude_ratio.is_finite() || clouds.altitude_ratio <= t.max_height_ratio {
                return Err(BodyError::CloudsBelowTerrain(clouds.altitude_ratio, t.max_height_ratio));
            }
        }

        if !self.atmosphere.strength.is_finite() || self.atmosphere.strength < 0.0 {
            return Err(BodyError::InvalidAtmosphere(self.atmosphere.strength));
        }

        if let AxisConfig::Fixed(axis) = &self.axis {
            axis.validate()?;
        }

        Ok(())
    }
}

fn check_period(name: &'static str, ratio: f32) -> Result<(), BodyError> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(())
    } else {
        Err(BodyError::InvalidPeriod(name, ratio))
    }
}
