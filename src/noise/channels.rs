//! Per-body noise channels derived from a master seed.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::gradient::{sample, NoiseMode};

/// A seeded noise source with a fixed wavelength and output amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseChannel {
    /// Channel seed; two channels with different seeds are uncorrelated.
    pub seed: u64,
    /// Wavelength in world units.
    pub period: f32,
    /// Output range upper bound.
    pub amplitude: f32,
}

impl NoiseChannel {
    /// Creates a channel.
    pub fn new(seed: u64, period: f32, amplitude: f32) -> Self {
        Self {
            seed,
            period,
            amplitude,
        }
    }

    /// Samples this channel at `point`.
    pub fn sample(&self, point: Vec3, mode: NoiseMode) -> f32 {
        sample(point, self.period, self.amplitude, self.seed, mode)
    }
}

/// Independent seeds for every noise-driven stage of one body.
///
/// All seeds are drawn from a generator local to the body, so two bodies
/// never share random state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoiseChannels {
    pub terrain_large: u64,
    pub terrain_medium: u64,
    pub terrain_small: u64,
    pub moisture: u64,
    pub cloud: u64,
    /// Seed for placement decisions (islands, random axis).
    pub features: u64,
}

impl NoiseChannels {
    /// Derives all channel seeds from a master seed.
    pub fn derive(master_seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(master_seed);
        Self {
            terrain_large: rng.random(),
            terrain_medium: rng.random(),
            terrain_small: rng.random(),
            moisture: rng.random(),
            cloud: rng.random(),
            features: rng.random(),
        }
    }

    /// Returns a fresh generator for feature placement.
    pub fn feature_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.features)
    }
}
