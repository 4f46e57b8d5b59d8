//! Radial terrain displacement from blended noise octaves.

use glam::Vec3;
use rand::Rng;
use rayon::prelude::*;

use crate::geometry::Mesh;
use crate::noise::{NoiseChannel, NoiseChannels, NoiseMode};
use super::config::{IslandConfig, TerrainConfig};

/// A terrain-concentrating centre with a falloff radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Island {
    pub center: Vec3,
    pub radius: f32,
}

/// Resolved terrain inputs for one body.
#[derive(Debug, Clone)]
pub struct TerrainParams {
    /// Large, medium and small octave channels, all sharing one amplitude.
    pub octaves: [NoiseChannel; 3],
    pub weights: [f32; 3],
    /// Highest allowed height multiplier.
    pub max_multiplier: f32,
    /// Empty when islands are disabled.
    pub islands: Vec<Island>,
}

impl TerrainParams {
    /// Resolves periods and amplitude from the config for a body of `diameter`.
    pub fn new(config: &TerrainConfig, channels: &NoiseChannels, diameter: f32, islands: Vec<Island>) -> Self {
        let amplitude = config.amplitude();
        let channel = |seed, ratio: f32| NoiseChannel::new(seed, ratio * diameter, amplitude);
        Self {
            octaves: [
                channel(channels.terrain_large, config.large.period_ratio),
                channel(channels.terrain_medium, config.medium.period_ratio),
                channel(channels.terrain_small, config.small.period_ratio),
            ],
            weights: [config.large.weight, config.medium.weight, config.small.weight],
            max_multiplier: config.max_height_ratio,
            islands,
        }
    }

    /// `amplitude · (lnd + mnd + snd)`, the largest possible blended value.
    pub fn blend_ceiling(&self) -> f32 {
        self.octaves
            .iter()
            .zip(self.weights)
            .map(|(o, w)| o.amplitude * w)
            .sum()
    }

    /// Height multiplier for an undisplaced vertex position.
    ///
    /// Always within `[1, max_multiplier]`.
    ///
    /// # Arguments
    /// * `point` - Vertex position on the base sphere
    ///
    /// # Returns
    /// Factor the vertex distance from the centre is scaled by
    pub fn height_multiplier(&self, point: Vec3) -> f32 {
        // Weighted sum of the three octaves, each in [0, amplitude]
        let blend: f32 = self
            .octaves
            .iter()
            .zip(self.weights)
            .map(|(o, w)| w * o.sample(point, NoiseMode::Raw))
            .sum();

        // Far from every island the whole ceiling is subtracted
        let ceiling = self.blend_ceiling();
        let noise = if self.islands.is_empty() {
            blend
        } else {
            blend - ceiling * (1.0 - island_proximity(point, &self.islands))
        };

        // Floor at the base surface, cap at the configured ceiling
        (1.0 + noise.clamp(0.0, ceiling)).min(self.max_multiplier)
    }
}

/// Picks island centres among mesh vertices with random radii.
///
/// The count is uniform in `[min_count, max_count]`; radii are uniform in
/// `[min_size_ratio, max_size_ratio] · diameter`.
///
/// # Arguments
/// * `mesh` - Undisplaced mesh whose vertices are candidate centres
/// * `config` - Count and size ranges
/// * `diameter` - Body diameter the size ratios scale with
/// * `rng` - Body-local feature generator
pub fn place_islands<R: Rng>(mesh: &Mesh, config: &IslandConfig, diameter: f32, rng: &mut R) -> Vec<Island> {
    let vertices = mesh.vertices();
    if vertices.is_empty() {
        return Vec::new();
    }

    let count = rng.random_range(config.min_count..=config.max_count);
    let min_size = config.min_size_ratio * diameter;
    let max_size = config.max_size_ratio * diameter;

    (0..count)
        .map(|_| {
            let radius = min_size + rng.random::<f32>() * (max_size - min_size);
            let center = vertices[rng.random_range(0..vertices.len())];
            Island { center, radius }
        })
        .collect()
}

/// Maximum over all islands of `max(0, 1 − distance / radius)`.
pub fn island_proximity(point: Vec3, islands: &[Island]) -> f32 {
    islands
        .iter()
        .filter(|island| island.radius > 0.0)
        .map(|island| (1.0 - point.distance(island.center) / island.radius).max(0.0))
        .fold(0.0, f32::max)
}

/// Displaces every vertex radially by its height multiplier.
///
/// Vertices are expected to lie on the undisplaced sphere; each ends at
/// `radius · multiplier` along its existing direction.
pub fn apply_terrain(mesh: &mut Mesh, params: &TerrainParams) {
    let radius = mesh.radius();
    mesh.vertices_mut().par_iter_mut().for_each(|v| {
        let multiplier = params.height_multiplier(*v);
        *v = v.normalize_or_zero() * (radius * multiplier);
    });
}
