//! Biome classification from elevation and moisture bands.
//!
//! Each face's centroid height is quantised into an elevation level and a
//! moisture noise sample into a moisture level; the pair is looked up in a
//! [`BiomeTable`]. Lookups never fail: anything unassigned or out of range
//! resolves to the table's fallback colour.

mod config;

pub use config::{BiomeAssignment, BiomeTableConfig, BiomeTableError, LatitudeBias, MoistureConfig};

use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use rayon::prelude::*;

use crate::geometry::{face_centroid, Mesh};
use crate::noise::{NoiseChannel, NoiseMode};

/// 8-bit RGBA colour.
pub type Rgba = [u8; 4];

/// Largest accepted `elevation_levels · moisture_levels` grid.
pub const MAX_TABLE_CELLS: u32 = 1 << 16;

/// Compiled, total `(elevation, moisture) -> colour` lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeTable {
    elevation_levels: u32,
    moisture_levels: u32,
    /// Dense grid, row-major by elevation then moisture.
    cells: Vec<Option<Rgba>>,
    fallback: Rgba,
}

impl BiomeTable {
    /// Validates and compiles a table configuration.
    pub fn compile(config: &BiomeTableConfig) -> Result<Self, BiomeTableError> {
        let (e_levels, m_levels) = (config.elevation_levels, config.moisture_levels);
        if e_levels == 0 || m_levels == 0 {
            return Err(BiomeTableError::ZeroLevels(e_levels, m_levels));
        }

        // Fallback must resolve before any assignment is looked at
        let fallback_name = match &config.fallback {
            Some(name) => name,
            None if config.assignments.is_empty() => {
                return Err(BiomeTableError::EmptyWithoutFallback)
            }
            None => return Err(BiomeTableError::MissingFallback),
        };
        let color_of = |name: &str| {
            config
                .palette
                .get(name)
                .copied()
                .ok_or_else(|| BiomeTableError::UnknownBiome(name.to_string()))
        };
        let fallback = color_of(fallback_name)?;

        // Reject grids whose product overflows or exceeds the cell cap
        let cell_count = e_levels
            .checked_mul(m_levels)
            .filter(|&n| n <= MAX_TABLE_CELLS)
            .ok_or(BiomeTableError::TooManyLevels(e_levels, m_levels))?;

        let mut cells = vec![None; cell_count as usize];
        // Fill the dense grid, rejecting out-of-range and repeated keys
        let mut seen = HashSet::new();
        for a in &config.assignments {
            if a.elevation == 0 || a.moisture == 0 || a.elevation > e_levels || a.moisture > m_levels
            {
                return Err(BiomeTableError::AssignmentOutOfRange(
                    a.elevation,
                    a.moisture,
                    e_levels,
                    m_levels,
                ));
            }
            if !seen.insert((a.elevation, a.moisture)) {
                return Err(BiomeTableError::DuplicateAssignment(a.elevation, a.moisture));
            }
            let idx = ((a.elevation - 1) * m_levels + (a.moisture - 1)) as usize;
            cells[idx] = Some(color_of(&a.biome)?);
        }

        Ok(Self {
            elevation_levels: e_levels,
            moisture_levels: m_levels,
            cells,
            fallback,
        })
    }

    /// Number of elevation levels.
    pub fn elevation_levels(&self) -> u32 {
        self.elevation_levels
    }

    /// Number of moisture levels.
    pub fn moisture_levels(&self) -> u32 {
        self.moisture_levels
    }

    /// Colour used for unassigned or out-of-range lookups.
    pub fn fallback(&self) -> Rgba {
        self.fallback
    }

    /// Looks up the biome colour for a level pair.
    ///
    /// Levels below 1 or above the table size return the fallback colour.
    pub fn get_biome_color(&self, elevation: i32, moisture: i32) -> Rgba {
        if elevation < 1
            || moisture < 1
            || elevation as u32 > self.elevation_levels
            || moisture as u32 > self.moisture_levels
        {
            return self.fallback;
        }
        let idx = ((elevation as u32 - 1) * self.moisture_levels + (moisture as u32 - 1)) as usize;
        self.cells[idx].unwrap_or(self.fallback)
    }
}

/// Quantises a centroid height into an elevation level.
///
/// `ceil(levels · (height − min) / range)`; anything at or below the base
/// surface yields a level below 1. A non-positive range maps to level 0.
pub fn elevation_level(height: f32, min_height: f32, height_range: f32, levels: u32) -> i32 {
    if height_range <= 0.0 {
        return 0;
    }
    let level = (levels as f32 * (height - min_height) / height_range).ceil();
    if level.is_finite() {
        level as i32
    } else {
        0
    }
}

/// Absolute latitude in radians of a point at height `y` on a body of `diameter`.
///
/// A zero diameter is treated as a polar point.
pub fn latitude(y: f32, diameter: f32) -> f32 {
    let ratio = if diameter > 0.0 { 2.0 * y / diameter } else { 1.0 };
    ratio.clamp(-1.0, 1.0).asin().abs()
}

/// Samples per-face moisture in `[0, levels]`.
#[derive(Debug, Clone, Copy)]
pub struct MoistureSampler {
    channel: NoiseChannel,
    bias: Option<LatitudeBias>,
    levels: u32,
    diameter: f32,
}

impl MoistureSampler {
    /// Creates a sampler whose amplitude equals the number of moisture levels.
    pub fn new(seed: u64, config: &MoistureConfig, diameter: f32, levels: u32) -> Self {
        Self {
            channel: NoiseChannel::new(seed, config.period_ratio * diameter, levels as f32),
            bias: config.latitude_bias,
            levels,
            diameter,
        }
    }

    /// Moisture value at a face centroid.
    pub fn sample(&self, centroid: Vec3) -> f32 {
        let total = self.levels as f32;
        let mut moisture = self.channel.sample(centroid, NoiseMode::Normalized);

        if let Some(bias) = self.bias {
            let weight = (bias.strength * latitude(centroid.y, self.diameter) / FRAC_PI_2).clamp(0.0, 1.0);
            moisture += (bias.target * total - moisture) * weight;
        }

        moisture.clamp(0.0, total)
    }
}

/// Classifies face centroids into biome colours.
#[derive(Debug, Clone)]
pub struct BiomeClassifier<'a> {
    pub table: &'a BiomeTable,
    /// Radius of the undisplaced surface.
    pub min_height: f32,
    /// Distance between the base surface and the terrain ceiling.
    pub height_range: f32,
    /// Moisture source; `None` places every face in moisture level 1.
    pub moisture: Option<MoistureSampler>,
}

impl BiomeClassifier<'_> {
    /// Returns the biome colour for a face centroid.
    pub fn classify(&self, centroid: Vec3) -> Rgba {
        let elevation = elevation_level(
            centroid.length(),
            self.min_height,
            self.height_range,
            self.table.elevation_levels(),
        );
        let moisture = match &self.moisture {
            Some(sampler) => sampler.sample(centroid).ceil() as i32,
            None => 1,
        };
        self.table.get_biome_color(elevation, moisture)
    }
}

/// Colours every face of `mesh` with its biome.
pub fn assign_biomes(mesh: &mut Mesh, classifier: &BiomeClassifier) {
    let (vertices, faces) = mesh.vertices_and_faces_mut();
    faces.par_iter_mut().for_each(|face| {
        face.color = classifier.classify(face_centroid(vertices, face));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn small_config() -> BiomeTableConfig {
        let mut palette = BTreeMap::new();
        palette.insert("ocean".to_string(), [0, 0, 255, 255]);
        palette.insert("land".to_string(), [0, 255, 0, 255]);
        BiomeTableConfig {
            elevation_levels: 2,
            moisture_levels: 2,
            palette,
            assignments: vec![BiomeAssignment {
                elevation: 1,
                moisture: 1,
                biome: "land".to_string(),
            }],
            fallback: Some("ocean".to_string()),
        }
    }

    #[test]
    fn test_lookup_is_total() {
        let table = BiomeTable::compile(&small_config()).unwrap();
        assert_eq!(table.get_biome_color(1, 1), [0, 255, 0, 255]);
        for e in -3..6 {
            for m in -3..6 {
                if (e, m) != (1, 1) {
                    assert_eq!(table.get_biome_color(e, m), table.fallback(), "({}, {})", e, m);
                }
            }
        }
    }

    #[test]
    fn test_terrestrial_compiles() {
        let table = BiomeTable::compile(&BiomeTableConfig::terrestrial()).unwrap();
        assert_eq!(table.get_biome_color(4, 6), [248, 248, 248, 255]);
        assert_eq!(table.get_biome_color(0, 3), [63, 156, 255, 255]);
        assert_eq!(table.get_biome_color(5, 3), [63, 156, 255, 255]);
    }

    #[test]
    fn test_rejects_empty_without_fallback() {
        let mut cfg = small_config();
        cfg.assignments.clear();
        cfg.fallback = None;
        assert_eq!(BiomeTable::compile(&cfg), Err(BiomeTableError::EmptyWithoutFallback));
    }

    #[test]
    fn test_rejects_missing_fallback() {
        let mut cfg = small_config();
        cfg.fallback = None;
        assert_eq!(BiomeTable::compile(&cfg), Err(BiomeTableError::MissingFallback));
    }

    #[test]
    fn test_rejects_bad_assignments() {
        let mut cfg = small_config();
        cfg.assignments[0].elevation = 3;
        assert!(matches!(
            BiomeTable::compile(&cfg),
            Err(BiomeTableError::AssignmentOutOfRange(3, 1, 2, 2))
        ));

        let mut cfg = small_config();
        cfg.assignments[0].biome = "lava".to_string();
        assert_eq!(
            BiomeTable::compile(&cfg),
            Err(BiomeTableError::UnknownBiome("lava".to_string()))
        );

        let mut cfg = small_config();
        let dup = cfg.assignments[0].clone();
        cfg.assignments.push(dup);
        assert_eq!(BiomeTable::compile(&cfg), Err(BiomeTableError::DuplicateAssignment(1, 1)));

        let mut cfg = small_config();
        cfg.moisture_levels = 0;
        assert_eq!(BiomeTable::compile(&cfg), Err(BiomeTableError::ZeroLevels(2, 0)));
    }

    #[test]
    fn test_rejects_oversized_grid() {
        // Product overflows u32.
        let mut cfg = small_config();
        cfg.elevation_levels = 70_000;
        cfg.moisture_levels = 70_000;
        assert_eq!(
            BiomeTable::compile(&cfg),
            Err(BiomeTableError::TooManyLevels(70_000, 70_000))
        );

        // Fits in u32 but exceeds the cell cap.
        let mut cfg = small_config();
        cfg.elevation_levels = MAX_TABLE_CELLS;
        cfg.moisture_levels = 2;
        assert_eq!(
            BiomeTable::compile(&cfg),
            Err(BiomeTableError::TooManyLevels(MAX_TABLE_CELLS, 2))
        );

        let mut cfg = small_config();
        cfg.elevation_levels = 256;
        cfg.moisture_levels = 256;
        assert!(BiomeTable::compile(&cfg).is_ok());
    }

    #[test]
    fn test_elevation_level() {
        assert_eq!(elevation_level(10.0, 10.0, 2.0, 4), 0);
        assert_eq!(elevation_level(10.1, 10.0, 2.0, 4), 1);
        assert_eq!(elevation_level(12.0, 10.0, 2.0, 4), 4);
        assert_eq!(elevation_level(9.0, 10.0, 2.0, 4), -2);
        assert_eq!(elevation_level(11.0, 10.0, 0.0, 4), 0);
    }

    #[test]
    fn test_latitude() {
        assert!(latitude(0.0, 10.0).abs() < 1e-6);
        assert!((latitude(5.0, 10.0) - FRAC_PI_2).abs() < 1e-6);
        assert!((latitude(-5.0, 10.0) - FRAC_PI_2).abs() < 1e-6);
        // Displaced vertices above the radius clamp to the pole.
        assert!((latitude(6.0, 10.0) - FRAC_PI_2).abs() < 1e-6);
        let degenerate = latitude(0.0, 0.0);
        assert!(degenerate.is_finite());
        assert!((degenerate - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_moisture_within_levels() {
        let cfg = MoistureConfig {
            period_ratio: 0.2,
            latitude_bias: Some(LatitudeBias::default()),
        };
        let sampler = MoistureSampler::new(5, &cfg, 10.0, 6);
        let mesh = Mesh::build(5.0, 2);
        for face in mesh.faces() {
            let m = sampler.sample(mesh.face_centroid(face));
            assert!((0.0..=6.0).contains(&m), "Moisture {} out of range", m);
        }
    }

    #[test]
    fn test_latitude_bias_pulls_poles() {
        let cfg = MoistureConfig {
            period_ratio: 0.2,
            latitude_bias: Some(LatitudeBias {
                strength: 1.0,
                target: 1.0,
            }),
        };
        let sampler = MoistureSampler::new(5, &cfg, 10.0, 6);
        let pole = sampler.sample(Vec3::new(0.0, 5.0, 0.0));
        assert!((pole - 6.0).abs() < 1e-4, "Pole moisture {} should reach target", pole);
    }

    #[test]
    fn test_assign_biomes_without_moisture() {
        let table = BiomeTable::compile(&small_config()).unwrap();
        let mut mesh = Mesh::build(1.0, 1);
        let classifier = BiomeClassifier {
            table: &table,
            min_height: 1.0,
            height_range: 0.2,
            moisture: None,
        };
        assign_biomes(&mut mesh, &classifier);
        // Undisplaced centroids sit inside the sphere, below the base surface.
        assert!(mesh.faces().iter().all(|f| f.color == table.fallback()));
    }
}
