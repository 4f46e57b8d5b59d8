//! Generated bodies: mesh, biome colours, clouds and orientation.
//!
//! A [`Body`] is built in one step from a [`BodyConfig`] and a master seed.
//! The config is validated up front, a geodesic mesh is built, the enabled
//! generation stages run, and the mesh is tilted onto its rotation axis.

mod config;

pub use config::{AtmosphereConfig, AxisConfig, BodyConfig, MAX_SUBDIVISION};

use std::time::Instant;

use thiserror::Error;
use tracing::info;

use crate::biomes::{BiomeTable, BiomeTableError};
use crate::geometry::Mesh;
use crate::noise::NoiseChannels;
use crate::orientation::{align_to_axis, AxisDefinition, AxisError, SpinMode};
use crate::pipeline::{BiomeStage, CloudStage, GenerationContext, Pipeline, PipelineError, TerrainStage};
use crate::terrain::CloudLayer;

/// Errors raised while generating a body.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BodyError {
    #[error("Diameter must be positive and finite (got {0})")]
    InvalidDiameter(f32),
    #[error("Subdivision level {0} exceeds the maximum of {1}")]
    SubdivisionTooHigh(u32, u32),
    #[error("Terrain weight '{0}' must be non-negative (got {1})")]
    InvalidWeight(&'static str, f32),
    #[error("Maximum height ratio must be above 1 (got {0})")]
    InvalidHeightRatio(f32),
    #[error("Island count range {0}..={1} is empty")]
    InvalidIslandCount(u32, u32),
    #[error("Island size range {0}..={1} is invalid")]
    InvalidIslandSize(f32, f32),
    #[error("Noise period ratio for '{0}' must be positive (got {1})")]
    InvalidPeriod(&'static str, f32),
    #[error("Cloud altitude {0} must be above the terrain ceiling {1}")]
    CloudsBelowTerrain(f32, f32),
    #[error("Atmosphere strength must be non-negative (got {0})")]
    InvalidAtmosphere(f32),
    #[error("Invalid axis: {0}")]
    Axis(#[from] AxisError),
    #[error("Invalid biome table: {0}")]
    BiomeTable(#[from] BiomeTableError),
    #[error("Generation failed: {0}")]
    Pipeline(#[from] PipelineError),
}

/// A fully generated body ready for rendering.
#[derive(Debug, Clone)]
pub struct Body {
    config: BodyConfig,
    seed: u64,
    mesh: Mesh,
    clouds: Option<CloudLayer>,
    axis: AxisDefinition,
}

impl Body {
    /// Generates a body.
    ///
    /// The same config and seed always produce the same body, independent of
    /// any other body generated before or concurrently.
    ///
    /// # Arguments
    /// * `config` - Body configuration, validated before any geometry is built
    /// * `seed` - Master seed for every noise channel and placement decision
    ///
    /// # Returns
    /// The generated body, or the first configuration or stage error
    pub fn generate(config: BodyConfig, seed: u64) -> Result<Self, BodyError> {
        let start = Instant::now();

        // Reject bad configs up front so no partial body is ever built
        config.validate()?;
        let table = BiomeTable::compile(&config.biomes)?;

        // All randomness for this body flows from its own seed
        let channels = NoiseChannels::derive(seed);
        let mesh = Mesh::build(config.radius(), config.subdivision);
        let mut ctx = GenerationContext::new(mesh, channels);

        // Disabled features are stages that are never added
        let mut pipeline = Pipeline::new();
        pipeline
            .add_stage(TerrainStage::new(config.terrain))
            .add_stage(BiomeStage::new(table, config.moisture, config.terrain.max_height_ratio));
        if let Some(clouds) = config.clouds {
            pipeline.add_stage(CloudStage::new(clouds));
        }
        pipeline.run(&mut ctx)?;

        // Random axes draw after island placement from the same feature stream
        let axis = match config.axis {
            AxisConfig::Fixed(axis) => axis,
            AxisConfig::Random => AxisDefinition::random(&mut ctx.features),
        };
        let GenerationContext { mut mesh, clouds, .. } = ctx;
        align_to_axis(&mut mesh, &axis);

        info!(
            seed,
            faces = mesh.face_count(),
            clouds = clouds.as_ref().map_or(0, CloudLayer::len),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "body generated"
        );

        Ok(Self {
            config,
            seed,
            mesh,
            clouds,
            axis,
        })
    }

    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Cloud layer, if the config enables one.
    pub fn clouds(&self) -> Option<&CloudLayer> {
        self.clouds.as_ref()
    }

    /// Rotation axis in effect, including a randomly drawn one.
    pub fn axis(&self) -> &AxisDefinition {
        &self.axis
    }

    pub fn radius(&self) -> f32 {
        self.mesh.radius()
    }

    pub fn atmosphere(&self) -> &AtmosphereConfig {
        &self.config.atmosphere
    }

    /// `(min, max)` vertex distances allowed by the terrain config.
    pub fn height_range(&self) -> (f32, f32) {
        let radius = self.radius();
        (radius, radius * self.config.terrain.max_height_ratio)
    }

    /// Rotates the body (and its clouds, which share its vertices) by `degrees`.
    pub fn spin(&mut self, degrees: f32, mode: SpinMode) {
        mode.apply(&mut self.mesh, &self.axis, degrees);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{expected_counts, UNASSIGNED_COLOR};

    fn small(mut config: BodyConfig) -> BodyConfig {
        config.subdivision = 2;
        config
    }

    #[test]
    fn test_generate_terrestrial() {
        let body = Body::generate(small(BodyConfig::terrestrial_oceans(100.0)), 42).unwrap();
        let (v, _, f) = expected_counts(2);
        assert_eq!(body.mesh().vertex_count(), v);
        assert_eq!(body.mesh().face_count(), f);
        assert!(body.clouds().is_some());
        assert!(body.mesh().faces().iter().all(|f| f.color != UNASSIGNED_COLOR));

        let (min, max) = body.height_range();
        for v in body.mesh().vertices() {
            let d = v.length();
            assert!(d >= min - 1e-3 && d <= max + 1e-3, "Vertex distance {} outside [{}, {}]", d, min, max);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = Body::generate(small(BodyConfig::default()), 7).unwrap();
        let b = Body::generate(small(BodyConfig::default()), 7).unwrap();
        assert_eq!(a.mesh().vertices(), b.mesh().vertices());
        assert_eq!(a.mesh().faces(), b.mesh().faces());
        assert_eq!(a.clouds(), b.clouds());

        let c = Body::generate(small(BodyConfig::default()), 8).unwrap();
        assert_ne!(a.mesh().vertices(), c.mesh().vertices());
    }

    #[test]
    fn test_disabled_features_do_not_error() {
        let mut cfg = small(BodyConfig::default());
        cfg.moisture = None;
        cfg.clouds = None;
        cfg.terrain.islands = None;
        let body = Body::generate(cfg, 1).unwrap();
        assert!(body.clouds().is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut cfg = BodyConfig::default();
        cfg.diameter = -5.0;
        assert_eq!(Body::generate(cfg, 1).unwrap_err(), BodyError::InvalidDiameter(-5.0));

        let mut cfg = BodyConfig::default();
        cfg.biomes.fallback = Some("lava".to_string());
        assert!(matches!(
            Body::generate(cfg, 1),
            Err(BodyError::BiomeTable(BiomeTableError::UnknownBiome(_)))
        ));
    }

    #[test]
    fn test_random_axis_is_reproducible() {
        let mut cfg = small(BodyConfig::classic_moon(50.0));
        cfg.axis = AxisConfig::Random;
        let a = Body::generate(cfg.clone(), 3).unwrap();
        let b = Body::generate(cfg, 3).unwrap();
        assert_eq!(a.axis(), b.axis());
        assert!(a.axis().validate().is_ok());
    }

    #[test]
    fn test_spin_keeps_heights() {
        let mut body = Body::generate(small(BodyConfig::default()), 11).unwrap();
        let before: Vec<f32> = body.mesh().vertices().iter().map(|v| v.length()).collect();
        body.spin(30.0, SpinMode::Axial);
        body.spin(30.0, SpinMode::Planar);
        for (v, len) in body.mesh().vertices().iter().zip(before) {
            assert!((v.length() - len).abs() < 1e-2);
        }
    }
}
