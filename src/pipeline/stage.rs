//! Generation stage trait and pipeline orchestration.

use std::time::Instant;

use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::debug;

use crate::biomes::{assign_biomes, BiomeClassifier, BiomeTable, MoistureConfig, MoistureSampler};
use crate::geometry::Mesh;
use crate::noise::{NoiseChannel, NoiseChannels};
use crate::terrain::{
    apply_terrain, generate_clouds, place_islands, CloudConfig, CloudLayer, TerrainConfig, TerrainParams,
};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Radial vertex displacement.
    Terrain,
    /// Per-face biome colouring.
    Biomes,
    /// Cloud face selection.
    Clouds,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Terrain => "terrain",
            StageId::Biomes => "biomes",
            StageId::Clouds => "clouds",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// Mutable state shared by the stages of one body's generation.
#[derive(Debug)]
pub struct GenerationContext {
    pub diameter: f32,
    pub channels: NoiseChannels,
    /// Generator for placement decisions, seeded from the feature channel.
    pub features: ChaCha8Rng,
    pub mesh: Mesh,
    pub clouds: Option<CloudLayer>,
}

impl GenerationContext {
    /// Wraps a freshly built mesh.
    pub fn new(mesh: Mesh, channels: NoiseChannels) -> Self {
        Self {
            diameter: mesh.radius() * 2.0,
            features: channels.feature_rng(),
            channels,
            mesh,
            clouds: None,
        }
    }
}

/// A single step of body generation.
///
/// Stages are strategy objects chosen from configuration; a disabled
/// feature is a stage that is simply never added.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, modifying the context in place.
    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), PipelineError>;
}

/// Runs generation stages in insertion order.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns the stage IDs in execution order.
    pub fn stage_ids(&self) -> Vec<StageId> {
        self.stages.iter().map(|s| s.id()).collect()
    }

    /// Executes all stages in order.
    ///
    /// Fails before running a stage whose dependencies have not completed.
    pub fn run(&self, ctx: &mut GenerationContext) -> Result<(), PipelineError> {
        let mut completed: Vec<StageId> = Vec::new();

        for stage in &self.stages {
            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            let start = Instant::now();
            debug!(stage = stage.id().name(), "stage started");
            stage.execute(ctx)?;
            debug!(
                stage = stage.id().name(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "stage finished"
            );
            completed.push(stage.id());
        }

        Ok(())
    }
}

/// Places islands and displaces vertices.
pub struct TerrainStage {
    pub config: TerrainConfig,
}

impl TerrainStage {
    pub fn new(config: TerrainConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for TerrainStage {
    fn id(&self) -> StageId {
        StageId::Terrain
    }

    fn name(&self) -> &str {
        "Terrain Displacement"
    }

    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), PipelineError> {
        let islands = match &self.config.islands {
            Some(cfg) => place_islands(&ctx.mesh, cfg, ctx.diameter, &mut ctx.features),
            None => Vec::new(),
        };
        debug!(islands = islands.len(), "islands placed");

        let params = TerrainParams::new(&self.config, &ctx.channels, ctx.diameter, islands);
        apply_terrain(&mut ctx.mesh, &params);
        Ok(())
    }
}

/// Colours faces from elevation and optional moisture.
pub struct BiomeStage {
    pub table: BiomeTable,
    /// `None` places every face in moisture level 1.
    pub moisture: Option<MoistureConfig>,
    /// Terrain ceiling as a multiple of the radius.
    pub max_height_ratio: f32,
}

impl BiomeStage {
    pub fn new(table: BiomeTable, moisture: Option<MoistureConfig>, max_height_ratio: f32) -> Self {
        Self {
            table,
            moisture,
            max_height_ratio,
        }
    }
}

impl GenerationStage for BiomeStage {
    fn id(&self) -> StageId {
        StageId::Biomes
    }

    fn name(&self) -> &str {
        "Biome Classification"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Terrain]
    }

    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), PipelineError> {
        let radius = ctx.mesh.radius();
        let height_range = radius * (self.max_height_ratio - 1.0);
        if height_range.is_nan() || height_range <= 0.0 {
            return Err(PipelineError::StageFailed(
                self.name().to_string(),
                format!("terrain ceiling {} is not above the base radius", self.max_height_ratio),
            ));
        }

        let moisture = self.moisture.as_ref().map(|cfg| {
            MoistureSampler::new(
                ctx.channels.moisture,
                cfg,
                ctx.diameter,
                self.table.moisture_levels(),
            )
        });
        let classifier = BiomeClassifier {
            table: &self.table,
            min_height: radius,
            height_range,
            moisture,
        };
        assign_biomes(&mut ctx.mesh, &classifier);
        Ok(())
    }
}

/// Selects cloud faces above the displaced terrain.
pub struct CloudStage {
    pub config: CloudConfig,
}

impl CloudStage {
    pub fn new(config: CloudConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for CloudStage {
    fn id(&self) -> StageId {
        StageId::Clouds
    }

    fn name(&self) -> &str {
        "Cloud Generation"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Terrain]
    }

    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), PipelineError> {
        let channel = NoiseChannel::new(ctx.channels.cloud, self.config.period_ratio * ctx.diameter, 1.0);
        let layer = generate_clouds(&ctx.mesh, &channel, &self.config);
        debug!(faces = layer.len(), "cloud layer generated");
        ctx.clouds = Some(layer);
        Ok(())
    }
}
