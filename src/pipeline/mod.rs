//! Pipeline module for orchestrating body generation stages.
//!
//! Provides a trait-based architecture for modular generation stages
//! that are selected from a body configuration and run in order.

mod stage;

pub use stage::{
    BiomeStage, CloudStage, GenerationContext, GenerationStage, Pipeline, PipelineError, StageId,
    TerrainStage,
};
