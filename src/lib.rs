//! Procedural planet generator.
//!
//! Builds geodesic icosphere bodies displaced by seeded gradient noise,
//! colours their faces from an elevation by moisture biome table, adds an
//! optional cloud shell, tilts them onto a rotation axis, and rasterizes
//! them back to front into RGBA frames with flat lighting and fog.
//!
//! ```no_run
//! use planetgen::{Body, BodyConfig, Canvas, Light, Scene, ScreenPosition, SpinMode};
//!
//! let body = Body::generate(BodyConfig::terrestrial_oceans(375.0), 42)?;
//! let mut scene = Scene::new(Canvas::new(600, 600)?, [0, 0, 0, 255], Light::default());
//! scene.add_body(body, ScreenPosition::Centre);
//! let frames = scene.animate(planetgen::DEFAULT_FRAME_COUNT, 1.0, SpinMode::Axial);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod biomes;
pub mod body;
pub mod geometry;
pub mod noise;
pub mod orientation;
pub mod pipeline;
pub mod render;
pub mod terrain;

pub use biomes::{BiomeTable, BiomeTableConfig, MoistureConfig, Rgba};
pub use body::{AtmosphereConfig, AxisConfig, Body, BodyConfig, BodyError};
pub use geometry::{Face, Mesh, MeshError};
pub use noise::{NoiseChannel, NoiseChannels, NoiseMode};
pub use orientation::{AxisDefinition, SpinMode};
pub use pipeline::{GenerationStage, Pipeline, PipelineError};
pub use render::{render_frame, Canvas, DrawSource, Light, RenderError, Scene, ScreenPosition, DEFAULT_FRAME_COUNT};
pub use terrain::{CloudConfig, CloudLayer, TerrainConfig};
