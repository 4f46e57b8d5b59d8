//! Software rendering of bodies into RGBA frames.

mod lighting;
mod raster;
mod scene;

pub use lighting::{face_normal, shade, Fog, Light, AMBIENT_WEIGHT, DIFFUSE_COEFFICIENT, DIFFUSE_WEIGHT};
pub use raster::{build_draw_list, fill_triangle, render_frame, Canvas, DrawFace, DrawSource};
pub use scene::{Scene, ScreenPosition, DEFAULT_FRAME_COUNT};

use thiserror::Error;

/// Errors raised while setting up rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Light vector has zero length")]
    ZeroLight,
    #[error("Light vector {0:?} is not finite")]
    NonFiniteLight([f32; 3]),
    #[error("Canvas must be at least 1x1 (got {0}x{1})")]
    EmptyCanvas(u32, u32),
}
