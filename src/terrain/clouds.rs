//! Cloud face selection.

use rayon::prelude::*;

use crate::biomes::Rgba;
use crate::geometry::{face_centroid, Face, Mesh};
use crate::noise::{NoiseChannel, NoiseMode};
use super::config::CloudConfig;

/// Faces drawn on a shell above the terrain.
///
/// Each face shares its vertex indices with a base face of the owning mesh;
/// positions are taken from the mesh and pushed out to `radius` when drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudLayer {
    pub faces: Vec<Face>,
    /// Shell radius in world units.
    pub radius: f32,
}

impl CloudLayer {
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn color(&self) -> Option<Rgba> {
        self.faces.first().map(|f| f.color)
    }
}

/// Selects every face whose cloud noise at the centroid exceeds the cutoff.
///
/// `channel` should have amplitude 1 so the cutoff is a fraction.
pub fn generate_clouds(mesh: &Mesh, channel: &NoiseChannel, config: &CloudConfig) -> CloudLayer {
    let vertices = mesh.vertices();
    let faces = mesh
        .faces()
        .par_iter()
        .filter(|face| channel.sample(face_centroid(vertices, face), NoiseMode::Normalized) > config.cutoff)
        .map(|face| Face::with_color(face.vertices, config.color))
        .collect();

    CloudLayer {
        faces,
        radius: mesh.radius() * config.altitude_ratio,
    }
}
