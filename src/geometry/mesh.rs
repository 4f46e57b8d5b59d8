//! Shared-vertex geodesic triangle mesh.

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::biomes::Rgba;
use super::icosahedron::{base_vertices, BASE_FACES};

/// Errors raised when assembling a mesh from explicit geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("Face {face} references vertex {index} but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Colour carried by faces before biome assignment runs.
pub const UNASSIGNED_COLOR: Rgba = [0, 0, 0, 255];

/// A triangle referencing three mesh vertices by index, plus its biome colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    /// Indices into the owning mesh's vertex list.
    pub vertices: [u32; 3],
    /// RGBA colour assigned by biome classification.
    pub color: Rgba,
}

impl Face {
    /// Creates a face with the unassigned colour.
    pub fn new(vertices: [u32; 3]) -> Self {
        Self {
            vertices,
            color: UNASSIGNED_COLOR,
        }
    }

    /// Creates a face with an explicit colour.
    pub fn with_color(vertices: [u32; 3], color: Rgba) -> Self {
        Self { vertices, color }
    }
}

/// Closed-form element counts of a geodesic mesh at the given subdivision level.
///
/// Returns `(vertices, edges, faces)` = `(10·4ⁿ + 2, 30·4ⁿ, 20·4ⁿ)`.
pub fn expected_counts(level: u32) -> (usize, usize, usize) {
    let scale = 4usize.pow(level);
    (10 * scale + 2, 30 * scale, 20 * scale)
}

/// A triangulated sphere built from a recursively subdivided icosahedron.
///
/// Vertices are owned by the mesh and only ever referenced by index.
#[derive(Debug, Clone)]
pub struct Mesh {
    radius: f32,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Builds a geodesic sphere of the given radius with `level` subdivision passes.
    ///
    /// Level 0 is the raw icosahedron (12 vertices, 20 faces).
    ///
    /// # Arguments
    /// * `radius` - Sphere radius every vertex is projected to
    /// * `level` - Number of 1-to-4 subdivision passes
    pub fn build(radius: f32, level: u32) -> Self {
        let mut mesh = Self {
            radius,
            vertices: base_vertices(radius),
            faces: BASE_FACES.iter().map(|&f| Face::new(f)).collect(),
        };

        for pass in 0..level {
            mesh.subdivide();
            debug!(
                level = pass + 1,
                vertices = mesh.vertices.len(),
                faces = mesh.faces.len(),
                "subdivision pass complete"
            );
        }

        mesh
    }

    /// Assembles a mesh from explicit geometry.
    ///
    /// The vertices are taken as-is; no sphere projection is applied.
    ///
    /// # Arguments
    /// * `radius` - Undisplaced sphere radius used for terrain and cloud offsets
    /// * `vertices` - Vertex positions
    /// * `faces` - Triangles indexing into `vertices`
    ///
    /// # Returns
    /// The mesh, or an error naming the first face that references a
    /// missing vertex.
    pub fn from_parts(radius: f32, vertices: Vec<Vec3>, faces: Vec<Face>) -> Result<Self, MeshError> {
        // Every index must resolve so later face lookups cannot go out of bounds.
        for (face_idx, face) in faces.iter().enumerate() {
            if let Some(&index) = face.vertices.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(MeshError::FaceIndexOutOfRange {
                    face: face_idx,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        Ok(Self {
            radius,
            vertices,
            faces,
        })
    }

    /// Undisplaced sphere radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// All vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Mutable vertex positions, for displacement and rotation.
    pub fn vertices_mut(&mut self) -> &mut [Vec3] {
        &mut self.vertices
    }

    /// All faces.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Mutable faces. Vertex membership must not be changed.
    pub fn faces_mut(&mut self) -> &mut [Face] {
        &mut self.faces
    }

    /// Split borrow used when faces are coloured from vertex positions.
    pub fn vertices_and_faces_mut(&mut self) -> (&[Vec3], &mut [Face]) {
        (&self.vertices, &mut self.faces)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns the three vertex positions of a face.
    pub fn face_vertices(&self, face: &Face) -> [Vec3; 3] {
        face_positions(&self.vertices, face)
    }

    /// Returns the centroid of a face.
    pub fn face_centroid(&self, face: &Face) -> Vec3 {
        face_centroid(&self.vertices, face)
    }

    /// Returns the unique undirected edges, each as `[low, high]`, sorted.
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let mut set = HashSet::with_capacity(self.faces.len() * 3 / 2);
        for face in &self.faces {
            let [a, b, c] = face.vertices;
            for (p, q) in [(a, b), (b, c), (c, a)] {
                set.insert(edge_key(p, q));
            }
        }
        let mut edges: Vec<[u32; 2]> = set.into_iter().map(|(a, b)| [a, b]).collect();
        edges.sort_unstable();
        edges
    }

    /// Performs one 1-to-4 subdivision pass and re-projects onto the sphere.
    ///
    /// Each edge midpoint is created exactly once and shared by both faces
    /// adjoining that edge.
    pub fn subdivide(&mut self) {
        // One entry per undirected edge; the second face on an edge reuses it
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::with_capacity(self.faces.len() * 3 / 2);
        let mut faces = Vec::with_capacity(self.faces.len() * 4);

        for face in &self.faces {
            let [v0, v1, v2] = face.vertices;

            // Shared edge midpoints, appended to the vertex list on first use
            let m01 = midpoint(&mut self.vertices, &mut midpoints, v0, v1);
            let m12 = midpoint(&mut self.vertices, &mut midpoints, v1, v2);
            let m20 = midpoint(&mut self.vertices, &mut midpoints, v2, v0);

            // Three corner faces keep the parent's winding, then the centre face
            faces.push(Face::with_color([v0, m01, m20], face.color));
            faces.push(Face::with_color([v1, m12, m01], face.color));
            faces.push(Face::with_color([v2, m20, m12], face.color));
            faces.push(Face::with_color([m01, m12, m20], face.color));
        }

        self.faces = faces;

        // Midpoints sit inside the sphere until re-projected
        self.project_to_sphere();
    }

    /// Moves every vertex to lie exactly at `radius` from the origin.
    pub fn project_to_sphere(&mut self) {
        let radius = self.radius;
        for v in &mut self.vertices {
            *v = v.normalize_or_zero() * radius;
        }
    }
}

/// Returns the three positions of `face` from a vertex slice.
pub fn face_positions(vertices: &[Vec3], face: &Face) -> [Vec3; 3] {
    face.vertices.map(|i| vertices[i as usize])
}

/// Returns the centroid of `face` from a vertex slice.
pub fn face_centroid(vertices: &[Vec3], face: &Face) -> Vec3 {
    let [a, b, c] = face_positions(vertices, face);
    (a + b + c) / 3.0
}

#[inline]
fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

fn midpoint(
    vertices: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = edge_key(a, b);
    if let Some(&idx) = cache.get(&key) {
        return idx;
    }

    let mid = (vertices[a as usize] + vertices[b as usize]) * 0.5;
    let idx = vertices.len() as u32;
    vertices.push(mid);
    cache.insert(key, idx);
    idx
}
