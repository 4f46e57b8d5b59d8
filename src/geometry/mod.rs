//! Geodesic sphere geometry.
//!
//! Builds a regular icosahedron and refines it into a closed, shared-vertex
//! triangle mesh whose vertices lie on a sphere.

mod icosahedron;
mod mesh;

pub use icosahedron::{
    base_vertices, BASE_EDGES, BASE_EDGE_COUNT, BASE_FACES, BASE_FACE_COUNT, BASE_VERTEX_COUNT,
};
pub use mesh::{
    expected_counts, face_centroid, face_positions, Face, Mesh, MeshError, UNASSIGNED_COLOR,
};
