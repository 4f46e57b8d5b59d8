//! Base icosahedron: golden-ratio vertices plus hand-enumerated edge and face tables.

use glam::Vec3;

/// Number of vertices of the base icosahedron.
pub const BASE_VERTEX_COUNT: usize = 12;
/// Number of edges of the base icosahedron.
pub const BASE_EDGE_COUNT: usize = 30;
/// Number of faces of the base icosahedron.
pub const BASE_FACE_COUNT: usize = 20;

/// Undirected vertex pairs of the icosahedron.
///
/// Opposite edges come first (`0..6`), followed by the edges joining the
/// three orthogonal golden rectangles.
pub const BASE_EDGES: [[u32; 2]; BASE_EDGE_COUNT] = [
    [0, 2],
    [1, 3],
    [4, 6],
    [5, 7],
    [8, 10],
    [9, 11],
    [0, 4],
    [0, 6],
    [1, 4],
    [1, 6],
    [2, 5],
    [2, 7],
    [3, 5],
    [3, 7],
    [0, 8],
    [0, 9],
    [1, 10],
    [1, 11],
    [2, 8],
    [2, 9],
    [3, 10],
    [3, 11],
    [6, 9],
    [6, 11],
    [7, 9],
    [7, 11],
    [4, 8],
    [4, 10],
    [5, 8],
    [5, 10],
];

/// Vertex triples of the icosahedron, wound counter-clockwise seen from outside.
pub const BASE_FACES: [[u32; 3]; BASE_FACE_COUNT] = [
    [0, 8, 2],
    [0, 2, 9],
    [0, 6, 4],
    [0, 4, 8],
    [0, 9, 6],
    [1, 3, 10],
    [1, 11, 3],
    [1, 4, 6],
    [1, 10, 4],
    [1, 6, 11],
    [2, 5, 7],
    [2, 8, 5],
    [2, 7, 9],
    [3, 7, 5],
    [3, 5, 10],
    [3, 11, 7],
    [4, 10, 8],
    [5, 8, 10],
    [6, 9, 11],
    [7, 11, 9],
];

/// Returns the 12 icosahedron vertices lying on a sphere of the given radius.
///
/// Vertices are the cyclic permutations of `(0, ±a, ±φ)` where
/// `a = 2r / sqrt(11 + 2√5)` and `φ = a(1 + √5)/2`, then projected onto the
/// sphere so every vertex sits exactly at `radius`.
pub fn base_vertices(radius: f32) -> Vec<Vec3> {
    let sqrt5 = 5.0f32.sqrt();
    let a = 2.0 * radius / (11.0 + 2.0 * sqrt5).sqrt();
    let phi = a * (1.0 + sqrt5) / 2.0;

    [
        Vec3::new(0.0, -a, -phi),
        Vec3::new(0.0, -a, phi),
        Vec3::new(0.0, a, -phi),
        Vec3::new(0.0, a, phi),
        Vec3::new(-a, -phi, 0.0),
        Vec3::new(-a, phi, 0.0),
        Vec3::new(a, -phi, 0.0),
        Vec3::new(a, phi, 0.0),
        Vec3::new(-phi, 0.0, -a),
        Vec3::new(phi, 0.0, -a),
        Vec3::new(-phi, 0.0, a),
        Vec3::new(phi, 0.0, a),
    ]
    .into_iter()
    .map(|v| v.normalize_or_zero() * radius)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn edge_key(a: u32, b: u32) -> (u32, u32) {
        if a < b { (a, b) } else { (b, a) }
    }

    #[test]
    fn test_base_vertices_on_sphere() {
        let verts = base_vertices(5.0);
        assert_eq!(verts.len(), BASE_VERTEX_COUNT);
        for v in &verts {
            assert!(
                (v.length() - 5.0).abs() < 1e-5,
                "Vertex {:?} has length {} (expected 5.0)",
                v,
                v.length()
            );
        }
    }

    #[test]
    fn test_edges_are_unique_and_equal_length() {
        let verts = base_vertices(1.0);
        let mut seen = HashSet::new();
        let expected = (verts[0] - verts[2]).length();

        for [a, b] in BASE_EDGES {
            assert_ne!(a, b);
            assert!(seen.insert(edge_key(a, b)), "Duplicate edge ({}, {})", a, b);
            let len = (verts[a as usize] - verts[b as usize]).length();
            assert!((len - expected).abs() < 1e-5, "Edge ({}, {}) has length {}", a, b, len);
        }
    }

    #[test]
    fn test_faces_use_table_edges() {
        let edges: HashSet<_> = BASE_EDGES.iter().map(|&[a, b]| edge_key(a, b)).collect();
        let mut face_sets = HashSet::new();

        for face in BASE_FACES {
            let [a, b, c] = face;
            assert!(a != b && b != c && a != c, "Face {:?} repeats a vertex", face);
            for (p, q) in [(a, b), (b, c), (c, a)] {
                assert!(edges.contains(&edge_key(p, q)), "Face {:?} uses unknown edge", face);
            }
            let mut sorted = face;
            sorted.sort_unstable();
            assert!(face_sets.insert(sorted), "Duplicate face {:?}", face);
        }
    }

    #[test]
    fn test_faces_wound_outward() {
        let verts = base_vertices(1.0);
        for face in BASE_FACES {
            let [a, b, c] = face.map(|i| verts[i as usize]);
            let normal = (b - a).cross(c - a);
            assert!(normal.dot(a + b + c) > 0.0, "Face {:?} is wound inward", face);
        }
    }
}
