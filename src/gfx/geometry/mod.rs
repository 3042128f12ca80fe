//! # Procedural Geometry Generation
//!
//! Tessellators for the primitive shapes the composer builds with. All shapes
//! are generated Y-up, centered on the origin, with per-vertex normals and
//! texture coordinates.
//!
//! ## Supported Primitives
//!
//! - **Sphere**: UV sphere with optional partial sweeps (domes, segments)
//! - **Capsule**: cylinder capped by two hemispheres
//! - **Cylinder**: truncated cone with caps
//!
//! ## Usage
//!
//! ```rust
//! use diorama::gfx::geometry::{generate_capsule, generate_sphere, SphereSweep};
//!
//! let dome = generate_sphere(4.0, 32, 16, SphereSweep::upper_hemisphere());
//! let capsule = generate_capsule(1.0, 4.0, 4, 8);
//! assert!(dome.triangle_count() > 0 && capsule.triangle_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds geometry from flat position/normal/index arrays as produced by
    /// OBJ loaders. Normals are computed when missing or mismatched.
    pub fn from_flat(positions: &[f32], normals: &[f32], indices: Vec<u32>) -> Self {
        let normals = if !normals.is_empty() && normals.len() == positions.len() {
            normals.to_vec()
        } else {
            calculate_vertex_normals(positions, &indices)
        };

        Self {
            vertices: positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect(),
            tex_coords: vec![[0.0, 0.0]; positions.len() / 3],
            normals: normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect(),
            indices,
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions and normals into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}

/// Averages face normals into smooth per-vertex normals.
///
/// Triangles referencing out-of-range vertices are skipped.
pub fn calculate_vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut normals = vec![0.0; vertex_count * 3];

    let vertex = |i: usize| [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
            continue;
        }

        let (v0, v1, v2) = (vertex(i0), vertex(i1), vertex(i2));
        let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
        let face_normal = [
            edge1[1] * edge2[2] - edge1[2] * edge2[1],
            edge1[2] * edge2[0] - edge1[0] * edge2[2],
            edge1[0] * edge2[1] - edge1[1] * edge2[0],
        ];

        for &vertex_idx in &[i0, i1, i2] {
            normals[vertex_idx * 3] += face_normal[0];
            normals[vertex_idx * 3 + 1] += face_normal[1];
            normals[vertex_idx * 3 + 2] += face_normal[2];
        }
    }

    for normal in normals.chunks_exact_mut(3) {
        let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
        if length > 0.0 {
            normal.iter_mut().for_each(|c| *c /= length);
        }
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_normals_of_flat_triangle() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = calculate_vertex_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals.len(), 9);
        for n in normals.chunks_exact(3) {
            assert!((n[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_from_flat_computes_missing_normals() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let data = GeometryData::from_flat(&positions, &[], vec![0, 1, 2]);
        assert_eq!(data.vertex_count(), 3);
        assert_eq!(data.normals.len(), 3);
        assert_eq!(data.triangle_count(), 1);
        assert_eq!(data.to_vertices().len(), 3);
    }
}
