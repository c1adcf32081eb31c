//! Indexed triangle surface with an optional per-face label channel.

use crate::{Aabb, Vertex};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Vertices and faces are stored separately, with faces referencing vertices
/// by index. Faces use counter-clockwise winding when viewed from outside, so
/// normals point outward by the right-hand rule.
///
/// The `face_labels` channel is either empty (untagged geometry) or exactly
/// `faces.len()` entries long, giving the segmentation label that produced
/// each triangle. It is the only way exported geometry can later be recolored
/// or filtered by label.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array, CCW winding.
    pub faces: Vec<[u32; 3]>,

    /// Per-face label channel; empty, or one entry per face.
    pub face_labels: Vec<i32>,
}

impl SurfaceMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            face_labels: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
            face_labels: Vec::new(),
        }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangle faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True if the mesh has no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// True if every face carries a label.
    #[inline]
    #[must_use]
    pub fn is_tagged(&self) -> bool {
        !self.faces.is_empty() && self.face_labels.len() == self.faces.len()
    }

    /// Stamp every face with `label`, replacing any existing tags.
    pub fn tag_faces(&mut self, label: i32) {
        self.face_labels.clear();
        self.face_labels.resize(self.faces.len(), label);
    }

    /// Bounding box of all vertex positions.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }

    /// Signed volume of the mesh via the divergence theorem.
    ///
    /// Positive for a closed mesh with outward CCW winding; not meaningful
    /// for open meshes.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;
        for &[i0, i1, i2] in &self.faces {
            let v0 = self.vertices[i0 as usize].position.coords;
            let v1 = self.vertices[i1 as usize].position.coords;
            let v2 = self.vertices[i2 as usize].position.coords;
            volume += v0.dot(&v1.cross(&v2));
        }
        volume / 6.0
    }

    /// Recompute vertex normals as the normalized, area-weighted average of
    /// adjacent face normals.
    ///
    /// Geometry-altering stages (smoothing, decimation) leave normals stale;
    /// call this before tagging and export.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![Vector3::zeros(); self.vertices.len()];

        for &[i0, i1, i2] in &self.faces {
            let p0 = self.vertices[i0 as usize].position;
            let p1 = self.vertices[i1 as usize].position;
            let p2 = self.vertices[i2 as usize].position;
            // Cross product magnitude is twice the triangle area, which gives
            // the area weighting for free.
            let face_normal = (p1 - p0).cross(&(p2 - p0));
            accum[i0 as usize] += face_normal;
            accum[i1 as usize] += face_normal;
            accum[i2 as usize] += face_normal;
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(accum) {
            let len = sum.norm();
            vertex.normal = if len > f64::EPSILON {
                Some(sum / len)
            } else {
                None
            };
        }
    }

    /// Append another mesh, offsetting its face indices.
    ///
    /// Label channels are concatenated when both meshes are tagged (or this
    /// mesh is still empty); merging a tagged mesh into an untagged one drops
    /// the tags.
    #[allow(clippy::cast_possible_truncation)]
    // Mesh indices are u32; meshes with more than 4B vertices are unsupported
    pub fn merge(&mut self, other: &Self) {
        let tags_survive = self.faces.is_empty() || (self.is_tagged() && other.is_tagged());

        let vertex_offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices.iter().cloned());
        for face in &other.faces {
            self.faces.push([
                face[0] + vertex_offset,
                face[1] + vertex_offset,
                face[2] + vertex_offset,
            ]);
        }

        if tags_survive {
            self.face_labels.extend_from_slice(&other.face_labels);
        } else {
            self.face_labels.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vertex;

    fn triangle_at(x: f64) -> SurfaceMesh {
        let mut mesh = SurfaceMesh::new();
        mesh.vertices.push(Vertex::from_coords(x, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(x + 1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(x, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        mesh
    }

    #[test]
    fn new_mesh_is_empty_and_untagged() {
        let mesh = SurfaceMesh::new();
        assert!(mesh.is_empty());
        assert!(!mesh.is_tagged());
    }

    #[test]
    fn tag_faces_stamps_every_face() {
        let mut mesh = triangle_at(0.0);
        mesh.tag_faces(7);
        assert!(mesh.is_tagged());
        assert_eq!(mesh.face_labels, vec![7]);
    }

    #[test]
    fn merge_offsets_indices_and_concatenates_labels() {
        let mut a = triangle_at(0.0);
        a.tag_faces(1);
        let mut b = triangle_at(5.0);
        b.tag_faces(3);

        a.merge(&b);
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.faces[1], [3, 4, 5]);
        assert_eq!(a.face_labels, vec![1, 3]);
    }

    #[test]
    fn merge_into_untagged_drops_labels() {
        let mut a = triangle_at(0.0);
        let mut b = triangle_at(5.0);
        b.tag_faces(3);

        a.merge(&b);
        assert_eq!(a.face_count(), 2);
        assert!(a.face_labels.is_empty());
    }

    #[test]
    fn recompute_normals_flat_triangle() {
        let mut mesh = triangle_at(0.0);
        mesh.recompute_normals();

        let n = mesh.vertices[0].normal.unwrap();
        assert!((n.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn signed_volume_of_tetrahedron() {
        let mut mesh = SurfaceMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 1.0));
        // Outward CCW winding
        mesh.faces.push([0, 2, 1]);
        mesh.faces.push([0, 1, 3]);
        mesh.faces.push([0, 3, 2]);
        mesh.faces.push([1, 2, 3]);

        assert!((mesh.signed_volume() - 1.0 / 6.0).abs() < 1e-12);
    }
}
