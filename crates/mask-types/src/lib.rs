//! Core types for maskmesh.
//!
//! This crate provides the foundational types shared by every stage of the
//! mask reconstruction pipeline:
//!
//! - [`Volume`] - A read-only 3D scalar grid with spacing and origin metadata
//! - [`Vertex`] - A point in 3D space with an optional unit normal
//! - [`SurfaceMesh`] - An indexed triangle mesh with a per-face label channel
//! - [`MeshObject`] - One reconstructed, label-tagged surface
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Coordinate System
//!
//! Right-handed, `f64` world coordinates. Face winding is counter-clockwise
//! (CCW) when viewed from outside; normals point outward by the right-hand
//! rule.
//!
//! # Example
//!
//! ```
//! use mask_types::{SurfaceMesh, Vertex};
//!
//! let mut mesh = SurfaceMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod mesh;
mod object;
mod vertex;
mod volume;

pub use bounds::Aabb;
pub use mesh::SurfaceMesh;
pub use object::MeshObject;
pub use vertex::Vertex;
pub use volume::{Volume, VolumeError};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
