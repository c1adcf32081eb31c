//! One reconstructed, label-tagged surface.

use crate::SurfaceMesh;
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A tagged surface produced for a single segmentation label.
///
/// Exactly one worker creates the object for a given label; it is immutable
/// once appended to the result collection. Every face of `surface` carries
/// the object's label in the mesh's face-label channel.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshObject {
    /// The segmentation label this surface was reconstructed from.
    pub label: i32,

    /// The tagged triangulated surface.
    pub surface: SurfaceMesh,

    /// Origin of the source volume, carried for downstream registration.
    pub origin: Point3<f64>,
}

impl MeshObject {
    /// Bundle a tagged surface with its label and the source volume origin.
    #[must_use]
    pub const fn new(label: i32, surface: SurfaceMesh, origin: Point3<f64>) -> Self {
        Self {
            label,
            surface,
            origin,
        }
    }
}
