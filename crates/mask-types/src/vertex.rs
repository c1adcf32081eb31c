//! Vertex type.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mesh vertex: a position and an optional unit normal.
///
/// Normals are produced by isosurface extraction (scalar-field gradient) and
/// recomputed from adjacent faces after geometry-altering stages. A vertex
/// fresh from construction has no normal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// Position in world coordinates.
    pub position: Point3<f64>,

    /// Unit normal, if one has been computed.
    pub normal: Option<Vector3<f64>>,
}

impl Vertex {
    /// Create a vertex at the given position with no normal.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: None,
        }
    }

    /// Create a vertex from raw coordinates.
    ///
    /// # Example
    ///
    /// ```
    /// use mask_types::Vertex;
    ///
    /// let v = Vertex::from_coords(1.0, 2.0, 3.0);
    /// assert_eq!(v.position.y, 2.0);
    /// assert!(v.normal.is_none());
    /// ```
    #[inline]
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Attach a normal to this vertex.
    #[inline]
    #[must_use]
    pub const fn with_normal(mut self, normal: Vector3<f64>) -> Self {
        self.normal = Some(normal);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_has_no_normal_by_default() {
        let v = Vertex::from_coords(0.0, 1.0, 2.0);
        assert!(v.normal.is_none());
    }

    #[test]
    fn with_normal_attaches() {
        let v = Vertex::from_coords(0.0, 0.0, 0.0).with_normal(Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(v.normal, Some(Vector3::new(0.0, 0.0, 1.0)));
    }
}
