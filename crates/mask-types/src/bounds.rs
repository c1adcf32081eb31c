//! Axis-aligned bounding box.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create an empty bounding box (min > max on every axis).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Compute the bounding box of a set of points.
    ///
    /// Returns [`Aabb::empty`] for an empty iterator.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut bounds = Self::empty();
        for p in points {
            bounds.expand(p);
        }
        bounds
    }

    /// Grow the box to contain `point`.
    pub fn expand(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// True if the box contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Length of the longest side, or 0.0 for an empty box.
    #[must_use]
    pub fn longest_side(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let extent = self.max - self.min;
        extent.x.max(extent.y).max(extent.z)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_is_empty() {
        assert!(Aabb::empty().is_empty());
        assert!((Aabb::empty().longest_side()).abs() < f64::EPSILON);
    }

    #[test]
    fn from_points_bounds() {
        let points = [
            Point3::new(-1.0, 0.0, 2.0),
            Point3::new(3.0, -2.0, 0.0),
            Point3::new(0.0, 5.0, 1.0),
        ];
        let bounds = Aabb::from_points(points.iter());

        assert!(!bounds.is_empty());
        assert!((bounds.min.x - -1.0).abs() < f64::EPSILON);
        assert!((bounds.max.y - 5.0).abs() < f64::EPSILON);
        assert!((bounds.longest_side() - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn center_of_unit_box() {
        let bounds = Aabb::from_points([Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)].iter());
        let c = bounds.center();
        assert!((c.x - 0.5).abs() < f64::EPSILON);
    }
}
