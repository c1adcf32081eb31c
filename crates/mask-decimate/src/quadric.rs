//! Quadric error metric.

use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

/// Accumulated squared plane distances for a vertex.
///
/// The metric is the symmetric 4x4 matrix `sum(p * p^T)` over the plane
/// equations `p = (a, b, c, d)` of the vertex's adjacent faces; evaluating it
/// at a homogeneous point gives the sum of squared distances to those planes.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Quadric {
    matrix: Matrix4<f64>,
}

impl Quadric {
    /// Quadric of a single plane through `point` with unit normal `normal`.
    pub(crate) fn from_plane(normal: Vector3<f64>, point: Point3<f64>) -> Self {
        let d = -normal.dot(&point.coords);
        let p = Vector4::new(normal.x, normal.y, normal.z, d);
        Self {
            matrix: p * p.transpose(),
        }
    }

    /// Accumulate another quadric.
    pub(crate) fn add(&mut self, other: &Self) {
        self.matrix += other.matrix;
    }

    /// Sum of this and another quadric.
    pub(crate) fn sum(&self, other: &Self) -> Self {
        Self {
            matrix: self.matrix + other.matrix,
        }
    }

    /// Squared-distance error at a point.
    pub(crate) fn evaluate(&self, point: Point3<f64>) -> f64 {
        let v = Vector4::new(point.x, point.y, point.z, 1.0);
        v.dot(&(self.matrix * v))
    }

    /// Point minimizing the error, if the metric is non-degenerate.
    pub(crate) fn optimal_point(&self) -> Option<Point3<f64>> {
        let a: Matrix3<f64> = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let b = -self.matrix.fixed_view::<3, 1>(0, 3).into_owned();
        a.try_inverse().map(|inv| Point3::from(inv * b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_quadric_has_zero_error() {
        let q = Quadric::default();
        assert_relative_eq!(q.evaluate(Point3::new(1.0, 2.0, 3.0)), 0.0);
    }

    #[test]
    fn plane_quadric_measures_squared_distance() {
        // Plane z = 1
        let q = Quadric::from_plane(Vector3::z(), Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(q.evaluate(Point3::new(5.0, -2.0, 1.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(q.evaluate(Point3::new(0.0, 0.0, 3.0)), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn optimal_point_of_three_planes() {
        let mut q = Quadric::from_plane(Vector3::x(), Point3::new(1.0, 0.0, 0.0));
        q.add(&Quadric::from_plane(Vector3::y(), Point3::new(0.0, 2.0, 0.0)));
        q.add(&Quadric::from_plane(Vector3::z(), Point3::new(0.0, 0.0, 3.0)));

        let p = q.optimal_point().unwrap();
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-9);
        assert_relative_eq!(p.z, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn single_plane_is_degenerate() {
        let q = Quadric::from_plane(Vector3::z(), Point3::origin());
        assert!(q.optimal_point().is_none());
    }
}
