//! Read-only 3D scalar grid with spacing and origin metadata.

use nalgebra::{Point3, Vector3};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error raised when constructing a [`Volume`] from mismatched parts.
#[derive(Debug, Error)]
pub enum VolumeError {
    /// Scalar data length does not match the grid dimensions.
    #[error("scalar data has {got} values but dimensions {dims:?} require {expected}")]
    DimensionMismatch {
        /// Grid dimensions that were requested.
        dims: (usize, usize, usize),
        /// Number of values the dimensions require.
        expected: usize,
        /// Number of values actually supplied.
        got: usize,
    },
}

/// A 3D scalar grid.
///
/// Voxels are stored in x-fastest (Fortran-style) order: the linear index of
/// voxel `(x, y, z)` is `x + y * nx + z * nx * ny`. Spacing may differ per
/// axis. Once built, a volume is shared by reference across worker threads
/// and never mutated.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Volume {
    data: Vec<f32>,
    dims: (usize, usize, usize),
    spacing: Vector3<f64>,
    origin: Point3<f64>,
}

impl Volume {
    /// Build a volume from raw voxel data.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::DimensionMismatch`] if `data.len()` does not
    /// equal `nx * ny * nz`.
    ///
    /// # Example
    ///
    /// ```
    /// use mask_types::{Point3, Vector3, Volume};
    ///
    /// let volume = Volume::from_data(
    ///     (2, 2, 2),
    ///     Vector3::new(1.0, 1.0, 1.0),
    ///     Point3::origin(),
    ///     vec![0.0; 8],
    /// )
    /// .unwrap();
    /// assert_eq!(volume.voxel_count(), 8);
    /// ```
    pub fn from_data(
        dims: (usize, usize, usize),
        spacing: Vector3<f64>,
        origin: Point3<f64>,
        data: Vec<f32>,
    ) -> Result<Self, VolumeError> {
        let expected = dims.0 * dims.1 * dims.2;
        if data.len() != expected {
            return Err(VolumeError::DimensionMismatch {
                dims,
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            dims,
            spacing,
            origin,
        })
    }

    /// Build a zero-filled volume, mainly for tests and synthetic masks.
    #[must_use]
    pub fn zeros(dims: (usize, usize, usize), spacing: Vector3<f64>, origin: Point3<f64>) -> Self {
        Self {
            data: vec![0.0; dims.0 * dims.1 * dims.2],
            dims,
            spacing,
            origin,
        }
    }

    /// Grid dimensions `(nx, ny, nz)`.
    #[inline]
    #[must_use]
    pub fn dims(&self) -> (usize, usize, usize) {
        self.dims
    }

    /// Per-axis voxel spacing.
    #[inline]
    #[must_use]
    pub fn spacing(&self) -> Vector3<f64> {
        self.spacing
    }

    /// World position of grid point `(0, 0, 0)`.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Total number of voxels.
    #[inline]
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.data.len()
    }

    /// True if the volume holds no voxels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Scalar value at grid coordinates, or 0.0 out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        if x < self.dims.0 && y < self.dims.1 && z < self.dims.2 {
            self.data[self.index(x, y, z)]
        } else {
            0.0
        }
    }

    /// Set the scalar value at grid coordinates; out-of-bounds writes are
    /// ignored.
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f32) {
        if x < self.dims.0 && y < self.dims.1 && z < self.dims.2 {
            let idx = self.index(x, y, z);
            self.data[idx] = value;
        }
    }

    /// World position of a grid point.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, x: usize, y: usize, z: usize) -> Point3<f64> {
        Point3::new(
            self.origin.x + x as f64 * self.spacing.x,
            self.origin.y + y as f64 * self.spacing.y,
            self.origin.z + z as f64 * self.spacing.z,
        )
    }

    /// Iterate over all voxel values in linear (x-fastest) order.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().copied()
    }

    /// Build a derived volume with the same geometry and transformed values.
    #[must_use]
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            dims: self.dims,
            spacing: self.spacing,
            origin: self.origin,
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.dims.0 + z * self.dims.0 * self.dims.1
    }
}
