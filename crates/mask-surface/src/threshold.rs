//! Binary thresholding of a labeled volume.

use mask_types::Volume;

/// Produce a binary volume selecting one label.
///
/// Every voxel whose value truncates to `label` becomes 1.0; all others
/// become 0.0. Dimensions, spacing, and origin are preserved, so the
/// isosurface extracted from the result lands in the source volume's world
/// coordinates.
///
/// Truncation is toward zero, matching the integer interpretation used by
/// label extraction.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
// Truncation is the defined voxel-to-label conversion
pub fn threshold_label(volume: &Volume, label: i32) -> Volume {
    volume.map_values(|v| if v as i32 == label { 1.0 } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mask_types::{Point3, Vector3};

    #[test]
    fn selects_only_the_target_label() {
        let mut volume = Volume::zeros((2, 2, 1), Vector3::new(1.0, 1.0, 1.0), Point3::origin());
        volume.set(0, 0, 0, 3.0);
        volume.set(1, 0, 0, 5.0);
        volume.set(0, 1, 0, 3.9); // truncates to 3

        let binary = threshold_label(&volume, 3);
        assert!((binary.get(0, 0, 0) - 1.0).abs() < f32::EPSILON);
        assert!((binary.get(1, 0, 0)).abs() < f32::EPSILON);
        assert!((binary.get(0, 1, 0) - 1.0).abs() < f32::EPSILON);
        assert!((binary.get(1, 1, 0)).abs() < f32::EPSILON);
    }

    #[test]
    fn preserves_geometry_metadata() {
        let volume = Volume::zeros(
            (3, 2, 1),
            Vector3::new(0.5, 0.5, 2.0),
            Point3::new(-1.0, 0.0, 4.0),
        );
        let binary = threshold_label(&volume, 1);
        assert_eq!(binary.dims(), volume.dims());
        assert_eq!(binary.spacing(), volume.spacing());
        assert_eq!(binary.origin(), volume.origin());
    }
}
