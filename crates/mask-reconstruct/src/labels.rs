//! Label extraction: one pass over the volume.

use std::collections::BTreeSet;

use mask_types::Volume;
use tracing::info;

use crate::error::{ReconstructError, ReconstructResult};

/// Collect the distinct positive labels present in a volume, ascending.
///
/// Each voxel scalar is truncated toward zero; values of 0 or below are
/// background and ignored.
///
/// # Errors
///
/// - [`ReconstructError::InvalidInput`] if the volume holds no voxels
/// - [`ReconstructError::NoLabelsFound`] if no voxel truncates to a positive
///   value
#[allow(clippy::cast_possible_truncation)]
// Truncation is the defined voxel-to-label conversion
pub fn extract_labels(volume: &Volume) -> ReconstructResult<Vec<i32>> {
    if volume.is_empty() {
        return Err(ReconstructError::invalid_input(
            "volume has no scalar values",
        ));
    }

    let mut labels = BTreeSet::new();
    for value in volume.values() {
        let label = value as i32;
        if label > 0 {
            labels.insert(label);
        }
    }

    if labels.is_empty() {
        return Err(ReconstructError::NoLabelsFound);
    }

    info!(count = labels.len(), "distinct labels found in mask");
    Ok(labels.into_iter().collect())
}
