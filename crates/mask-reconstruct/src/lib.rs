//! Label-parallel surface reconstruction from segmentation masks.
//!
//! Takes a labeled volume (each voxel an integer label, 0 = background) and
//! builds one triangulated, label-tagged surface per distinct positive
//! label, processing labels concurrently on a fixed pool of worker threads.
//!
//! # Pipeline
//!
//! For each label: binary threshold → marching-cubes isosurface → optional
//! smoothing → optional decimation → attribute tagging. A shared atomic
//! cursor hands labels to workers, so a worker finishing a cheap label
//! immediately claims the next one. Results accumulate in a mutex-guarded
//! [`MeshCollection`]; the calling thread blocks on the pool's join barrier,
//! after which the collection is read-only.
//!
//! # Example
//!
//! ```
//! use mask_reconstruct::{reconstruct_mask, ReconstructParams};
//! use mask_types::{Point3, Vector3, Volume};
//!
//! let mut mask = Volume::zeros((12, 12, 12), Vector3::new(1.0, 1.0, 1.0), Point3::origin());
//! for x in 3..9 {
//!     for y in 3..9 {
//!         for z in 3..9 {
//!             mask.set(x, y, z, 2.0);
//!         }
//!     }
//! }
//!
//! let built = reconstruct_mask(&mask, &ReconstructParams::default()).unwrap();
//! assert_eq!(built.meshes.labels(), vec![2]);
//! println!("{}", built.report);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cancel;
mod error;
mod export;
mod labels;
mod params;
mod pipeline;
mod report;
mod scheduler;
mod store;

pub use cancel::CancelToken;
pub use error::{ExportError, ReconstructError, ReconstructResult};
pub use export::{export_attributed, export_plain};
pub use labels::extract_labels;
pub use params::ReconstructParams;
pub use report::{LabelEvent, LabelTiming, ReconstructReport};
pub use store::MeshCollection;

use mask_types::Volume;

/// Everything a build produces: the surfaces and the aggregate diagnostics.
#[derive(Debug)]
pub struct Reconstruction {
    /// One tagged surface per label that produced geometry.
    pub meshes: MeshCollection,

    /// Aggregate timing and outcome records, assembled after the join
    /// barrier.
    pub report: ReconstructReport,
}

/// Reconstruct one surface per distinct positive label in `volume`.
///
/// Input validation and label extraction run before any concurrent work; a
/// label whose isosurface is empty is recorded in the report and skipped,
/// never aborting sibling labels.
///
/// # Errors
///
/// - [`ReconstructError::InvalidInput`] if the volume holds no voxels
/// - [`ReconstructError::NoLabelsFound`] if no voxel has a positive label
pub fn reconstruct_mask(
    volume: &Volume,
    params: &ReconstructParams,
) -> ReconstructResult<Reconstruction> {
    reconstruct_mask_with_cancel(volume, params, &CancelToken::new())
}

/// [`reconstruct_mask`] with a caller-held cancellation token.
///
/// Workers stop claiming labels once the token is cancelled; the pool then
/// drains and the build returns [`ReconstructError::Cancelled`], discarding
/// partial results.
///
/// # Errors
///
/// As [`reconstruct_mask`], plus [`ReconstructError::Cancelled`].
pub fn reconstruct_mask_with_cancel(
    volume: &Volume,
    params: &ReconstructParams,
    cancel: &CancelToken,
) -> ReconstructResult<Reconstruction> {
    let labels = extract_labels(volume)?;
    let (meshes, report) = scheduler::run_pool(volume, &labels, params, cancel);

    if cancel.is_cancelled() {
        return Err(ReconstructError::Cancelled);
    }

    Ok(Reconstruction { meshes, report })
}
