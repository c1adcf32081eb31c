//! NIfTI-1 mask volume loading.
//!
//! Wraps the `nifti` crate to expose a labeled mask file as a [`Volume`].
//! Only the fields the reconstruction pipeline consumes are read: the voxel
//! grid, per-axis spacing from `pixdim`, and the q-offset translation as the
//! world origin.

use std::path::Path;

use mask_types::{Point3, Vector3, Volume};
// Leading :: disambiguates the nifti crate from this module's own path
use ::nifti::{NiftiObject, NiftiVolume, RandomAccessNiftiVolume, ReaderOptions};

use crate::error::{IoError, IoResult};

/// Load a labeled mask volume from a NIfTI-1 file (`.nii` or `.nii.gz`).
///
/// The image must be three-dimensional; trailing singleton dimensions (a
/// common export artifact) are accepted and collapsed.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be decoded, or has
/// more than three non-singleton dimensions.
pub fn load_mask_volume<P: AsRef<Path>>(path: P) -> IoResult<Volume> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let object = ReaderOptions::new().read_file(path)?;
    let header = object.header().clone();
    let volume = object.into_volume();

    let dim = volume.dim().to_vec();
    if dim.len() < 3 {
        return Err(IoError::invalid_volume(format!(
            "expected a 3D image, got {} dimension(s)",
            dim.len()
        )));
    }
    if dim.iter().skip(3).any(|&d| d > 1) {
        return Err(IoError::invalid_volume(format!(
            "expected a 3D image, got shape {dim:?}"
        )));
    }

    let (nx, ny, nz) = (
        usize::from(dim[0]),
        usize::from(dim[1]),
        usize::from(dim[2]),
    );

    // Read voxels in the volume's x-fastest order
    let mut coords = vec![0_u16; dim.len()];
    let mut data = Vec::with_capacity(nx * ny * nz);
    #[allow(clippy::cast_possible_truncation)]
    // Grid coordinates fit in u16 because the NIfTI header stores them as u16
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                coords[0] = x as u16;
                coords[1] = y as u16;
                coords[2] = z as u16;
                data.push(volume.get_f32(&coords)?);
            }
        }
    }

    // pixdim[0] holds the qfac flag; axis spacings start at index 1.
    // Some tools write zero spacing; fall back to unit voxels.
    let axis_spacing = |i: usize| {
        let s = f64::from(header.pixdim[i]).abs();
        if s > 0.0 {
            s
        } else {
            1.0
        }
    };
    let spacing = Vector3::new(axis_spacing(1), axis_spacing(2), axis_spacing(3));
    let origin = Point3::new(
        f64::from(header.quatern_x),
        f64::from(header.quatern_y),
        f64::from(header.quatern_z),
    );

    Volume::from_data((nx, ny, nz), spacing, origin, data)
        .map_err(|e| IoError::invalid_volume(e.to_string()))
}
