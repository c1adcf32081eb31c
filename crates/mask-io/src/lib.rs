//! File I/O for maskmesh.
//!
//! Three boundaries with the filesystem:
//!
//! - [`load_mask_volume`] - decode a NIfTI-1 labeled mask into a
//!   [`mask_types::Volume`]
//! - [`save_stl`] / [`load_stl`] - binary STL, geometry only (the plain
//!   export representation; labels are dropped)
//! - [`save_ply`] / [`load_ply`] - binary little-endian PLY with a per-face
//!   `label` property (the attributed export representation)
//!
//! # Example
//!
//! ```no_run
//! use mask_io::{load_mask_volume, save_stl};
//! use mask_types::SurfaceMesh;
//!
//! let volume = load_mask_volume("mask.nii.gz").unwrap();
//! println!("{:?} voxels", volume.dims());
//!
//! let mesh = SurfaceMesh::new();
//! save_stl(&mesh, "out.stl").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod nifti;
mod ply;
mod stl;

pub use error::{IoError, IoResult};
pub use nifti::load_mask_volume;
pub use ply::{load_ply, save_ply};
pub use stl::{load_stl, save_stl};
