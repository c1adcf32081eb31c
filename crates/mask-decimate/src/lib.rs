//! Triangle reduction by quadric error metric (QEM) edge collapse.
//!
//! Iteratively collapses the cheapest edges of a surface until a target
//! fraction of the original triangle count remains. Collapses that would
//! create non-manifold geometry (link condition) or remove an open boundary
//! are rejected, so the surface keeps its genus.
//!
//! # Example
//!
//! ```
//! use mask_decimate::{decimate_surface, DecimateParams};
//! use mask_types::SurfaceMesh;
//!
//! let result = decimate_surface(&SurfaceMesh::new(), &DecimateParams::default());
//! assert_eq!(result.final_faces, 0);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod collapse;
mod params;
mod quadric;
mod result;

pub use collapse::decimate_surface;
pub use params::DecimateParams;
pub use result::DecimateResult;
