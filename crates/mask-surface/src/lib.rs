//! Surface extraction from labeled volumes.
//!
//! Two operations, forming the first stages of the per-label geometry
//! pipeline:
//!
//! - [`threshold_label`] - binarize a labeled volume against one target label
//! - [`extract_isosurface`] - marching cubes over a scalar field
//!
//! # Example
//!
//! ```
//! use mask_types::{Point3, Vector3, Volume};
//! use mask_surface::{extract_isosurface, threshold_label};
//!
//! let mut mask = Volume::zeros((8, 8, 8), Vector3::new(1.0, 1.0, 1.0), Point3::origin());
//! for x in 2..6 {
//!     for y in 2..6 {
//!         for z in 2..6 {
//!             mask.set(x, y, z, 3.0);
//!         }
//!     }
//! }
//!
//! let binary = threshold_label(&mask, 3);
//! let surface = extract_isosurface(&binary, 0.5);
//! assert!(!surface.is_empty());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod extract;
mod tables;
mod threshold;

pub use extract::extract_isosurface;
pub use threshold::threshold_label;
