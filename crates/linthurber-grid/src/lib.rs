//! # linthurber-grid
//!
//! Regular 3-D scalar grids for the Lin-Thurber velocity model.
//!
//! The model is made of three grids that cover the same projected extent:
//! a single-layer surface elevation grid (DEM) and two velocity grids (Vp and
//! Vs) stacked over a non-uniform set of depth layers. This crate provides:
//!
//! - [`GridGeometry`]: grid dimensions derived from extent and spacing
//! - [`DepthTable`]: mapping from depth to a (fractional) layer index
//! - [`GridVolume`]: a resident buffer with clamped trilinear sampling
//! - [`trilinear`]: the eight-corner blend used by [`GridVolume::sample`]
//!
//! Coordinates passed to the sampling functions are in grid-index space,
//! i.e. projected metres divided by the grid's spacing.
//!
//! ## Example
//!
//! ```
//! use linthurber_grid::{DepthTable, GridDims, GridVolume};
//!
//! let volume = GridVolume::resident(
//!     GridDims::new(2, 2, 1),
//!     vec![1000.0, 2000.0, 3000.0, 4000.0],
//! )?;
//! assert_eq!(volume.sample(0.5, 0.5, 0.0)?, 2500.0);
//!
//! let table = DepthTable::new(vec![1.0, 3.0, 6.0])?;
//! assert_eq!(table.fractional_layer(2.0), 0.5);
//! # Ok::<(), linthurber_grid::GridError>(())
//! ```

mod depth;
mod error;
mod geometry;
mod trilinear;
mod volume;

pub use depth::DepthTable;
pub use error::GridError;
pub use geometry::{GridDims, GridGeometry, GridKind, MAX_Z_DIM};
pub use trilinear::{trilinear, Corners};
pub use volume::{GridVolume, VolumeStatus};

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
