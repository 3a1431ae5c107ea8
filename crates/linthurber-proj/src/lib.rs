//! # linthurber-proj
//!
//! Geographic to model-plane projection for the Lin-Thurber velocity model.
//!
//! The query engine only needs one capability from a projection: turn a
//! longitude/latitude pair into planar `(x, y)` metres measured from the
//! model's origin corner. That capability is the [`Projector`] trait; hosts
//! with their own geodesy can implement it directly.
//!
//! [`BilinearProjector`] is the projection the model ships with. It maps the
//! model's bounding quadrilateral (four lon/lat corners) onto a rectangle of
//! known size by bilinear interpolation.
//!
//! ```
//! use linthurber_proj::{BilinearProjector, Projector};
//!
//! let projector = BilinearProjector::new(
//!     [-118.0, -117.0, -117.0, -118.0],
//!     [34.0, 34.0, 35.0, 35.0],
//!     [1000.0, 1000.0],
//! )?;
//! let (x, y) = projector.geo_to_xy(-117.5, 34.5)?;
//! assert!((x - 500.0).abs() < 1e-6 && (y - 500.0).abs() < 1e-6);
//! # Ok::<(), linthurber_proj::ProjectionError>(())
//! ```

mod bilinear;
mod error;

pub use bilinear::BilinearProjector;
pub use error::ProjectionError;

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;

/// Converts geographic coordinates into planar model coordinates.
pub trait Projector: Send + Sync {
    /// Project `(lon, lat)` in decimal degrees to `(x, y)` in metres.
    fn geo_to_xy(&self, lon: f64, lat: f64) -> Result<(f64, f64)>;
}

impl<P: Projector + ?Sized> Projector for Box<P> {
    fn geo_to_xy(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        (**self).geo_to_xy(lon, lat)
    }
}
