//! Error types for projection operations.

use thiserror::Error;

/// Errors that can occur when mapping a geographic point into the model plane.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// The point lies outside the model's bounding quadrilateral.
    #[error("Point ({lon}, {lat}) is outside the model region")]
    OutsideRegion {
        /// Requested longitude.
        lon: f64,
        /// Requested latitude.
        lat: f64,
    },

    /// The inverse mapping did not converge for this point.
    #[error("Projection did not converge for point ({lon}, {lat})")]
    NoConvergence {
        /// Requested longitude.
        lon: f64,
        /// Requested latitude.
        lat: f64,
    },

    /// The bounding quadrilateral or plane dimensions are unusable.
    #[error("Invalid projection definition: {0}")]
    InvalidCorners(String),
}
