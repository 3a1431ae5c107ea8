//! Error types for the grid crate.

use crate::volume::VolumeStatus;
use thiserror::Error;

/// Errors that can occur when building or sampling a grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// Spacing, extent or layer count is unusable.
    #[error("Invalid grid geometry: {0}")]
    InvalidGeometry(String),

    /// Depth breakpoints are empty, too long or not strictly increasing.
    #[error("Invalid depth table: {0}")]
    InvalidDepthTable(String),

    /// A resident buffer does not hold exactly `nx * ny * nz` values.
    #[error("Grid buffer holds {actual} values, expected {expected}")]
    BufferSize {
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },

    /// A sample coordinate rounds to a cell outside the grid.
    #[error("Sample ({x:.3}, {y:.3}, {z:.3}) is outside grid {dims:?}")]
    OutOfBounds {
        /// Requested x in grid-index space.
        x: f64,
        /// Requested y in grid-index space.
        y: f64,
        /// Requested z in grid-index space.
        z: f64,
        /// Grid dimensions `[nx, ny, nz]`.
        dims: [usize; 3],
    },

    /// The volume has no data in memory.
    #[error("Grid data is not resident (status: {status:?})")]
    DataUnavailable {
        /// Current status of the volume.
        status: VolumeStatus,
    },

    /// An integer cell index is outside the grid.
    #[error("Cell index ({i}, {j}, {k}) is outside grid {dims:?}")]
    IndexOutOfRange {
        /// Column index.
        i: i64,
        /// Row index.
        j: i64,
        /// Layer index.
        k: i64,
        /// Grid dimensions `[nx, ny, nz]`.
        dims: [usize; 3],
    },
}
