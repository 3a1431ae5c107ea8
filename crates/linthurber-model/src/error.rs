//! Error types for the velocity model.

use linthurber_grid::GridError;
use linthurber_proj::ProjectionError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or querying the model.
///
/// `Config`, `Load` and `Io` are fatal and only come out of initialisation.
/// `OutOfBounds`, `DataUnavailable` and `Projection` describe a single query
/// point; [`crate::VelocityModel::query`] absorbs them into the sentinel value.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Malformed or inconsistent configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing, truncated or malformed grid data.
    #[error("Load error: {0}")]
    Load(String),

    /// I/O error on a model file.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A query point falls outside a grid.
    #[error("Point outside model grid: {0}")]
    OutOfBounds(GridError),

    /// A grid is not resident in memory.
    #[error("Grid data unavailable: {0}")]
    DataUnavailable(GridError),

    /// The projector rejected a query point.
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// Input and output slices of a batch query differ in length.
    #[error("Query has {points} points but {outputs} output slots")]
    LengthMismatch {
        /// Number of query points.
        points: usize,
        /// Number of output slots.
        outputs: usize,
    },
}

impl ModelError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ModelError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<GridError> for ModelError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::InvalidGeometry(_) | GridError::InvalidDepthTable(_) => {
                ModelError::Config(err.to_string())
            }
            GridError::BufferSize { .. } | GridError::IndexOutOfRange { .. } => {
                ModelError::Load(err.to_string())
            }
            GridError::OutOfBounds { .. } => ModelError::OutOfBounds(err),
            GridError::DataUnavailable { .. } => ModelError::DataUnavailable(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linthurber_grid::VolumeStatus;

    #[test]
    fn test_grid_error_mapping() {
        let err: ModelError = GridError::InvalidDepthTable("x".to_string()).into();
        assert!(matches!(err, ModelError::Config(_)));

        let err: ModelError = GridError::BufferSize { expected: 4, actual: 3 }.into();
        assert!(matches!(err, ModelError::Load(_)));

        let err: ModelError = GridError::OutOfBounds {
            x: 5.0,
            y: 0.0,
            z: 0.0,
            dims: [2, 2, 1],
        }
        .into();
        assert!(matches!(err, ModelError::OutOfBounds(_)));

        let err: ModelError = GridError::DataUnavailable {
            status: VolumeStatus::Absent,
        }
        .into();
        assert!(matches!(err, ModelError::DataUnavailable(_)));
    }

    #[test]
    fn test_messages() {
        let err = ModelError::LengthMismatch { points: 3, outputs: 2 };
        assert_eq!(err.to_string(), "Query has 3 points but 2 output slots");

        let err: ModelError = ProjectionError::OutsideRegion { lon: 1.0, lat: 2.0 }.into();
        assert_eq!(err.to_string(), "Projection error: Point (1, 2) is outside the model region");
    }
}
