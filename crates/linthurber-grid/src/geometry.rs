//! Grid dimensions derived from the projected extent and per-grid spacing.

use crate::{GridError, Result};

/// Maximum number of vertical layers a model may declare.
pub const MAX_Z_DIM: usize = 100;

/// The three scalar grids that make up the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridKind {
    /// Surface elevation (single layer).
    Dem,
    /// P-wave velocity.
    Vp,
    /// S-wave velocity.
    Vs,
}

impl GridKind {
    /// Short lowercase name, used in log messages and file names.
    pub fn name(&self) -> &'static str {
        match self {
            GridKind::Dem => "dem",
            GridKind::Vp => "vp",
            GridKind::Vs => "vs",
        }
    }
}

/// Dimensions `(nx, ny, nz)` of one grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridDims {
    /// Create a new set of dimensions.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Total number of cells, or `None` if it does not fit in `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        self.nx.checked_mul(self.ny)?.checked_mul(self.nz)
    }

    /// Total number of cells.
    ///
    /// Dimensions built by [`GridGeometry`] are known not to overflow.
    pub fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// True if any axis is empty.
    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0 || self.nz == 0
    }

    /// Flat offset of cell `(i, j, k)`, x fastest, then y, then z.
    pub fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        k * self.nx * self.ny + j * self.nx + i
    }

    /// Check whether `(i, j, k)` lies inside the grid.
    pub fn contains(&self, i: i64, j: i64, k: i64) -> bool {
        i >= 0
            && j >= 0
            && k >= 0
            && (i as u64) < self.nx as u64
            && (j as u64) < self.ny as u64
            && (k as u64) < self.nz as u64
    }

    /// Dimensions as an array, for error reporting.
    pub fn as_array(&self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }
}

/// Geometry shared by the DEM, Vp and Vs grids.
///
/// All three grids cover the same projected extent, but each has its own
/// horizontal spacing. Vp and Vs share the vertical layer count; the DEM
/// always has a single layer.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    extent: [f64; 2],
    spacing_dem: f64,
    spacing_vp: f64,
    spacing_vs: f64,
    dem: GridDims,
    vp: GridDims,
    vs: GridDims,
}

impl GridGeometry {
    /// Derive grid dimensions from the projected extent (metres), the
    /// per-grid spacing (metres) and the vertical layer count.
    ///
    /// Each horizontal dimension is `floor(extent / spacing) + 1`.
    pub fn new(
        extent: [f64; 2],
        spacing_dem: f64,
        spacing_vp: f64,
        spacing_vs: f64,
        num_z: usize,
    ) -> Result<Self> {
        for (axis, value) in ["x", "y"].iter().zip(extent) {
            if !(value.is_finite() && value > 0.0) {
                return Err(GridError::InvalidGeometry(format!(
                    "extent along {} must be positive, got {}",
                    axis, value
                )));
            }
        }
        if num_z == 0 || num_z > MAX_Z_DIM {
            return Err(GridError::InvalidGeometry(format!(
                "num_z must be between 1 and {}, got {}",
                MAX_Z_DIM, num_z
            )));
        }

        let dem = Self::derive_dims(GridKind::Dem, extent, spacing_dem, 1)?;
        let vp = Self::derive_dims(GridKind::Vp, extent, spacing_vp, num_z)?;
        let vs = Self::derive_dims(GridKind::Vs, extent, spacing_vs, num_z)?;

        Ok(Self {
            extent,
            spacing_dem,
            spacing_vp,
            spacing_vs,
            dem,
            vp,
            vs,
        })
    }

    fn derive_dims(kind: GridKind, extent: [f64; 2], spacing: f64, nz: usize) -> Result<GridDims> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(GridError::InvalidGeometry(format!(
                "spacing_{} must be positive, got {}",
                kind.name(),
                spacing
            )));
        }

        let cells = |length: f64| -> Result<usize> {
            let n = (length / spacing).floor();
            if n >= (usize::MAX - 1) as f64 {
                return Err(GridError::InvalidGeometry(format!(
                    "{} grid is too large ({} / {})",
                    kind.name(),
                    length,
                    spacing
                )));
            }
            Ok(n as usize + 1)
        };

        let dims = GridDims::new(cells(extent[0])?, cells(extent[1])?, nz);
        if dims.checked_len().is_none() {
            return Err(GridError::InvalidGeometry(format!(
                "{} grid {:?} has too many cells",
                kind.name(),
                dims.as_array()
            )));
        }
        Ok(dims)
    }

    /// Dimensions of the given grid.
    pub fn dims(&self, kind: GridKind) -> GridDims {
        match kind {
            GridKind::Dem => self.dem,
            GridKind::Vp => self.vp,
            GridKind::Vs => self.vs,
        }
    }

    /// Horizontal spacing of the given grid, in metres.
    pub fn spacing(&self, kind: GridKind) -> f64 {
        match kind {
            GridKind::Dem => self.spacing_dem,
            GridKind::Vp => self.spacing_vp,
            GridKind::Vs => self.spacing_vs,
        }
    }

    /// Projected extent `[x, y]` in metres.
    pub fn extent(&self) -> [f64; 2] {
        self.extent
    }

    /// Number of vertical layers in the velocity grids.
    pub fn num_z(&self) -> usize {
        self.vp.nz
    }

    /// Convert a projected position (metres) into grid-index space for `kind`.
    pub fn to_index_space(&self, kind: GridKind, x: f64, y: f64) -> (f64, f64) {
        let spacing = self.spacing(kind);
        (x / spacing, y / spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims_per_grid_spacing() {
        let geometry = GridGeometry::new([10_000.0, 4_500.0], 500.0, 1_000.0, 2_000.0, 5)
            .expect("valid geometry");

        assert_eq!(geometry.dims(GridKind::Dem), GridDims::new(21, 10, 1));
        assert_eq!(geometry.dims(GridKind::Vp), GridDims::new(11, 5, 5));
        assert_eq!(geometry.dims(GridKind::Vs), GridDims::new(6, 3, 5));
        assert_eq!(geometry.num_z(), 5);
    }

    #[test]
    fn test_dims_floor_partial_cells() {
        let geometry = GridGeometry::new([1_999.0, 1_000.0], 1_000.0, 1_000.0, 1_000.0, 1)
            .expect("valid geometry");
        assert_eq!(geometry.dims(GridKind::Vp), GridDims::new(2, 2, 1));
    }

    #[test]
    fn test_rejects_bad_spacing() {
        assert!(matches!(
            GridGeometry::new([1_000.0, 1_000.0], 0.0, 1.0, 1.0, 1),
            Err(GridError::InvalidGeometry(_))
        ));
        assert!(matches!(
            GridGeometry::new([1_000.0, 1_000.0], 1.0, -5.0, 1.0, 1),
            Err(GridError::InvalidGeometry(_))
        ));
        assert!(matches!(
            GridGeometry::new([1_000.0, 1_000.0], 1.0, 1.0, f64::NAN, 1),
            Err(GridError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_rejects_bad_extent_and_layers() {
        assert!(GridGeometry::new([0.0, 1_000.0], 1.0, 1.0, 1.0, 1).is_err());
        assert!(GridGeometry::new([1_000.0, -1.0], 1.0, 1.0, 1.0, 1).is_err());
        assert!(GridGeometry::new([1_000.0, 1_000.0], 1.0, 1.0, 1.0, 0).is_err());
        assert!(GridGeometry::new([1_000.0, 1_000.0], 1.0, 1.0, 1.0, MAX_Z_DIM + 1).is_err());
        assert!(GridGeometry::new([1_000.0, 1_000.0], 1.0, 1.0, 1.0, MAX_Z_DIM).is_ok());
    }

    #[test]
    fn test_rejects_overflowing_grid() {
        let result = GridGeometry::new([1.0e300, 1.0e300], 1.0e-300, 1.0, 1.0, 1);
        assert!(matches!(result, Err(GridError::InvalidGeometry(_))));
    }

    #[test]
    fn test_offset_is_x_fastest() {
        let dims = GridDims::new(4, 3, 2);
        assert_eq!(dims.offset(0, 0, 0), 0);
        assert_eq!(dims.offset(1, 0, 0), 1);
        assert_eq!(dims.offset(0, 1, 0), 4);
        assert_eq!(dims.offset(0, 0, 1), 12);
        assert_eq!(dims.offset(3, 2, 1), 23);
        assert_eq!(dims.len(), 24);
    }

    #[test]
    fn test_contains() {
        let dims = GridDims::new(2, 2, 1);
        assert!(dims.contains(0, 0, 0));
        assert!(dims.contains(1, 1, 0));
        assert!(!dims.contains(2, 0, 0));
        assert!(!dims.contains(0, -1, 0));
        assert!(!dims.contains(0, 0, 1));
    }

    #[test]
    fn test_to_index_space() {
        let geometry = GridGeometry::new([4_000.0, 4_000.0], 250.0, 1_000.0, 2_000.0, 1)
            .expect("valid geometry");
        assert_eq!(geometry.to_index_space(GridKind::Dem, 500.0, 1_000.0), (2.0, 4.0));
        assert_eq!(geometry.to_index_space(GridKind::Vs, 500.0, 1_000.0), (0.25, 0.5));
    }
}
