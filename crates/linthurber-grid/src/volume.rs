//! A single resident 3-D scalar grid.

use crate::geometry::GridDims;
use crate::trilinear::{trilinear, Corners};
use crate::{GridError, Result};

/// Where a volume's data currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeStatus {
    /// No source file was found.
    Absent,
    /// A source file exists but has not been read into memory.
    OnDisk,
    /// Data is in memory and can be sampled.
    Resident,
}

/// One scalar grid (DEM, Vp or Vs).
///
/// Values are stored as `f32` with x varying fastest, then y, then z. A
/// resident volume always holds exactly `nx * ny * nz` values; other statuses
/// hold none and refuse to be sampled.
#[derive(Debug, Clone)]
pub struct GridVolume {
    dims: GridDims,
    status: VolumeStatus,
    data: Vec<f32>,
}

impl GridVolume {
    /// Wrap an existing buffer, checking its length against `dims`.
    pub fn resident(dims: GridDims, data: Vec<f32>) -> Result<Self> {
        let expected = dims.checked_len().ok_or(GridError::BufferSize {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() != expected {
            return Err(GridError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            dims,
            status: VolumeStatus::Resident,
            data,
        })
    }

    /// Allocate a resident volume with every cell set to `value`.
    pub fn filled(dims: GridDims, value: f32) -> Result<Self> {
        let len = dims.checked_len().ok_or(GridError::BufferSize {
            expected: usize::MAX,
            actual: 0,
        })?;
        Ok(Self {
            dims,
            status: VolumeStatus::Resident,
            data: vec![value; len],
        })
    }

    /// A volume whose source could not be found.
    pub fn absent(dims: GridDims) -> Self {
        Self {
            dims,
            status: VolumeStatus::Absent,
            data: Vec::new(),
        }
    }

    /// A volume known to exist on disk but not loaded.
    pub fn on_disk(dims: GridDims) -> Self {
        Self {
            dims,
            status: VolumeStatus::OnDisk,
            data: Vec::new(),
        }
    }

    /// Grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Current status.
    pub fn status(&self) -> VolumeStatus {
        self.status
    }

    /// True if the data is in memory.
    pub fn is_resident(&self) -> bool {
        self.status == VolumeStatus::Resident
    }

    /// Raw values in storage order.
    pub fn values(&self) -> &[f32] {
        &self.data
    }

    /// Drop the in-memory data. The volume reports [`VolumeStatus::OnDisk`]
    /// afterwards.
    pub fn release(&mut self) {
        if self.is_resident() {
            self.data = Vec::new();
            self.status = VolumeStatus::OnDisk;
        }
    }

    fn ensure_resident(&self) -> Result<()> {
        if self.is_resident() {
            Ok(())
        } else {
            Err(GridError::DataUnavailable {
                status: self.status,
            })
        }
    }

    /// Value of cell `(i, j, k)`.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Result<f32> {
        self.ensure_resident()?;
        if !self.dims.contains(i as i64, j as i64, k as i64) {
            return Err(self.index_error(i as i64, j as i64, k as i64));
        }
        Ok(self.data[self.dims.offset(i, j, k)])
    }

    /// Overwrite cell `(i, j, k)`.
    pub fn set(&mut self, i: i64, j: i64, k: i64, value: f32) -> Result<()> {
        self.ensure_resident()?;
        if !self.dims.contains(i, j, k) {
            return Err(self.index_error(i, j, k));
        }
        let offset = self.dims.offset(i as usize, j as usize, k as usize);
        self.data[offset] = value;
        Ok(())
    }

    fn index_error(&self, i: i64, j: i64, k: i64) -> GridError {
        GridError::IndexOutOfRange {
            i,
            j,
            k,
            dims: self.dims.as_array(),
        }
    }

    /// Reject coordinates whose nearest cell lies outside the grid.
    ///
    /// Each axis is rounded independently; this is a coarse check on the
    /// nearest cell, not on the full interpolation window.
    fn check_rounded(&self, x: f64, y: f64, z: f64) -> Result<(i64, i64, i64)> {
        let out_of_bounds = || GridError::OutOfBounds {
            x,
            y,
            z,
            dims: self.dims.as_array(),
        };
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(out_of_bounds());
        }
        let (a, b, c) = (x.round() as i64, y.round() as i64, z.round() as i64);
        if !self.dims.contains(a, b, c) {
            return Err(out_of_bounds());
        }
        Ok((a, b, c))
    }

    /// Value at the clamped cell `(i, j, k)`.
    fn clamped(&self, i: i64, j: i64, k: i64) -> f64 {
        let i = i.clamp(0, self.dims.nx as i64 - 1) as usize;
        let j = j.clamp(0, self.dims.ny as i64 - 1) as usize;
        let k = k.clamp(0, self.dims.nz as i64 - 1) as usize;
        self.data[self.dims.offset(i, j, k)] as f64
    }

    /// Trilinear sample at a grid-index-space position.
    ///
    /// Corners that fall past an edge are clamped onto it, so the edge value
    /// is extended outward rather than wrapped.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> Result<f64> {
        self.ensure_resident()?;
        self.check_rounded(x, y, z)?;

        let (x0, y0, z0) = (x.floor(), y.floor(), z.floor());
        let (i0, j0, k0) = (x0 as i64, y0 as i64, z0 as i64);

        let mut corners: Corners = [[[0.0; 2]; 2]; 2];
        for (dz, plane) in corners.iter_mut().enumerate() {
            for (dy, row) in plane.iter_mut().enumerate() {
                for (dx, corner) in row.iter_mut().enumerate() {
                    *corner = self.clamped(i0 + dx as i64, j0 + dy as i64, k0 + dz as i64);
                }
            }
        }

        Ok(trilinear(&corners, x - x0, y - y0, z - z0))
    }

    /// Nearest-cell sample at a grid-index-space position.
    pub fn sample_nearest(&self, x: f64, y: f64, z: f64) -> Result<f64> {
        self.ensure_resident()?;
        let (a, b, c) = self.check_rounded(x, y, z)?;
        Ok(self.data[self.dims.offset(a as usize, b as usize, c as usize)] as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 4x3x3 volume where each cell holds `100k + 10j + i`.
    fn ramp() -> GridVolume {
        let dims = GridDims::new(4, 3, 3);
        let mut data = Vec::with_capacity(dims.len());
        for k in 0..3 {
            for j in 0..3 {
                for i in 0..4 {
                    data.push((100 * k + 10 * j + i) as f32);
                }
            }
        }
        GridVolume::resident(dims, data).expect("sized buffer")
    }

    #[test]
    fn test_resident_checks_length() {
        let dims = GridDims::new(2, 2, 2);
        assert!(GridVolume::resident(dims, vec![0.0; 8]).is_ok());
        assert!(matches!(
            GridVolume::resident(dims, vec![0.0; 7]),
            Err(GridError::BufferSize { expected: 8, actual: 7 })
        ));
    }

    #[test]
    fn test_grid_points_exact() {
        let volume = ramp();
        for k in 0..3 {
            for j in 0..3 {
                for i in 0..4 {
                    let v = volume.sample(i as f64, j as f64, k as f64).unwrap();
                    assert_eq!(v, (100 * k + 10 * j + i) as f64);
                }
            }
        }
    }

    #[test]
    fn test_linear_field_interpolates_exactly() {
        let volume = ramp();
        assert_relative_eq!(volume.sample(1.5, 0.5, 0.5).unwrap(), 56.5, epsilon = 1e-9);
        assert_relative_eq!(volume.sample(2.25, 1.75, 1.1).unwrap(), 129.75, epsilon = 1e-9);
    }

    #[test]
    fn test_sample_within_corner_range() {
        let dims = GridDims::new(2, 2, 2);
        let data = vec![3.0, -1.0, 8.0, 0.5, 2.0, 7.0, -4.0, 6.0];
        let volume = GridVolume::resident(dims, data).unwrap();
        for &(x, y, z) in &[(0.2, 0.3, 0.4), (0.49, 0.01, 0.33), (0.0, 0.5, 0.25)] {
            let v = volume.sample(x, y, z).unwrap();
            assert!((-4.0..=8.0).contains(&v));
        }
    }

    #[test]
    fn test_edge_clamped_beyond_far_edge() {
        let volume = ramp();
        // x = 3.4 rounds to 3 (inside); the i0+1 corner clamps onto column 3.
        assert_relative_eq!(volume.sample(3.4, 0.0, 0.0).unwrap(), 3.0, epsilon = 1e-9);
        assert_relative_eq!(volume.sample(3.0, 2.3, 2.2).unwrap(), 223.0, epsilon = 1e-9);
    }

    #[test]
    fn test_edge_clamped_before_near_edge() {
        let volume = ramp();
        // -0.4 rounds to 0 and floors to -1, which clamps onto the first column.
        assert_relative_eq!(volume.sample(-0.4, 1.0, 0.0).unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rounded_bounds_check() {
        let volume = ramp();
        assert!(matches!(
            volume.sample(3.5, 0.0, 0.0),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(matches!(
            volume.sample(0.0, -0.6, 0.0),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(matches!(
            volume.sample(0.0, 0.0, 2.5),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(volume.sample(f64::NAN, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_sample_nearest() {
        let volume = ramp();
        assert_eq!(volume.sample_nearest(1.4, 1.6, 0.2).unwrap(), 21.0);
        assert_eq!(volume.sample_nearest(2.5, 0.0, 1.5).unwrap(), 203.0);
        assert!(volume.sample_nearest(4.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_unresident_fails_fast() {
        let dims = GridDims::new(2, 2, 1);
        let absent = GridVolume::absent(dims);
        assert!(matches!(
            absent.sample(0.0, 0.0, 0.0),
            Err(GridError::DataUnavailable { status: VolumeStatus::Absent })
        ));

        let mut volume = GridVolume::filled(dims, 1.0).unwrap();
        volume.release();
        assert_eq!(volume.status(), VolumeStatus::OnDisk);
        assert!(matches!(
            volume.sample_nearest(0.0, 0.0, 0.0),
            Err(GridError::DataUnavailable { status: VolumeStatus::OnDisk })
        ));
        assert!(volume.values().is_empty());
    }

    #[test]
    fn test_get_and_set() {
        let mut volume = GridVolume::filled(GridDims::new(3, 2, 2), -1.0).unwrap();
        volume.set(2, 1, 1, 42.0).unwrap();
        assert_eq!(volume.get(2, 1, 1).unwrap(), 42.0);
        assert_eq!(volume.get(0, 0, 0).unwrap(), -1.0);
        assert!(matches!(
            volume.set(3, 0, 0, 1.0),
            Err(GridError::IndexOutOfRange { i: 3, .. })
        ));
        assert!(volume.set(0, -1, 0, 1.0).is_err());
    }

    #[test]
    fn test_filled_rejects_overflowing_dims() {
        let dims = GridDims::new(usize::MAX / 2, 3, 1);
        assert!(matches!(
            GridVolume::filled(dims, 0.0),
            Err(GridError::BufferSize { expected: usize::MAX, .. })
        ));
    }
}
