//! Non-uniform vertical layering.
//!
//! The velocity grids are stored as a stack of horizontal layers whose depths
//! (kilometres below mean sea level) are listed in a breakpoint table. The
//! table maps a continuous depth onto a layer coordinate in one of three ways:
//!
//! - [`DepthTable::fractional_layer`] blends linearly between the two
//!   breakpoints that bracket the depth, for DEM-relative queries.
//! - [`DepthTable::discrete_layer`] snaps to the first breakpoint at or below
//!   the depth, for queries that skip the DEM correction.
//! - [`DepthTable::containing_layer`] is the same search without clamping,
//!   used when placing file records into layers.

use crate::geometry::MAX_Z_DIM;
use crate::{GridError, Result};

/// Strictly increasing depth breakpoints, one per vertical layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthTable {
    depths: Vec<f64>,
}

impl DepthTable {
    /// Build a table, rejecting empty, oversized, non-finite or
    /// non-increasing breakpoint lists.
    pub fn new(depths: Vec<f64>) -> Result<Self> {
        if depths.is_empty() {
            return Err(GridError::InvalidDepthTable(
                "at least one breakpoint is required".to_string(),
            ));
        }
        if depths.len() > MAX_Z_DIM {
            return Err(GridError::InvalidDepthTable(format!(
                "{} breakpoints exceeds the maximum of {}",
                depths.len(),
                MAX_Z_DIM
            )));
        }
        if let Some(bad) = depths.iter().position(|d| !d.is_finite()) {
            return Err(GridError::InvalidDepthTable(format!(
                "breakpoint {} is not finite",
                bad
            )));
        }
        // Equal neighbours would divide by zero in `fractional_layer`.
        if let Some(k) = depths.windows(2).position(|w| w[1] <= w[0]) {
            return Err(GridError::InvalidDepthTable(format!(
                "breakpoints must be strictly increasing ({} then {} at index {})",
                depths[k],
                depths[k + 1],
                k + 1
            )));
        }
        Ok(Self { depths })
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Always false; a table holds at least one breakpoint.
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// The breakpoints, shallowest first.
    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    /// Index of the first breakpoint at or below `depth_km`, if any.
    pub fn containing_layer(&self, depth_km: f64) -> Option<usize> {
        self.depths.iter().position(|&d| d >= depth_km)
    }

    /// Layer index without blending; depths past the last breakpoint clamp
    /// to the deepest layer.
    pub fn discrete_layer(&self, depth_km: f64) -> usize {
        self.containing_layer(depth_km)
            .unwrap_or(self.depths.len() - 1)
    }

    /// Fractional layer coordinate.
    ///
    /// Depths at or above the first breakpoint map to `0`, depths past the
    /// last breakpoint map to `len - 1`, and anything in between is blended
    /// linearly between the bracketing breakpoints.
    pub fn fractional_layer(&self, depth_km: f64) -> f64 {
        match self.containing_layer(depth_km) {
            None => (self.depths.len() - 1) as f64,
            Some(0) => 0.0,
            Some(k) => {
                let upper = self.depths[k];
                let lower = self.depths[k - 1];
                let ratio = (depth_km - lower) / (upper - lower);
                (k - 1) as f64 + ratio
            }
        }
    }
}
