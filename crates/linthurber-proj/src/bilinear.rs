//! Bilinear mapping between a lon/lat quadrilateral and the model plane.

use crate::{ProjectionError, Projector, Result};

/// Maximum Newton iterations for the inverse mapping.
const MAX_ITERATIONS: usize = 50;

/// Convergence threshold on the `(u, v)` update.
const TOLERANCE: f64 = 1e-12;

/// Slack allowed on the unit square before a point counts as outside.
const EDGE_SLACK: f64 = 1e-9;

/// Maps a geographic quadrilateral onto the rectangle `[0, width] x [0, height]`.
///
/// The four corners are given as parallel longitude and latitude arrays, in
/// the order (x=0, y=0), (x=width, y=0), (x=width, y=height), (x=0, y=height).
/// A point inside the quadrilateral is located by inverting the bilinear map
/// from the unit square onto the corners.
#[derive(Debug, Clone, PartialEq)]
pub struct BilinearProjector {
    lon: [f64; 4],
    lat: [f64; 4],
    dims: [f64; 2],
}

impl BilinearProjector {
    /// Create a projector from corner longitudes, corner latitudes and the
    /// plane dimensions in metres.
    pub fn new(lon: [f64; 4], lat: [f64; 4], dims: [f64; 2]) -> Result<Self> {
        if lon.iter().chain(lat.iter()).any(|c| !c.is_finite()) {
            return Err(ProjectionError::InvalidCorners(
                "corner coordinates must be finite".to_string(),
            ));
        }
        if !dims.iter().all(|d| d.is_finite() && *d > 0.0) {
            return Err(ProjectionError::InvalidCorners(format!(
                "plane dimensions must be positive, got {:?}",
                dims
            )));
        }

        let projector = Self { lon, lat, dims };
        // A collapsed quadrilateral has a singular Jacobian at its centre.
        if projector.jacobian_det(0.5, 0.5).abs() < f64::EPSILON {
            return Err(ProjectionError::InvalidCorners(
                "corners do not span an area".to_string(),
            ));
        }
        Ok(projector)
    }

    /// Plane dimensions `[width, height]` in metres.
    pub fn dims(&self) -> [f64; 2] {
        self.dims
    }

    /// Geographic position of unit-square coordinate `(u, v)`.
    fn forward(&self, u: f64, v: f64) -> (f64, f64) {
        let blend = |c: &[f64; 4]| {
            c[0] * (1.0 - u) * (1.0 - v) + c[1] * u * (1.0 - v) + c[2] * u * v + c[3] * (1.0 - u) * v
        };
        (blend(&self.lon), blend(&self.lat))
    }

    /// Partial derivatives `[[dlon/du, dlon/dv], [dlat/du, dlat/dv]]`.
    fn jacobian(&self, u: f64, v: f64) -> [[f64; 2]; 2] {
        let partials = |c: &[f64; 4]| {
            let du = (c[1] - c[0]) * (1.0 - v) + (c[2] - c[3]) * v;
            let dv = (c[3] - c[0]) * (1.0 - u) + (c[2] - c[1]) * u;
            [du, dv]
        };
        [partials(&self.lon), partials(&self.lat)]
    }

    fn jacobian_det(&self, u: f64, v: f64) -> f64 {
        let j = self.jacobian(u, v);
        j[0][0] * j[1][1] - j[0][1] * j[1][0]
    }

    /// Unit-square coordinate of a geographic point, by Newton iteration.
    fn inverse(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let no_convergence = ProjectionError::NoConvergence { lon, lat };
        if !(lon.is_finite() && lat.is_finite()) {
            return Err(no_convergence);
        }

        let (mut u, mut v) = (0.5, 0.5);
        for _ in 0..MAX_ITERATIONS {
            let (plon, plat) = self.forward(u, v);
            let (rx, ry) = (plon - lon, plat - lat);
            let j = self.jacobian(u, v);
            let det = j[0][0] * j[1][1] - j[0][1] * j[1][0];
            if det.abs() < f64::EPSILON * f64::EPSILON {
                return Err(no_convergence);
            }

            let du = (j[1][1] * rx - j[0][1] * ry) / det;
            let dv = (j[0][0] * ry - j[1][0] * rx) / det;
            u -= du;
            v -= dv;

            if !(u.is_finite() && v.is_finite()) {
                return Err(no_convergence);
            }
            if du.abs() < TOLERANCE && dv.abs() < TOLERANCE {
                return Ok((u, v));
            }
        }
        Err(no_convergence)
    }

    /// Geographic position of a model-plane point (metres).
    pub fn xy_to_geo(&self, x: f64, y: f64) -> (f64, f64) {
        self.forward(x / self.dims[0], y / self.dims[1])
    }
}

impl Projector for BilinearProjector {
    fn geo_to_xy(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let (u, v) = self.inverse(lon, lat)?;
        let inside = |t: f64| (-EDGE_SLACK..=1.0 + EDGE_SLACK).contains(&t);
        if !(inside(u) && inside(v)) {
            return Err(ProjectionError::OutsideRegion { lon, lat });
        }
        Ok((
            u.clamp(0.0, 1.0) * self.dims[0],
            v.clamp(0.0, 1.0) * self.dims[1],
        ))
    }
}
