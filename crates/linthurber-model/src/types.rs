//! Query input and output types.

/// Value reported for any property the model could not determine.
pub const SENTINEL: f64 = -1.0;

/// A query location.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Depth below the surface, in metres.
    pub depth: f64,
}

impl GeoPoint {
    /// Create a new query point.
    pub fn new(longitude: f64, latitude: f64, depth: f64) -> Self {
        Self {
            longitude,
            latitude,
            depth,
        }
    }
}

/// Material properties returned for one query point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialProperties {
    /// P-wave velocity in m/s.
    pub vp: f64,
    /// S-wave velocity in m/s.
    pub vs: f64,
    /// Density in kg/m^3.
    pub rho: f64,
    /// P-wave quality factor. Not provided by this model.
    pub qp: f64,
    /// S-wave quality factor. Not provided by this model.
    pub qs: f64,
}

impl MaterialProperties {
    /// Properties with every field set to [`SENTINEL`].
    pub const fn unknown() -> Self {
        Self {
            vp: SENTINEL,
            vs: SENTINEL,
            rho: SENTINEL,
            qp: SENTINEL,
            qs: SENTINEL,
        }
    }

    /// True if no property was filled in.
    pub fn is_unknown(&self) -> bool {
        self.vp == SENTINEL && self.vs == SENTINEL && self.rho == SENTINEL
    }
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self::unknown()
    }
}
