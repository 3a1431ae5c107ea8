//! Density from P-wave velocity.

/// Lowest density the relation reports, in g/cm^3.
const MIN_DENSITY_G_CM3: f64 = 1.0;

/// Density in kg/m^3 from P-wave velocity in m/s.
///
/// Nafe-Drake curve as fitted by Brocher (2005), eq. 1. The polynomial is
/// evaluated in km/s and g/cm^3 and floored at 1 g/cm^3.
pub fn nafe_drake_density(vp: f64) -> f64 {
    let f = vp / 1000.0;
    let rho = f * (1.6612 - f * (0.4721 - f * (0.0671 - f * (0.0043 - f * 0.000106))));
    rho.max(MIN_DENSITY_G_CM3) * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_floor_at_zero_velocity() {
        assert_eq!(nafe_drake_density(0.0), 1000.0);
        assert_eq!(nafe_drake_density(-500.0), 1000.0);
    }

    #[test]
    fn test_known_values() {
        // f = 2.5: 2.5 * (1.6612 - 2.5 * (0.4721 - 2.5 * (0.0671 - 2.5 * (0.0043 - 2.5 * 0.000106))))
        assert_relative_eq!(nafe_drake_density(2500.0), 2093.1953125, epsilon = 1e-6);
        assert_relative_eq!(nafe_drake_density(6000.0), 2716.656, epsilon = 1e-6);
    }

    #[test]
    fn test_monotonic_over_crustal_range() {
        let mut previous = nafe_drake_density(1000.0);
        for vp in (1010..=8000).step_by(10) {
            let rho = nafe_drake_density(vp as f64);
            assert!(rho >= previous, "density decreased at vp={}", vp);
            previous = rho;
        }
    }
}
