//! Trilinear blending of the eight corners of a grid cell.

/// Corner values of one cell, indexed `[dz][dy][dx]`.
pub type Corners = [[[f64; 2]; 2]; 2];

/// Blend eight corner values at fractional offsets `(fx, fy, fz)` in `[0, 1]`.
///
/// The corner `(dz, dy, dx)` is weighted by
/// `(dz ? fz : 1-fz) * (dy ? fy : 1-fy) * (dx ? fx : 1-fx)`.
pub fn trilinear(corners: &Corners, fx: f64, fy: f64, fz: f64) -> f64 {
    let wx = [1.0 - fx, fx];
    let wy = [1.0 - fy, fy];
    let wz = [1.0 - fz, fz];

    let mut value = 0.0;
    for (dz, plane) in corners.iter().enumerate() {
        for (dy, row) in plane.iter().enumerate() {
            for (dx, corner) in row.iter().enumerate() {
                value += wz[dz] * wy[dy] * wx[dx] * corner;
            }
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_corners() -> Corners {
        [
            [[1.0, 2.0], [3.0, 4.0]],
            [[5.0, 6.0], [7.0, 8.0]],
        ]
    }

    #[test]
    fn test_corners_reproduced_exactly() {
        let c = sample_corners();
        for dz in 0..2 {
            for dy in 0..2 {
                for dx in 0..2 {
                    let v = trilinear(&c, dx as f64, dy as f64, dz as f64);
                    assert_eq!(v, c[dz][dy][dx]);
                }
            }
        }
    }

    #[test]
    fn test_center_is_mean() {
        let c = sample_corners();
        assert_relative_eq!(trilinear(&c, 0.5, 0.5, 0.5), 4.5);
    }

    #[test]
    fn test_linear_along_each_axis() {
        let c = sample_corners();
        assert_relative_eq!(trilinear(&c, 0.25, 0.0, 0.0), 1.25);
        assert_relative_eq!(trilinear(&c, 0.0, 0.25, 0.0), 1.5);
        assert_relative_eq!(trilinear(&c, 0.0, 0.0, 0.25), 2.0);
    }

    #[test]
    fn test_stays_within_corner_range() {
        let c: Corners = [
            [[-3.0, 10.0], [2.5, 0.0]],
            [[7.0, -1.0], [4.0, 9.5]],
        ];
        let steps = [0.0, 0.1, 0.33, 0.5, 0.77, 0.9, 1.0];
        for &fx in &steps {
            for &fy in &steps {
                for &fz in &steps {
                    let v = trilinear(&c, fx, fy, fz);
                    assert!((-3.0 - 1e-12..=10.0 + 1e-12).contains(&v), "{} escaped", v);
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let c = sample_corners();
        let a = trilinear(&c, 0.123, 0.456, 0.789);
        let b = trilinear(&c, 0.123, 0.456, 0.789);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
