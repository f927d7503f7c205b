//! Vector math kernel
//!
//! Thin helpers over `glam::DVec3` for the few operations the simulation
//! needs beyond plain arithmetic: axis-angle rotation matrices, toroidal
//! wrapping, and random directions.

use glam::{DMat3, DVec3};
use rand::Rng;

use crate::consts::WRAP_INSET;

/// Build a rotation matrix of `degrees` about `axis` (Rodrigues' formula).
///
/// The axis does not need to be normalized. A zero-length axis yields the
/// identity, so degenerate input can never inject NaNs into the ship frame.
pub fn rotation_matrix(axis: DVec3, degrees: f64) -> DMat3 {
    let len = axis.length();
    if len <= f64::EPSILON || !len.is_finite() {
        return DMat3::IDENTITY;
    }
    let DVec3 { x, y, z } = axis / len;
    let (sin_a, cos_a) = degrees.to_radians().sin_cos();
    let t = 1.0 - cos_a;

    // Columns of the row-major textbook matrix
    DMat3::from_cols(
        DVec3::new(x * x * t + cos_a, y * x * t + z * sin_a, z * x * t - y * sin_a),
        DVec3::new(x * y * t - z * sin_a, y * y * t + cos_a, z * y * t + x * sin_a),
        DVec3::new(x * z * t + y * sin_a, y * z * t - x * sin_a, z * z * t + cos_a),
    )
}

/// Normalize, or return `fallback` for zero-length / non-finite input
#[inline]
pub fn normalize_or(v: DVec3, fallback: DVec3) -> DVec3 {
    let n = v.normalize_or_zero();
    if n == DVec3::ZERO { fallback } else { n }
}

/// Wrap a single coordinate around `center` with half-size `bound`.
///
/// A coordinate beyond `center ± bound` is teleported to the opposite side,
/// `WRAP_INSET` inside the boundary.
#[inline]
pub fn wrap_coord(p: f64, center: f64, bound: f64) -> f64 {
    if p > center + bound {
        center - bound + WRAP_INSET
    } else if p < center - bound {
        center + bound - WRAP_INSET
    } else {
        p
    }
}

/// Wrap every axis of `pos` around `center`
#[inline]
pub fn wrap_position(pos: &mut DVec3, center: DVec3, bound: f64) {
    pos.x = wrap_coord(pos.x, center.x, bound);
    pos.y = wrap_coord(pos.y, center.y, bound);
    pos.z = wrap_coord(pos.z, center.z, bound);
}

/// Random unit vector: +Z rotated by random whole-degree angles about X, Y, then Z
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> DVec3 {
    let mut u = DVec3::Z;
    for axis in [DVec3::X, DVec3::Y, DVec3::Z] {
        let degrees = rng.random_range(0..359) as f64;
        u = rotation_matrix(axis, degrees) * u;
    }
    u
}

/// Random point in the cube `[-half, half]^3`
pub fn random_in_cube<R: Rng + ?Sized>(rng: &mut R, half: f64) -> DVec3 {
    DVec3::new(
        rng.random_range(-half..=half),
        rng.random_range(-half..=half),
        rng.random_range(-half..=half),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_rotation_matches_glam() {
        let axis = DVec3::new(1.0, 2.0, -0.5);
        let ours = rotation_matrix(axis, 37.0);
        let theirs = DMat3::from_axis_angle(axis.normalize(), 37.0_f64.to_radians());
        let v = DVec3::new(0.3, -4.0, 2.5);
        assert!((ours * v - theirs * v).length() < EPS);
    }

    #[test]
    fn test_rotation_quarter_turn() {
        // 90° about Z takes X to Y
        let r = rotation_matrix(DVec3::Z, 90.0) * DVec3::X;
        assert!((r - DVec3::Y).length() < EPS);
    }

    #[test]
    fn test_rotation_zero_axis_is_identity() {
        assert_eq!(rotation_matrix(DVec3::ZERO, 45.0), DMat3::IDENTITY);
    }

    #[test]
    fn test_normalize_or_fallback() {
        assert_eq!(normalize_or(DVec3::ZERO, DVec3::X), DVec3::X);
        assert_eq!(normalize_or(DVec3::new(0.0, 3.0, 0.0), DVec3::X), DVec3::Y);
    }

    #[test]
    fn test_wrap_coord() {
        assert_eq!(wrap_coord(95.0, 0.0, 90.0), -80.0);
        assert_eq!(wrap_coord(-95.0, 0.0, 90.0), 80.0);
        assert_eq!(wrap_coord(50.0, 0.0, 90.0), 50.0);
        // Recentered on the ship
        assert_eq!(wrap_coord(10.0, 200.0, 90.0), 280.0);
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            assert!((random_unit_vector(&mut rng).length() - 1.0).abs() < EPS);
        }
    }

    proptest! {
        #[test]
        fn wrap_lands_in_bounds_and_is_idempotent(
            p in -1.0e4f64..1.0e4,
            s in -1.0e3f64..1.0e3,
        ) {
            let bound = crate::consts::WRAP_BOUND;
            let once = wrap_coord(p, s, bound);
            prop_assert!(once >= s - bound && once <= s + bound);
            prop_assert_eq!(wrap_coord(once, s, bound), once);
        }
    }
}
