//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Clamp a value into the range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Wrap an angle into the range `[-pi, pi)`.
///
/// Useful for expressing heading errors as a shortest signed rotation.
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float + std::ops::Rem,
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap();
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    rem_euclid(angle + pi_t, tau_t) - pi_t
}

/// Get the signed shortest angular distance from `a` to `b`.
///
/// The result is in `[-pi, pi)` and accounts for wrapping, so the distance
/// from `0.1` to `tau - 0.1` is `-0.2`, not `tau - 0.2`.
pub fn ang_dist_pi<T>(a: T, b: T) -> T
where
    T: Float + std::ops::Rem,
{
    wrap_pi(b - a)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float + std::ops::Rem,
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() {
        r + rhs.abs()
    } else {
        r
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;
    const TAU: f64 = std::f64::consts::TAU;

    #[test]
    fn test_wrap_pi() {
        assert!((wrap_pi(0f64)).abs() < 1e-12);
        assert!((wrap_pi(PI + 0.5) - (0.5 - PI)).abs() < 1e-12);
        assert!((wrap_pi(-PI - 0.5) - (PI - 0.5)).abs() < 1e-12);
        assert!((wrap_pi(TAU + 1.0) - 1.0).abs() < 1e-12);
        assert!((wrap_pi(-1.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ang_dist_pi() {
        assert!((ang_dist_pi(1f64, 2f64) - 1.0).abs() < 1e-12);
        assert!((ang_dist_pi(2f64, 1f64) + 1.0).abs() < 1e-12);
        assert!((ang_dist_pi(0.1, TAU - 0.1) + 0.2).abs() < 1e-12);
        assert!((ang_dist_pi(TAU - 0.1, 0.1) - 0.2).abs() < 1e-12);
        assert!((ang_dist_pi(0f64, TAU)).abs() < 1e-12);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(0.5f64, 0.0, 1.0), 0.5);
        assert_eq!(clamp(-0.5f64, 0.0, 1.0), 0.0);
        assert_eq!(clamp(1.5f64, 0.0, 1.0), 1.0);
    }
}
