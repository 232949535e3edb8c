//! Piecewise linear lookups over sorted axes.
//!
//! Wind speeds are interpolated linearly and clamped to the axis range, wind
//! angles are interpolated on the circle so 0° and 360° are the same bin.

use num_traits::Float;

use super::normalize_angle;

/// Linear interpolation between `a` and `b`. A fraction of zero returns `a` exactly.
pub fn lerp<T: Float>(a: T, b: T, frac: T) -> T {
    a + (b - a) * frac
}

/// Find the interval [x[k], x[k+1]] containing the given x value using binary search.
/// `x` must be sorted ascending, hold at least two values and satisfy x[0] <= value < x[n-1].
pub fn find_interval(x: &[f64], value: f64) -> usize {
    let mut lo = 0;
    let mut hi = x.len() - 1;

    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if value < x[mid] {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    lo
}

/// Bracketing indices and the fraction between them for a clamped linear lookup
pub fn linear_weights(x: &[f64], value: f64) -> (usize, usize, f64) {
    let n = x.len();
    if n == 1 || value <= x[0] {
        return (0, 0, 0.0);
    }
    if value >= x[n - 1] {
        return (n - 1, n - 1, 0.0);
    }

    let k = find_interval(x, value);
    (k, k + 1, (value - x[k]) / (x[k + 1] - x[k]))
}

/// Bracketing indices and the fraction between them on the circle.
/// `directions` are degrees sorted ascending inside [0, 360).
pub fn circular_weights(directions: &[f64], target: f64) -> (usize, usize, f64) {
    let n = directions.len();
    if n == 1 {
        return (0, 0, 0.0);
    }

    let target = normalize_angle(target);
    let first = directions[0];
    let last = directions[n - 1];

    if target >= last {
        let span = first + 360.0 - last;
        return (n - 1, 0, (target - last) / span);
    }
    if target < first {
        let span = first + 360.0 - last;
        return (n - 1, 0, (target + 360.0 - last) / span);
    }

    let k = find_interval(directions, target);
    (k, k + 1, (target - directions[k]) / (directions[k + 1] - directions[k]))
}

/// Interpolate y at x, clamping to the boundary values outside the data range
pub fn linear_interpolate(x: &[f64], y: &[f64], value: f64) -> f64 {
    let (lo, hi, frac) = linear_weights(x, value);
    if lo == hi {
        return y[lo];
    }
    lerp(y[lo], y[hi], frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_data() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y = vec![0.0, 1.0, 2.0, 3.0];

        assert!((linear_interpolate(&x, &y, 0.5) - 0.5).abs() < 1e-10);
        assert!((linear_interpolate(&x, &y, 1.5) - 1.5).abs() < 1e-10);
        assert!((linear_interpolate(&x, &y, 2.5) - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_exact_at_knots() {
        let x = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let y = vec![0.0, 0.5, 0.3, 0.8, 1.0];

        for i in 0..x.len() {
            assert_eq!(linear_interpolate(&x, &y, x[i]), y[i],
                "Failed at knot {}", i);
        }
    }

    #[test]
    fn test_boundary_clamping() {
        let x = vec![1.0, 2.0, 3.0];
        let y = vec![10.0, 20.0, 30.0];

        assert_eq!(linear_interpolate(&x, &y, 0.0), 10.0);
        assert_eq!(linear_interpolate(&x, &y, 5.0), 30.0);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(linear_interpolate(&[4.0], &[7.0], 10.0), 7.0);
        assert_eq!(circular_weights(&[45.0], 200.0), (0, 0, 0.0));
    }

    #[test]
    fn test_circular_weights_basic() {
        let dir = vec![0.0, 90.0, 180.0, 270.0];

        let (lo, hi, frac) = circular_weights(&dir, 45.0);
        assert_eq!((lo, hi), (0, 1));
        assert!((frac - 0.5).abs() < 1e-10, "Expected 0.5, got {}", frac);
    }

    #[test]
    fn test_circular_weights_wrap() {
        let dir = vec![0.0, 90.0, 180.0, 270.0];

        // between 270 and 360/0
        let (lo, hi, frac) = circular_weights(&dir, 315.0);
        assert_eq!((lo, hi), (3, 0));
        assert!((frac - 0.5).abs() < 1e-10, "Expected 0.5 at 315 deg, got {}", frac);

        assert_eq!(circular_weights(&dir, -45.0), circular_weights(&dir, 315.0));
    }

    #[test]
    fn test_circular_wrap_before_first_bin() {
        let dir = vec![30.0, 90.0, 330.0];

        // 0 deg sits halfway between 330 and 30
        let (lo, hi, frac) = circular_weights(&dir, 0.0);
        assert_eq!((lo, hi), (2, 0));
        assert!((frac - 0.5).abs() < 1e-10, "Expected 0.5, got {}", frac);
    }

    #[test]
    fn test_circular_exact_at_knots() {
        let dir = vec![0.0, 90.0, 180.0, 270.0];

        for i in 0..dir.len() {
            let (lo, _, frac) = circular_weights(&dir, dir[i]);
            assert_eq!(lo, i);
            assert_eq!(frac, 0.0);
        }
    }

    #[test]
    fn test_lerp_generic() {
        assert_eq!(lerp(2.0f32, 4.0f32, 0.5f32), 3.0f32);
        assert_eq!(lerp(2.0f64, 4.0f64, 0.0f64), 2.0f64);
    }
}
