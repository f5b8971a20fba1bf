pub mod aabb;

pub use aabb::Aabb;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Coarser tolerance for comparing coordinates produced by independent
/// arithmetic paths, e.g. mirrored cut boundaries.
pub const FP_TOLERANCE: f64 = 1e-4;

/// Coordinate axis of an axis-aligned scan or extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index of this axis in a point or vector.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Relative discrepancy of `estimated` against `required`:
/// `|required - estimated| / required`.
///
/// The result is dimensionless; 0.0 means an exact match. `required` must
/// be non-zero, which callers guarantee by validating requests up front.
#[must_use]
pub fn percentage_discrepancy(estimated: f64, required: f64) -> f64 {
    (required - estimated).abs() / required
}

/// Returns the smallest prime strictly greater than `n`.
#[must_use]
pub fn next_smallest_prime(n: usize) -> usize {
    let mut candidate = n + 1;
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn discrepancy_exact_match_is_zero() {
        let pd = percentage_discrepancy(0.3, 0.3);
        assert!(pd.abs() < TOL, "pd={pd}");
    }

    #[test]
    fn discrepancy_is_relative_to_required() {
        // Estimate 0.25 against request 0.2: off by 25% of the request.
        let pd = percentage_discrepancy(0.25, 0.2);
        assert!((pd - 0.25).abs() < TOL, "pd={pd}");

        // Symmetric absolute error, different relative error.
        let pd = percentage_discrepancy(0.15, 0.2);
        assert!((pd - 0.25).abs() < TOL, "pd={pd}");
    }

    #[test]
    fn discrepancy_scales_with_both_arguments() {
        let a = percentage_discrepancy(0.3, 0.4);
        let b = percentage_discrepancy(3.0, 4.0);
        assert!((a - b).abs() < TOL, "a={a} b={b}");
    }

    #[test]
    fn next_prime_from_defaults() {
        assert_eq!(next_smallest_prime(20), 23);
        assert_eq!(next_smallest_prime(10), 11);
        assert_eq!(next_smallest_prime(23), 29);
        assert_eq!(next_smallest_prime(11), 13);
    }

    #[test]
    fn next_prime_small_inputs() {
        assert_eq!(next_smallest_prime(0), 2);
        assert_eq!(next_smallest_prime(1), 2);
        assert_eq!(next_smallest_prime(2), 3);
        assert_eq!(next_smallest_prime(7), 11);
    }

    #[test]
    fn axis_indices() {
        assert_eq!(Axis::X.index(), 0);
        assert_eq!(Axis::Y.index(), 1);
        assert_eq!(Axis::Z.index(), 2);
    }
}
