//! Candidate cut verification.
//!
//! Volume is checked first: a candidate whose estimated fraction misses
//! the request by more than `allowed_pd_volume` is rejected outright and
//! gets no score. Surviving candidates are scored on aspect: the bounding
//! extents are reduced to three two-ratio configurations (each axis in
//! turn as the unit), each compared against the required aspects in both
//! orders, and the score is the smallest summed discrepancy over the six
//! checks. The candidate is accepted when any single check has both
//! components within `allowed_pd_aspect`.

use tracing::debug;

use crate::config::SearchConfig;
use crate::math::{percentage_discrepancy, Aabb};

/// Outcome of verifying one candidate cut.
///
/// `score` is `None` when the volume gate failed; an aspect score is
/// still recorded for candidates that merely miss the aspect tolerance,
/// so banded selection can consider them later.
#[derive(Debug, Clone, Copy)]
pub struct Verdict {
    pub accepted: bool,
    pub score: Option<f64>,
}

impl Verdict {
    /// Verdict for a candidate that failed the volume gate.
    #[must_use]
    pub fn volume_rejected() -> Self {
        Self {
            accepted: false,
            score: None,
        }
    }
}

/// Verifies a candidate cut against the request.
///
/// `required_aspects` is the derived pair `[a0/a1, a2/a1]` of the request
/// triple. Symmetric candidates describe one half of a mirrored pair, so
/// their X extent is doubled before the aspect checks.
#[must_use]
pub fn verify_cut(
    estimated_fraction: f64,
    required_fraction: f64,
    required_aspects: [f64; 2],
    bounds: &Aabb,
    symmetric: bool,
    config: &SearchConfig,
) -> Verdict {
    let pd_volume = percentage_discrepancy(estimated_fraction, required_fraction);
    debug!(
        estimated = estimated_fraction,
        required = required_fraction,
        pd_volume,
        "volume check"
    );
    if pd_volume > config.allowed_pd_volume {
        debug!("volume rejected");
        return Verdict::volume_rejected();
    }

    let dims = bounds.dims();
    let dx = if symmetric { dims.x * 2.0 } else { dims.x };
    let (dy, dz) = (dims.y, dims.z);

    let configurations = [[dx / dy, dz / dy], [dy / dx, dz / dx], [dx / dz, dy / dz]];

    let mut accepted = false;
    let mut score = f64::INFINITY;
    for measured in configurations {
        for (first, second) in [(0, 1), (1, 0)] {
            let pd_a = percentage_discrepancy(measured[first], required_aspects[0]);
            let pd_b = percentage_discrepancy(measured[second], required_aspects[1]);
            if pd_a + pd_b < score {
                score = pd_a + pd_b;
            }
            if pd_a <= config.allowed_pd_aspect && pd_b <= config.allowed_pd_aspect {
                accepted = true;
            }
        }
    }

    debug!(score, accepted, "aspect check");
    Verdict {
        accepted,
        score: Some(score),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Aabb;
    use approx::assert_abs_diff_eq;

    fn cfg() -> SearchConfig {
        SearchConfig::default()
    }

    fn cube_bounds(dx: f64, dy: f64, dz: f64) -> Aabb {
        Aabb::from_coords(0.0, 0.0, 0.0, dx, dy, dz)
    }

    #[test]
    fn volume_within_tolerance_passes_gate() {
        // 0.21 against 0.2: pd 0.05, inside the 10% gate.
        let v = verify_cut(
            0.21,
            0.2,
            [1.0, 1.0],
            &cube_bounds(1.0, 1.0, 1.0),
            false,
            &cfg(),
        );
        assert!(v.score.is_some());
        assert!(v.accepted);
    }

    #[test]
    fn volume_outside_tolerance_is_hard_reject() {
        // 0.25 against 0.2: pd 0.25, no score at all.
        let v = verify_cut(
            0.25,
            0.2,
            [1.0, 1.0],
            &cube_bounds(1.0, 1.0, 1.0),
            false,
            &cfg(),
        );
        assert!(!v.accepted);
        assert!(v.score.is_none());
    }

    #[test]
    fn aspect_matches_any_axis_permutation() {
        // Request aspects derived from (2, 1, 1) are [2, 1]. A 2:1:1 box
        // measured with y as the unit axis gives exactly (2, 1).
        let v = verify_cut(
            0.2,
            0.2,
            [2.0, 1.0],
            &cube_bounds(2.0, 1.0, 1.0),
            false,
            &cfg(),
        );
        assert!(v.accepted);
        assert_abs_diff_eq!(v.score.unwrap(), 0.0, epsilon = 1e-12);

        // Same solid rotated into z: the configuration sweep still finds it.
        let v = verify_cut(
            0.2,
            0.2,
            [2.0, 1.0],
            &cube_bounds(1.0, 1.0, 2.0),
            false,
            &cfg(),
        );
        assert!(v.accepted, "score={:?}", v.score);
    }

    #[test]
    fn symmetric_half_doubles_x_extent() {
        // A unit-cube half with required aspects [2, 1]: asymmetric it is
        // a clear miss, symmetric the doubled X makes it exact.
        let bounds = cube_bounds(1.0, 1.0, 1.0);
        let asym = verify_cut(0.2, 0.2, [2.0, 1.0], &bounds, false, &cfg());
        assert!(!asym.accepted);

        let sym = verify_cut(0.2, 0.2, [2.0, 1.0], &bounds, true, &cfg());
        assert!(sym.accepted);
        assert_abs_diff_eq!(sym.score.unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn score_is_minimum_over_all_orderings() {
        // Dims (0.6, 0.65, 0.7), request (1, 1): best configuration uses
        // x as the unit, giving 0.65/0.6 + 0.7/0.6 discrepancies
        // (1/12 + 1/6 = 0.25).
        let v = verify_cut(
            0.3,
            0.3,
            [1.0, 1.0],
            &cube_bounds(0.6, 0.65, 0.7),
            false,
            &cfg(),
        );
        assert!(v.accepted);
        assert_abs_diff_eq!(v.score.unwrap(), 0.25, epsilon = 1e-9);
    }

    #[test]
    fn near_miss_keeps_score_without_acceptance() {
        // Dims (1, 1, 1.5) against (1, 1): best configuration is exact on
        // one component and 50% off on the other.
        let v = verify_cut(
            0.2,
            0.2,
            [1.0, 1.0],
            &cube_bounds(1.0, 1.0, 1.5),
            false,
            &cfg(),
        );
        assert!(!v.accepted);
        assert_abs_diff_eq!(v.score.unwrap(), 0.5, epsilon = 1e-9);
    }
}
