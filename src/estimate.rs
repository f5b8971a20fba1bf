//! Surface-area volume estimation.
//!
//! Slab volumes are never integrated exactly. Instead, each slab's share
//! of the solid is estimated from the area of its bounding cut surfaces:
//! faces whose normal aligns with the scan axis and whose average vertex
//! coordinate sits on the slab's far boundary (or the near boundary for
//! anti-aligned faces) contribute their area, weighted by how much of the
//! slab they actually cover. Normalizing the per-slab sums yields volume
//! ratios that sum to one.

use tracing::warn;

use crate::kernel::FacePatch;
use crate::math::{Axis, TOLERANCE};

/// Accumulated cut-surface area of one slab.
///
/// `near` and `far` bound the slab along `axis`; `interval` is their
/// distance. A face counts when its normal component along the axis is
/// within `normal_tolerance` of ±1 and its average vertex coordinate lies
/// within a tenth of the interval of the matching slab boundary: the far
/// boundary for aligned normals, the near boundary for anti-aligned ones.
/// Each face is weighted by the fraction of the slab it spans, so a face
/// in the middle of the slab contributes only its partial cover.
#[must_use]
pub fn slab_cut_area(
    faces: &[FacePatch],
    axis: Axis,
    near: f64,
    far: f64,
    interval: f64,
    normal_tolerance: f64,
) -> f64 {
    let i = axis.index();
    let band = interval / 10.0;
    let mut area = 0.0;

    for face in faces {
        let n = face.normal[i];
        let coord = face.centroid[i];
        if (n - 1.0).abs() <= normal_tolerance {
            if coord >= far - band {
                area += face.area * (coord - near) / interval;
            }
        } else if (n + 1.0).abs() <= normal_tolerance && coord <= near + band {
            area += face.area * (far - coord) / interval;
        }
    }
    area
}

/// Normalizes per-slab areas into volume ratios summing to one.
///
/// Returns `None` when the total area is not positive, which happens on
/// degenerate input (no axis-aligned cut surface anywhere along the
/// scan). Callers treat that as "no viable split on this axis".
#[must_use]
pub fn volume_ratios(areas: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = areas.iter().sum();
    if total <= TOLERANCE {
        warn!(total, slabs = areas.len(), "degenerate area estimate");
        return None;
    }
    Some(areas.iter().map(|a| a / total).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};

    fn patch(normal: Vector3, area: f64, centroid: Point3) -> FacePatch {
        FacePatch {
            normal,
            area,
            centroid,
        }
    }

    const NORMAL_TOL: f64 = 0.03;

    #[test]
    fn full_cover_faces_count_fully() {
        // Slab [0.2, 0.3] of a unit cube scanned along y: the +y cut at
        // 0.3 and the -y cut at 0.2 each cover the whole slab.
        let faces = [
            patch(Vector3::new(0.0, 1.0, 0.0), 1.0, Point3::new(0.5, 0.3, 0.5)),
            patch(Vector3::new(0.0, -1.0, 0.0), 1.0, Point3::new(0.5, 0.2, 0.5)),
        ];
        let a = slab_cut_area(&faces, Axis::Y, 0.2, 0.3, 0.1, NORMAL_TOL);
        assert!((a - 2.0).abs() < 1e-12, "a={a}");
    }

    #[test]
    fn faces_off_the_boundary_are_ignored() {
        // A +y face in the middle of the slab is interior geometry, not a
        // slab cut surface.
        let faces = [patch(
            Vector3::new(0.0, 1.0, 0.0),
            1.0,
            Point3::new(0.5, 0.25, 0.5),
        )];
        let a = slab_cut_area(&faces, Axis::Y, 0.2, 0.3, 0.1, NORMAL_TOL);
        assert!(a.abs() < 1e-12, "a={a}");
    }

    #[test]
    fn misaligned_normals_are_ignored() {
        let tilted = Vector3::new(0.1, 0.9, 0.0).normalize();
        let faces = [
            patch(tilted, 1.0, Point3::new(0.5, 0.3, 0.5)),
            patch(Vector3::new(1.0, 0.0, 0.0), 1.0, Point3::new(1.0, 0.3, 0.5)),
        ];
        let a = slab_cut_area(&faces, Axis::Y, 0.2, 0.3, 0.1, NORMAL_TOL);
        assert!(a.abs() < 1e-12, "a={a}");
    }

    #[test]
    fn partial_cover_is_weighted() {
        // A +y face near the far boundary at 0.295 covers 95% of the slab.
        let faces = [patch(
            Vector3::new(0.0, 1.0, 0.0),
            2.0,
            Point3::new(0.5, 0.295, 0.5),
        )];
        let a = slab_cut_area(&faces, Axis::Y, 0.2, 0.3, 0.1, NORMAL_TOL);
        assert!((a - 2.0 * 0.95).abs() < 1e-12, "a={a}");
    }

    #[test]
    fn anti_aligned_faces_use_near_boundary() {
        let faces = [patch(
            Vector3::new(0.0, -1.0, 0.0),
            1.0,
            Point3::new(0.5, 0.205, 0.5),
        )];
        let a = slab_cut_area(&faces, Axis::Y, 0.2, 0.3, 0.1, NORMAL_TOL);
        assert!((a - 0.95).abs() < 1e-12, "a={a}");
    }

    #[test]
    fn ratios_normalize_to_one() {
        let ratios = volume_ratios(&[2.0, 2.0, 4.0]).unwrap();
        let sum: f64 = ratios.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12, "sum={sum}");
        assert!((ratios[0] - 0.25).abs() < 1e-12);
        assert!((ratios[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_total_area_is_degenerate() {
        assert!(volume_ratios(&[0.0, 0.0, 0.0]).is_none());
        assert!(volume_ratios(&[]).is_none());
    }
}
