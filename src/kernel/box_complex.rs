use slotmap::SlotMap;

use crate::error::KernelError;
use crate::math::{Aabb, Point3, Vector3};

use super::{FacePatch, MeshKernel, SolidId};

/// Exact mesh kernel over complexes of disjoint axis-aligned boxes.
///
/// Every solid is a set of pairwise disjoint boxes. Booleans against other
/// box complexes are exact: intersection clips box pairs, difference
/// splits each box into at most six fragments per subtracted box. Faces
/// are reported as one rectangular patch per box side.
///
/// Backs the tests and the demo; tessellating backends implement the same
/// [`MeshKernel`] trait.
#[derive(Debug, Default)]
pub struct BoxComplexKernel {
    solids: SlotMap<SolidId, Vec<Aabb>>,
}

impl BoxComplexKernel {
    /// Creates an empty kernel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact volume of a solid: sum of its box volumes.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::UnknownSolid`] for a stale id.
    pub fn volume(&self, solid: SolidId) -> Result<f64, KernelError> {
        Ok(self.boxes(solid)?.iter().map(Aabb::volume).sum())
    }

    /// Number of boxes making up a solid.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::UnknownSolid`] for a stale id.
    pub fn box_count(&self, solid: SolidId) -> Result<usize, KernelError> {
        Ok(self.boxes(solid)?.len())
    }

    fn boxes(&self, solid: SolidId) -> Result<&Vec<Aabb>, KernelError> {
        self.solids.get(solid).ok_or(KernelError::UnknownSolid)
    }

    fn boxes_mut(&mut self, solid: SolidId) -> Result<&mut Vec<Aabb>, KernelError> {
        self.solids.get_mut(solid).ok_or(KernelError::UnknownSolid)
    }
}

/// Fragments of `a \ b`, each with positive extent on every axis.
///
/// The overlap region is carved out by splitting along x first, then y,
/// then z, so the fragments are pairwise disjoint.
fn box_minus_box(a: &Aabb, b: &Aabb) -> Vec<Aabb> {
    let Some(overlap) = a.intersection(b) else {
        return vec![*a];
    };

    let mut out = Vec::new();

    // Slices of `a` left and right of the overlap along x.
    let lo_x = Aabb::new(a.min, Point3::new(overlap.min.x, a.max.y, a.max.z));
    let hi_x = Aabb::new(Point3::new(overlap.max.x, a.min.y, a.min.z), a.max);

    // Within the overlap's x range: slices below and above along y.
    let lo_y = Aabb::new(
        Point3::new(overlap.min.x, a.min.y, a.min.z),
        Point3::new(overlap.max.x, overlap.min.y, a.max.z),
    );
    let hi_y = Aabb::new(
        Point3::new(overlap.min.x, overlap.max.y, a.min.z),
        Point3::new(overlap.max.x, a.max.y, a.max.z),
    );

    // Within the overlap's x and y ranges: slices in front and behind along z.
    let lo_z = Aabb::new(
        Point3::new(overlap.min.x, overlap.min.y, a.min.z),
        Point3::new(overlap.max.x, overlap.max.y, overlap.min.z),
    );
    let hi_z = Aabb::new(
        Point3::new(overlap.min.x, overlap.min.y, overlap.max.z),
        Point3::new(overlap.max.x, overlap.max.y, a.max.z),
    );

    for piece in [lo_x, hi_x, lo_y, hi_y, lo_z, hi_z] {
        if piece.is_proper() {
            out.push(piece);
        }
    }
    out
}

/// Six rectangular face patches of a box.
fn box_faces(b: &Aabb, out: &mut Vec<FacePatch>) {
    let d = b.dims();
    let cx = f64::midpoint(b.min.x, b.max.x);
    let cy = f64::midpoint(b.min.y, b.max.y);
    let cz = f64::midpoint(b.min.z, b.max.z);

    let sides = [
        (Vector3::new(-1.0, 0.0, 0.0), d.y * d.z, Point3::new(b.min.x, cy, cz)),
        (Vector3::new(1.0, 0.0, 0.0), d.y * d.z, Point3::new(b.max.x, cy, cz)),
        (Vector3::new(0.0, -1.0, 0.0), d.x * d.z, Point3::new(cx, b.min.y, cz)),
        (Vector3::new(0.0, 1.0, 0.0), d.x * d.z, Point3::new(cx, b.max.y, cz)),
        (Vector3::new(0.0, 0.0, -1.0), d.x * d.y, Point3::new(cx, cy, b.min.z)),
        (Vector3::new(0.0, 0.0, 1.0), d.x * d.y, Point3::new(cx, cy, b.max.z)),
    ];
    for (normal, area, centroid) in sides {
        out.push(FacePatch {
            normal,
            area,
            centroid,
        });
    }
}

impl MeshKernel for BoxComplexKernel {
    fn make_box(&mut self, bounds: &Aabb) -> SolidId {
        self.solids.insert(vec![*bounds])
    }

    fn bounding_box(&self, solid: SolidId) -> Result<Aabb, KernelError> {
        let boxes = self.boxes(solid)?;
        let mut iter = boxes.iter();
        let first = iter.next().ok_or(KernelError::EmptySolid)?;
        Ok(iter.fold(*first, |acc, b| acc.union(b)))
    }

    fn intersect(
        &mut self,
        tool: SolidId,
        target: SolidId,
        _subdivision_level: u32,
    ) -> Result<(), KernelError> {
        let tool_boxes = self.boxes(tool)?.clone();
        let target_boxes = self.boxes_mut(target)?;
        let mut clipped = Vec::new();
        for t in target_boxes.iter() {
            for s in &tool_boxes {
                if let Some(overlap) = t.intersection(s) {
                    clipped.push(overlap);
                }
            }
        }
        *target_boxes = clipped;
        Ok(())
    }

    fn difference(
        &mut self,
        tool: SolidId,
        target: SolidId,
        _subdivision_level: u32,
    ) -> Result<(), KernelError> {
        let tool_boxes = self.boxes(tool)?.clone();
        let target_boxes = self.boxes_mut(target)?;
        for s in &tool_boxes {
            let mut remaining = Vec::new();
            for t in target_boxes.iter() {
                remaining.extend(box_minus_box(t, s));
            }
            *target_boxes = remaining;
        }
        Ok(())
    }

    fn destroy(&mut self, solid: SolidId) -> Result<(), KernelError> {
        self.solids
            .remove(solid)
            .map(|_| ())
            .ok_or(KernelError::UnknownSolid)
    }

    fn faces(&self, solid: SolidId) -> Result<Vec<FacePatch>, KernelError> {
        let boxes = self.boxes(solid)?;
        let mut out = Vec::with_capacity(boxes.len() * 6);
        for b in boxes {
            box_faces(b, &mut out);
        }
        Ok(out)
    }
}
