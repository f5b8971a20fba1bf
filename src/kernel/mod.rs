pub mod box_complex;

pub use box_complex::BoxComplexKernel;

use crate::error::KernelError;
use crate::math::{Aabb, Point3, Vector3};

slotmap::new_key_type! {
    /// Generational id of a solid owned by a mesh kernel.
    pub struct SolidId;
}

/// Planar face summary used by the surface-area volume estimator.
///
/// `centroid` is the average of the face's vertices, which is what the
/// slab boundary test compares against, not the area centroid.
#[derive(Debug, Clone, Copy)]
pub struct FacePatch {
    pub normal: Vector3,
    pub area: f64,
    pub centroid: Point3,
}

/// Mesh backend seam for the cut search.
///
/// The search only ever needs axis-aligned scratch boxes, booleans between
/// a scratch box and a solid, bounding boxes and face summaries, so the
/// trait stays deliberately small. `subdivision_level` is a refinement
/// hint for tessellating backends; exact backends may ignore it.
pub trait MeshKernel {
    /// Creates an axis-aligned box solid.
    fn make_box(&mut self, bounds: &Aabb) -> SolidId;

    /// Axis-aligned bounding box of a solid.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::UnknownSolid`] for a stale id and
    /// [`KernelError::EmptySolid`] when the solid has no geometry.
    fn bounding_box(&self, solid: SolidId) -> Result<Aabb, KernelError>;

    /// Replaces `target` with `target ∩ tool`. `tool` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::UnknownSolid`] for a stale id.
    fn intersect(
        &mut self,
        tool: SolidId,
        target: SolidId,
        subdivision_level: u32,
    ) -> Result<(), KernelError>;

    /// Replaces `target` with `target \ tool`. `tool` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::UnknownSolid`] for a stale id.
    fn difference(
        &mut self,
        tool: SolidId,
        target: SolidId,
        subdivision_level: u32,
    ) -> Result<(), KernelError>;

    /// Removes a solid from the kernel.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::UnknownSolid`] for a stale id.
    fn destroy(&mut self, solid: SolidId) -> Result<(), KernelError>;

    /// Flat list of face summaries. An empty solid yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::UnknownSolid`] for a stale id.
    fn faces(&self, solid: SolidId) -> Result<Vec<FacePatch>, KernelError>;
}
