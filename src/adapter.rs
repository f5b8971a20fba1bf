use crate::error::{KernelError, Result};
use crate::kernel::{FacePatch, MeshKernel, SolidId};
use crate::math::Aabb;

/// Geometry operations the cut search needs, expressed over any
/// [`MeshKernel`]. Scratch boxes are created and destroyed inside each
/// call so the kernel never accumulates helper solids.
#[derive(Debug)]
pub struct GeometryAdapter<'k, K: MeshKernel> {
    kernel: &'k mut K,
}

impl<'k, K: MeshKernel> GeometryAdapter<'k, K> {
    pub fn new(kernel: &'k mut K) -> Self {
        Self { kernel }
    }

    /// Bounding box of a solid.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors, including [`KernelError::EmptySolid`].
    pub fn bounding_box(&self, solid: SolidId) -> Result<Aabb> {
        Ok(self.kernel.bounding_box(solid)?)
    }

    /// Bounding box of a solid, with empty solids mapped to `None`.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors other than [`KernelError::EmptySolid`].
    pub fn try_bounding_box(&self, solid: SolidId) -> Result<Option<Aabb>> {
        match self.kernel.bounding_box(solid) {
            Ok(bounds) => Ok(Some(bounds)),
            Err(KernelError::EmptySolid) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// New solid holding `solid ∩ bounds`. May be empty.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors.
    pub fn clip_to_box(&mut self, solid: SolidId, bounds: &Aabb, level: u32) -> Result<SolidId> {
        let scratch = self.kernel.make_box(bounds);
        if let Err(e) = self.kernel.intersect(solid, scratch, level) {
            // Keep the kernel clean even on the error path.
            let _ = self.kernel.destroy(scratch);
            return Err(e.into());
        }
        Ok(scratch)
    }

    /// Subtracts the box `bounds` from `solid` in place.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors.
    pub fn carve_box(&mut self, solid: SolidId, bounds: &Aabb, level: u32) -> Result<()> {
        let tool = self.kernel.make_box(bounds);
        let outcome = self.kernel.difference(tool, solid, level);
        let cleanup = self.kernel.destroy(tool);
        outcome?;
        cleanup?;
        Ok(())
    }

    /// Face summaries of a solid.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors.
    pub fn faces(&self, solid: SolidId) -> Result<Vec<FacePatch>> {
        Ok(self.kernel.faces(solid)?)
    }

    /// Destroys a scratch solid.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors.
    pub fn release(&mut self, solid: SolidId) -> Result<()> {
        Ok(self.kernel.destroy(solid)?)
    }
}
