use super::{Axis, Point3, Vector3, TOLERANCE};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb {
    /// Creates a box from corner points. `min` must be component-wise
    /// less than or equal to `max`.
    #[must_use]
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Creates a box from six coordinates.
    #[must_use]
    pub fn from_coords(x0: f64, y0: f64, z0: f64, x1: f64, y1: f64, z1: f64) -> Self {
        Self::new(Point3::new(x0, y0, z0), Point3::new(x1, y1, z1))
    }

    /// Extent along one axis.
    #[must_use]
    pub fn extent(&self, axis: Axis) -> f64 {
        let i = axis.index();
        self.max[i] - self.min[i]
    }

    /// Extents along all three axes.
    #[must_use]
    pub fn dims(&self) -> Vector3 {
        self.max - self.min
    }

    /// Box volume.
    #[must_use]
    pub fn volume(&self) -> f64 {
        let d = self.dims();
        d.x * d.y * d.z
    }

    /// Box grown by `margin` on both sides of each axis.
    #[must_use]
    pub fn grown(&self, margin: Vector3) -> Self {
        Self::new(self.min - margin, self.max + margin)
    }

    /// Copy of this box with the range along `axis` replaced by `[lo, hi]`.
    #[must_use]
    pub fn with_axis_range(&self, axis: Axis, lo: f64, hi: f64) -> Self {
        let i = axis.index();
        let mut out = *self;
        out.min[i] = lo;
        out.max[i] = hi;
        out
    }

    /// Smallest box enclosing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    /// Overlap of two boxes, or `None` when they do not overlap with
    /// positive extent on every axis. Contact slivers are rejected.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let mut min = Point3::origin();
        let mut max = Point3::origin();
        for i in 0..3 {
            min[i] = self.min[i].max(other.min[i]);
            max[i] = self.max[i].min(other.max[i]);
            if max[i] - min[i] <= TOLERANCE {
                return None;
            }
        }
        Some(Self::new(min, max))
    }

    /// True when every extent is above tolerance.
    #[must_use]
    pub fn is_proper(&self) -> bool {
        (0..3).all(|i| self.max[i] - self.min[i] > TOLERANCE)
    }
}
