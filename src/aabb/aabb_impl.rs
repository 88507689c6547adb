//! Axis Aligned Bounding Boxes.

use crate::axis::Axis;
use nalgebra::{Point3, Vector3};
use std::fmt;
use std::ops::Index;

/// Aabb struct.
///
/// Six doubles: a minimum and a maximum corner. A non-empty box satisfies
/// `min <= max` on every axis. Boxes with zero extent along any axis (flat
/// triangles aligned to a voxel face, for instance) are valid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    /// Minimum coordinates
    pub min: Point3<f64>,

    /// Maximum coordinates
    pub max: Point3<f64>,
}

impl Aabb {
    /// Creates a new [`Aabb`] with the given bounds.
    ///
    /// # Examples
    /// ```
    /// use voxel_bvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    /// assert_eq!(aabb.min.x, -1.0);
    /// assert_eq!(aabb.max.z, 1.0);
    /// ```
    pub fn with_bounds(min: Point3<f64>, max: Point3<f64>) -> Aabb {
        Aabb { min, max }
    }

    /// Creates a new [`Aabb`] from per-axis extents, in the order
    /// `xmin, xmax, ymin, ymax, zmin, zmax`.
    pub fn from_extents(xmin: f64, xmax: f64, ymin: f64, ymax: f64, zmin: f64, zmax: f64) -> Aabb {
        Aabb {
            min: Point3::new(xmin, ymin, zmin),
            max: Point3::new(xmax, ymax, zmax),
        }
    }

    /// Creates a new empty [`Aabb`].
    ///
    /// The empty box is the identity of [`Aabb::join`] and [`Aabb::grow`].
    ///
    /// # Examples
    /// ```
    /// use voxel_bvh::aabb::Aabb;
    ///
    /// let aabb = Aabb::empty();
    /// assert!(aabb.is_empty());
    /// ```
    pub fn empty() -> Aabb {
        Aabb {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Returns true if the [`Aabb`] contains no points at all.
    pub fn is_empty(&self) -> bool {
        !(self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z)
    }

    /// Returns true if the [`Point3`] is inside the [`Aabb`].
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Returns true if `other` lies completely within this [`Aabb`].
    pub fn contains_aabb(&self, other: &Aabb) -> bool {
        self.contains(&other.min) && self.contains(&other.max)
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and `other`.
    ///
    /// # Examples
    /// ```
    /// use voxel_bvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb1 = Aabb::with_bounds(Point3::new(-101.0, 0.0, 0.0), Point3::new(-100.0, 1.0, 1.0));
    /// let aabb2 = Aabb::with_bounds(Point3::new(100.0, 0.0, 0.0), Point3::new(101.0, 1.0, 1.0));
    /// let joint = aabb1.join(&aabb2);
    ///
    /// assert_eq!(joint.min, Point3::new(-101.0, 0.0, 0.0));
    /// assert_eq!(joint.max, Point3::new(101.0, 1.0, 1.0));
    /// ```
    pub fn join(&self, other: &Aabb) -> Aabb {
        Aabb::with_bounds(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Mutable version of [`Aabb::join`].
    pub fn join_mut(&mut self, other: &Aabb) {
        *self = self.join(other);
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and the point `other`.
    pub fn grow(&self, other: &Point3<f64>) -> Aabb {
        Aabb::with_bounds(self.min.inf(other), self.max.sup(other))
    }

    /// Mutable version of [`Aabb::grow`].
    pub fn grow_mut(&mut self, other: &Point3<f64>) {
        *self = self.grow(other);
    }

    /// Returns the size of this [`Aabb`] in all three dimensions.
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Returns the center [`Point3`] of the [`Aabb`].
    pub fn center(&self) -> Point3<f64> {
        self.min + (self.size() / 2.0)
    }

    /// Returns the total surface area of this [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use voxel_bvh::aabb::Aabb;
    ///
    /// let aabb = Aabb::from_extents(0.0, 1.0, 0.0, 2.0, 0.0, 3.0);
    /// assert_eq!(aabb.surface_area(), 22.0);
    /// ```
    pub fn surface_area(&self) -> f64 {
        let size = self.size();
        2.0 * (size.x * size.y + size.x * size.z + size.y * size.z)
    }

    /// Returns the axis along which the [`Aabb`] is stretched the most.
    /// Ties prefer X over Y over Z.
    ///
    /// # Examples
    /// ```
    /// use voxel_bvh::aabb::Aabb;
    /// use voxel_bvh::axis::Axis;
    ///
    /// let aabb = Aabb::from_extents(0.0, 1.0, 0.0, 5.0, 0.0, 5.0);
    /// assert_eq!(aabb.largest_axis(), Axis::Y);
    /// ```
    pub fn largest_axis(&self) -> Axis {
        Axis::largest(&self.size())
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}] - [{}, {}, {}]",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

impl Default for Aabb {
    fn default() -> Aabb {
        Aabb::empty()
    }
}

/// Make [`Aabb`]s indexable. `aabb[0]` gives a reference to the minimum bound.
/// All other indices return a reference to the maximum bound.
impl Index<usize> for Aabb {
    type Output = Point3<f64>;

    fn index(&self, index: usize) -> &Point3<f64> {
        if index == 0 {
            &self.min
        } else {
            &self.max
        }
    }
}
