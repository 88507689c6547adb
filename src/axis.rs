//! Axis enum for indexing three-dimensional structures.

use nalgebra::{Point3, Vector3};
use std::ops::Index;

/// An `Axis` in a three-dimensional coordinate system.
/// Used to access `Vector3`/`Point3` structs via index.
///
/// # Examples
/// ```
/// use voxel_bvh::axis::Axis;
///
/// let position = [1.0, 0.5, 42.0];
///
/// assert_eq!(position[Axis::Y], 0.5);
/// ```
///
/// [`Point3`] and [`Vector3`] are also indexable using `Axis`.
///
/// ```
/// use nalgebra::Point3;
/// use voxel_bvh::axis::Axis;
///
/// let position: Point3<f64> = Point3::new(1.0, 2.0, 3.0);
///
/// assert_eq!(position[Axis::Z], 3.0);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Index of the X axis.
    X = 0,

    /// Index of the Y axis.
    Y = 1,

    /// Index of the Z axis.
    Z = 2,
}

impl Axis {
    /// All axes, in tie-breaking priority order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns the axis along which `extent` is largest.
    /// Ties prefer X over Y over Z.
    pub fn largest(extent: &Vector3<f64>) -> Axis {
        if extent.x >= extent.y && extent.x >= extent.z {
            Axis::X
        } else if extent.y >= extent.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }
}

/// Make slices indexable by `Axis`.
impl Index<Axis> for [f64] {
    type Output = f64;

    fn index(&self, axis: Axis) -> &f64 {
        &self[axis as usize]
    }
}

/// Make `Point3` indexable by `Axis`.
impl Index<Axis> for Point3<f64> {
    type Output = f64;

    fn index(&self, axis: Axis) -> &f64 {
        &self[axis as usize]
    }
}

/// Make `Vector3` indexable by `Axis`.
impl Index<Axis> for Vector3<f64> {
    type Output = f64;

    fn index(&self, axis: Axis) -> &f64 {
        &self[axis as usize]
    }
}
