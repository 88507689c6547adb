//! Single-precision bounds for the flattened node array.

use super::Aabb;
use crate::utils::{narrow_down, narrow_up};

/// An [`Aabb`] narrowed to single precision.
///
/// The narrowing rounds outward: minimum coordinates round down and maximum
/// coordinates round up, so the packed box always contains the box it was
/// made from. The six values are stored in `xmin, xmax, ymin, ymax, zmin, zmax`
/// order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PackedAabb(pub [f32; 6]);

impl PackedAabb {
    /// Narrows `aabb`, rounding outward.
    pub fn from_aabb(aabb: &Aabb) -> PackedAabb {
        PackedAabb([
            narrow_down(aabb.min.x),
            narrow_up(aabb.max.x),
            narrow_down(aabb.min.y),
            narrow_up(aabb.max.y),
            narrow_down(aabb.min.z),
            narrow_up(aabb.max.z),
        ])
    }

    /// Widens back to a double-precision [`Aabb`].
    pub fn to_aabb(&self) -> Aabb {
        let [xmin, xmax, ymin, ymax, zmin, zmax] = self.0.map(f64::from);
        Aabb::from_extents(xmin, xmax, ymin, ymax, zmin, zmax)
    }

    /// Encodes the bounds as the bit patterns of the six `f32` values.
    /// Every `f32`, including infinities and signed zeros, survives the trip.
    pub fn to_bits(&self) -> [i32; 6] {
        self.0.map(|x| x.to_bits() as i32)
    }

    /// Inverse of [`PackedAabb::to_bits`].
    pub fn from_bits(bits: [i32; 6]) -> PackedAabb {
        PackedAabb(bits.map(|x| f32::from_bits(x as u32)))
    }
}
