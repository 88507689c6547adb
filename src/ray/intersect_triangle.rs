//! The precision-generic Möller-Trumbore ray/triangle test.

use crate::precision::Precision;
use crate::EPSILON;
use nalgebra::Vector3;

/// Which triangle faces a ray may hit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Culling {
    /// Both faces are hit. Only rays (nearly) parallel to the plane are rejected.
    None,

    /// Only the face whose normal `e2 × e1` points against the ray is hit.
    Back,
}

/// A struct which is returned by [`intersects_triangle`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Intersection<T> {
    /// Distance from the ray origin to the intersection point.
    pub distance: T,

    /// Barycentric weight of the second corner.
    pub u: T,

    /// Barycentric weight of the third corner.
    pub v: T,
}

/// Implementation of the
/// [Möller-Trumbore triangle/ray intersection algorithm](https://en.wikipedia.org/wiki/M%C3%B6ller%E2%80%93Trumbore_intersection_algorithm),
/// shared by the double-precision construction primitives and the single-precision
/// packed primitives.
///
/// `origin_offset` is the ray origin minus the first corner, `e1` and `e2` are the
/// edges from the first corner to the second and third. Returns `None` when the ray is
/// parallel to the triangle (`|det| < EPSILON`), culled, outside the triangle, or when
/// the hit is not farther than `EPSILON`. Comparing against the ray's current best
/// distance is left to the caller, which works in `f64`.
///
/// # Examples
/// ```
/// use nalgebra::Vector3;
/// use voxel_bvh::ray::{intersects_triangle, Culling};
///
/// let hit = intersects_triangle(
///     &Vector3::new(0.25f32, 0.25, -2.0),
///     &Vector3::new(0.0, 0.0, 1.0),
///     &Vector3::new(1.0, 0.0, 0.0),
///     &Vector3::new(0.0, 1.0, 0.0),
///     Culling::None,
/// )
/// .unwrap();
/// assert_eq!(hit.distance, 2.0);
/// assert_eq!((hit.u, hit.v), (0.25, 0.25));
/// ```
#[allow(clippy::many_single_char_names)]
pub fn intersects_triangle<T: Precision>(
    origin_offset: &Vector3<T>,
    direction: &Vector3<T>,
    e1: &Vector3<T>,
    e2: &Vector3<T>,
    culling: Culling,
) -> Option<Intersection<T>> {
    let epsilon = T::narrow(EPSILON);

    // det = e1 . (d x e2) = d . (e2 x e1), the cosine against the face normal.
    let pvec = direction.cross(e2);
    let det = e1.dot(&pvec);
    let rejected = match culling {
        Culling::None => det > -epsilon && det < epsilon,
        Culling::Back => det > -epsilon,
    };
    if rejected {
        return None;
    }
    let recip = T::one() / det;

    let u = origin_offset.dot(&pvec) * recip;
    if u < T::zero() || u > T::one() {
        return None;
    }

    let qvec = origin_offset.cross(e1);
    let v = direction.dot(&qvec) * recip;
    if v < T::zero() || u + v > T::one() {
        return None;
    }

    let distance = e2.dot(&qvec) * recip;
    if distance > epsilon {
        Some(Intersection { distance, u, v })
    } else {
        None
    }
}
