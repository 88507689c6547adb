//! This module defines the single-precision runtime triangle.

use super::{commit_textured_hit, PackedPrimitive, Primitive};
use crate::aabb::Aabb;
use crate::material::MaterialRef;
use crate::precision::Precision;
use crate::ray::{intersects_triangle, Culling, Ray};
use nalgebra::{Point3, Vector2, Vector3};

/// A textured triangle packed into single precision for traversal.
///
/// Corners are stored as absolute coordinates, edges and the normal are
/// recomputed on every test. Texture coordinates keep the rotated order of
/// [`TexturedTriangle`].
///
/// The [`Culling`] mode is copied from the construction triangle, so packing
/// never changes which faces are hit.
///
/// [`TexturedTriangle`]: struct.TexturedTriangle.html
#[derive(Debug, Clone)]
pub struct PackedTriangle {
    corners: [Point3<f32>; 3],
    uv: [Vector2<f32>; 3],
    material: MaterialRef,
    culling: Culling,
}

impl PackedTriangle {
    /// Narrows a triangle to single precision. `uv` holds the texture
    /// coordinates of the second, third and first corner.
    pub fn new(
        c1: Point3<f64>,
        c2: Point3<f64>,
        c3: Point3<f64>,
        uv: &[Vector2<f64>; 3],
        material: MaterialRef,
        culling: Culling,
    ) -> PackedTriangle {
        PackedTriangle {
            corners: [c1, c2, c3].map(|c| c.map(|x| x as f32)),
            uv: uv.map(|t| t.map(|x| x as f32)),
            material,
            culling,
        }
    }

    /// Returns the three corners.
    pub fn corners(&self) -> &[Point3<f32>; 3] {
        &self.corners
    }

    /// Returns the surface material.
    pub fn material(&self) -> &MaterialRef {
        &self.material
    }

    /// Returns which faces rays may hit.
    pub fn culling(&self) -> Culling {
        self.culling
    }
}

impl Primitive for PackedTriangle {
    fn intersect(&self, ray: &mut Ray) -> bool {
        let [c1, c2, c3] = self.corners;
        let e1 = c2 - c1;
        let e2 = c3 - c1;

        // The origin offset is taken in double precision before narrowing, which keeps
        // rays far from the world origin accurate.
        let origin_offset = (ray.origin - c1.map(f64::from)).map(f32::narrow);
        let direction = ray.direction.map(f32::narrow);

        match intersects_triangle(&origin_offset, &direction, &e1, &e2, self.culling) {
            Some(hit) if hit.distance.widen() < ray.t => {
                let uv = self.uv.map(|t| t.map(f64::from));
                commit_textured_hit(
                    ray,
                    hit.distance.widen(),
                    hit.u.widen(),
                    hit.v.widen(),
                    &uv,
                    &self.material,
                    || e2.cross(&e1).map(f64::from).normalize(),
                )
            }
            _ => false,
        }
    }

    fn bounds(&self) -> Aabb {
        let [c1, c2, c3] = self.corners;
        let min = c1.inf(&c2).inf(&c3).map(f64::from);
        let max = c1.sup(&c2).sup(&c3).map(f64::from);
        Aabb::with_bounds(min, max)
    }

    fn pack(&self) -> PackedPrimitive {
        PackedPrimitive::Triangle(self.clone())
    }
}

// Exposed for tests that need the normal without a hit.
#[cfg(test)]
impl PackedTriangle {
    pub(crate) fn normal(&self) -> Vector3<f64> {
        let [c1, c2, c3] = self.corners;
        (c3 - c1).cross(&(c2 - c1)).map(f64::from).normalize()
    }
}
