//! This module defines the double-precision construction-time triangle.

use super::{commit_textured_hit, PackedPrimitive, PackedTriangle, Primitive};
use crate::aabb::Aabb;
use crate::material::MaterialRef;
use crate::ray::{intersects_triangle, Culling, Ray};
use nalgebra::{Point3, Vector2, Vector3};

/// A textured triangle in double precision, as produced by scene entities.
///
/// The triangle is stored as an origin corner plus two edges, which is the
/// form the intersection test works on. Texture coordinates are stored
/// rotated by one position (second, third, first corner) so that they line
/// up with the barycentric weights `(u, v, 1 - u - v)`.
#[derive(Debug, Clone)]
pub struct TexturedTriangle {
    /// Edge from the first to the second corner.
    pub e1: Vector3<f64>,

    /// Edge from the first to the third corner.
    pub e2: Vector3<f64>,

    /// The first corner.
    pub o: Point3<f64>,

    /// Unit geometric normal, `normalize(e2 × e1)`.
    pub n: Vector3<f64>,

    /// Texture coordinates of the second, third and first corner.
    pub uv: [Vector2<f64>; 3],

    /// Surface material.
    pub material: MaterialRef,

    /// Whether rays hitting the back face are accepted.
    pub double_sided: bool,

    bounds: Aabb,
}

impl TexturedTriangle {
    /// Creates a new double-sided triangle from three corners and their texture coordinates.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        c1: Point3<f64>,
        c2: Point3<f64>,
        c3: Point3<f64>,
        t1: Vector2<f64>,
        t2: Vector2<f64>,
        t3: Vector2<f64>,
        material: MaterialRef,
    ) -> TexturedTriangle {
        TexturedTriangle::with_sidedness(c1, c2, c3, t1, t2, t3, material, true)
    }

    /// Creates a new triangle. A single-sided triangle is only hit by rays travelling
    /// against its normal `normalize((c3 - c1) × (c2 - c1))`, both directly and
    /// after [`Primitive::pack`].
    ///
    /// [`Primitive::pack`]: trait.Primitive.html#tymethod.pack
    #[allow(clippy::too_many_arguments)]
    pub fn with_sidedness(
        c1: Point3<f64>,
        c2: Point3<f64>,
        c3: Point3<f64>,
        t1: Vector2<f64>,
        t2: Vector2<f64>,
        t3: Vector2<f64>,
        material: MaterialRef,
        double_sided: bool,
    ) -> TexturedTriangle {
        let e1 = c2 - c1;
        let e2 = c3 - c1;
        TexturedTriangle {
            e1,
            e2,
            o: c1,
            n: e2.cross(&e1).normalize(),
            uv: [t2, t3, t1],
            material,
            double_sided,
            bounds: Aabb::empty().grow(&c1).grow(&c2).grow(&c3),
        }
    }

    /// Returns the three corners in construction order.
    pub fn corners(&self) -> [Point3<f64>; 3] {
        [self.o, self.o + self.e1, self.o + self.e2]
    }

    /// Returns the texture coordinates of the three corners in construction order.
    pub fn texture_coordinates(&self) -> [Vector2<f64>; 3] {
        [self.uv[2], self.uv[0], self.uv[1]]
    }

    /// Returns a copy of this triangle moved by `offset`.
    pub fn translated(&self, offset: &Vector3<f64>) -> TexturedTriangle {
        let [c1, c2, c3] = self.corners();
        let [t1, t2, t3] = self.texture_coordinates();
        TexturedTriangle::with_sidedness(
            c1 + *offset,
            c2 + *offset,
            c3 + *offset,
            t1,
            t2,
            t3,
            self.material.clone(),
            self.double_sided,
        )
    }

    fn culling(&self) -> Culling {
        if self.double_sided {
            Culling::None
        } else {
            Culling::Back
        }
    }
}

impl Primitive for TexturedTriangle {
    fn intersect(&self, ray: &mut Ray) -> bool {
        let origin_offset = ray.origin - self.o;
        match intersects_triangle(
            &origin_offset,
            &ray.direction,
            &self.e1,
            &self.e2,
            self.culling(),
        ) {
            Some(hit) if hit.distance < ray.t => commit_textured_hit(
                ray,
                hit.distance,
                hit.u,
                hit.v,
                &self.uv,
                &self.material,
                || self.n,
            ),
            _ => false,
        }
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn pack(&self) -> PackedPrimitive {
        let [c1, c2, c3] = self.corners();
        PackedPrimitive::Triangle(PackedTriangle::new(
            c1,
            c2,
            c3,
            &self.uv,
            self.material.clone(),
            self.culling(),
        ))
    }
}
