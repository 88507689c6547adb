//! Ray-testable primitives, in their construction and packed runtime forms.

mod packed_triangle;
mod triangle;

pub use self::packed_triangle::*;
pub use self::triangle::*;

use crate::aabb::Aabb;
use crate::material::MaterialRef;
use crate::ray::Ray;
use nalgebra::{Vector2, Vector3};
use std::fmt::Debug;
use std::sync::Arc;

/// The smallest ray-testable unit of a scene.
pub trait Primitive: Debug + Send + Sync {
    /// Intersects `ray` with this primitive.
    ///
    /// Returns `true` and updates the hit state of `ray` only if the hit is
    /// strictly closer than `ray.t` and the material is not transparent at
    /// the hit point. Otherwise `ray` is left untouched.
    fn intersect(&self, ray: &mut Ray) -> bool;

    /// Returns the exact bounds of this primitive.
    fn bounds(&self) -> Aabb;

    /// Converts this primitive into its runtime representation.
    fn pack(&self) -> PackedPrimitive;
}

/// A primitive in the form stored in the leaves of a [`Bvh`].
///
/// Triangles are stored inline; any other [`Primitive`] kind is shared
/// behind an [`Arc`].
///
/// [`Bvh`]: ../bvh/struct.Bvh.html
#[derive(Debug, Clone)]
pub enum PackedPrimitive {
    /// A single-precision triangle.
    Triangle(PackedTriangle),

    /// Some other primitive kind.
    Shared(Arc<dyn Primitive>),
}

impl Primitive for PackedPrimitive {
    #[inline]
    fn intersect(&self, ray: &mut Ray) -> bool {
        match self {
            PackedPrimitive::Triangle(triangle) => triangle.intersect(ray),
            PackedPrimitive::Shared(primitive) => primitive.intersect(ray),
        }
    }

    fn bounds(&self) -> Aabb {
        match self {
            PackedPrimitive::Triangle(triangle) => triangle.bounds(),
            PackedPrimitive::Shared(primitive) => primitive.bounds(),
        }
    }

    fn pack(&self) -> PackedPrimitive {
        self.clone()
    }
}

impl From<PackedTriangle> for PackedPrimitive {
    fn from(triangle: PackedTriangle) -> PackedPrimitive {
        PackedPrimitive::Triangle(triangle)
    }
}

/// Samples `material` at the texture coordinate blended from `uv` with the
/// barycentric weights `(u, v, 1 - u - v)` and, unless it is transparent there,
/// commits the hit to `ray`.
pub(crate) fn commit_textured_hit(
    ray: &mut Ray,
    distance: f64,
    u: f64,
    v: f64,
    uv: &[Vector2<f64>; 3],
    material: &MaterialRef,
    normal: impl FnOnce() -> Vector3<f64>,
) -> bool {
    let w = 1.0 - u - v;
    let tex_u = uv[0].x * u + uv[1].x * v + uv[2].x * w;
    let tex_v = uv[0].y * u + uv[1].y * v + uv[2].y * w;
    let color = material.color(tex_u, tex_v);
    if color[3] > 0.0 {
        ray.t = distance;
        ray.u = tex_u;
        ray.v = tex_v;
        ray.color = color;
        ray.material = Some(Arc::clone(material));
        ray.normal = normal();
        true
    } else {
        false
    }
}
