//! Common utilities shared by unit tests.
#![cfg(test)]

use std::sync::Arc;

use nalgebra::{Point3, Vector2, Vector3};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::aabb::Aabb;
use crate::material::{Material, MaterialRef, SolidColor};
use crate::primitive::{PackedPrimitive, Primitive, TexturedTriangle};
use crate::ray::Ray;

/// A vector represented as a tuple
pub type TupleVec = (f64, f64, f64);

/// Generate a `TupleVec` for [`proptest::strategy::Strategy`] from -10e10 to 10e10
/// A small enough range to keep products of coordinates finite.
pub fn tuplevec_small_strategy() -> impl Strategy<Value = TupleVec> {
    (
        -10e10_f64..10e10_f64,
        -10e10_f64..10e10_f64,
        -10e10_f64..10e10_f64,
    )
}

/// Generate a `TupleVec` for [`proptest::strategy::Strategy`] from -10e30 to 10e30
/// Still inside the `f32` range, so narrowing never overflows.
pub fn tuplevec_large_strategy() -> impl Strategy<Value = TupleVec> {
    (
        -10e30_f64..10e30_f64,
        -10e30_f64..10e30_f64,
        -10e30_f64..10e30_f64,
    )
}

/// Convert a `TupleVec` to a [`Point3`].
pub fn tuple_to_point(tpl: &TupleVec) -> Point3<f64> {
    Point3::new(tpl.0, tpl.1, tpl.2)
}

/// Convert a `TupleVec` to a [`Vector3`].
pub fn tuple_to_vector(tpl: &TupleVec) -> Vector3<f64> {
    Vector3::new(tpl.0, tpl.1, tpl.2)
}

/// An opaque or transparent single color.
pub fn solid(rgba: [f32; 4]) -> MaterialRef {
    Arc::new(SolidColor::new(rgba))
}

/// Encodes the texture coordinate into the red and green channels.
#[derive(Debug)]
pub struct Gradient;

impl Material for Gradient {
    fn color(&self, u: f64, v: f64) -> [f32; 4] {
        [u as f32, v as f32, 0.0, 1.0]
    }
}

/// A material whose color is the sampled texture coordinate.
pub fn gradient() -> MaterialRef {
    Arc::new(Gradient)
}

/// The triangle `(0,0,0) (1,0,0) (0,1,0)` with texture coordinates equal to its x/y
/// position. Its normal points towards -z.
pub fn xy_triangle(material: MaterialRef, double_sided: bool) -> TexturedTriangle {
    TexturedTriangle::with_sidedness(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Vector2::new(0.0, 0.0),
        Vector2::new(1.0, 0.0),
        Vector2::new(0.0, 1.0),
        material,
        double_sided,
    )
}

/// A small triangle in the plane `z = pos.z` with its first corner at `pos`.
pub fn small_triangle(pos: Point3<f64>, size: f64) -> TexturedTriangle {
    TexturedTriangle::new(
        pos,
        pos + Vector3::new(size, 0.0, 0.0),
        pos + Vector3::new(0.0, size, 0.0),
        Vector2::new(0.0, 0.0),
        Vector2::new(1.0, 0.0),
        Vector2::new(0.0, 1.0),
        solid([1.0; 4]),
    )
}

/// Packs a set of construction triangles.
pub fn pack_all(triangles: &[TexturedTriangle]) -> Vec<PackedPrimitive> {
    triangles.iter().map(|t| t.pack()).collect()
}

/// Creates a unit size cube centered at `pos` and pushes its triangles to `shapes`.
/// All faces share `material`.
fn push_cube(pos: Point3<f64>, material: &MaterialRef, shapes: &mut Vec<TexturedTriangle>) {
    let top_front_right = pos + Vector3::new(0.5, 0.5, -0.5);
    let top_back_right = pos + Vector3::new(0.5, 0.5, 0.5);
    let top_back_left = pos + Vector3::new(-0.5, 0.5, 0.5);
    let top_front_left = pos + Vector3::new(-0.5, 0.5, -0.5);
    let bottom_front_right = pos + Vector3::new(0.5, -0.5, -0.5);
    let bottom_back_right = pos + Vector3::new(0.5, -0.5, 0.5);
    let bottom_back_left = pos + Vector3::new(-0.5, -0.5, 0.5);
    let bottom_front_left = pos + Vector3::new(-0.5, -0.5, -0.5);

    let faces = [
        (top_back_right, top_front_right, top_front_left),
        (top_front_left, top_back_left, top_back_right),
        (bottom_front_left, bottom_front_right, bottom_back_right),
        (bottom_back_right, bottom_back_left, bottom_front_left),
        (top_back_left, top_front_left, bottom_front_left),
        (bottom_front_left, bottom_back_left, top_back_left),
        (bottom_front_right, top_front_right, top_back_right),
        (top_back_right, bottom_back_right, bottom_front_right),
        (top_front_left, top_front_right, bottom_front_right),
        (bottom_front_right, bottom_front_left, top_front_left),
        (bottom_back_right, top_back_right, top_back_left),
        (top_back_left, bottom_back_left, bottom_back_right),
    ];
    for (a, b, c) in faces {
        shapes.push(TexturedTriangle::new(
            a,
            b,
            c,
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
            material.clone(),
        ));
    }
}

/// Returns an `Aabb` which defines the default testing space bounds.
pub fn default_bounds() -> Aabb {
    Aabb::from_extents(-20.0, 20.0, -20.0, 20.0, -20.0, 20.0)
}

/// Returns a random point inside `bounds`.
pub fn random_point(rng: &mut StdRng, bounds: &Aabb) -> Point3<f64> {
    Point3::new(
        rng.random_range(bounds.min.x..bounds.max.x),
        rng.random_range(bounds.min.y..bounds.max.y),
        rng.random_range(bounds.min.z..bounds.max.z),
    )
}

/// Creates `n` deterministic random cubes, each with its own opaque color.
/// Returns the `Vec` of surface triangles.
pub fn create_n_cubes(n: usize, bounds: &Aabb, seed: u64) -> Vec<TexturedTriangle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut triangles = Vec::with_capacity(n * 12);
    for i in 0..n {
        let material = solid([i as f32, 0.0, 0.0, 1.0]);
        push_cube(random_point(&mut rng, bounds), &material, &mut triangles);
    }
    triangles
}

/// Creates `n` deterministic random rays starting inside `bounds`.
pub fn create_n_rays(n: usize, bounds: &Aabb, seed: u64) -> Vec<Ray> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let origin = random_point(&mut rng, bounds);
            let target = random_point(&mut rng, bounds);
            Ray::new(origin, target - origin)
        })
        .collect()
}

/// The closest hit found by testing every primitive in order.
pub fn brute_force_closest(primitives: &[PackedPrimitive], ray: &mut Ray) -> bool {
    let mut hit = false;
    for primitive in primitives {
        hit |= primitive.intersect(ray);
    }
    hit
}
