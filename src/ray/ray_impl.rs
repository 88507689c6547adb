//! This module defines the per-query [`Ray`] state and the ray/[`Aabb`] slab test.

use crate::aabb::Aabb;
use crate::material::MaterialRef;
use crate::utils::{fast_max, fast_min};
use nalgebra::{Point3, Vector3};

/// A ray together with the state of the closest hit found so far.
///
/// Primitives only ever write the hit fields when they accept a hit that is
/// strictly closer than the current `t`, so `t` decreases monotonically during
/// a query. A ray is mutated by every query and must not be shared between
/// threads querying at the same time; give each worker its own.
#[derive(Debug, Clone)]
pub struct Ray {
    /// The ray origin.
    pub origin: Point3<f64>,

    /// The normalized ray direction.
    pub direction: Vector3<f64>,

    /// Inverse (1/x) ray direction. Cached for use in [`Aabb`] intersections.
    pub inv_direction: Vector3<f64>,

    /// Distance to the closest accepted hit, or the far bound if nothing was hit.
    pub t: f64,

    /// Interpolated texture U coordinate of the closest hit.
    pub u: f64,

    /// Interpolated texture V coordinate of the closest hit.
    pub v: f64,

    /// Unit geometric normal of the closest hit.
    pub normal: Vector3<f64>,

    /// RGBA color sampled at the closest hit.
    pub color: [f32; 4],

    /// Material of the closest hit.
    pub material: Option<MaterialRef>,
}

impl Ray {
    /// Creates a new [`Ray`] from an `origin` and a `direction`.
    /// `direction` will be normalized. The ray starts out with `t = +inf`.
    ///
    /// # Examples
    /// ```
    /// use voxel_bvh::ray::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let origin = Point3::new(0.0, 0.0, 0.0);
    /// let direction = Vector3::new(2.0, 0.0, 0.0);
    /// let ray = Ray::new(origin, direction);
    ///
    /// assert_eq!(ray.origin, origin);
    /// assert_eq!(ray.direction, Vector3::new(1.0, 0.0, 0.0));
    /// assert_eq!(ray.t, f64::INFINITY);
    /// ```
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Ray {
        let direction = direction.normalize();
        Ray {
            origin,
            direction,
            inv_direction: direction.map(|x| 1.0 / x),
            t: f64::INFINITY,
            u: 0.0,
            v: 0.0,
            normal: Vector3::zeros(),
            color: [0.0; 4],
            material: None,
        }
    }

    /// Points the ray somewhere else and clears the previous hit.
    pub fn set(&mut self, origin: Point3<f64>, direction: Vector3<f64>) {
        let direction = direction.normalize();
        self.origin = origin;
        self.direction = direction;
        self.inv_direction = direction.map(|x| 1.0 / x);
        self.reset();
    }

    /// Clears the hit state so the ray can be reused for a new query.
    pub fn reset(&mut self) {
        self.reset_far(f64::INFINITY);
    }

    /// Clears the hit state and limits the next query to hits closer than `far`.
    pub fn reset_far(&mut self, far: f64) {
        self.t = far;
        self.u = 0.0;
        self.v = 0.0;
        self.normal = Vector3::zeros();
        self.color = [0.0; 4];
        self.material = None;
    }

    /// Returns the point at distance `t` along the ray.
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// Returns the distance at which the ray enters `aabb`, clamped to zero when the
    /// origin is inside. Returns `None` if the ray misses the box or only reaches
    /// it at or beyond the current `t`, in which case nothing inside it can be closer.
    ///
    /// Boxes without thickness are hit. An axis along which the ray does not move
    /// does not constrain the result when the origin lies on the slab boundary.
    ///
    /// # Examples
    /// ```
    /// use voxel_bvh::aabb::Aabb;
    /// use voxel_bvh::ray::Ray;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let mut ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
    /// let aabb = Aabb::from_extents(99.9, 100.1, -1.0, 1.0, -1.0, 1.0);
    ///
    /// assert!((ray.aabb_entry_distance(&aabb).unwrap() - 99.9).abs() < 1e-9);
    /// ray.t = 50.0;
    /// assert!(ray.aabb_entry_distance(&aabb).is_none());
    /// ```
    pub fn aabb_entry_distance(&self, aabb: &Aabb) -> Option<f64> {
        let mut entry = 0.0;
        let mut exit = self.t;
        for axis in 0..3 {
            let t1 = (aabb.min[axis] - self.origin[axis]) * self.inv_direction[axis];
            let t2 = (aabb.max[axis] - self.origin[axis]) * self.inv_direction[axis];
            // NaN appears as the first argument so that it is ignored.
            entry = fast_max(fast_min(t1, t2), entry);
            exit = fast_min(fast_max(t1, t2), exit);
        }
        if entry <= exit && entry < self.t {
            Some(entry)
        } else {
            None
        }
    }

    /// Tests the intersection of a [`Ray`] with an [`Aabb`], within the current `t`.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.aabb_entry_distance(aabb).is_some()
    }

    /// Returns true if a hit has been committed since the last reset.
    pub fn has_hit(&self) -> bool {
        self.material.is_some()
    }
}
