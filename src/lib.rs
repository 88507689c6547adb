#![cfg_attr(feature = "bench", feature(test))]
#![warn(missing_docs)]
//! A crate which builds and queries a packed binary bounding volume hierarchy
//! over textured triangles, as used by a voxel-world ray tracer.
//!
//! ## About
//!
//! Scenes are described by entities which produce construction-time primitives
//! in double precision. Before building, every primitive is packed into its
//! compact single-precision runtime form. The hierarchy is then built with a
//! surface area heuristic splitting along the major axis (`SAH_MA`), and
//! flattened into a cache friendly array of fixed-width integer records.
//!
//! Once built, a [`Bvh`](bvh::Bvh) is immutable. Any number of threads may
//! query it at the same time, as long as every thread owns its own
//! [`Ray`](ray::Ray).
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use nalgebra::{Point3, Vector2, Vector3};
//! use voxel_bvh::bvh::{BvhRegistry, Intersectable};
//! use voxel_bvh::entity::{Entity, Mesh};
//! use voxel_bvh::material::SolidColor;
//! use voxel_bvh::primitive::TexturedTriangle;
//! use voxel_bvh::ray::Ray;
//!
//! let stone = Arc::new(SolidColor::new([0.5, 0.5, 0.5, 1.0]));
//! let triangle = TexturedTriangle::new(
//!     Point3::new(-1.0, -1.0, 5.0),
//!     Point3::new(1.0, -1.0, 5.0),
//!     Point3::new(0.0, 1.0, 5.0),
//!     Vector2::new(0.0, 0.0),
//!     Vector2::new(1.0, 0.0),
//!     Vector2::new(0.0, 1.0),
//!     stone,
//! );
//! let entities: Vec<Box<dyn Entity>> = vec![Box::new(Mesh::new(vec![triangle]))];
//!
//! let registry = BvhRegistry::default();
//! let bvh = registry
//!     .create(&entities, Vector3::zeros(), &mut ())
//!     .expect("valid default configuration");
//!
//! let mut ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, 1.0));
//! assert!(bvh.closest_intersection(&mut ray));
//! assert!((ray.t - 5.0).abs() < 1e-6);
//! ```
//!
//! ## Features
//!
//! - `rayon` (default **enabled**) - sorts of large primitive ranges run on a rayon thread pool
//! - `serde` (default **disabled**) - adds `Serialize` and `Deserialize` implementations for the
//!   build configuration
//! - `bench` (default **disabled**) - nightly benchmarks
//!

#[cfg(all(feature = "bench", test))]
extern crate test;

/// A minimal floating value used both as the parallel-determinant threshold and
/// as the lower bound for accepted hit distances.
pub const EPSILON: f64 = 0.000001;

pub mod aabb;
pub mod axis;
pub mod bvh;
pub mod config;
pub mod entity;
pub mod error;
pub mod material;
pub mod precision;
pub mod primitive;
pub mod progress;
pub mod ray;
mod utils;

#[cfg(test)]
mod testbase;
