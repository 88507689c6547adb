//! This module holds the [`Ray`] definition and the Möller-Trumbore triangle test
//! shared by every primitive precision.
mod intersect_triangle;
mod ray_impl;

pub use self::intersect_triangle::*;
pub use self::ray_impl::*;
