//! Axis Aligned Bounding Boxes.

mod aabb_impl;
mod packed;

pub use aabb_impl::*;
pub use packed::*;
