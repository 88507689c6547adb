//! This module defines a [`Bvh`], the builders that create it, and the
//! [`BvhRegistry`] that selects a builder by name.
//!
//! [`Bvh`]: struct.Bvh.html
//! [`BvhRegistry`]: struct.BvhRegistry.html
//!

mod build;
mod bvh_impl;
mod node;
mod packed;
mod registry;

pub use self::build::*;
pub use self::bvh_impl::*;
pub use self::node::*;
pub use self::packed::*;
pub use self::registry::*;
