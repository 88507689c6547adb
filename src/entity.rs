//! Scene entities, the input of BVH construction.

use crate::primitive::{Primitive, TexturedTriangle};
use nalgebra::Vector3;
use std::fmt::Debug;

/// Something in the scene that can produce primitives.
pub trait Entity: Debug + Send + Sync {
    /// Yields the construction-time primitives of this entity, moved by the
    /// world-space `offset`. May yield nothing.
    fn primitives(&self, offset: &Vector3<f64>) -> Box<dyn Iterator<Item = Box<dyn Primitive>> + '_>;
}

/// A fixed set of triangles given in entity-local coordinates.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    triangles: Vec<TexturedTriangle>,
}

impl Mesh {
    /// Creates a new [`Mesh`].
    pub fn new(triangles: Vec<TexturedTriangle>) -> Mesh {
        Mesh { triangles }
    }

    /// Returns the triangles in local coordinates.
    pub fn triangles(&self) -> &[TexturedTriangle] {
        &self.triangles
    }
}

impl Entity for Mesh {
    fn primitives(&self, offset: &Vector3<f64>) -> Box<dyn Iterator<Item = Box<dyn Primitive>> + '_> {
        let offset = *offset;
        Box::new(
            self.triangles
                .iter()
                .map(move |triangle| Box::new(triangle.translated(&offset)) as Box<dyn Primitive>),
        )
    }
}
