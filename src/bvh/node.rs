//! This module defines [`BvhNode`], the decoded form of a node record.

use crate::aabb::Aabb;
use std::fmt;

/// A node of a [`Bvh`] in depth-first order.
///
/// The left child of an internal node is always the next node in the array, so
/// only the right child's index is stored.
///
/// [`Bvh`]: struct.Bvh.html
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BvhNode {
    /// Inner node.
    Internal {
        /// The convex hull of everything below this node.
        bounds: Aabb,

        /// Index of the right subtree's root node.
        right_child: usize,
    },

    /// Leaf node.
    Leaf {
        /// The convex hull of the primitives in this leaf.
        bounds: Aabb,

        /// Index of the first primitive in the leaf primitive array.
        start: usize,

        /// Number of primitives in this leaf.
        count: usize,
    },
}

impl BvhNode {
    /// Returns the bounds of this node.
    pub fn bounds(&self) -> &Aabb {
        match self {
            BvhNode::Internal { bounds, .. } | BvhNode::Leaf { bounds, .. } => bounds,
        }
    }

    /// Returns true for leaf nodes.
    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }
}

impl fmt::Display for BvhNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BvhNode::Internal {
                bounds,
                right_child,
            } => write!(f, "node right={} {}", right_child, bounds),
            BvhNode::Leaf {
                bounds,
                start,
                count,
            } => write!(f, "leaf primitives={}..{} {}", start, start + count, bounds),
        }
    }
}
