//! The flat integer node array used at query time.

use super::BvhNode;
use crate::aabb::PackedAabb;
use crate::error::BvhError;

/// Number of `i32` values in one node record.
pub const RECORD_SIZE: usize = 8;

/// Nodes flattened into fixed-width records of eight `i32` values:
///
/// ```text
/// [child index or leaf marker, leaf count, xmin, xmax, ymin, ymax, zmin, zmax]
/// ```
///
/// An internal node stores the index of its right child, which is always
/// positive since the root sits at index 0, and a count of zero. A leaf stores
/// `-(start + 1)`, which is always negative, followed by its primitive count.
/// Bounds are the bit patterns of outward-rounded `f32` values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedNodes {
    data: Vec<i32>,
}

impl PackedNodes {
    /// Packs `nodes`. Fails when an index does not fit an `i32` record field.
    pub fn from_nodes(nodes: &[BvhNode]) -> Result<PackedNodes, BvhError> {
        if i32::try_from(nodes.len()).is_err() {
            return Err(BvhError::TooManyNodes(nodes.len()));
        }

        let mut data = Vec::with_capacity(nodes.len() * RECORD_SIZE);
        for node in nodes {
            let (head, count) = match *node {
                BvhNode::Internal { right_child, .. } => {
                    let right = i32::try_from(right_child)
                        .map_err(|_| BvhError::TooManyNodes(nodes.len()))?;
                    (right, 0)
                }
                BvhNode::Leaf { start, count, .. } => {
                    let end = start.saturating_add(count);
                    let marker = i32::try_from(start)
                        .ok()
                        .and_then(|start| start.checked_add(1))
                        .ok_or(BvhError::TooManyPrimitives(end))?;
                    let count = i32::try_from(count).map_err(|_| BvhError::TooManyPrimitives(end))?;
                    (-marker, count)
                }
            };
            data.push(head);
            data.push(count);
            data.extend_from_slice(&PackedAabb::from_aabb(node.bounds()).to_bits());
        }
        Ok(PackedNodes { data })
    }

    /// Number of node records.
    pub fn len(&self) -> usize {
        self.data.len() / RECORD_SIZE
    }

    /// Returns true if there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The raw integer records.
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    /// Decodes the record at `index`, or `None` if it is out of range.
    pub fn node(&self, index: usize) -> Option<BvhNode> {
        let record = self
            .data
            .get(index * RECORD_SIZE..(index + 1) * RECORD_SIZE)?;
        let mut bits = [0; 6];
        bits.copy_from_slice(&record[2..]);
        let bounds = PackedAabb::from_bits(bits).to_aabb();
        Some(if record[0] < 0 {
            BvhNode::Leaf {
                bounds,
                start: (-(record[0] + 1)) as usize,
                count: record[1] as usize,
            }
        } else {
            BvhNode::Internal {
                bounds,
                right_child: record[0] as usize,
            }
        })
    }
}
