//! This module defines [`Bvh`] and the closest-hit query over it.
//!
//! [`Bvh`]: struct.Bvh.html
//!

use super::{BvhNode, PackedNodes};
use crate::primitive::{PackedPrimitive, Primitive};
use crate::ray::Ray;
use std::fmt::Write;

/// Something a ray can be tested against for its closest hit.
pub trait Intersectable: Send + Sync {
    /// Finds the closest hit along `ray` that is nearer than `ray.t`.
    ///
    /// Returns `true` if a hit was committed to `ray`. On `false` the ray is left
    /// exactly as it was.
    fn closest_intersection(&self, ray: &mut Ray) -> bool;
}

/// A packed bounding volume hierarchy.
///
/// Nodes are stored depth first in a [`PackedNodes`] array with the root at
/// index 0. Leaves refer to contiguous ranges of the primitive array. A built
/// [`Bvh`] is never modified again and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: PackedNodes,
    primitives: Vec<PackedPrimitive>,
    depth: usize,
}

impl Bvh {
    /// The BVH without any primitives. Every query misses.
    pub fn empty() -> Bvh {
        Bvh::default()
    }

    pub(crate) fn from_parts(
        nodes: PackedNodes,
        primitives: Vec<PackedPrimitive>,
        depth: usize,
    ) -> Bvh {
        Bvh {
            nodes,
            primitives,
            depth,
        }
    }

    /// The number of nodes on the longest path from the root to a leaf.
    /// A tree with a single leaf has depth 1, the empty BVH has depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The packed node array.
    pub fn nodes(&self) -> &PackedNodes {
        &self.nodes
    }

    /// The leaf primitives, in the order leaves refer to them.
    pub fn primitives(&self) -> &[PackedPrimitive] {
        &self.primitives
    }

    /// Decodes the node at `index`.
    pub fn node(&self, index: usize) -> Option<BvhNode> {
        self.nodes.node(index)
    }

    /// Renders the tree, one node per line, indented by depth.
    pub fn pretty_print(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(0, 0)];
        while let Some((index, level)) = stack.pop() {
            let Some(node) = self.node(index) else {
                continue;
            };
            let _ = writeln!(out, "{:indent$}{}: {}", "", index, node, indent = level * 2);
            if let BvhNode::Internal { right_child, .. } = node {
                stack.push((right_child, level + 1));
                stack.push((index + 1, level + 1));
            }
        }
        out
    }
}

impl Intersectable for Bvh {
    fn closest_intersection(&self, ray: &mut Ray) -> bool {
        let root = match self.node(0) {
            Some(root) => root,
            None => return false,
        };
        let entry = match ray.aabb_entry_distance(root.bounds()) {
            Some(entry) => entry,
            None => return false,
        };

        let mut hit = false;
        let mut stack = TraversalStack::new();
        stack.push(0, entry);

        while let Some((index, entry)) = stack.pop() {
            // The ray may have been shortened since this node was pushed.
            if entry >= ray.t {
                continue;
            }
            let Some(node) = self.node(index) else {
                continue;
            };
            match node {
                BvhNode::Leaf { start, count, .. } => {
                    for primitive in &self.primitives[start..start + count] {
                        hit |= primitive.intersect(ray);
                    }
                }
                BvhNode::Internal { right_child, .. } => {
                    let children = [index + 1, right_child];
                    let mut visits = children.iter().filter_map(|&child| {
                        let node = self.node(child)?;
                        let entry = ray.aabb_entry_distance(node.bounds())?;
                        Some((child, entry))
                    });
                    match (visits.next(), visits.next()) {
                        (Some(left), Some(right)) => {
                            // Visit the nearer child first.
                            let (near, far) = if right.1 < left.1 {
                                (right, left)
                            } else {
                                (left, right)
                            };
                            stack.push(far.0, far.1);
                            stack.push(near.0, near.1);
                        }
                        (Some(child), None) | (None, Some(child)) => stack.push(child.0, child.1),
                        (None, None) => {}
                    }
                }
            }
        }
        hit
    }
}

/// Number of traversal entries kept on the call stack before spilling to the heap.
const INLINE_STACK_SIZE: usize = 64;

/// The pending `(node index, entry distance)` pairs of one traversal.
///
/// Balanced trees never leave the inline part, so queries do not allocate. Degenerate
/// trees deeper than [`INLINE_STACK_SIZE`] spill the excess into a `Vec`.
struct TraversalStack {
    inline: [(usize, f64); INLINE_STACK_SIZE],
    len: usize,
    spill: Vec<(usize, f64)>,
}

impl TraversalStack {
    fn new() -> TraversalStack {
        TraversalStack {
            inline: [(0, 0.0); INLINE_STACK_SIZE],
            len: 0,
            spill: Vec::new(),
        }
    }

    fn push(&mut self, index: usize, entry: f64) {
        if self.len < INLINE_STACK_SIZE {
            self.inline[self.len] = (index, entry);
        } else {
            self.spill.push((index, entry));
        }
        self.len += 1;
    }

    fn pop(&mut self) -> Option<(usize, f64)> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        if self.len < INLINE_STACK_SIZE {
            Some(self.inline[self.len])
        } else {
            self.spill.pop()
        }
    }
}


#[cfg(all(feature = "bench", test))]
mod bench {
    use crate::bvh::{Bvh, Intersectable, SplitStrategy, TreeBuilder};
    use crate::config::BuildConfig;
    use crate::testbase::{create_n_cubes, create_n_rays, default_bounds, pack_all};

    fn build_n_cubes(n: usize, strategy: SplitStrategy, b: &mut ::test::Bencher) {
        let triangles = create_n_cubes(n, &default_bounds(), 0);
        let builder = TreeBuilder::new(strategy, BuildConfig::default());
        b.iter(|| builder.build_tree(pack_all(&triangles), &mut ()).unwrap());
    }

    fn intersect_n_cubes(n: usize, b: &mut ::test::Bencher) {
        let triangles = create_n_cubes(n, &default_bounds(), 0);
        let bvh: Bvh = TreeBuilder::new(SplitStrategy::SahMajorAxis, BuildConfig::default())
            .build_tree(pack_all(&triangles), &mut ())
            .unwrap();
        let rays = create_n_rays(1000, &default_bounds(), 1);
        b.iter(|| {
            for ray in &rays {
                let mut ray = ray.clone();
                bvh.closest_intersection(&mut ray);
            }
        });
    }

    #[bench]
    /// Benchmark the SAH_MA construction of 1,200 triangles.
    fn bench_build_1200_triangles_sah_ma(b: &mut ::test::Bencher) {
        build_n_cubes(100, SplitStrategy::SahMajorAxis, b);
    }

    #[bench]
    /// Benchmark the SAH_MA construction of 120,000 triangles.
    fn bench_build_120k_triangles_sah_ma(b: &mut ::test::Bencher) {
        build_n_cubes(10_000, SplitStrategy::SahMajorAxis, b);
    }

    #[bench]
    /// Benchmark the full SAH construction of 120,000 triangles.
    fn bench_build_120k_triangles_sah(b: &mut ::test::Bencher) {
        build_n_cubes(10_000, SplitStrategy::FullSah, b);
    }

    #[bench]
    /// Benchmark the midpoint construction of 120,000 triangles.
    fn bench_build_120k_triangles_midpoint(b: &mut ::test::Bencher) {
        build_n_cubes(10_000, SplitStrategy::Midpoint, b);
    }

    #[bench]
    /// Benchmark 1,000 closest-hit queries against 12,000 triangles.
    fn bench_intersect_12k_triangles(b: &mut ::test::Bencher) {
        intersect_n_cubes(1_000, b);
    }

    #[bench]
    /// Benchmark 1,000 closest-hit queries against 120,000 triangles.
    fn bench_intersect_120k_triangles(b: &mut ::test::Bencher) {
        intersect_n_cubes(10_000, b);
    }
}
