//! Top-down construction of a [`Bvh`] by in-place partitioning.
//!
//! [`Bvh`]: struct.Bvh.html

use super::{Bvh, BvhNode, PackedNodes};
use crate::aabb::Aabb;
use crate::axis::Axis;
use crate::config::BuildConfig;
use crate::error::BvhError;
use crate::primitive::{PackedPrimitive, Primitive};
use crate::progress::ProgressListener;
use std::cmp::Ordering;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "rayon")]
use rayon::{ThreadPool, ThreadPoolBuilder};
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// How a range of primitives is divided into two children.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Sorts along the longest axis of the range's bounds and picks the
    /// split with the lowest surface area cost.
    SahMajorAxis,

    /// Evaluates the surface area cost along all three axes and keeps the
    /// cheapest. Ties prefer x, then y, then z.
    FullSah,

    /// Splits at the middle of the centroid bounds along their longest axis.
    Midpoint,
}

impl SplitStrategy {
    /// The registry name of this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            SplitStrategy::SahMajorAxis => "SAH_MA",
            SplitStrategy::FullSah => "SAH",
            SplitStrategy::Midpoint => "MIDPOINT",
        }
    }

    /// A one-line description for settings UIs.
    pub fn tooltip(&self) -> &'static str {
        match self {
            SplitStrategy::SahMajorAxis => "Fast and nearly optimal BVH building method.",
            SplitStrategy::FullSah => "Slower BVH building method that tries every axis.",
            SplitStrategy::Midpoint => "Very fast BVH building method with slower queries.",
        }
    }
}

/// A primitive together with its cached bounds.
#[derive(Debug)]
struct BuildItem {
    bounds: Aabb,
    primitive: PackedPrimitive,
}

/// Work left on the construction stack.
enum Task {
    /// Build the subtree over `start..end`, whose root is at `level`.
    Range {
        start: usize,
        end: usize,
        level: usize,
    },
    /// The left subtree of `parent` is done; its right subtree starts at the next node.
    Right {
        parent: usize,
        start: usize,
        end: usize,
        level: usize,
    },
    /// Both subtrees of the node covering `..end` are done.
    Finished { end: usize },
}

/// Builds binary trees with a fixed [`SplitStrategy`].
///
/// Primitives are partitioned in place, depth first and left to right. Each leaf covers a
/// contiguous range of the final permutation, so the primitives are handed to the [`Bvh`]
/// as they are once construction completes.
///
/// [`Bvh`]: struct.Bvh.html
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    strategy: SplitStrategy,
    config: BuildConfig,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<ThreadPool>>,
}

impl TreeBuilder {
    /// Creates a new [`TreeBuilder`]. Large sorts use the global rayon pool.
    pub fn new(strategy: SplitStrategy, config: BuildConfig) -> TreeBuilder {
        TreeBuilder {
            strategy,
            config,
            #[cfg(feature = "rayon")]
            pool: None,
        }
    }

    /// Creates a new [`TreeBuilder`] that sorts large ranges on its own pool of `threads` workers.
    #[cfg(feature = "rayon")]
    pub fn with_threads(
        strategy: SplitStrategy,
        config: BuildConfig,
        threads: usize,
    ) -> Result<TreeBuilder, BvhError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("bvh-sort-{}", i))
            .build()?;
        Ok(TreeBuilder::with_thread_pool(strategy, config, Arc::new(pool)))
    }

    /// Creates a new [`TreeBuilder`] that sorts large ranges on `pool`.
    #[cfg(feature = "rayon")]
    pub fn with_thread_pool(
        strategy: SplitStrategy,
        config: BuildConfig,
        pool: Arc<ThreadPool>,
    ) -> TreeBuilder {
        TreeBuilder {
            strategy,
            config,
            pool: Some(pool),
        }
    }

    /// The split strategy.
    pub fn strategy(&self) -> SplitStrategy {
        self.strategy
    }

    /// The build configuration.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Builds a [`Bvh`] over `primitives`, taking ownership of them.
    ///
    /// Progress is reported after each completed internal node with the end of the
    /// primitive range it covered, so the values run up to `primitives.len()`.
    ///
    /// [`Bvh`]: struct.Bvh.html
    pub fn build_tree(
        &self,
        primitives: Vec<PackedPrimitive>,
        progress: &mut dyn ProgressListener,
    ) -> Result<Bvh, BvhError> {
        self.config.validate()?;
        if primitives.is_empty() {
            return Ok(Bvh::empty());
        }

        let mut items = primitives
            .into_iter()
            .map(|primitive| BuildItem {
                bounds: primitive.bounds(),
                primitive,
            })
            .collect::<Vec<_>>();

        let mut nodes = Vec::with_capacity(2 * items.len() / self.config.leaf_threshold + 1);
        let mut depth = 0;
        let mut tasks = vec![Task::Range {
            start: 0,
            end: items.len(),
            level: 1,
        }];

        while let Some(task) = tasks.pop() {
            let (start, end, level) = match task {
                Task::Range { start, end, level } => (start, end, level),
                Task::Right {
                    parent,
                    start,
                    end,
                    level,
                } => {
                    let right = nodes.len();
                    if let Some(BvhNode::Internal { right_child, .. }) = nodes.get_mut(parent) {
                        *right_child = right;
                    }
                    (start, end, level)
                }
                Task::Finished { end } => {
                    progress.update(end);
                    continue;
                }
            };

            let range = &mut items[start..end];
            let bounds = range
                .iter()
                .fold(Aabb::empty(), |bounds, item| bounds.join(&item.bounds));

            if range.len() < self.config.leaf_threshold {
                nodes.push(BvhNode::Leaf {
                    bounds,
                    start,
                    count: range.len(),
                });
                depth = depth.max(level);
                continue;
            }

            let mid = start + self.partition(range, &bounds);
            let parent = nodes.len();
            nodes.push(BvhNode::Internal {
                bounds,
                right_child: 0,
            });
            tasks.push(Task::Finished { end });
            tasks.push(Task::Right {
                parent,
                start: mid,
                end,
                level: level + 1,
            });
            tasks.push(Task::Range {
                start,
                end: mid,
                level: level + 1,
            });
        }

        let primitives = items
            .into_iter()
            .map(|item| item.primitive)
            .collect::<Vec<_>>();
        let nodes = PackedNodes::from_nodes(&nodes)?;
        if i32::try_from(primitives.len()).is_err() {
            return Err(BvhError::TooManyPrimitives(primitives.len()));
        }

        log::info!(
            "Built {} BVH over {} primitives with {} nodes and depth {}",
            self.strategy.name(),
            primitives.len(),
            nodes.len(),
            depth
        );
        Ok(Bvh::from_parts(nodes, primitives, depth))
    }

    /// Reorders `items` and returns the size of the left part, in `1..items.len()`.
    fn partition(&self, items: &mut [BuildItem], bounds: &Aabb) -> usize {
        match self.strategy {
            SplitStrategy::SahMajorAxis => {
                let axis = bounds.largest_axis();
                self.sort(items, |item| item.bounds.min[axis]);
                sah_split(items, |item| &item.bounds).0 + 1
            }
            SplitStrategy::FullSah => {
                // Stable sorts are unique, so sorting an index list tells us exactly how the
                // items themselves will end up.
                let view: &[BuildItem] = items;
                let mut best: Option<(Axis, usize, f64)> = None;
                for axis in Axis::ALL {
                    let mut order = (0..view.len()).collect::<Vec<_>>();
                    self.sort(&mut order, |&i| view[i].bounds.min[axis]);
                    let (split, cost) = sah_split(&order, |&i| &view[i].bounds);
                    if best.map_or(true, |(_, _, best_cost)| cost < best_cost) {
                        best = Some((axis, split, cost));
                    }
                }
                let (axis, split) = best.map_or((Axis::X, 0), |(axis, split, _)| (axis, split));
                self.sort(items, |item| item.bounds.min[axis]);
                split + 1
            }
            SplitStrategy::Midpoint => {
                let centroids = items.iter().fold(Aabb::empty(), |centroids, item| {
                    centroids.grow(&item.bounds.center())
                });
                let axis = centroids.largest_axis();
                let middle = centroids.center()[axis];
                self.sort(items, |item| item.bounds.center()[axis]);
                let below = items
                    .iter()
                    .take_while(|item| item.bounds.center()[axis] < middle)
                    .count();
                below.clamp(1, items.len() - 1)
            }
        }
    }

    /// Stable sort by `key`, on the thread pool for long ranges.
    fn sort<T, F>(&self, slice: &mut [T], key: F)
    where
        T: Send,
        F: Fn(&T) -> f64 + Sync,
    {
        let compare = |a: &T, b: &T| -> Ordering { key(a).total_cmp(&key(b)) };
        if slice.len() > self.config.parallel_sort_threshold {
            self.sort_parallel(slice, compare);
        } else {
            slice.sort_by(compare);
        }
    }

    #[cfg(feature = "rayon")]
    fn sort_parallel<T, C>(&self, slice: &mut [T], compare: C)
    where
        T: Send,
        C: Fn(&T, &T) -> Ordering + Send + Sync,
    {
        log::trace!("Sorting {} primitives in parallel", slice.len());
        match &self.pool {
            Some(pool) => pool.install(|| slice.par_sort_by(compare)),
            None => slice.par_sort_by(compare),
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn sort_parallel<T, C>(&self, slice: &mut [T], compare: C)
    where
        C: Fn(&T, &T) -> Ordering,
    {
        slice.sort_by(compare);
    }
}

/// Finds the surface area heuristic split of `items`, which must be sorted and hold
/// at least two elements.
///
/// Returns `(i, cost)` for the cheapest split between element `i` and `i + 1`, where
/// the cost of a split is `area(0..=i) * (i + 1) + area(i + 1..) * (len - i - 1)`.
/// Ties go to the lowest `i`.
pub(crate) fn sah_split<'a, T, F>(items: &'a [T], bounds: F) -> (usize, f64)
where
    F: Fn(&'a T) -> &'a Aabb,
{
    let len = items.len();

    // right_area[i] is the area of the box around items[i + 1..].
    let mut right_area = vec![0.0; len];
    let mut right = Aabb::empty();
    for i in (0..len.saturating_sub(1)).rev() {
        right.join_mut(bounds(&items[i + 1]));
        right_area[i] = right.surface_area();
    }

    let mut best = (0, f64::INFINITY);
    let mut left = Aabb::empty();
    for i in 0..len.saturating_sub(1) {
        left.join_mut(bounds(&items[i]));
        let cost =
            left.surface_area() * (i + 1) as f64 + right_area[i] * (len - i - 1) as f64;
        if cost < best.1 {
            best = (i, cost);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::{sah_split, SplitStrategy, TreeBuilder};
    use crate::aabb::Aabb;
    use crate::bvh::{Bvh, BvhNode};
    use crate::config::BuildConfig;
    use crate::primitive::Primitive;
    use crate::testbase::{create_n_cubes, default_bounds, pack_all, small_triangle};
    use nalgebra::Point3;

    const STRATEGIES: [SplitStrategy; 3] = [
        SplitStrategy::SahMajorAxis,
        SplitStrategy::FullSah,
        SplitStrategy::Midpoint,
    ];

    fn unit_box_at(x: f64) -> Aabb {
        Aabb::from_extents(x, x + 1.0, 0.0, 1.0, 0.0, 1.0)
    }

    fn build_row(xs: &[f64], strategy: SplitStrategy, leaf_threshold: usize) -> Bvh {
        let triangles = xs
            .iter()
            .map(|&x| small_triangle(Point3::new(x, 0.0, 0.0), 1.0))
            .collect::<Vec<_>>();
        let config = BuildConfig {
            leaf_threshold,
            ..BuildConfig::default()
        };
        TreeBuilder::new(strategy, config)
            .build_tree(pack_all(&triangles), &mut ())
            .unwrap()
    }

    /// Collects `(start, count)` of all leaves in depth-first order.
    fn leaves(bvh: &Bvh) -> Vec<(usize, usize)> {
        (0..bvh.node_count())
            .filter_map(|i| match bvh.node(i) {
                Some(BvhNode::Leaf { start, count, .. }) => Some((start, count)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_sah_split_separates_clusters() {
        let boxes = [0.0, 1.0, 2.0, 100.0, 101.0]
            .iter()
            .map(|&x| unit_box_at(x))
            .collect::<Vec<_>>();
        let (split, _) = sah_split(&boxes, |b| b);
        assert_eq!(split, 2);
    }

    #[test]
    fn test_sah_split_ties_go_to_lowest_index() {
        let boxes = vec![unit_box_at(0.0); 4];
        let (split, cost) = sah_split(&boxes, |b| b);
        assert_eq!(split, 0);
        assert_eq!(cost, 6.0 * 4.0);
    }

    #[test]
    fn test_builder_picks_unambiguous_split() {
        // Two tight clusters far apart along x, given out of order.
        let xs = [100.0, 0.0, 101.5, 1.5, 103.0, 3.0];
        for strategy in STRATEGIES {
            let bvh = build_row(&xs, strategy, 4);
            match bvh.node(0) {
                Some(BvhNode::Internal { right_child, .. }) => {
                    assert_eq!(right_child, 2, "{:?}", strategy);
                    let left = bvh.node(1).unwrap();
                    let right = bvh.node(2).unwrap();
                    assert!(left.bounds().max.x < 10.0, "{:?}", strategy);
                    assert!(right.bounds().min.x > 90.0, "{:?}", strategy);
                }
                other => panic!("expected an internal root, got {:?}", other),
            }
            assert_eq!(leaves(&bvh), vec![(0, 3), (3, 3)]);
        }
    }

    #[test]
    fn test_range_below_threshold_is_leaf() {
        for strategy in STRATEGIES {
            let bvh = build_row(&[0.0, 1.0, 2.0], strategy, 4);
            assert_eq!(bvh.node_count(), 1);
            assert_eq!(bvh.depth(), 1);
            assert_eq!(leaves(&bvh), vec![(0, 3)]);
        }
    }

    #[test]
    fn test_range_at_threshold_splits_interior() {
        for strategy in STRATEGIES {
            let bvh = build_row(&[0.0, 0.0, 0.0, 0.0], strategy, 4);
            let leaves = leaves(&bvh);
            assert_eq!(leaves.len(), 2, "{:?}", strategy);
            assert!(leaves.iter().all(|&(_, count)| count > 0));
            assert_eq!(leaves[0].0 + leaves[0].1, leaves[1].0);
            assert_eq!(bvh.depth(), 2);
        }
    }

    #[test]
    fn test_leaf_threshold_two_puts_one_primitive_per_leaf() {
        let bvh = build_row(&[0.0, 3.0, 6.0, 9.0, 12.0], SplitStrategy::SahMajorAxis, 2);
        let leaves = leaves(&bvh);
        assert_eq!(leaves.len(), 5);
        assert!(leaves.iter().all(|&(_, count)| count == 1));
        assert_eq!(bvh.node_count(), 9);
    }

    #[test]
    fn test_leaves_cover_every_primitive_once() {
        let triangles = create_n_cubes(50, &default_bounds(), 7);
        for strategy in STRATEGIES {
            let bvh = TreeBuilder::new(strategy, BuildConfig::default())
                .build_tree(pack_all(&triangles), &mut ())
                .unwrap();
            let mut next = 0;
            for (start, count) in leaves(&bvh) {
                assert_eq!(start, next);
                next += count;
            }
            assert_eq!(next, triangles.len());
            assert_eq!(bvh.primitives().len(), triangles.len());
        }
    }

    #[test]
    fn test_node_bounds_contain_children() {
        let triangles = create_n_cubes(40, &default_bounds(), 3);
        let bvh = TreeBuilder::new(SplitStrategy::SahMajorAxis, BuildConfig::default())
            .build_tree(pack_all(&triangles), &mut ())
            .unwrap();
        for i in 0..bvh.node_count() {
            match bvh.node(i).unwrap() {
                BvhNode::Internal {
                    bounds,
                    right_child,
                } => {
                    assert!(bounds.contains_aabb(bvh.node(i + 1).unwrap().bounds()));
                    assert!(bounds.contains_aabb(bvh.node(right_child).unwrap().bounds()));
                    assert!(right_child > i + 1);
                }
                BvhNode::Leaf {
                    bounds,
                    start,
                    count,
                } => {
                    for primitive in &bvh.primitives()[start..start + count] {
                        assert!(bounds.contains_aabb(&primitive.bounds()));
                    }
                }
            }
        }
    }

    #[test]
    fn test_progress_reports_range_ends() {
        let mut updates = Vec::new();
        let xs = (0..16).map(|i| i as f64 * 2.0).collect::<Vec<_>>();
        let triangles = xs
            .iter()
            .map(|&x| small_triangle(Point3::new(x, 0.0, 0.0), 1.0))
            .collect::<Vec<_>>();
        let mut record = |done: usize| updates.push(done);
        TreeBuilder::new(SplitStrategy::SahMajorAxis, BuildConfig::default())
            .build_tree(pack_all(&triangles), &mut record)
            .unwrap();

        // The root completes last and covers everything.
        assert_eq!(updates.last(), Some(&16));
        assert!(updates.iter().all(|&done| done <= 16));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BuildConfig {
            leaf_threshold: 1,
            parallel_sort_threshold: 1,
        };
        let triangles = [small_triangle(Point3::origin(), 1.0)];
        assert!(TreeBuilder::new(SplitStrategy::SahMajorAxis, config)
            .build_tree(pack_all(&triangles), &mut ())
            .is_err());
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_parallel_sort_matches_inline_sort() {
        let triangles = create_n_cubes(100, &default_bounds(), 11);
        let inline = BuildConfig {
            leaf_threshold: 4,
            parallel_sort_threshold: usize::MAX,
        };
        let parallel = BuildConfig {
            leaf_threshold: 4,
            parallel_sort_threshold: 4,
        };
        for strategy in STRATEGIES {
            let a = TreeBuilder::new(strategy, inline)
                .build_tree(pack_all(&triangles), &mut ())
                .unwrap();
            let b = TreeBuilder::with_threads(strategy, parallel, 3)
                .unwrap()
                .build_tree(pack_all(&triangles), &mut ())
                .unwrap();
            assert_eq!(a.nodes(), b.nodes());
            assert_eq!(a.depth(), b.depth());

            let global = TreeBuilder::new(strategy, parallel)
                .build_tree(pack_all(&triangles), &mut ())
                .unwrap();
            assert_eq!(a.nodes(), global.nodes());
        }
    }
}
