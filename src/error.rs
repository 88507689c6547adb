//! Error types for BVH construction.

use thiserror::Error;

/// Errors that can occur while configuring or building a [`Bvh`].
///
/// Ray queries never fail; a miss is reported as `false`.
///
/// [`Bvh`]: ../bvh/struct.Bvh.html
#[derive(Error, Debug)]
pub enum BvhError {
    /// The leaf threshold does not allow every split to be strictly interior.
    #[error("leaf threshold must be at least 2, got {0}")]
    InvalidLeafThreshold(usize),

    /// Parallel sorting would kick in for ranges that become leaves.
    #[error("parallel sort threshold {parallel} is below the leaf threshold {leaf}")]
    InvalidParallelSortThreshold {
        /// The configured parallel sort threshold.
        parallel: usize,
        /// The configured leaf threshold.
        leaf: usize,
    },

    /// The node array does not fit the packed `i32` index space.
    #[error("BVH with {0} nodes exceeds the packed node index range")]
    TooManyNodes(usize),

    /// The leaf primitive array does not fit the packed `i32` index space.
    #[error("BVH with {0} primitives exceeds the packed primitive index range")]
    TooManyPrimitives(usize),

    /// The worker pool used for sorting could not be started.
    #[cfg(feature = "rayon")]
    #[error("failed to start the sort worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
