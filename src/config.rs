//! Build configuration.

use crate::error::BvhError;

/// Name of the builder used when nothing else is selected.
pub const DEFAULT_METHOD: &str = "SAH_MA";

/// Tuning knobs of the tree builders.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuildConfig {
    /// Ranges with fewer primitives than this become leaves.
    pub leaf_threshold: usize,

    /// Ranges with more primitives than this are sorted on the thread pool.
    pub parallel_sort_threshold: usize,
}

impl Default for BuildConfig {
    fn default() -> BuildConfig {
        BuildConfig {
            leaf_threshold: 4,
            parallel_sort_threshold: 10_000,
        }
    }
}

impl BuildConfig {
    /// Checks that the configuration can be built with.
    ///
    /// A leaf threshold below 2 would ask for splitting single primitives, and a
    /// parallel sort threshold below the leaf threshold would dispatch ranges that
    /// are never sorted.
    ///
    /// # Examples
    /// ```
    /// use voxel_bvh::config::BuildConfig;
    ///
    /// assert!(BuildConfig::default().validate().is_ok());
    /// let config = BuildConfig { leaf_threshold: 1, ..BuildConfig::default() };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), BvhError> {
        if self.leaf_threshold < 2 {
            return Err(BvhError::InvalidLeafThreshold(self.leaf_threshold));
        }
        if self.parallel_sort_threshold < self.leaf_threshold {
            return Err(BvhError::InvalidParallelSortThreshold {
                parallel: self.parallel_sort_threshold,
                leaf: self.leaf_threshold,
            });
        }
        Ok(())
    }
}

/// Settings read at startup to set up a [`BvhRegistry`].
///
/// [`BvhRegistry`]: ../bvh/struct.BvhRegistry.html
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BvhSettings {
    /// Name of the selected builder.
    pub method: String,

    /// Configuration shared by all builders.
    pub build: BuildConfig,
}

impl Default for BvhSettings {
    fn default() -> BvhSettings {
        BvhSettings {
            method: DEFAULT_METHOD.to_string(),
            build: BuildConfig::default(),
        }
    }
}
