//! Name-based selection of BVH builders.

use super::{Bvh, SplitStrategy, TreeBuilder};
use crate::config::{BvhSettings, DEFAULT_METHOD};
use crate::entity::Entity;
use crate::error::BvhError;
use crate::primitive::PackedPrimitive;
use crate::progress::{IntervalProgress, ProgressListener, ScaledProgress};
use nalgebra::Vector3;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Progress units announced by [`BvhBuilder::create`].
pub const PROGRESS_TARGET: usize = 1000;

/// A BVH construction method.
pub trait BvhBuilder: Debug + Send + Sync {
    /// Builds a [`Bvh`] over already packed primitives.
    ///
    /// Progress values run from 0 up to `primitives.len()`.
    ///
    /// [`Bvh`]: struct.Bvh.html
    fn build(
        &self,
        primitives: Vec<PackedPrimitive>,
        progress: &mut dyn ProgressListener,
    ) -> Result<Bvh, BvhError>;

    /// A one-line description for settings UIs.
    fn tooltip(&self) -> &str;

    /// Collects and packs the primitives of `entities`, moved by `offset`, and builds
    /// a [`Bvh`] over them.
    ///
    /// Progress is announced as [`PROGRESS_TARGET`] units: the first half while
    /// collecting entities, the second half while building.
    ///
    /// [`Bvh`]: struct.Bvh.html
    fn create(
        &self,
        entities: &[Box<dyn Entity>],
        offset: Vector3<f64>,
        progress: &mut dyn ProgressListener,
    ) -> Result<Bvh, BvhError> {
        let half = PROGRESS_TARGET / 2;
        let mut progress = IntervalProgress::new(progress, 1);
        progress.set_target(PROGRESS_TARGET);
        progress.update(0);

        let mut primitives = Vec::with_capacity(entities.len());
        {
            let mut collecting = ScaledProgress::new(&mut progress, 0, half, entities.len());
            for (done, entity) in entities.iter().enumerate() {
                primitives.extend(entity.primitives(&offset).map(|primitive| primitive.pack()));
                collecting.update(done + 1);
            }
        }

        let total = primitives.len();
        let mut building = ScaledProgress::new(&mut progress, half, half, total);
        self.build(primitives, &mut building)
    }
}

impl BvhBuilder for TreeBuilder {
    fn build(
        &self,
        primitives: Vec<PackedPrimitive>,
        progress: &mut dyn ProgressListener,
    ) -> Result<Bvh, BvhError> {
        self.build_tree(primitives, progress)
    }

    fn tooltip(&self) -> &str {
        self.strategy().tooltip()
    }
}

/// The set of known BVH builders and the one currently selected.
///
/// Build one at startup from [`BvhSettings`] and pass it to whoever constructs
/// scenes.
///
/// # Examples
/// ```
/// use voxel_bvh::bvh::BvhRegistry;
///
/// let mut registry = BvhRegistry::default();
/// assert_eq!(registry.names(), vec!["MIDPOINT", "SAH", "SAH_MA"]);
/// registry.select("SAH");
/// assert_eq!(registry.selected(), "SAH");
/// ```
///
/// [`BvhSettings`]: ../config/struct.BvhSettings.html
#[derive(Debug, Clone)]
pub struct BvhRegistry {
    builders: HashMap<String, Arc<dyn BvhBuilder>>,
    selected: String,
}

impl BvhRegistry {
    /// Creates a registry with the `SAH_MA`, `SAH` and `MIDPOINT` builders and selects
    /// `settings.method`.
    pub fn new(settings: &BvhSettings) -> Result<BvhRegistry, BvhError> {
        settings.build.validate()?;
        Ok(BvhRegistry::with_builtin_builders(settings))
    }

    fn with_builtin_builders(settings: &BvhSettings) -> BvhRegistry {
        let mut registry = BvhRegistry {
            builders: HashMap::new(),
            selected: settings.method.clone(),
        };
        for strategy in [
            SplitStrategy::SahMajorAxis,
            SplitStrategy::FullSah,
            SplitStrategy::Midpoint,
        ] {
            registry.register(
                strategy.name(),
                Arc::new(TreeBuilder::new(strategy, settings.build)),
            );
        }
        registry
    }

    /// Adds or replaces the builder called `name`.
    pub fn register(&mut self, name: &str, builder: Arc<dyn BvhBuilder>) {
        self.builders.insert(name.to_string(), builder);
    }

    /// Selects the builder used by [`BvhRegistry::create`]. Unknown names are kept and
    /// fall back to the default builder when used.
    pub fn select(&mut self, name: &str) {
        log::debug!("Selected BVH method {}", name);
        self.selected = name.to_string();
    }

    /// The name of the selected builder.
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Returns the builder called `name`, or the default builder if there is none.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn BvhBuilder>> {
        self.builders.get(name).or_else(|| {
            log::debug!("Unknown BVH method {}, using {}", name, DEFAULT_METHOD);
            self.builders.get(DEFAULT_METHOD)
        })
    }

    /// The sorted names of all registered builders.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.builders.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// The tooltip of the builder called `name`.
    pub fn tooltip(&self, name: &str) -> Option<&str> {
        self.builders.get(name).map(|builder| builder.tooltip())
    }

    /// Builds a [`Bvh`] over `entities` with the selected builder.
    ///
    /// Without entities this returns [`Bvh::empty`] right away, without reporting
    /// any progress.
    ///
    /// [`Bvh`]: struct.Bvh.html
    /// [`Bvh::empty`]: struct.Bvh.html#method.empty
    pub fn create(
        &self,
        entities: &[Box<dyn Entity>],
        offset: Vector3<f64>,
        progress: &mut dyn ProgressListener,
    ) -> Result<Bvh, BvhError> {
        if entities.is_empty() {
            return Ok(Bvh::empty());
        }
        match self.get(&self.selected) {
            Some(builder) => builder.create(entities, offset, progress),
            None => TreeBuilder::new(SplitStrategy::SahMajorAxis, Default::default())
                .create(entities, offset, progress),
        }
    }
}

impl Default for BvhRegistry {
    fn default() -> BvhRegistry {
        BvhRegistry::with_builtin_builders(&BvhSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{BvhBuilder, BvhRegistry, PROGRESS_TARGET};
    use crate::bvh::{Bvh, Intersectable};
    use crate::config::{BuildConfig, BvhSettings};
    use crate::entity::{Entity, Mesh};
    use crate::error::BvhError;
    use crate::primitive::PackedPrimitive;
    use crate::progress::ProgressListener;
    use crate::ray::Ray;
    use crate::testbase::{create_n_cubes, default_bounds, tuple_to_vector};
    use nalgebra::{Point3, Vector3};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts calls and builds nothing.
    #[derive(Debug, Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl BvhBuilder for Counting {
        fn build(
            &self,
            _primitives: Vec<PackedPrimitive>,
            _progress: &mut dyn ProgressListener,
        ) -> Result<Bvh, BvhError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Bvh::empty())
        }

        fn tooltip(&self) -> &str {
            "counts"
        }
    }

    #[derive(Default)]
    struct Recorder {
        target: Option<usize>,
        updates: Vec<usize>,
    }

    impl ProgressListener for Recorder {
        fn set_target(&mut self, target: usize) {
            self.target = Some(target);
        }

        fn update(&mut self, done: usize) {
            self.updates.push(done);
        }
    }

    fn cube_entities() -> Vec<Box<dyn Entity>> {
        (0..4)
            .map(|seed| {
                Box::new(Mesh::new(create_n_cubes(25, &default_bounds(), seed))) as Box<dyn Entity>
            })
            .collect()
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let counting = Arc::new(Counting::default());
        let mut registry = BvhRegistry::default();
        registry.register("SAH_MA", counting.clone());

        let mut recorder = Recorder::default();
        let bvh = registry
            .create(&[], Vector3::zeros(), &mut recorder)
            .unwrap();

        assert_eq!(bvh.node_count(), 0);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
        assert!(recorder.updates.is_empty());
    }

    #[test]
    fn test_unknown_method_falls_back_to_default() {
        let counting = Arc::new(Counting::default());
        let mut registry = BvhRegistry::default();
        registry.register("SAH_MA", counting.clone());
        registry.select("OCTREE");

        registry
            .create(&cube_entities(), Vector3::zeros(), &mut ())
            .unwrap();
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.selected(), "OCTREE");
    }

    #[test]
    fn test_tooltips() {
        let registry = BvhRegistry::default();
        for name in registry.names() {
            assert!(!registry.tooltip(name).unwrap().is_empty());
        }
        assert_eq!(
            registry.tooltip("SAH_MA"),
            Some("Fast and nearly optimal BVH building method.")
        );
        assert_eq!(registry.tooltip("OCTREE"), None);
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        let settings = BvhSettings {
            build: BuildConfig {
                leaf_threshold: 0,
                parallel_sort_threshold: 10,
            },
            ..BvhSettings::default()
        };
        assert!(matches!(
            BvhRegistry::new(&settings),
            Err(BvhError::InvalidLeafThreshold(0))
        ));
    }

    #[test]
    fn test_create_reports_scaled_progress() {
        let registry = BvhRegistry::default();
        let mut recorder = Recorder::default();
        let bvh = registry
            .create(&cube_entities(), Vector3::zeros(), &mut recorder)
            .unwrap();

        assert_eq!(recorder.target, Some(PROGRESS_TARGET));
        assert_eq!(recorder.updates.first(), Some(&0));
        assert!(recorder.updates.contains(&500));
        assert_eq!(recorder.updates.last(), Some(&PROGRESS_TARGET));
        assert!(recorder.updates.iter().all(|&done| done <= PROGRESS_TARGET));
        assert_eq!(bvh.primitives().len(), 4 * 25 * 12);
    }

    #[test]
    fn test_entities_without_primitives_build_empty() {
        let registry = BvhRegistry::default();
        let entities: Vec<Box<dyn Entity>> = vec![Box::new(Mesh::default())];
        let bvh = registry
            .create(&entities, Vector3::zeros(), &mut ())
            .unwrap();
        let mut ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
        assert!(!bvh.closest_intersection(&mut ray));
    }

    #[test]
    fn test_offset_moves_the_scene() {
        let registry = BvhRegistry::new(&BvhSettings::default()).unwrap();
        let entities = cube_entities();
        let offset = tuple_to_vector(&(1000.0, -64.0, 250.0));
        let at_origin = registry.create(&entities, Vector3::zeros(), &mut ()).unwrap();
        let moved = registry.create(&entities, offset, &mut ()).unwrap();

        let mut hits = 0;
        for i in 0..50 {
            let origin = Point3::new(-30.0, i as f64 * 0.8 - 20.0, 0.5);
            let direction = Vector3::new(1.0, 0.01, 0.02);
            let mut a = Ray::new(origin, direction);
            let mut b = Ray::new(origin + offset, direction);
            let hit = at_origin.closest_intersection(&mut a);
            assert_eq!(moved.closest_intersection(&mut b), hit);
            if hit {
                hits += 1;
                assert!((a.t - b.t).abs() < 1e-3);
            }
        }
        assert!(hits > 0);
    }
}
