//! Progress reporting during BVH construction.

/// Receives progress updates while a BVH is built.
///
/// The target is announced once near the start, after which `update` is
/// called repeatedly with the number of units completed so far. Reporting is
/// purely observational and always happens on the building thread.
pub trait ProgressListener {
    /// Announces the total number of units of work.
    fn set_target(&mut self, _target: usize) {}

    /// Reports the number of units completed so far.
    fn update(&mut self, done: usize);
}

/// The unit listener ignores all progress.
impl ProgressListener for () {
    fn update(&mut self, _done: usize) {}
}

/// Any closure taking the completed units is a listener.
impl<F: FnMut(usize)> ProgressListener for F {
    fn update(&mut self, done: usize) {
        self(done)
    }
}

/// Forwards progress to another listener, but only once the reported value has
/// moved by at least `interval` since the last forwarded value.
///
/// # Examples
/// ```
/// use voxel_bvh::progress::{IntervalProgress, ProgressListener};
///
/// let mut seen = Vec::new();
/// {
///     let mut record = |done: usize| seen.push(done);
///     let mut progress = IntervalProgress::new(&mut record, 10);
///     for done in 0..25 {
///         progress.update(done);
///     }
/// }
/// assert_eq!(seen, vec![0, 10, 20]);
/// ```
pub struct IntervalProgress<'a> {
    inner: &'a mut dyn ProgressListener,
    interval: usize,
    last: Option<usize>,
}

impl<'a> IntervalProgress<'a> {
    /// Creates a new [`IntervalProgress`]. An interval of zero forwards everything.
    pub fn new(inner: &'a mut dyn ProgressListener, interval: usize) -> IntervalProgress<'a> {
        IntervalProgress {
            inner,
            interval,
            last: None,
        }
    }
}

impl std::fmt::Debug for IntervalProgress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalProgress")
            .field("interval", &self.interval)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

impl ProgressListener for IntervalProgress<'_> {
    fn set_target(&mut self, target: usize) {
        self.inner.set_target(target);
    }

    fn update(&mut self, done: usize) {
        let due = match self.last {
            None => true,
            Some(last) => done.abs_diff(last) >= self.interval,
        };
        if due {
            self.last = Some(done);
            self.inner.update(done);
        }
    }
}

/// Maps a sub-task's `0..=total` progress onto `offset..=offset + span` of another listener.
pub(crate) struct ScaledProgress<'a> {
    inner: &'a mut dyn ProgressListener,
    offset: usize,
    span: usize,
    total: usize,
}

impl<'a> ScaledProgress<'a> {
    pub(crate) fn new(
        inner: &'a mut dyn ProgressListener,
        offset: usize,
        span: usize,
        total: usize,
    ) -> ScaledProgress<'a> {
        ScaledProgress {
            inner,
            offset,
            span,
            total: total.max(1),
        }
    }
}

impl ProgressListener for ScaledProgress<'_> {
    fn update(&mut self, done: usize) {
        let scaled = (done.min(self.total) as f64 * self.span as f64 / self.total as f64) as usize;
        self.inner.update(self.offset + scaled);
    }
}
