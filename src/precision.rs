//! The scalar widths the triangle intersection routine is instantiated for.

use nalgebra::RealField;

/// A floating point width usable by [`intersects_triangle`].
///
/// Implemented for `f64` (construction-time primitives) and `f32` (packed
/// runtime primitives). Conversions go through `f64`, which is the width of
/// [`Ray`] state.
///
/// [`intersects_triangle`]: ../ray/fn.intersects_triangle.html
/// [`Ray`]: ../ray/struct.Ray.html
pub trait Precision: RealField + Copy {
    /// Converts from `f64`, rounding to nearest.
    fn narrow(value: f64) -> Self;

    /// Converts to `f64` without loss.
    fn widen(self) -> f64;
}

impl Precision for f64 {
    #[inline(always)]
    fn narrow(value: f64) -> f64 {
        value
    }

    #[inline(always)]
    fn widen(self) -> f64 {
        self
    }
}

impl Precision for f32 {
    #[inline(always)]
    fn narrow(value: f64) -> f32 {
        value as f32
    }

    #[inline(always)]
    fn widen(self) -> f64 {
        f64::from(self)
    }
}

