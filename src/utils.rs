//! Utilities module.

/// Fast floating point minimum. This function matches the semantics of
///
/// ```no_compile
/// if x < y { x } else { y }
/// ```
///
/// which has efficient instruction sequences on many platforms (1 instruction on x86). For most
/// values, it matches the semantics of `x.min(y)`; the special cases are:
///
/// ```text
/// min(-0.0, +0.0); +0.0
/// min(+0.0, -0.0): -0.0
/// min( NaN,  1.0):  1.0
/// min( 1.0,  NaN):  NaN
/// ```
#[inline(always)]
pub(crate) fn fast_min(x: f64, y: f64) -> f64 {
    if x < y {
        x
    } else {
        y
    }
}

/// Fast floating point maximum. See [`fast_min`] for the special cases.
#[inline(always)]
pub(crate) fn fast_max(x: f64, y: f64) -> f64 {
    if x > y {
        x
    } else {
        y
    }
}

/// The largest `f32` strictly below `x`.
pub(crate) fn next_down(x: f32) -> f32 {
    if x.is_nan() || x == f32::NEG_INFINITY {
        x
    } else if x == 0.0 {
        -f32::from_bits(1)
    } else if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else {
        f32::from_bits(x.to_bits() + 1)
    }
}

/// The smallest `f32` strictly above `x`.
pub(crate) fn next_up(x: f32) -> f32 {
    -next_down(-x)
}

/// Narrows `x` to the largest `f32` that is not greater than `x`.
pub(crate) fn narrow_down(x: f64) -> f32 {
    let narrowed = x as f32;
    if f64::from(narrowed) > x {
        next_down(narrowed)
    } else {
        narrowed
    }
}

/// Narrows `x` to the smallest `f32` that is not less than `x`.
pub(crate) fn narrow_up(x: f64) -> f32 {
    let narrowed = x as f32;
    if f64::from(narrowed) < x {
        next_up(narrowed)
    } else {
        narrowed
    }
}

#[cfg(test)]
mod tests {
    use super::{narrow_down, narrow_up, next_down, next_up};
    use proptest::prelude::*;

    #[test]
    fn test_next_around_zero() {
        assert!(next_down(0.0) < 0.0);
        assert!(next_up(0.0) > 0.0);
        assert!(next_up(-0.0) > 0.0);
        assert_eq!(next_up(f32::MAX), f32::INFINITY);
        assert_eq!(next_down(f32::INFINITY), f32::MAX);
    }

    #[test]
    fn test_narrow_exact_values_unchanged() {
        assert_eq!(narrow_down(0.5), 0.5);
        assert_eq!(narrow_up(-3.0), -3.0);
        assert_eq!(narrow_up(f64::INFINITY), f32::INFINITY);
    }

    proptest! {
        // Narrowing in either direction brackets the original value.
        #[test]
        fn test_narrow_brackets_value(x in -1e30f64..1e30f64) {
            let low = narrow_down(x);
            let high = narrow_up(x);
            assert!(f64::from(low) <= x);
            assert!(f64::from(high) >= x);
            assert!(high == low || next_up(low) == high);
        }
    }
}
