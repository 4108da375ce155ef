//! Utility functions for fast-stats.
//!
//! # Floating-Point Comparison
//!
//! Results from different backends, or from `f32` and `f64` runs of the scalar
//! kernel, are compared with a tolerance rather than `==`. These helpers are
//! used by the parity tests and are exposed for callers checking their own
//! reference implementations.
//!
//! # Example
//!
//! ```
//! use fast_stats::utils::{approx_eq_relative, PARITY_TOLERANCE};
//!
//! assert!(approx_eq_relative(1000.0_f32, 1000.05, PARITY_TOLERANCE));
//! assert!(!approx_eq_relative(1000.0_f32, 1001.0, PARITY_TOLERANCE));
//! ```

use crate::engine::StatsRecord;
use crate::traits::SeriesElement;

/// Relative tolerance for comparing results of different backends (1e-4).
pub const PARITY_TOLERANCE: f32 = 1e-4;

/// Absolute tolerance for `f32` statistics of values in `[0, 1)` (1e-5).
pub const UNIT_INTERVAL_EPSILON: f32 = 1e-5;

/// Approximate equality check for floating-point values.
///
/// Returns `true` if `a` and `b` are within `tolerance` of each other,
/// or if both are NaN.
///
/// # Example
///
/// ```
/// use fast_stats::utils::approx_eq;
///
/// assert!(approx_eq(1.0_f32, 1.0 + 1e-7, 1e-6));
/// assert!(approx_eq(f32::NAN, f32::NAN, 1e-6));
/// assert!(!approx_eq(f32::NAN, 1.0, 1e-6));
/// ```
#[inline]
#[must_use]
pub fn approx_eq<T: SeriesElement>(a: T, b: T, tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    a == b || (a - b).abs() <= tolerance
}

/// Relative approximate equality check for floating-point values.
///
/// The difference is scaled by the larger magnitude, floored at 1, so values
/// near zero (a variance of a near-constant sequence, say) are compared
/// absolutely instead of failing on a meaningless relative error.
///
/// # Example
///
/// ```
/// use fast_stats::utils::approx_eq_relative;
///
/// assert!(approx_eq_relative(1e6_f32, 1e6 + 10.0, 1e-4));
/// assert!(approx_eq_relative(1e-9_f32, 2e-9, 1e-4));
/// ```
#[inline]
#[must_use]
pub fn approx_eq_relative<T: SeriesElement>(a: T, b: T, rel_tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    if a == b {
        return true;
    }

    let scale = a.abs().max(b.abs()).max(T::one());
    (a - b).abs() / scale <= rel_tolerance
}

/// Field-wise [`approx_eq_relative`] over two records.
#[must_use]
pub fn records_approx_eq<T: SeriesElement>(
    a: &StatsRecord<T>,
    b: &StatsRecord<T>,
    rel_tolerance: T,
) -> bool {
    approx_eq_relative(a.mean, b.mean, rel_tolerance)
        && approx_eq_relative(a.min, b.min, rel_tolerance)
        && approx_eq_relative(a.max, b.max, rel_tolerance)
        && approx_eq_relative(a.variance, b.variance, rel_tolerance)
        && approx_eq_relative(a.standard_deviation, b.standard_deviation, rel_tolerance)
}

/// Narrows an `f64` record to `f32`, for comparing against `f32` results.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn record_to_f32(record: &StatsRecord<f64>) -> StatsRecord<f32> {
    StatsRecord {
        mean: record.mean as f32,
        min: record.min as f32,
        max: record.max as f32,
        variance: record.variance as f32,
        standard_deviation: record.standard_deviation as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_basic() {
        assert!(approx_eq(1.0_f32, 1.0, 1e-6));
        assert!(approx_eq(1.0_f64, 1.0 + 1e-11, 1e-10));
        assert!(!approx_eq(1.0_f32, 2.0, 1e-6));
    }

    #[test]
    fn test_approx_eq_infinities() {
        assert!(approx_eq(f32::INFINITY, f32::INFINITY, 1e-6));
        assert!(!approx_eq(f32::INFINITY, f32::NEG_INFINITY, 1e-6));
    }

    #[test]
    fn test_approx_eq_relative_scales() {
        assert!(approx_eq_relative(1e6_f32, 1e6 + 10.0, 1e-4));
        assert!(!approx_eq_relative(1e6_f32, 1e6 + 1000.0, 1e-4));
        assert!(approx_eq_relative(0.0_f32, 5e-5, 1e-4));
        assert!(!approx_eq_relative(0.0_f32, 5e-3, 1e-4));
    }

    #[test]
    fn test_approx_eq_relative_nan() {
        assert!(approx_eq_relative(f32::NAN, f32::NAN, 1e-4));
        assert!(!approx_eq_relative(f32::NAN, 0.0, 1e-4));
    }

    #[test]
    fn test_records_approx_eq() {
        let a = StatsRecord {
            mean: 2.0_f32,
            min: 1.0,
            max: 3.0,
            variance: 0.5,
            standard_deviation: 0.5_f32.sqrt(),
        };
        let mut b = a;
        assert!(records_approx_eq(&a, &b, PARITY_TOLERANCE));
        b.max = 3.1;
        assert!(!records_approx_eq(&a, &b, PARITY_TOLERANCE));
    }

    #[test]
    fn test_record_to_f32() {
        let wide = StatsRecord {
            mean: 2.75_f64,
            min: 1.0,
            max: 4.0,
            variance: 1.1875,
            standard_deviation: 1.1875_f64.sqrt(),
        };
        let narrow = record_to_f32(&wide);
        assert_eq!(narrow.mean, 2.75);
        assert_eq!(narrow.variance, 1.1875);
        assert!(approx_eq(narrow.standard_deviation, 1.1875_f32.sqrt(), 1e-6));
    }
}
