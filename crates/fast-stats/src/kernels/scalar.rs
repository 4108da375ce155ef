//! Scalar two-sweep descriptive statistics.
//!
//! This is the portability fallback for sequences that do not fill a lane
//! group and the reference oracle the lane kernels are tested against. It runs
//! the exact operation sequence of the lane kernel, one sequence at a time:
//!
//! ```text
//! sweep 1:  sum += x;  min = min(min, x);  max = max(max, x)
//! mean     = sum / L
//! sweep 2:  variance += ((x - mean) * (x - mean)) / L
//! std_dev  = sqrt(variance)
//! ```
//!
//! Every squared deviation is divided by `L` before it is accumulated. This
//! is the naive two-pass formulation, not Welford's, and its rounding is part
//! of the contract.
//!
//! # Example
//!
//! ```
//! use fast_stats::kernels::scalar::describe;
//!
//! let stats = describe(&[1.0_f32, 3.0, 3.0, 4.0]).unwrap();
//! assert_eq!(stats.mean, 2.75);
//! assert_eq!(stats.min, 1.0);
//! assert_eq!(stats.max, 4.0);
//! assert_eq!(stats.variance, 1.1875);
//! ```

use crate::engine::StatsRecord;
use crate::error::Result;
use crate::traits::{validate_length, SeriesElement};

/// Computes the statistics of a single sequence.
///
/// Works at `f32` or `f64` precision; the `f64` form is useful as a
/// higher-precision reference for `f32` results.
///
/// # Errors
///
/// - `Error::EmptySequence` if `values` is empty
/// - `Error::NumericConversion` if the length is not representable in `T`
pub fn describe<T: SeriesElement>(values: &[T]) -> Result<StatsRecord<T>> {
    validate_length(values.len())?;
    let len = T::from_usize(values.len())?;
    Ok(describe_unchecked(values, len))
}

/// Two-sweep kernel over one sequence with a pre-converted length.
///
/// `len` must equal `values.len()`. An empty `values` yields non-finite
/// statistics rather than a panic.
#[inline]
pub(crate) fn describe_unchecked<T: SeriesElement>(values: &[T], len: T) -> StatsRecord<T> {
    let seed = values.first().copied().unwrap_or_else(T::nan);

    let mut sum = T::zero();
    let mut min = seed;
    let mut max = seed;
    for &x in values {
        sum = sum + x;
        min = min.lane_min(x);
        max = max.lane_max(x);
    }
    let mean = sum / len;

    let variance = values.iter().fold(T::zero(), |acc, &x| {
        let deviation = x - mean;
        acc + deviation * deviation / len
    });

    StatsRecord {
        mean,
        min,
        max,
        variance,
        standard_deviation: variance.sqrt(),
    }
}
