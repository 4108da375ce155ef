//! Core traits and batch validation for fast-stats.
//!
//! # Overview
//!
//! [`SeriesElement`] abstracts over `f32` and `f64` so the scalar kernel can be
//! run at either precision. The lane kernels are `f32` only.
//!
//! The validation functions check the batch shape before any statistics are
//! computed:
//! 1. The sequence length is non-zero
//! 2. Every sequence has the same length
//! 3. `sequences * length` fits in addressable storage
//!
//! # Example
//!
//! ```
//! use fast_stats::traits::validate_uniform_lengths;
//!
//! let batch = vec![vec![1.0_f32, 2.0], vec![3.0, 4.0]];
//! assert_eq!(validate_uniform_lengths(&batch).unwrap(), Some(2));
//!
//! let ragged = vec![vec![1.0_f32, 2.0], vec![3.0]];
//! assert!(validate_uniform_lengths(&ragged).is_err());
//! ```

use num_traits::{Float, NumCast};

use crate::error::{Error, Result};

/// A trait for types that can be used as sequence elements.
///
/// # Type Bounds
///
/// - `Float`: IEEE arithmetic, `sqrt`, and the representable extremes
/// - `NumCast`: conversion of the sequence length into the element type
/// - `Copy` + `Default`: values are copied into lane vectors and records
/// - `Send` + `Sync`: batches may be processed across threads
///
/// # Example
///
/// ```
/// use fast_stats::traits::SeriesElement;
///
/// fn mean<T: SeriesElement>(data: &[T]) -> fast_stats::Result<T> {
///     let len = T::from_usize(data.len())?;
///     Ok(data.iter().fold(T::zero(), |acc, &x| acc + x) / len)
/// }
///
/// assert!((mean(&[1.0_f64, 2.0, 3.0]).unwrap() - 2.0).abs() < 1e-12);
/// ```
pub trait SeriesElement: Float + NumCast + Copy + Default + Send + Sync + 'static {
    /// Creates a series element from a `usize` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Element-wise minimum with the SSE `minps` convention.
    ///
    /// Returns `self` only when it is strictly less than `other`, so every
    /// backend picks the same operand on ties and on signed zeros.
    #[inline]
    #[must_use]
    fn lane_min(self, other: Self) -> Self {
        if self < other {
            self
        } else {
            other
        }
    }

    /// Element-wise maximum with the SSE `maxps` convention.
    #[inline]
    #[must_use]
    fn lane_max(self, other: Self) -> Self {
        if self > other {
            self
        } else {
            other
        }
    }
}

impl<T: Float + NumCast + Copy + Default + Send + Sync + 'static> SeriesElement for T {}

/// Validates that a sequence length is usable.
///
/// # Errors
///
/// Returns `Error::EmptySequence` if `length` is zero.
#[inline]
pub const fn validate_length(length: usize) -> Result<()> {
    if length == 0 {
        Err(Error::EmptySequence)
    } else {
        Ok(())
    }
}

/// Returns the number of values a `sequences x length` batch occupies.
///
/// # Errors
///
/// Returns `Error::StorageOverflow` if the product overflows `usize` or the
/// byte size of the values would exceed `isize::MAX`.
pub fn storage_len<T>(sequences: usize, length: usize) -> Result<usize> {
    let overflow = Error::StorageOverflow { sequences, length };
    let values = sequences.checked_mul(length).ok_or_else(|| overflow.clone())?;
    let bytes = values
        .checked_mul(std::mem::size_of::<T>())
        .ok_or_else(|| overflow.clone())?;
    if bytes > isize::MAX as usize {
        return Err(overflow);
    }
    Ok(values)
}

/// Validates that every `f32` sequence in a batch has the same non-zero length.
///
/// Returns the shared length, or `None` for an empty batch (which has no
/// length to check).
///
/// # Errors
///
/// - `Error::EmptySequence` if the shared length is zero
/// - `Error::LengthMismatch` for the first sequence whose length differs
///   from sequence 0
pub fn validate_uniform_lengths<S: AsRef<[f32]>>(sequences: &[S]) -> Result<Option<usize>> {
    let Some(first) = sequences.first() else {
        return Ok(None);
    };
    let expected = first.as_ref().len();
    validate_length(expected)?;

    if let Some((index, actual)) = sequences
        .iter()
        .map(|s| s.as_ref().len())
        .enumerate()
        .find(|&(_, len)| len != expected)
    {
        return Err(Error::LengthMismatch {
            index,
            expected,
            actual,
        });
    }

    storage_len::<f32>(sequences.len(), expected)?;
    Ok(Some(expected))
}
