//! The batched statistics engine.
//!
//! [`compute`] takes N equal-length `f32` sequences and returns one
//! [`StatsRecord`] per sequence, index-aligned with the input:
//!
//! 1. The batch is split into lane groups of [`LANES`] consecutive sequences.
//! 2. Each complete group runs the four-lane two-sweep kernel.
//! 3. The `N mod 4` trailing sequences run the scalar kernel, which performs
//!    the same operations one sequence at a time. Nothing past the end of the
//!    batch is ever read.
//!
//! Sums are accumulated naively in `f32`, so statistics of values that do not
//! sum exactly carry ordinary rounding error (see [`StatsRecord`]).
//!
//! The input is validated before any work starts, so an invalid batch yields
//! an error and never a partial [`ResultSet`].
//!
//! # Example
//!
//! ```
//! use fast_stats::engine::compute;
//!
//! let batch = vec![
//!     vec![1.0_f32, 3.0, 3.0, 4.0],
//!     vec![1.0, 4.0, 3.0, 4.0],
//!     vec![1.0, 5.0, 3.0, 4.0],
//!     vec![1.0, 6.0, 3.0, 4.0],
//!     vec![2.0, 2.0, 2.0, 2.0],
//! ];
//!
//! let results = compute(&batch).unwrap();
//! assert_eq!(results.len(), 5);
//! assert_eq!(results[0].mean, 2.75);
//! assert_eq!(results[3].max, 6.0);
//! assert_eq!(results[4].variance, 0.0);
//! ```

use std::ops::Deref;

use tracing::debug;

use crate::batch::{Batch, BatchProcessor};
use crate::error::Result;
use crate::kernels::lanes::{self, describe_group_native, LANES, LANE_ISA};
use crate::kernels::scalar::describe_unchecked;
use crate::traits::SeriesElement;

/// Descriptive statistics of one sequence.
///
/// The layout is `#[repr(C)]` with the fields in declaration order, so a
/// `StatsRecord<f32>` is five consecutive `f32`s across an FFI boundary.
///
/// `variance >= 0` and `standard_deviation == variance.sqrt()` always hold.
/// `min <= mean <= max` holds when the running sum is exact; the mean is a
/// plain rounded `sum / L`, so ten copies of `0.1` give a mean one ulp above
/// `0.1` and a variance of about `5.6e-17` rather than zero.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsRecord<T = f32> {
    /// Arithmetic mean, `sum / L`.
    pub mean: T,
    /// Smallest value.
    pub min: T,
    /// Largest value.
    pub max: T,
    /// Population variance (divides by `L`).
    pub variance: T,
    /// `sqrt(variance)`.
    pub standard_deviation: T,
}

/// The records of one [`compute`] call, index-aligned with the input batch.
///
/// Owned by the caller; dropping it releases the storage.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResultSet {
    records: Vec<StatsRecord>,
}

impl ResultSet {
    /// Number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[StatsRecord] {
        &self.records
    }

    /// Consumes the result set, returning the records.
    #[must_use]
    pub fn into_vec(self) -> Vec<StatsRecord> {
        self.records
    }

    /// Consumes the result set, returning the records as a boxed slice.
    #[must_use]
    pub fn into_boxed_slice(self) -> Box<[StatsRecord]> {
        self.records.into_boxed_slice()
    }
}

impl Deref for ResultSet {
    type Target = [StatsRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl From<Vec<StatsRecord>> for ResultSet {
    fn from(records: Vec<StatsRecord>) -> Self {
        Self { records }
    }
}

impl From<ResultSet> for Vec<StatsRecord> {
    fn from(results: ResultSet) -> Self {
        results.records
    }
}

impl IntoIterator for ResultSet {
    type Item = StatsRecord;
    type IntoIter = std::vec::IntoIter<StatsRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a StatsRecord;
    type IntoIter = std::slice::Iter<'a, StatsRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Which kernel computes complete lane groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Backend {
    /// Four-lane kernel on this target's [`NativeLanes`](crate::kernels::NativeLanes)
    /// for complete groups, scalar kernel for the remainder.
    #[default]
    Vectorized,
    /// Scalar kernel for every sequence.
    Scalar,
}

impl Backend {
    /// Name of the instruction set used by [`Backend::Vectorized`] on this
    /// target: `"sse"`, `"neon"` or `"portable"`.
    #[must_use]
    pub const fn lane_isa() -> &'static str {
        LANE_ISA
    }
}

/// A configured statistics engine.
///
/// # Example
///
/// ```
/// use fast_stats::batch::Batch;
/// use fast_stats::engine::{Backend, Engine};
///
/// let series = vec![vec![1.0_f32, 2.0, 3.0]; 6];
/// let batch = Batch::new(&series).unwrap();
///
/// let scalar = Engine::new().backend(Backend::Scalar).compute(&batch).unwrap();
/// let vector = Engine::new().compute(&batch).unwrap();
/// assert_eq!(scalar, vector);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engine {
    backend: Backend,
    processor: BatchProcessor,
}

impl Engine {
    /// Creates an engine with the vectorized backend and default scheduling.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            backend: Backend::Vectorized,
            processor: BatchProcessor::new(),
        }
    }

    /// Selects the kernel backend.
    #[must_use]
    pub const fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the number of lane groups at which work is spread across threads
    /// (only with the `parallel` feature).
    #[must_use]
    pub const fn min_parallel_groups(mut self, groups: usize) -> Self {
        self.processor = self.processor.min_parallel_groups(groups);
        self
    }

    /// The configured backend.
    #[must_use]
    pub const fn selected_backend(&self) -> Backend {
        self.backend
    }

    /// Computes one record per sequence of `batch`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the sequence length cannot be
    /// represented as `f32`. Shape errors are caught when the [`Batch`] is
    /// built.
    pub fn compute(&self, batch: &Batch<'_>) -> Result<ResultSet> {
        if batch.is_empty() {
            return Ok(ResultSet::default());
        }

        let len: f32 = SeriesElement::from_usize(batch.sequence_len())?;
        let backend = self.backend;
        debug!(
            sequences = batch.len(),
            length = batch.sequence_len(),
            backend = ?backend,
            lane_isa = LANE_ISA,
            full_groups = lanes::full_groups(batch.len()),
            remainder = lanes::remainder(batch.len()),
            "computing batch statistics"
        );

        let records = self
            .processor
            .process(batch, |group, out| describe_into(backend, group, len, out));
        Ok(ResultSet::from(records))
    }
}

/// Fills `out` with the statistics of `group`, one record per sequence.
fn describe_into(backend: Backend, group: &[&[f32]], len: f32, out: &mut [StatsRecord]) {
    match (backend, <&[&[f32]; LANES]>::try_from(group)) {
        (Backend::Vectorized, Ok(full)) => out.copy_from_slice(&describe_group_native(full, len)),
        _ => {
            for (record, sequence) in out.iter_mut().zip(group) {
                *record = describe_unchecked(sequence, len);
            }
        }
    }
}

/// Computes statistics for every sequence with the vectorized backend.
///
/// # Errors
///
/// - `Error::EmptySequence` if the sequences have length 0
/// - `Error::LengthMismatch` if the sequences have different lengths
/// - `Error::StorageOverflow` if the batch size overflows
pub fn compute<S: AsRef<[f32]>>(sequences: &[S]) -> Result<ResultSet> {
    Engine::new().compute(&Batch::new(sequences)?)
}

/// Computes statistics for every sequence with the scalar backend.
///
/// # Errors
///
/// Same as [`compute`].
pub fn compute_scalar<S: AsRef<[f32]>>(sequences: &[S]) -> Result<ResultSet> {
    Engine::new()
        .backend(Backend::Scalar)
        .compute(&Batch::new(sequences)?)
}

/// Computes statistics for `sequences` rows of `length` values stored
/// contiguously in `data`.
///
/// # Errors
///
/// - `Error::EmptySequence` if `length` is 0
/// - `Error::StorageOverflow` if `sequences * length` overflows
/// - `Error::BufferSize` if `data.len() != sequences * length`
pub fn compute_row_major(data: &[f32], sequences: usize, length: usize) -> Result<ResultSet> {
    Engine::new().compute(&Batch::from_row_major(data, sequences, length)?)
}
