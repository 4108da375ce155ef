//! Batch views and lane-group scheduling.
//!
//! A [`Batch`] is a validated, borrowed view of N sequences of equal length.
//! It can be built from any slice of sequences or from one row-major buffer;
//! either way the caller keeps ownership and the engine only reads.
//!
//! [`BatchProcessor`] walks the batch one lane group at a time, handing each
//! group's sequences and output records to a group function. Groups are
//! independent, so with the `parallel` feature enabled large batches are
//! spread across threads with Rayon. The output is the same either way.
//!
//! # Feature Flag
//!
//! ```toml
//! [dependencies]
//! fast-stats = { version = "0.1", features = ["parallel"] }
//! ```
//!
//! # Example
//!
//! ```
//! use fast_stats::batch::Batch;
//!
//! let data = [1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let batch = Batch::from_row_major(&data, 2, 3).unwrap();
//! assert_eq!(batch.len(), 2);
//! assert_eq!(batch.sequence_len(), 3);
//! assert_eq!(batch.get(1), Some(&[4.0_f32, 5.0, 6.0][..]));
//! ```

use crate::engine::StatsRecord;
use crate::error::{Error, Result};
use crate::kernels::lanes::LANES;
use crate::traits::{storage_len, validate_length, validate_uniform_lengths};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A validated, read-only batch of equal-length `f32` sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch<'a> {
    sequences: Vec<&'a [f32]>,
    length: usize,
}

impl<'a> Batch<'a> {
    /// Builds a batch from a slice of sequences.
    ///
    /// An empty slice is a valid, empty batch with length 0.
    ///
    /// # Errors
    ///
    /// - `Error::EmptySequence` if the sequences have length 0
    /// - `Error::LengthMismatch` if the sequences have different lengths
    /// - `Error::StorageOverflow` if the batch size overflows
    pub fn new<S: AsRef<[f32]>>(sequences: &'a [S]) -> Result<Self> {
        let length = validate_uniform_lengths(sequences)?.unwrap_or(0);
        Ok(Self {
            sequences: sequences.iter().map(AsRef::as_ref).collect(),
            length,
        })
    }

    /// Builds a batch over a row-major buffer of `sequences` rows of `length`
    /// values each.
    ///
    /// # Errors
    ///
    /// - `Error::EmptySequence` if `length` is 0, even when `sequences` is 0
    /// - `Error::StorageOverflow` if `sequences * length` overflows
    /// - `Error::BufferSize` if `data` does not hold exactly `sequences * length` values
    pub fn from_row_major(data: &'a [f32], sequences: usize, length: usize) -> Result<Self> {
        validate_length(length)?;
        let expected = storage_len::<f32>(sequences, length)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            sequences: data.chunks_exact(length).collect(),
            length,
        })
    }

    /// Number of sequences in the batch.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Returns `true` if the batch holds no sequences.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// The shared length of every sequence (0 for an empty slice-built batch).
    #[inline]
    #[must_use]
    pub const fn sequence_len(&self) -> usize {
        self.length
    }

    /// The sequences, in caller order.
    #[inline]
    #[must_use]
    pub fn sequences(&self) -> &[&'a [f32]] {
        &self.sequences
    }

    /// Returns sequence `index`, if present.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a [f32]> {
        self.sequences.get(index).copied()
    }

    /// Number of lane groups, counting a trailing partial group.
    #[inline]
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.len().div_ceil(LANES)
    }
}

/// Schedules lane groups of a batch, sequentially or across threads.
///
/// The group function receives up to [`LANES`] sequences and the same number
/// of output records; only the final group of a batch can be shorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProcessor {
    /// Minimum number of lane groups before work is spread across threads.
    min_parallel_groups: usize,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProcessor {
    /// Creates a processor with the default parallel threshold (64 groups).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_parallel_groups: 64,
        }
    }

    /// Sets the minimum number of lane groups required for parallel processing.
    ///
    /// Batches with fewer groups are processed on the calling thread. Has no
    /// effect without the `parallel` feature.
    #[must_use]
    pub const fn min_parallel_groups(mut self, groups: usize) -> Self {
        self.min_parallel_groups = groups;
        self
    }

    /// Returns the configured parallel threshold.
    #[must_use]
    pub const fn parallel_threshold(&self) -> usize {
        self.min_parallel_groups
    }

    /// Runs `group_fn` over every lane group and returns the records in
    /// batch order.
    #[cfg(feature = "parallel")]
    pub fn process<F>(&self, batch: &Batch<'_>, group_fn: F) -> Vec<StatsRecord>
    where
        F: Fn(&[&[f32]], &mut [StatsRecord]) + Send + Sync,
    {
        let mut records = vec![StatsRecord::default(); batch.len()];
        if batch.group_count() < self.min_parallel_groups {
            records
                .chunks_mut(LANES)
                .zip(batch.sequences().chunks(LANES))
                .for_each(|(out, group)| group_fn(group, out));
        } else {
            records
                .par_chunks_mut(LANES)
                .zip(batch.sequences().par_chunks(LANES))
                .for_each(|(out, group)| group_fn(group, out));
        }
        records
    }

    /// Sequential version when the parallel feature is disabled.
    #[cfg(not(feature = "parallel"))]
    pub fn process<F>(&self, batch: &Batch<'_>, group_fn: F) -> Vec<StatsRecord>
    where
        F: Fn(&[&[f32]], &mut [StatsRecord]),
    {
        let mut records = vec![StatsRecord::default(); batch.len()];
        records
            .chunks_mut(LANES)
            .zip(batch.sequences().chunks(LANES))
            .for_each(|(out, group)| group_fn(group, out));
        records
    }
}
