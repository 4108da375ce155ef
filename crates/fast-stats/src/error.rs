//! Error types for fast-stats.
//!
//! The engine is a closed numeric kernel, so the only failures are
//! precondition violations on the batch shape. They are reported before any
//! computation starts; a failed call never produces a partial result.

use thiserror::Error;

/// The main error type for fast-stats operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The sequence length is zero.
    ///
    /// Mean and variance divide by the length, so a zero-length sequence has
    /// no defined statistics.
    #[error("invalid argument: sequence length must be at least 1")]
    EmptySequence,

    /// A sequence in the batch does not have the batch length.
    #[error("invalid argument: sequence {index} has length {actual}, expected {expected}")]
    LengthMismatch {
        /// Index of the offending sequence within the batch.
        index: usize,
        /// The length shared by the batch (taken from the first sequence).
        expected: usize,
        /// The length of the offending sequence.
        actual: usize,
    },

    /// The batch dimensions overflow addressable storage.
    #[error("invalid argument: {sequences} sequences of length {length} overflow addressable storage")]
    StorageOverflow {
        /// Number of sequences requested.
        sequences: usize,
        /// Length of each sequence.
        length: usize,
    },

    /// A row-major buffer does not hold exactly `sequences * length` values.
    #[error("invalid argument: row-major buffer holds {actual} values, expected {expected}")]
    BufferSize {
        /// The number of values the batch dimensions require.
        expected: usize,
        /// The number of values provided.
        actual: usize,
    },

    /// Failed to convert a numeric value to the element type.
    ///
    /// This occurs when the sequence length cannot be represented in the
    /// element type used by a kernel.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },
}

impl Error {
    /// Returns `true` for caller contract violations on the batch shape.
    ///
    /// These are the invalid-argument class: a zero length, a ragged batch,
    /// a storage overflow, or a mis-sized row-major buffer. All of them are
    /// fixed by passing different input.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::EmptySequence
                | Self::LengthMismatch { .. }
                | Self::StorageOverflow { .. }
                | Self::BufferSize { .. }
        )
    }
}

/// Convenience type alias for Results using the fast-stats Error type.
pub type Result<T> = std::result::Result<T, Error>;
