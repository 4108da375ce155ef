//! Input validation tests.
//!
//! Every shape error must be reported before computation starts, with the
//! variant and fields identifying the offending input:
//! - zero-length sequences
//! - ragged batches
//! - row-major buffers of the wrong size
//! - batch sizes that overflow
//!
//! Non-finite values are not validated; they flow through plain float
//! arithmetic.

#![allow(clippy::float_cmp)]

use fast_stats::batch::Batch;
use fast_stats::error::Error;
use fast_stats::prelude::*;

// ==================== Zero Length ====================

#[test]
fn validation_zero_length_sequences() {
    let series = vec![Vec::<f32>::new(); 4];
    assert_eq!(compute(&series), Err(Error::EmptySequence));
    assert_eq!(compute_scalar(&series), Err(Error::EmptySequence));
}

#[test]
fn validation_zero_length_single_sequence() {
    let series = vec![Vec::<f32>::new()];
    assert_eq!(compute(&series), Err(Error::EmptySequence));
}

#[test]
fn validation_zero_length_row_major() {
    assert_eq!(compute_row_major(&[], 3, 0), Err(Error::EmptySequence));
    assert_eq!(compute_row_major(&[], 0, 0), Err(Error::EmptySequence));
}

#[test]
fn validation_single_sequence_kernel_empty() {
    let empty: [f32; 0] = [];
    assert_eq!(describe(&empty), Err(Error::EmptySequence));
}

// ==================== Empty Batch ====================

#[test]
fn validation_empty_batch_is_not_an_error() {
    let series: Vec<Vec<f32>> = vec![];
    let results = compute(&series).unwrap();
    assert!(results.is_empty());
}

#[test]
fn validation_empty_row_major_batch() {
    let results = compute_row_major(&[], 0, 16).unwrap();
    assert!(results.is_empty());
}

// ==================== Ragged Batches ====================

#[test]
fn validation_ragged_batch_reports_first_mismatch() {
    let series = vec![
        vec![1.0_f32, 2.0, 3.0],
        vec![1.0, 2.0, 3.0],
        vec![1.0, 2.0],
        vec![1.0],
    ];
    assert_eq!(
        compute(&series),
        Err(Error::LengthMismatch {
            index: 2,
            expected: 3,
            actual: 2
        })
    );
}

#[test]
fn validation_ragged_in_remainder_group() {
    let mut series = vec![vec![0.5_f32; 8]; 6];
    series[5].push(0.5);
    assert!(matches!(
        compute(&series),
        Err(Error::LengthMismatch { index: 5, .. })
    ));
}

#[test]
fn validation_ragged_with_empty_first() {
    let series = vec![vec![], vec![1.0_f32]];
    let err = compute(&series).unwrap_err();
    assert!(err.is_invalid_argument());
}

// ==================== Row-Major Buffers ====================

#[test]
fn validation_row_major_short_buffer() {
    let data = [1.0_f32; 7];
    assert_eq!(
        compute_row_major(&data, 2, 4),
        Err(Error::BufferSize {
            expected: 8,
            actual: 7
        })
    );
}

#[test]
fn validation_row_major_long_buffer() {
    let data = [1.0_f32; 9];
    assert!(matches!(
        compute_row_major(&data, 2, 4),
        Err(Error::BufferSize { expected: 8, actual: 9 })
    ));
}

#[test]
fn validation_row_major_overflow() {
    let data = [1.0_f32; 4];
    let err = compute_row_major(&data, usize::MAX / 2, 3).unwrap_err();
    assert!(matches!(err, Error::StorageOverflow { .. }));
    assert!(err.is_invalid_argument());
}

#[test]
fn validation_row_major_byte_size_overflow() {
    // The element count fits in usize but the byte size does not fit in isize
    let data = [1.0_f32; 4];
    let err = Batch::from_row_major(&data, usize::MAX / 8, 2).unwrap_err();
    assert!(matches!(err, Error::StorageOverflow { .. }));
}

// ==================== Error Messages ====================

#[test]
fn validation_error_messages_identify_input() {
    let series = vec![vec![1.0_f32, 2.0], vec![3.0]];
    let message = compute(&series).unwrap_err().to_string();
    assert!(message.contains("sequence 1"), "{message}");
    assert!(message.contains("expected 2"), "{message}");

    let message = compute_row_major(&[1.0; 3], 2, 2).unwrap_err().to_string();
    assert!(message.contains('4'), "{message}");
    assert!(message.contains('3'), "{message}");
}

#[test]
fn validation_errors_are_invalid_argument() {
    let errors = [
        compute(&[Vec::<f32>::new()]).unwrap_err(),
        compute(&[vec![1.0_f32], vec![]]).unwrap_err(),
        compute_row_major(&[1.0], 2, 1).unwrap_err(),
    ];
    for err in &errors {
        assert!(err.is_invalid_argument(), "{err}");
    }
}

// ==================== Non-Finite Values ====================

#[test]
fn validation_infinity_is_accepted() {
    let series = vec![vec![1.0_f32, f32::INFINITY]; 5];
    let results = compute(&series).unwrap();
    for record in &results {
        assert_eq!(record.max, f32::INFINITY);
        assert_eq!(record.min, 1.0);
        assert_eq!(record.mean, f32::INFINITY);
    }
}

#[test]
fn validation_nan_is_accepted() {
    let series = vec![vec![f32::NAN, 1.0]; 3];
    let results = compute(&series).unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.mean.is_nan()));
}
