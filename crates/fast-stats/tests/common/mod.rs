//! Shared test utilities for fast-stats tests.

/// Deterministic pseudo-random values in `[0, 1)` (xorshift32), so failures
/// reproduce without a seed file.
#[allow(dead_code)]
pub fn unit_values(seed: u32, count: usize) -> Vec<f32> {
    let mut state = seed.max(1);
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            // 24 high bits map exactly onto the f32 mantissa
            (state >> 8) as f32 / 16_777_216.0
        })
        .collect()
}

/// A batch of `sequences` rows of `length` values in `[0, 1)`.
#[allow(dead_code)]
pub fn unit_batch(sequences: usize, length: usize) -> Vec<Vec<f32>> {
    (0..sequences)
        .map(|s| unit_values(0x9E37_79B9 ^ (s as u32).wrapping_mul(2_654_435_761), length))
        .collect()
}

/// The four-sequence reference fixture.
#[allow(dead_code)]
pub fn reference_fixture() -> Vec<Vec<f32>> {
    vec![
        vec![1.0, 3.0, 3.0, 4.0],
        vec![1.0, 4.0, 3.0, 4.0],
        vec![1.0, 5.0, 3.0, 4.0],
        vec![1.0, 6.0, 3.0, 4.0],
    ]
}
