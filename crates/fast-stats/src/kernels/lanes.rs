//! Four-lane two-sweep kernel.
//!
//! A lane group is four sequences of equal length processed together: at each
//! position `i` the four values `s0[i], s1[i], s2[i], s3[i]` are packed into
//! one vector and every accumulator update is a single element-wise operation.
//!
//! # Lane order
//!
//! Lane `k` of the group that starts at sequence `base` always holds sequence
//! `base + k` ([`lane_to_sequence`]). Every [`LaneVector`] packs lanes
//! low-to-high in that order, so results scatter back without reordering.
//!
//! # Backends
//!
//! | Target    | Vector            | Instructions                      |
//! |-----------|-------------------|-----------------------------------|
//! | `x86_64`  | [`SseLanes`]      | SSE `addps`/`minps`/`sqrtps`/...  |
//! | `aarch64` | `NeonLanes`       | NEON `vaddq_f32`/`vbslq_f32`/...  |
//! | other     | [`PortableLanes`] | plain `[f32; 4]` arithmetic       |
//!
//! All backends perform the same IEEE-754 single-precision operations in the
//! same order as [`scalar`](super::scalar), without fused multiply-add, and
//! select min/max operands with the `minps`/`maxps` rule. For finite inputs the
//! lane results are bit-identical to the scalar oracle.
//!
//! # Example
//!
//! ```
//! use fast_stats::kernels::lanes::{describe_group, PortableLanes};
//!
//! let a = [1.0_f32, 3.0, 3.0, 4.0];
//! let b = [1.0_f32, 4.0, 3.0, 4.0];
//! let c = [1.0_f32, 5.0, 3.0, 4.0];
//! let d = [1.0_f32, 6.0, 3.0, 4.0];
//!
//! let stats = describe_group::<PortableLanes>(&[&a, &b, &c, &d], 4.0);
//! assert_eq!(stats[0].mean, 2.75);
//! assert_eq!(stats[3].max, 6.0);
//! ```

use crate::engine::StatsRecord;

/// Number of sequences processed together by one lane group.
pub const LANES: usize = 4;

/// Name of the instruction set backing [`NativeLanes`] on this target.
#[cfg(target_arch = "x86_64")]
pub const LANE_ISA: &str = "sse";
/// Name of the instruction set backing [`NativeLanes`] on this target.
#[cfg(target_arch = "aarch64")]
pub const LANE_ISA: &str = "neon";
/// Name of the instruction set backing [`NativeLanes`] on this target.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub const LANE_ISA: &str = "portable";

/// The fastest lane vector available on this target.
#[cfg(target_arch = "x86_64")]
pub type NativeLanes = SseLanes;
/// The fastest lane vector available on this target.
#[cfg(target_arch = "aarch64")]
pub type NativeLanes = NeonLanes;
/// The fastest lane vector available on this target.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub type NativeLanes = PortableLanes;

/// Maps a lane of a group to the index of the sequence it carries.
///
/// ```
/// use fast_stats::kernels::lanes::lane_to_sequence;
///
/// assert_eq!(lane_to_sequence(8, 0), 8);
/// assert_eq!(lane_to_sequence(8, 3), 11);
/// ```
#[inline]
#[must_use]
pub const fn lane_to_sequence(group_start: usize, lane: usize) -> usize {
    group_start + lane
}

/// Number of complete lane groups in a batch of `sequences`.
#[inline]
#[must_use]
pub const fn full_groups(sequences: usize) -> usize {
    sequences / LANES
}

/// Number of sequences left over after the complete lane groups.
#[inline]
#[must_use]
pub const fn remainder(sequences: usize) -> usize {
    sequences % LANES
}

/// A four-lane `f32` vector.
///
/// Implementations must keep lane `k` of [`pack`](Self::pack) at index `k` of
/// [`unpack`](Self::unpack), and implement `min`/`max` as
/// `if a < b { a } else { b }` / `if a > b { a } else { b }`.
pub trait LaneVector: Copy {
    /// Broadcasts one value to every lane.
    fn splat(value: f32) -> Self;
    /// Packs four values, lane `k` taking `lanes[k]`.
    fn pack(lanes: [f32; LANES]) -> Self;
    /// Extracts the lanes in pack order.
    fn unpack(self) -> [f32; LANES];
    /// Element-wise `self + rhs`.
    fn add(self, rhs: Self) -> Self;
    /// Element-wise `self - rhs`.
    fn sub(self, rhs: Self) -> Self;
    /// Element-wise `self * rhs`.
    fn mul(self, rhs: Self) -> Self;
    /// Element-wise `self / rhs`.
    fn div(self, rhs: Self) -> Self;
    /// Element-wise minimum, `minps` operand rule.
    fn min(self, rhs: Self) -> Self;
    /// Element-wise maximum, `maxps` operand rule.
    fn max(self, rhs: Self) -> Self;
    /// Element-wise square root.
    fn sqrt(self) -> Self;
}

/// Runs the two-sweep kernel over one full lane group.
///
/// `len` is the shared sequence length as `f32`. The four sequences must all
/// have that length; a shorter sequence truncates every lane to its length.
///
/// Record `k` of the result describes `group[k]`.
#[must_use]
pub fn describe_group<V: LaneVector>(group: &[&[f32]; LANES], len: f32) -> [StatsRecord; LANES] {
    let seed = V::pack(std::array::from_fn(|lane| {
        group[lane].first().copied().unwrap_or(f32::NAN)
    }));

    let mut sums = V::splat(0.0);
    let mut mins = seed;
    let mut maxes = seed;
    for row in rows(group) {
        let packed = V::pack(row);
        sums = sums.add(packed);
        mins = mins.min(packed);
        maxes = maxes.max(packed);
    }

    let lengths = V::splat(len);
    let means = sums.div(lengths);

    let mut variances = V::splat(0.0);
    for row in rows(group) {
        let deviation = V::pack(row).sub(means);
        variances = variances.add(deviation.mul(deviation).div(lengths));
    }
    let standard_deviations = variances.sqrt();

    let means = means.unpack();
    let mins = mins.unpack();
    let maxes = maxes.unpack();
    let variances = variances.unpack();
    let standard_deviations = standard_deviations.unpack();

    std::array::from_fn(|lane| StatsRecord {
        mean: means[lane],
        min: mins[lane],
        max: maxes[lane],
        variance: variances[lane],
        standard_deviation: standard_deviations[lane],
    })
}

/// [`describe_group`] with this target's [`NativeLanes`].
#[inline]
#[must_use]
pub fn describe_group_native(group: &[&[f32]; LANES], len: f32) -> [StatsRecord; LANES] {
    describe_group::<NativeLanes>(group, len)
}

/// Iterates the positions of a group, yielding the four lane values at each.
#[inline]
fn rows<'a>(group: &[&'a [f32]; LANES]) -> impl Iterator<Item = [f32; LANES]> + 'a {
    let [s0, s1, s2, s3] = *group;
    s0.iter()
        .zip(s1)
        .zip(s2)
        .zip(s3)
        .map(|(((&a, &b), &c), &d)| [a, b, c, d])
}

/// Lane vector over a plain array, for targets without a native backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortableLanes([f32; LANES]);

impl PortableLanes {
    #[inline]
    fn zip_with(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self(std::array::from_fn(|lane| f(self.0[lane], rhs.0[lane])))
    }
}

impl LaneVector for PortableLanes {
    #[inline]
    fn splat(value: f32) -> Self {
        Self([value; LANES])
    }

    #[inline]
    fn pack(lanes: [f32; LANES]) -> Self {
        Self(lanes)
    }

    #[inline]
    fn unpack(self) -> [f32; LANES] {
        self.0
    }

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a - b)
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a * b)
    }

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a / b)
    }

    #[inline]
    fn min(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| if a < b { a } else { b })
    }

    #[inline]
    fn max(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| if a > b { a } else { b })
    }

    #[inline]
    fn sqrt(self) -> Self {
        Self(self.0.map(f32::sqrt))
    }
}

#[cfg(target_arch = "x86_64")]
pub use sse::SseLanes;

#[cfg(target_arch = "x86_64")]
mod sse {
    use std::arch::x86_64::{
        __m128, _mm_add_ps, _mm_div_ps, _mm_max_ps, _mm_min_ps, _mm_mul_ps, _mm_set1_ps,
        _mm_setr_ps, _mm_sqrt_ps, _mm_storeu_ps, _mm_sub_ps,
    };

    use super::{LaneVector, LANES};

    /// SSE lane vector (`__m128`).
    ///
    /// SSE and SSE2 are part of the `x86_64` baseline, so every intrinsic used
    /// here is available on any `x86_64` CPU without runtime detection.
    #[derive(Debug, Clone, Copy)]
    pub struct SseLanes(__m128);

    // Newer toolchains expose baseline intrinsics as safe functions.
    #[allow(unused_unsafe)]
    impl LaneVector for SseLanes {
        #[inline]
        fn splat(value: f32) -> Self {
            // SAFETY: SSE is always enabled on x86_64.
            Self(unsafe { _mm_set1_ps(value) })
        }

        #[inline]
        fn pack(lanes: [f32; LANES]) -> Self {
            // `setr` fills lane 0 first; `_mm_set_ps` would reverse the order.
            // SAFETY: SSE is always enabled on x86_64.
            Self(unsafe { _mm_setr_ps(lanes[0], lanes[1], lanes[2], lanes[3]) })
        }

        #[inline]
        fn unpack(self) -> [f32; LANES] {
            let mut out = [0.0_f32; LANES];
            // SAFETY: `out` holds exactly four f32s; `storeu` has no alignment requirement.
            unsafe { _mm_storeu_ps(out.as_mut_ptr(), self.0) };
            out
        }

        #[inline]
        fn add(self, rhs: Self) -> Self {
            // SAFETY: SSE is always enabled on x86_64.
            Self(unsafe { _mm_add_ps(self.0, rhs.0) })
        }

        #[inline]
        fn sub(self, rhs: Self) -> Self {
            // SAFETY: SSE is always enabled on x86_64.
            Self(unsafe { _mm_sub_ps(self.0, rhs.0) })
        }

        #[inline]
        fn mul(self, rhs: Self) -> Self {
            // SAFETY: SSE is always enabled on x86_64.
            Self(unsafe { _mm_mul_ps(self.0, rhs.0) })
        }

        #[inline]
        fn div(self, rhs: Self) -> Self {
            // SAFETY: SSE is always enabled on x86_64.
            Self(unsafe { _mm_div_ps(self.0, rhs.0) })
        }

        #[inline]
        fn min(self, rhs: Self) -> Self {
            // SAFETY: SSE is always enabled on x86_64.
            Self(unsafe { _mm_min_ps(self.0, rhs.0) })
        }

        #[inline]
        fn max(self, rhs: Self) -> Self {
            // SAFETY: SSE is always enabled on x86_64.
            Self(unsafe { _mm_max_ps(self.0, rhs.0) })
        }

        #[inline]
        fn sqrt(self) -> Self {
            // SAFETY: SSE is always enabled on x86_64.
            Self(unsafe { _mm_sqrt_ps(self.0) })
        }
    }
}

#[cfg(target_arch = "aarch64")]
pub use neon::NeonLanes;

#[cfg(target_arch = "aarch64")]
mod neon {
    use std::arch::aarch64::{
        float32x4_t, vaddq_f32, vbslq_f32, vcgtq_f32, vcltq_f32, vdivq_f32, vdupq_n_f32,
        vld1q_f32, vmulq_f32, vsqrtq_f32, vst1q_f32, vsubq_f32,
    };

    use super::{LaneVector, LANES};

    /// NEON lane vector (`float32x4_t`).
    ///
    /// NEON is mandatory on `aarch64`. `vminq_f32`/`vmaxq_f32` treat NaN and
    /// signed zeros differently from `minps`/`maxps`, so min and max are built
    /// from a compare and a bit-select instead.
    #[derive(Debug, Clone, Copy)]
    pub struct NeonLanes(float32x4_t);

    #[allow(unused_unsafe)]
    impl LaneVector for NeonLanes {
        #[inline]
        fn splat(value: f32) -> Self {
            // SAFETY: NEON is always enabled on aarch64.
            Self(unsafe { vdupq_n_f32(value) })
        }

        #[inline]
        fn pack(lanes: [f32; LANES]) -> Self {
            // SAFETY: `lanes` holds exactly four f32s.
            Self(unsafe { vld1q_f32(lanes.as_ptr()) })
        }

        #[inline]
        fn unpack(self) -> [f32; LANES] {
            let mut out = [0.0_f32; LANES];
            // SAFETY: `out` holds exactly four f32s.
            unsafe { vst1q_f32(out.as_mut_ptr(), self.0) };
            out
        }

        #[inline]
        fn add(self, rhs: Self) -> Self {
            // SAFETY: NEON is always enabled on aarch64.
            Self(unsafe { vaddq_f32(self.0, rhs.0) })
        }

        #[inline]
        fn sub(self, rhs: Self) -> Self {
            // SAFETY: NEON is always enabled on aarch64.
            Self(unsafe { vsubq_f32(self.0, rhs.0) })
        }

        #[inline]
        fn mul(self, rhs: Self) -> Self {
            // SAFETY: NEON is always enabled on aarch64.
            Self(unsafe { vmulq_f32(self.0, rhs.0) })
        }

        #[inline]
        fn div(self, rhs: Self) -> Self {
            // SAFETY: NEON is always enabled on aarch64.
            Self(unsafe { vdivq_f32(self.0, rhs.0) })
        }

        #[inline]
        fn min(self, rhs: Self) -> Self {
            // SAFETY: NEON is always enabled on aarch64.
            Self(unsafe { vbslq_f32(vcltq_f32(self.0, rhs.0), self.0, rhs.0) })
        }

        #[inline]
        fn max(self, rhs: Self) -> Self {
            // SAFETY: NEON is always enabled on aarch64.
            Self(unsafe { vbslq_f32(vcgtq_f32(self.0, rhs.0), self.0, rhs.0) })
        }

        #[inline]
        fn sqrt(self) -> Self {
            // SAFETY: NEON is always enabled on aarch64.
            Self(unsafe { vsqrtq_f32(self.0) })
        }
    }
}
