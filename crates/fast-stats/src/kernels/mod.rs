//! Two-sweep statistics kernels.
//!
//! # Kernels
//!
//! - [`lanes`]: four sequences at a time in one lane vector (SSE, NEON, or a
//!   portable array), used for every complete lane group
//! - [`scalar`]: one sequence at a time, used for the remainder group, for
//!   [`Backend::Scalar`](crate::engine::Backend::Scalar), and as the reference
//!   oracle in tests
//!
//! Both kernels run the same operations in the same order, so they agree
//! bit-for-bit on finite input.

pub mod lanes;
pub mod scalar;

pub use lanes::{
    describe_group, describe_group_native, lane_to_sequence, LaneVector, NativeLanes,
    PortableLanes, LANES, LANE_ISA,
};
pub use scalar::describe;
