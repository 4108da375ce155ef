//! fast-stats: batched four-lane descriptive statistics
//!
//! For each sequence of a batch of equal-length `f32` sequences, fast-stats
//! computes the mean, minimum, maximum, population variance and standard
//! deviation. Four sequences are processed at once in one SIMD vector (SSE on
//! `x86_64`, NEON on `aarch64`, a portable array elsewhere), with two sweeps
//! over the data: sum/min/max first, then the squared deviations from the mean.
//!
//! # Features
//!
//! - **Lane parallelism**: four sequences per vector instruction
//! - **Any batch size**: the `N mod 4` trailing sequences go through the
//!   scalar kernel, never past the end of the batch
//! - **Parity**: the scalar and vectorized paths agree bit-for-bit on finite input
//! - **Checked input**: zero-length, ragged, and oversized batches are errors
//!
//! # Quick Start
//!
//! ```
//! use fast_stats::prelude::*;
//!
//! let batch = vec![
//!     vec![1.0_f32, 3.0, 3.0, 4.0],
//!     vec![1.0, 4.0, 3.0, 4.0],
//!     vec![1.0, 5.0, 3.0, 4.0],
//!     vec![1.0, 6.0, 3.0, 4.0],
//! ];
//!
//! let results = compute(&batch).unwrap();
//! assert_eq!(results[0].mean, 2.75);
//! assert_eq!(results[0].variance, 1.1875);
//! assert_eq!(results[3].max, 6.0);
//! ```
//!
//! # Error Handling
//!
//! ```
//! use fast_stats::prelude::*;
//!
//! let ragged = vec![vec![1.0_f32, 2.0], vec![3.0]];
//! let err = compute(&ragged).unwrap_err();
//! assert!(err.is_invalid_argument());
//!
//! let empty_rows = vec![Vec::<f32>::new(); 3];
//! assert_eq!(compute(&empty_rows).unwrap_err(), Error::EmptySequence);
//! ```
//!
//! # Cargo Features
//!
//! - `parallel`: spread lane groups of large batches across threads with Rayon
//! - `serde`: `Serialize`/`Deserialize` for [`StatsRecord`], [`ResultSet`] and [`Backend`]

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod engine;
pub mod error;
pub mod kernels;
pub mod prelude;
pub mod traits;
pub mod utils;

// Re-export commonly used types at crate root
pub use batch::Batch;
pub use engine::{compute, compute_row_major, compute_scalar, Backend, Engine, ResultSet, StatsRecord};
pub use error::{Error, Result};
pub use traits::SeriesElement;
pub use utils::{approx_eq, approx_eq_relative, PARITY_TOLERANCE};
