//! Commonly used types and functions for convenient importing.
//!
//! # Usage
//!
//! ```
//! use fast_stats::prelude::*;
//!
//! let series = vec![vec![1.0_f32, 2.0, 3.0], vec![4.0, 4.0, 4.0]];
//! let results: ResultSet = compute(&series).unwrap();
//! assert_eq!(results[1].variance, 0.0);
//! ```
//!
//! # Contents
//!
//! - [`Error`], [`Result`]: error handling
//! - [`SeriesElement`]: numeric element trait
//! - [`Batch`], [`Engine`], [`Backend`]: configured computation
//! - [`StatsRecord`], [`ResultSet`]: outputs
//! - [`compute`], [`compute_scalar`], [`compute_row_major`], [`describe`]: entry points
//! - [`LANES`]: lane group width

// Error types
pub use crate::error::{Error, Result};

// Traits
pub use crate::traits::SeriesElement;

// Engine
pub use crate::batch::Batch;
pub use crate::engine::{
    compute, compute_row_major, compute_scalar, Backend, Engine, ResultSet, StatsRecord,
};

// Kernels
pub use crate::kernels::{describe, LANES};
