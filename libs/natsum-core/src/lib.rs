#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Parallel summation of the first N natural numbers.
//!
//! The crate has two halves:
//! - the partitioner ([`Interval::subinterval`], [`Interval::partitions`]),
//!   which tiles a half-open interval into contiguous pieces, and
//! - the parallel reducer ([`Reducer`]), which sums each piece on its own
//!   thread and combines the partial results.
//!
//! [`ThreadingScheme`] picks how many pieces to use.

pub mod error;
pub mod interval;
pub mod reducer;
pub mod scheme;

pub use error::SumError;
pub use interval::{Interval, closed_form_sum, sum_over};
pub use reducer::{Reducer, Worker, WorkerReport, WorkerStatus};
pub use scheme::{SCHEMES, ThreadingScheme};
