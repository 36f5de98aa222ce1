//! Half-open integer intervals and the partitioner that slices them.

use std::fmt;
use std::num::NonZeroUsize;

use crate::error::SumError;

/// Half-open interval `[begin, end)` over `u64`.
///
/// `begin <= end` always holds; an interval with `begin == end` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    begin: u64,
    end: u64,
}

fn to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

impl Interval {
    /// Creates `[begin, end)`.
    ///
    /// # Errors
    /// Returns [`SumError::InvertedInterval`] if `begin > end`.
    pub fn new(begin: u64, end: u64) -> Result<Self, SumError> {
        if begin > end {
            return Err(SumError::InvertedInterval { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// The interval `[1, bound + 1)`, i.e. the naturals `1..=bound`.
    ///
    /// # Errors
    /// Returns [`SumError::BoundTooLarge`] if `bound + 1` overflows.
    pub fn first_naturals(bound: u64) -> Result<Self, SumError> {
        let end = bound
            .checked_add(1)
            .ok_or(SumError::BoundTooLarge(bound))?;
        Self::new(1, end)
    }

    #[must_use]
    pub const fn begin(self) -> u64 {
        self.begin
    }

    #[must_use]
    pub const fn end(self) -> u64 {
        self.end
    }

    #[must_use]
    pub const fn len(self) -> u64 {
        self.end - self.begin
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.begin == self.end
    }

    /// Returns the `index`-th of `count` contiguous subintervals.
    ///
    /// Every subinterval has `len / count` elements, except the last one,
    /// which also absorbs the `len % count` remainder. When `count`
    /// exceeds the length, the leading subintervals are empty.
    ///
    /// # Errors
    /// Returns [`SumError::PartitionOutOfRange`] if `index >= count`.
    pub fn subinterval(self, count: NonZeroUsize, index: usize) -> Result<Self, SumError> {
        if index >= count.get() {
            return Err(SumError::PartitionOutOfRange {
                index,
                count: count.get(),
            });
        }
        Ok(self.nth_partition(count, index))
    }

    /// Iterates over all `count` subintervals in order.
    pub fn partitions(self, count: NonZeroUsize) -> impl ExactSizeIterator<Item = Self> {
        (0..count.get()).map(move |index| self.nth_partition(count, index))
    }

    // Caller guarantees index < count, so delta * index + delta <= len.
    fn nth_partition(self, count: NonZeroUsize, index: usize) -> Self {
        let count = to_u64(count.get());
        let index = to_u64(index);
        let len = self.len();
        let delta = len.div_euclid(count);
        let remainder = len.rem_euclid(count);

        let begin = self.begin + delta * index;
        let mut end = begin + delta;
        if index == count - 1 {
            end += remainder;
        }
        Self { begin, end }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

/// Sums every integer in `interval` by iteration, wrapping on overflow.
#[must_use]
pub fn sum_over(interval: Interval) -> u64 {
    (interval.begin..interval.end).fold(0, u64::wrapping_add)
}

/// Closed form `n * (n + 1) / 2`, reduced modulo 2^64.
///
/// The product is formed in `u128` so the result agrees with a wrapping
/// iterative sum for every `n`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn closed_form_sum(n: u64) -> u64 {
    let n = u128::from(n);
    ((n * (n + 1)) >> 1) as u64
}
