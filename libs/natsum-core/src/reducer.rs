//! Parallel reduction: one scoped worker thread per partition.
//!
//! Workers sum their partition without touching shared state and hand the
//! partial sum back through their join handle. The coordinating thread owns
//! the running total and folds each partial in after the join.

use std::num::NonZeroUsize;
use std::thread::{self, ScopedJoinHandle};

use crate::error::SumError;
use crate::interval::{Interval, sum_over};

/// Exit status reported by a worker. Zero means success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStatus(i32);

impl WorkerStatus {
    pub const SUCCESS: Self = Self(0);

    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

/// What a worker hands back to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub index: usize,
    pub interval: Interval,
    pub partial: u64,
    pub status: WorkerStatus,
}

/// A single unit of work: one partition, owned for the worker's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct Worker {
    index: usize,
    interval: Interval,
}

impl Worker {
    #[must_use]
    pub const fn new(index: usize, interval: Interval) -> Self {
        Self { index, interval }
    }

    /// Sums the owned partition.
    #[must_use]
    pub fn run(self) -> WorkerReport {
        let partial = sum_over(self.interval);
        tracing::debug!(
            worker = self.index,
            interval = %self.interval,
            partial,
            "Worker finished its partition"
        );
        WorkerReport {
            index: self.index,
            interval: self.interval,
            partial,
            status: WorkerStatus::SUCCESS,
        }
    }
}

/// Per-invocation reducer holding its own accumulator.
#[derive(Debug)]
pub struct Reducer {
    interval: Interval,
    workers: NonZeroUsize,
    total: u64,
}

impl Reducer {
    #[must_use]
    pub const fn new(interval: Interval, workers: NonZeroUsize) -> Self {
        Self {
            interval,
            workers,
            total: 0,
        }
    }

    /// Spawns every worker, then joins them in spawn order and returns the
    /// wrapping sum of their partial results.
    ///
    /// # Errors
    /// Returns [`SumError::Spawn`] if a thread cannot be created and
    /// [`SumError::WorkerPanicked`] if a worker dies before reporting.
    pub fn run(mut self) -> Result<u64, SumError> {
        let count = self.workers.get();
        let plural = if count == 1 { "" } else { "s" };
        tracing::info!(workers = count, "Spawning {count} worker thread{plural}");

        let partitions = self.interval.partitions(self.workers);
        thread::scope(|scope| -> Result<(), SumError> {
            let mut handles = Vec::with_capacity(count);
            for (index, interval) in partitions.enumerate() {
                tracing::info!(
                    worker = index,
                    begin = interval.begin(),
                    end = interval.end(),
                    "Worker {index} gets {interval}"
                );
                let handle = thread::Builder::new()
                    .name(format!("natsum-worker-{index}"))
                    .spawn_scoped(scope, move || Worker::new(index, interval).run())
                    .map_err(|source| SumError::Spawn { index, source })?;
                handles.push(handle);
            }

            join_in_order(handles, |index, report: WorkerReport| {
                tracing::info!(
                    worker = report.index,
                    status = report.status.code(),
                    "Worker {index} exited with status {}",
                    report.status.code()
                );
                self.accumulate(&report);
            })
        })?;

        Ok(self.total)
    }

    fn accumulate(&mut self, report: &WorkerReport) {
        self.total = self.total.wrapping_add(report.partial);
    }
}

/// Joins every handle in spawn order, including the ones after a panicked
/// worker, and returns the first panic as [`SumError::WorkerPanicked`].
fn join_in_order<T>(
    handles: Vec<ScopedJoinHandle<'_, T>>,
    mut on_joined: impl FnMut(usize, T),
) -> Result<(), SumError> {
    let mut first_panic = None;
    for (index, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(value) => on_joined(index, value),
            Err(_panic) => {
                tracing::error!(worker = index, "Worker {index} panicked");
                if first_panic.is_none() {
                    first_panic = Some(SumError::WorkerPanicked { index });
                }
            }
        }
    }
    match first_panic {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
