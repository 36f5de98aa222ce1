use std::io;

/// Errors raised while partitioning or summing.
#[derive(Debug, thiserror::Error)]
pub enum SumError {
    #[error("interval begin {begin} is past its end {end}")]
    InvertedInterval { begin: u64, end: u64 },

    #[error("partition index {index} is out of range for {count} partitions")]
    PartitionOutOfRange { index: usize, count: usize },

    #[error("bound {0} is too large: the interval [1, N + 1) does not fit in u64")]
    BoundTooLarge(u64),

    #[error("'{name}' is not a recognized threading scheme. Try {known}")]
    UnknownScheme { name: String, known: String },

    #[error("failed to query the number of available CPUs")]
    CpuCount(#[source] io::Error),

    #[error("failed to spawn worker {index}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker {index} panicked before reporting its partial sum")]
    WorkerPanicked { index: usize },
}
