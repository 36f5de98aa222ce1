//! Threading schemes and the registry used to select one by name.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::thread;

use crate::error::SumError;
use crate::interval::Interval;
use crate::reducer::Reducer;

/// How the summation is split across worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadingScheme {
    /// One worker over the whole interval.
    #[default]
    Single,
    /// One worker per logical CPU available to the process.
    CpuShare,
}

/// Name-to-scheme registry. Lookup is exact and case-sensitive.
pub const SCHEMES: &[(&str, ThreadingScheme)] = &[
    ("single", ThreadingScheme::Single),
    ("cpus", ThreadingScheme::CpuShare),
];

impl ThreadingScheme {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        SCHEMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(_, scheme)| scheme)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::CpuShare => "cpus",
        }
    }

    /// Number of workers this scheme spawns. Queried on every call.
    ///
    /// # Errors
    /// Returns [`SumError::CpuCount`] if the CPU count cannot be determined.
    pub fn partition_count(self) -> Result<NonZeroUsize, SumError> {
        match self {
            Self::Single => Ok(NonZeroUsize::MIN),
            Self::CpuShare => thread::available_parallelism().map_err(SumError::CpuCount),
        }
    }

    /// Sums `1..=bound` using this scheme's worker layout.
    ///
    /// # Errors
    /// Returns an error if `bound` is `u64::MAX`, the CPU count cannot be
    /// queried, or a worker thread cannot be spawned or panics.
    pub fn sum_up_to(self, bound: u64) -> Result<u64, SumError> {
        let interval = Interval::first_naturals(bound)?;
        let workers = self.partition_count()?;
        tracing::debug!(scheme = self.name(), %interval, "Running threading scheme");
        Reducer::new(interval, workers).run()
    }
}

fn known_names() -> String {
    let quoted: Vec<String> = SCHEMES.iter().map(|(name, _)| format!("'{name}'")).collect();
    quoted.join(", or ")
}

impl FromStr for ThreadingScheme {
    type Err = SumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SumError::UnknownScheme {
            name: s.to_owned(),
            known: known_names(),
        })
    }
}

impl fmt::Display for ThreadingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
