use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Why a source row was left out of the computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The row names a different city than the one requested.
    CityMismatch,
    /// Demand row without a timestamp value.
    MissingTimestamp,
    /// Demand row whose timestamp could not be parsed.
    InvalidTimestamp,
    /// Demand value is not a non-negative number.
    InvalidDemand,
    /// Rider row without a start or end value.
    MissingBound,
    /// Rider row whose start or end could not be parsed.
    InvalidBound,
    /// Rider row with `end <= start`.
    EmptyInterval,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::CityMismatch => "city_mismatch",
            SkipReason::MissingTimestamp => "missing_timestamp",
            SkipReason::InvalidTimestamp => "invalid_timestamp",
            SkipReason::InvalidDemand => "invalid_demand",
            SkipReason::MissingBound => "missing_bound",
            SkipReason::InvalidBound => "invalid_bound",
            SkipReason::EmptyInterval => "empty_interval",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one source row.
pub type RowOutcome<T> = Result<T, SkipReason>;

/// Row counters for one ingested table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl IngestStats {
    /// Count one row outcome.
    pub fn record<T>(&mut self, outcome: &RowOutcome<T>) {
        self.rows_read += 1;
        match outcome {
            Ok(_) => self.rows_accepted += 1,
            Err(reason) => *self.skipped.entry(*reason).or_insert(0) += 1,
        }
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }
}

/// Ingestion counters for both input tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestDiagnostics {
    pub demand: IngestStats,
    pub riders: IngestStats,
}
