use serde::{Deserialize, Serialize};

use super::diagnostics::IngestDiagnostics;
use super::time::{rfc3339, Instant};

/// Staffing figures for one timeline bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveragePoint {
    /// Bucket start.
    #[serde(with = "rfc3339")]
    pub time: Instant,
    pub demand: u64,
    /// Riders whose window overlaps the bucket.
    pub available: u64,
    pub staffed: u64,
    pub unmet: u64,
    pub surplus: u64,
}

impl CoveragePoint {
    /// Derive staffed/unmet/surplus from demand and availability.
    pub fn new(time: Instant, demand: u64, available: u64) -> Self {
        Self {
            time,
            demand,
            available,
            staffed: demand.min(available),
            unmet: demand.saturating_sub(available),
            surplus: available.saturating_sub(demand),
        }
    }
}

/// Aggregate figures over the whole series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub interval_minutes: i64,
    pub points: usize,
    pub total_unmet: u64,
    pub total_surplus: u64,
    pub city: String,
    #[serde(with = "rfc3339")]
    pub start: Instant,
    #[serde(with = "rfc3339")]
    pub end: Instant,
}

/// Coverage series plus summary and ingestion counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub summary: CoverageSummary,
    pub series: Vec<CoveragePoint>,
    #[serde(default)]
    pub diagnostics: IngestDiagnostics,
}

impl CoverageReport {
    /// Assemble a report; totals are summed from the series and saturate at `u64::MAX`.
    pub fn new(
        city: impl Into<String>,
        start: Instant,
        end: Instant,
        interval_minutes: i64,
        series: Vec<CoveragePoint>,
        diagnostics: IngestDiagnostics,
    ) -> Self {
        let total_unmet = series
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.unmet));
        let total_surplus = series
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.surplus));

        Self {
            summary: CoverageSummary {
                interval_minutes,
                points: series.len(),
                total_unmet,
                total_surplus,
                city: city.into(),
                start,
                end,
            },
            series,
            diagnostics,
        }
    }
}
