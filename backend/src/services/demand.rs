//! Demand index construction from the forecast table.

use log::{debug, info};
use std::collections::HashMap;

use super::passes_city_filter;
use crate::models::{instant_from_cell, CellValue, IngestStats, Instant, RawRow, RowOutcome, SkipReason};
use crate::parsing::{resolve_row, LogicalField, DEMAND_ALIASES};

/// Forecast demand keyed by exact timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemandIndex {
    entries: HashMap<Instant, u64>,
}

impl DemandIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store demand for `at`, returning the value it replaced.
    pub fn insert(&mut self, at: Instant, demand: u64) -> Option<u64> {
        self.entries.insert(at, demand)
    }

    /// Demand recorded at exactly `at`.
    pub fn get(&self, at: &Instant) -> Option<u64> {
        self.entries.get(at).copied()
    }

    /// Demand at exactly `at`, zero when nothing was recorded.
    pub fn demand_at(&self, at: &Instant) -> u64 {
        self.get(at).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Instant, &u64)> {
        self.entries.iter()
    }
}

impl FromIterator<(Instant, u64)> for DemandIndex {
    fn from_iter<I: IntoIterator<Item = (Instant, u64)>>(iter: I) -> Self {
        let mut index = DemandIndex::new();
        for (at, demand) in iter {
            index.insert(at, demand);
        }
        index
    }
}

/// Parse a demand cell as a non-negative integer, truncating fractions.
pub fn parse_demand(cell: &CellValue) -> Option<u64> {
    let value = match cell {
        CellValue::Int(i) => return u64::try_from(*i).ok(),
        CellValue::Float(f) => *f,
        CellValue::Text(s) => {
            let text = s.trim();
            if let Ok(whole) = text.parse::<u64>() {
                return Some(whole);
            }
            text.parse::<f64>().ok()?
        }
        CellValue::Bool(_) | CellValue::DateTime(_) => return None,
    };

    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < 0.0 || truncated >= u64::MAX as f64 {
        return None;
    }
    Some(truncated as u64)
}

/// Evaluate one forecast row against the target city.
///
/// `target_city` must already be trimmed. A missing demand column counts as
/// zero demand; a present but unparseable one skips the row.
pub fn evaluate_demand_row(row: &RawRow, target_city: &str) -> RowOutcome<(Instant, u64)> {
    let fields = resolve_row(row, &DEMAND_ALIASES);

    if !passes_city_filter(&fields, target_city) {
        return Err(SkipReason::CityMismatch);
    }

    let timestamp = fields
        .non_empty(LogicalField::Timestamp)
        .ok_or(SkipReason::MissingTimestamp)?;
    let at = instant_from_cell(timestamp).ok_or(SkipReason::InvalidTimestamp)?;

    let demand = match fields.get(LogicalField::Demand) {
        Some(cell) => parse_demand(cell).ok_or(SkipReason::InvalidDemand)?,
        None => 0,
    };

    Ok((at, demand))
}

/// Build the demand index for one city.
///
/// Rows that fail evaluation are skipped and counted. A later row with the
/// same timestamp replaces the earlier value.
pub fn build_demand_index(rows: &[RawRow], target_city: &str) -> (DemandIndex, IngestStats) {
    let target_city = target_city.trim();
    let mut index = DemandIndex::new();
    let mut stats = IngestStats::default();

    for (idx, row) in rows.iter().enumerate() {
        let outcome = evaluate_demand_row(row, target_city);
        stats.record(&outcome);
        match outcome {
            Ok((at, demand)) => {
                if let Some(previous) = index.insert(at, demand) {
                    debug!(
                        "Demand row {} overwrites {} with {} at {}",
                        idx + 2,
                        previous,
                        demand,
                        at
                    );
                }
            }
            Err(reason) => debug!("Skipping demand row {}: {}", idx + 2, reason),
        }
    }

    info!(
        "Demand index for '{}': {} timestamps from {} rows ({} skipped)",
        target_city,
        index.len(),
        stats.rows_read,
        stats.skipped_total()
    );

    (index, stats)
}
