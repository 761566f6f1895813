//! Rider availability collection from the roster table.

use log::{debug, info};

use super::passes_city_filter;
use crate::models::{
    instant_from_cell, AvailabilityInterval, IngestStats, RawRow, RowOutcome, SkipReason,
};
use crate::parsing::{resolve_row, LogicalField, RIDER_ALIASES};

/// Evaluate one roster row against the target city.
///
/// `target_city` must already be trimmed. A missing rider id becomes the
/// empty string.
pub fn evaluate_rider_row(row: &RawRow, target_city: &str) -> RowOutcome<AvailabilityInterval> {
    let fields = resolve_row(row, &RIDER_ALIASES);

    if !passes_city_filter(&fields, target_city) {
        return Err(SkipReason::CityMismatch);
    }

    let (Some(start), Some(end)) = (
        fields.non_empty(LogicalField::IntervalStart),
        fields.non_empty(LogicalField::IntervalEnd),
    ) else {
        return Err(SkipReason::MissingBound);
    };

    let start = instant_from_cell(start).ok_or(SkipReason::InvalidBound)?;
    let end = instant_from_cell(end).ok_or(SkipReason::InvalidBound)?;

    let rider_id = fields
        .get(LogicalField::RiderId)
        .map(|cell| cell.as_text().into_owned())
        .unwrap_or_default();

    AvailabilityInterval::new(rider_id, start, end).ok_or(SkipReason::EmptyInterval)
}

/// Collect availability intervals for one city, in input order.
///
/// A rider may contribute several intervals; nothing is merged or deduplicated.
pub fn collect_availability(
    rows: &[RawRow],
    target_city: &str,
) -> (Vec<AvailabilityInterval>, IngestStats) {
    let target_city = target_city.trim();
    let mut intervals = Vec::new();
    let mut stats = IngestStats::default();

    for (idx, row) in rows.iter().enumerate() {
        let outcome = evaluate_rider_row(row, target_city);
        stats.record(&outcome);
        match outcome {
            Ok(interval) => intervals.push(interval),
            Err(reason) => debug!("Skipping rider row {}: {}", idx + 2, reason),
        }
    }

    info!(
        "Availability for '{}': {} intervals from {} rows ({} skipped)",
        target_city,
        intervals.len(),
        stats.rows_read,
        stats.skipped_total()
    );

    (intervals, stats)
}
