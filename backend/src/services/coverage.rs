//! Coverage computation: demand against available riders per bucket.

use log::info;

use super::availability::collect_availability;
use super::demand::{build_demand_index, DemandIndex};
use super::timeline::Timeline;
use crate::error::CoverageResult;
use crate::models::{
    AvailabilityInterval, CoveragePoint, CoverageReport, CoverageRequest, IngestDiagnostics,
};
use crate::parsing::extract_rows;

/// One coverage point per timeline bucket.
///
/// Demand is an exact lookup at the bucket start. Availability counts the
/// intervals overlapping `[t0, t0 + step)` under strict half-open comparison.
pub fn calculate_coverage(
    timeline: &Timeline,
    demand: &DemandIndex,
    intervals: &[AvailabilityInterval],
) -> Vec<CoveragePoint> {
    timeline
        .buckets()
        .map(|(t0, t1)| {
            let available = intervals.iter().filter(|i| i.overlaps(t0, t1)).count() as u64;
            CoveragePoint::new(t0, demand.demand_at(&t0), available)
        })
        .collect()
}

/// Run the whole pipeline for one request.
///
/// The range is validated before either buffer is decoded. Fails only with
/// [`crate::CoverageError::InvalidRange`] or
/// [`crate::CoverageError::MalformedInput`]; bad rows are skipped and counted
/// in the report diagnostics.
pub fn compute_coverage(request: &CoverageRequest) -> CoverageResult<CoverageReport> {
    let timeline = Timeline::generate_bounded(
        request.start,
        request.end,
        request.interval_minutes,
        request.max_points,
    )?;
    let target_city = request.city.trim();

    let demand_rows = extract_rows(
        &request.demand.bytes,
        &request.demand.name,
        request.demand.format,
    )?;
    let rider_rows = extract_rows(
        &request.riders.bytes,
        &request.riders.name,
        request.riders.format,
    )?;

    let (demand_index, demand_stats) = build_demand_index(&demand_rows, target_city);
    let (intervals, rider_stats) = collect_availability(&rider_rows, target_city);

    let series = calculate_coverage(&timeline, &demand_index, &intervals);
    let report = CoverageReport::new(
        target_city.to_string(),
        request.start,
        request.end,
        request.interval_minutes,
        series,
        IngestDiagnostics {
            demand: demand_stats,
            riders: rider_stats,
        },
    );

    info!(
        "Coverage for '{}': {} points, total_unmet={}, total_surplus={}",
        target_city, report.summary.points, report.summary.total_unmet, report.summary.total_surplus
    );

    Ok(report)
}
