//! Fixed-step timeline generation.

use chrono::TimeDelta;

use crate::error::{CoverageError, CoverageResult};
use crate::models::Instant;

/// Check a requested range before any work is done.
pub fn validate_range(start: Instant, end: Instant, interval_minutes: i64) -> CoverageResult<()> {
    if interval_minutes <= 0 {
        return Err(CoverageError::invalid_range(format!(
            "interval_minutes must be a positive integer, got {}",
            interval_minutes
        )));
    }
    if end <= start {
        return Err(CoverageError::invalid_range(format!(
            "end_date must be after start_date (start_date={}, end_date={})",
            start.to_rfc3339(),
            end.to_rfc3339()
        )));
    }
    Ok(())
}

/// Bucket limit applied when a request does not set its own.
pub const DEFAULT_MAX_POINTS: usize = 100_000;

/// Bucket start instants `start, start+Δ, …` up to and including `end`.
///
/// The last bucket may extend past `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    start: Instant,
    end: Instant,
    interval_minutes: i64,
    step: TimeDelta,
    instants: Vec<Instant>,
}

impl Timeline {
    /// Generate the timeline for `[start, end]` with a step of `interval_minutes`.
    pub fn generate(start: Instant, end: Instant, interval_minutes: i64) -> CoverageResult<Self> {
        Self::generate_bounded(start, end, interval_minutes, DEFAULT_MAX_POINTS)
    }

    /// Like [`Timeline::generate`], failing when more than `max_points`
    /// buckets would be produced.
    pub fn generate_bounded(
        start: Instant,
        end: Instant,
        interval_minutes: i64,
        max_points: usize,
    ) -> CoverageResult<Self> {
        validate_range(start, end, interval_minutes)?;

        let step = TimeDelta::try_minutes(interval_minutes).ok_or_else(|| {
            CoverageError::invalid_range(format!(
                "interval_minutes={} is out of range",
                interval_minutes
            ))
        })?;

        let points = bucket_count(end - start, step);
        if points > max_points as u128 {
            return Err(CoverageError::invalid_range(format!(
                "range {} to {} at {} minutes gives {} buckets, limit is {}",
                start.to_rfc3339(),
                end.to_rfc3339(),
                interval_minutes,
                points,
                max_points
            )));
        }

        let mut instants = Vec::with_capacity(points as usize);
        let mut current = start;
        while current <= end {
            let next = current.checked_add_signed(step).ok_or_else(|| {
                CoverageError::invalid_range("timeline extends past the representable date range")
            })?;
            instants.push(current);
            current = next;
        }

        Ok(Self {
            start,
            end,
            interval_minutes,
            step,
            instants,
        })
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    pub fn interval_minutes(&self) -> i64 {
        self.interval_minutes
    }

    pub fn step(&self) -> TimeDelta {
        self.step
    }

    pub fn instants(&self) -> &[Instant] {
        &self.instants
    }

    /// `(bucket_start, bucket_end)` pairs, `bucket_end = bucket_start + step`.
    pub fn buckets(&self) -> impl Iterator<Item = (Instant, Instant)> + '_ {
        self.instants.iter().map(move |&t0| (t0, t0 + self.step))
    }

    pub fn len(&self) -> usize {
        self.instants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }
}

/// Buckets in an end-inclusive span; both deltas are positive.
fn bucket_count(span: TimeDelta, step: TimeDelta) -> u128 {
    let span_ms = span.num_milliseconds().max(0) as u128;
    let step_ms = step.num_milliseconds().max(1) as u128;
    span_ms / step_ms + 1
}
