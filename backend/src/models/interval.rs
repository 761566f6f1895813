use serde::{Deserialize, Serialize};

use super::time::Instant;

/// A rider's availability window, `[start, end)`.
///
/// Always satisfies `end > start`; construct through [`AvailabilityInterval::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityInterval {
    pub rider_id: String,
    pub start: Instant,
    pub end: Instant,
}

impl AvailabilityInterval {
    /// Create an interval, or `None` when the range is empty or inverted.
    pub fn new(rider_id: impl Into<String>, start: Instant, end: Instant) -> Option<Self> {
        if end <= start {
            return None;
        }
        Some(Self {
            rider_id: rider_id.into(),
            start,
            end,
        })
    }

    /// Half-open overlap with the bucket `[bucket_start, bucket_end)`.
    ///
    /// Touching at a boundary does not count.
    pub fn overlaps(&self, bucket_start: Instant, bucket_end: Instant) -> bool {
        self.start < bucket_end && bucket_start < self.end
    }

    /// Length of the window.
    pub fn duration(&self) -> chrono::TimeDelta {
        self.end - self.start
    }
}
