//! Service layer: the coverage pipeline.
//!
//! Each stage is a plain function over the previous stage's output so it can
//! be tested on its own:
//!
//! - [`demand`]: forecast rows to a timestamp-keyed [`DemandIndex`]
//! - [`availability`]: roster rows to [`crate::models::AvailabilityInterval`]s
//! - [`timeline`]: requested range to fixed-step buckets
//! - [`coverage`]: buckets, demand and intervals to a [`crate::models::CoverageReport`]

pub mod availability;
pub mod coverage;
pub mod demand;
pub mod timeline;

pub use availability::{collect_availability, evaluate_rider_row};
pub use coverage::{calculate_coverage, compute_coverage};
pub use demand::{build_demand_index, evaluate_demand_row, parse_demand, DemandIndex};
pub use timeline::{validate_range, Timeline, DEFAULT_MAX_POINTS};

use crate::parsing::{LogicalField, ResolvedFields};

/// City filter shared by both tables.
///
/// A row without a city column passes. A row with one passes only when its
/// trimmed value equals `target_city` exactly.
pub(crate) fn passes_city_filter(fields: &ResolvedFields<'_>, target_city: &str) -> bool {
    match fields.get(LogicalField::City) {
        Some(city) => city.as_text().trim() == target_city,
        None => true,
    }
}
