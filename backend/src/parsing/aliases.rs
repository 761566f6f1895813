//! Header alias tables and resolution.
//!
//! Source files name the same column in several ways (`city_code` vs
//! `city`, `Rider ID` vs `rider_id`). Each table declares, per logical field,
//! the accepted header spellings in priority order. Resolution lowercases and
//! trims the row's keys (never its values) and picks the first alias present.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::models::{CellValue, RawRow};

/// A semantic column, independent of its header spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    City,
    Timestamp,
    Demand,
    RiderId,
    IntervalStart,
    IntervalEnd,
}

impl LogicalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalField::City => "city",
            LogicalField::Timestamp => "timestamp",
            LogicalField::Demand => "demand",
            LogicalField::RiderId => "rider_id",
            LogicalField::IntervalStart => "interval_start",
            LogicalField::IntervalEnd => "interval_end",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered header aliases for each logical field of one table.
///
/// Aliases are stored normalized (lowercase, trimmed).
#[derive(Debug, Clone, Copy)]
pub struct AliasTable {
    entries: &'static [(LogicalField, &'static [&'static str])],
}

/// Demand forecast columns.
pub const DEMAND_ALIASES: AliasTable = AliasTable {
    entries: &[
        (LogicalField::City, &["city_code", "city"]),
        (
            LogicalField::Timestamp,
            &["slot_started_local_at", "timestamp", "time", "datetime"],
        ),
        (
            LogicalField::Demand,
            &["final_order_forecast", "available_capacity", "demand"],
        ),
    ],
};

/// Rider availability columns.
pub const RIDER_ALIASES: AliasTable = AliasTable {
    entries: &[
        (LogicalField::City, &["ciudad", "city"]),
        (LogicalField::RiderId, &["rider id", "rider_id", "id"]),
        (
            LogicalField::IntervalStart,
            &["available from", "start", "start_time"],
        ),
        (LogicalField::IntervalEnd, &["available to", "end", "end_time"]),
    ],
};

impl AliasTable {
    /// Accepted aliases for `field`, most preferred first.
    pub fn aliases(&self, field: LogicalField) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }

    /// Logical fields declared by this table.
    pub fn fields(&self) -> impl Iterator<Item = LogicalField> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }
}

/// Normalized form of a header key.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

/// Logical field values resolved from one row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFields<'a> {
    values: HashMap<LogicalField, &'a CellValue>,
}

impl<'a> ResolvedFields<'a> {
    /// Raw value for `field`, or `None` when no alias matched.
    pub fn get(&self, field: LogicalField) -> Option<&'a CellValue> {
        self.values.get(&field).copied()
    }

    /// Present and not empty text.
    pub fn non_empty(&self, field: LogicalField) -> Option<&'a CellValue> {
        self.get(field).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, field: LogicalField) -> bool {
        self.values.contains_key(&field)
    }
}

/// Resolve every logical field of `table` against one row.
///
/// When two raw keys normalize to the same string the first one in row
/// order supplies the value.
pub fn resolve_row<'a>(row: &'a RawRow, table: &AliasTable) -> ResolvedFields<'a> {
    let mut normalized: HashMap<String, &'a CellValue> = HashMap::with_capacity(row.len());
    for (key, value) in row {
        normalized.entry(normalize_key(key)).or_insert(value);
    }

    let values = table
        .entries
        .iter()
        .filter_map(|(field, aliases)| {
            aliases
                .iter()
                .find_map(|alias| normalized.get(*alias))
                .map(|value| (*field, *value))
        })
        .collect();

    ResolvedFields { values }
}
