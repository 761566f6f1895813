//! Readers for the uploaded demand and rider tables.
//!
//! # Parsers
//!
//! - [`extractor`]: turn a delimited-text or spreadsheet buffer into header-keyed rows
//! - [`aliases`]: map the many header spellings onto logical fields
//!
//! # Example
//!
//! ```
//! use rider_coverage::parsing::{extract_rows, resolve_row, LogicalField, SourceFormat, DEMAND_ALIASES};
//!
//! let csv = "City_Code,Timestamp,Demand\nMAD,2024-01-01T10:00,5\n";
//! let rows = extract_rows(csv.as_bytes(), "demand.csv", SourceFormat::Delimited)
//!     .expect("delimited text never fails");
//! let fields = resolve_row(&rows[0], &DEMAND_ALIASES);
//! assert_eq!(fields.get(LogicalField::Demand).unwrap().as_text(), "5");
//! ```

pub mod aliases;
pub mod extractor;

pub use aliases::{
    normalize_key, resolve_row, AliasTable, LogicalField, ResolvedFields, DEMAND_ALIASES,
    RIDER_ALIASES,
};
pub use extractor::{extract_rows, SourceFormat};
