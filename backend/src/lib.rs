//! # Rider Coverage
//!
//! Compares forecast delivery demand against rider availability for one city
//! over a requested time range.
//!
//! Two uploaded tables drive a computation:
//!
//! - a demand forecast (city, slot timestamp, expected orders)
//! - a rider roster (rider, city, availability start and end)
//!
//! Either table may be delimited text or a spreadsheet. Header spellings
//! vary between sources and are resolved through alias tables.
//!
//! ## Architecture
//!
//! - [`parsing`]: buffer decoding and header alias resolution
//! - [`models`]: rows, intervals, requests, reports and ingest diagnostics
//! - [`services`]: demand index, availability, timeline and coverage
//! - [`api`]: response DTOs
//! - [`config`]: server configuration
//! - [`http`]: Axum-based HTTP shell (feature `http-server`)
//!
//! ## Example
//!
//! ```
//! use rider_coverage::models::{CoverageRequest, InputTable};
//! use rider_coverage::compute_coverage;
//!
//! let demand = "city,timestamp,demand\nMAD,2024-01-01 10:00,5\n";
//! let riders = "rider_id,city,start,end\nr1,MAD,2024-01-01 09:45,2024-01-01 10:20\n";
//!
//! let request = CoverageRequest::from_text_range(
//!     InputTable::delimited("demand.csv", demand),
//!     InputTable::delimited("riders.csv", riders),
//!     "2024-01-01 10:00",
//!     "2024-01-01 10:30",
//!     "MAD",
//!     30,
//! )
//! .unwrap();
//!
//! let report = compute_coverage(&request).unwrap();
//! assert_eq!(report.series[0].unmet, 4);
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{CoverageError, CoverageResult};
pub use services::compute_coverage;
