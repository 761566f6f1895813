use super::time::{parse_instant, Instant};
use crate::error::{CoverageError, CoverageResult};
use crate::parsing::SourceFormat;
use crate::services::DEFAULT_MAX_POINTS;

/// One uploaded table: its bytes, a name for error messages, and its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTable {
    pub name: String,
    pub bytes: Vec<u8>,
    pub format: SourceFormat,
}

impl InputTable {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>, format: SourceFormat) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            format,
        }
    }

    /// Delimited-text table.
    pub fn delimited(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(name, bytes, SourceFormat::Delimited)
    }

    /// Spreadsheet table.
    pub fn spreadsheet(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(name, bytes, SourceFormat::Spreadsheet)
    }
}

/// Everything one coverage computation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageRequest {
    pub demand: InputTable,
    pub riders: InputTable,
    pub start: Instant,
    pub end: Instant,
    /// Target city code as supplied; trimmed before filtering.
    pub city: String,
    pub interval_minutes: i64,
    /// Largest timeline this request may generate.
    pub max_points: usize,
}

impl CoverageRequest {
    /// Build a request from textual range bounds.
    ///
    /// An unparseable bound is reported as [`CoverageError::InvalidRange`]
    /// naming the offending parameter.
    pub fn from_text_range(
        demand: InputTable,
        riders: InputTable,
        start: &str,
        end: &str,
        city: impl Into<String>,
        interval_minutes: i64,
    ) -> CoverageResult<Self> {
        Ok(Self {
            demand,
            riders,
            start: parse_range_bound("start_date", start)?,
            end: parse_range_bound("end_date", end)?,
            city: city.into(),
            interval_minutes,
            max_points: DEFAULT_MAX_POINTS,
        })
    }

    /// Replace the bucket limit.
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }
}

/// Parse a request range bound.
pub fn parse_range_bound(param: &str, value: &str) -> CoverageResult<Instant> {
    parse_instant(value.trim()).ok_or_else(|| {
        CoverageError::invalid_range(format!(
            "Invalid date format for {}: '{}'. Use 'YYYY-MM-DD HH:MM'.",
            param, value
        ))
    })
}
