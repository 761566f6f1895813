use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// One extracted row: header name (as spelled in the source) to raw value.
///
/// Insertion order follows the source header.
pub type RawRow = IndexMap<String, CellValue>;

/// A raw scalar as read from a source table.
///
/// Delimited text only ever yields [`CellValue::Text`]; spreadsheets keep the
/// cell's native type. Missing cells are represented as empty text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// The empty-text placeholder used for missing cells.
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    /// True for empty text. Typed scalars are never empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }

    /// Textual form of the value, borrowed when it already is text.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(i) => write!(f, "{}", i),
            // Spreadsheets store integral ids as floats; print them without ".0"
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_placeholder() {
        assert!(CellValue::empty().is_empty());
        assert!(CellValue::default().is_empty());
        assert!(!CellValue::Int(0).is_empty());
        assert!(!CellValue::from(" ").is_empty());
    }

    #[test]
    fn test_integral_float_prints_without_fraction() {
        assert_eq!(CellValue::Float(42.0).to_string(), "42");
        assert_eq!(CellValue::Float(4.5).to_string(), "4.5");
        assert_eq!(CellValue::Int(-3).as_text(), "-3");
    }

    #[test]
    fn test_datetime_text() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(CellValue::DateTime(dt).as_text(), "2024-01-01T10:30:00");
    }

    #[test]
    fn test_text_is_borrowed() {
        let cell = CellValue::from("MAD");
        assert!(matches!(cell.as_text(), Cow::Borrowed("MAD")));
    }
}
