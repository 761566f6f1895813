//! Row extraction from uploaded tables.
//!
//! Both input tables go through the same extractor; the caller declares the
//! buffer's format. Delimited text is decoded leniently and never fails on bad
//! bytes. Spreadsheets are opened with calamine and fail as a whole when the
//! workbook structure cannot be read.

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use crate::error::{CoverageError, CoverageResult};
use crate::models::{CellValue, RawRow};

/// Declared layout of an input buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Comma/tab/semicolon separated text with a header line.
    #[default]
    Delimited,
    /// Workbook (xlsx, xlsm, xlsb, xls, ods); the first sheet is read.
    Spreadsheet,
}

impl SourceFormat {
    /// Infer the format from a file name extension.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" | "tsv" => Some(Self::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delimited => "delimited",
            Self::Spreadsheet => "spreadsheet",
        }
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "delimited" | "csv" | "text" => Ok(Self::Delimited),
            "spreadsheet" | "xlsx" | "xls" | "excel" => Ok(Self::Spreadsheet),
            _ => Err(format!("Unknown source format: {}", s)),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract header-keyed rows from a buffer.
///
/// The first row is the header. An input without data rows yields an empty
/// vector. The only failure is a buffer that is not a readable instance of
/// `format`, reported as [`CoverageError::MalformedInput`].
pub fn extract_rows(
    bytes: &[u8],
    source_name: &str,
    format: SourceFormat,
) -> CoverageResult<Vec<RawRow>> {
    let rows = match format {
        SourceFormat::Delimited => read_delimited(bytes, source_name)?,
        SourceFormat::Spreadsheet => read_spreadsheet(bytes, source_name)?,
    };
    debug!(
        "Extracted {} rows from '{}' ({})",
        rows.len(),
        source_name,
        format
    );
    Ok(rows)
}

/// Decode text, honouring a UTF-8 or UTF-16 byte-order mark.
///
/// Invalid sequences become U+FFFD.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest),
        [0xFF, 0xFE, rest @ ..] => Cow::Owned(decode_utf16(rest, u16::from_le_bytes)),
        [0xFE, 0xFF, rest @ ..] => Cow::Owned(decode_utf16(rest, u16::from_be_bytes)),
        _ => String::from_utf8_lossy(bytes),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Pick the field separator from the header line.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    if header.contains(',') {
        b','
    } else if header.contains('\t') {
        b'\t'
    } else if header.contains(';') {
        b';'
    } else {
        b','
    }
}

fn read_delimited(bytes: &[u8], source_name: &str) -> CoverageResult<Vec<RawRow>> {
    let text = decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(sniff_delimiter(&text))
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CoverageError::malformed(source_name, SourceFormat::Delimited, e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            CoverageError::malformed(
                source_name,
                SourceFormat::Delimited,
                format!("record {}: {}", idx + 1, e),
            )
        })?;

        // Blank line
        if record.len() <= 1 && record.iter().all(str::is_empty) {
            continue;
        }

        let cells = record.iter().map(CellValue::from);
        rows.push(zip_row(&headers, cells));
    }

    Ok(rows)
}

fn read_spreadsheet(bytes: &[u8], source_name: &str) -> CoverageResult<Vec<RawRow>> {
    let malformed =
        |message: String| CoverageError::malformed(source_name, SourceFormat::Spreadsheet, message);

    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| malformed(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| malformed("workbook contains no worksheets".to_string()))?
        .map_err(|e| malformed(e.to_string()))?;

    // The range begins at the first used cell, not at column A.
    let first_column = range.start().map_or(0, |(_, col)| col as usize);

    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        return Ok(Vec::new());
    };

    let headers: Vec<String> = header_cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_name(first_column + idx, cell))
        .collect();

    Ok(sheet_rows
        .map(|cells| zip_row(&headers, cells.iter().map(convert_cell)))
        .collect())
}

/// Header text for a spreadsheet column; blank cells get `column_<n>`,
/// where `n` is the 1-based sheet column (A is 1).
fn header_name(sheet_column: usize, cell: &Data) -> String {
    let text = convert_cell(cell).as_text().into_owned();
    if text.trim().is_empty() {
        format!("column_{}", sheet_column + 1)
    } else {
        text
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::empty(),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(cell.to_string())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Pair values with header names by position.
///
/// Missing trailing values become empty text and surplus values are dropped,
/// so every row carries exactly the header's keys. A repeated header name
/// keeps its first position and its last value.
fn zip_row<I>(headers: &[String], cells: I) -> RawRow
where
    I: IntoIterator<Item = CellValue>,
{
    let mut cells = cells.into_iter();
    let mut row = RawRow::with_capacity(headers.len());
    for name in headers {
        let value = cells.next().unwrap_or_default();
        row.insert(name.clone(), value);
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(row: &RawRow, key: &str) -> String {
        row.get(key).map(|c| c.as_text().into_owned()).unwrap_or_default()
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("csv".parse::<SourceFormat>().unwrap(), SourceFormat::Delimited);
        assert_eq!("Delimited".parse::<SourceFormat>().unwrap(), SourceFormat::Delimited);
        assert_eq!("xlsx".parse::<SourceFormat>().unwrap(), SourceFormat::Spreadsheet);
        assert_eq!(" excel ".parse::<SourceFormat>().unwrap(), SourceFormat::Spreadsheet);
        assert!("parquet".parse::<SourceFormat>().is_err());
    }

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(SourceFormat::from_file_name("demand.CSV"), Some(SourceFormat::Delimited));
        assert_eq!(SourceFormat::from_file_name("riders.xlsx"), Some(SourceFormat::Spreadsheet));
        assert_eq!(SourceFormat::from_file_name("riders.ods"), Some(SourceFormat::Spreadsheet));
        assert_eq!(SourceFormat::from_file_name("riders"), None);
        assert_eq!(SourceFormat::from_file_name("riders.json"), None);
    }

    #[test]
    fn test_delimited_basic() {
        let csv = "city,timestamp,demand\nMAD,2024-01-01T10:00,5\nBCN,2024-01-01T10:00,3\n";
        let rows = extract_rows(csv.as_bytes(), "demand.csv", SourceFormat::Delimited).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(text(&rows[0], "city"), "MAD");
        assert_eq!(text(&rows[1], "demand"), "3");
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, vec!["city", "timestamp", "demand"]);
    }

    #[test]
    fn test_delimited_header_only_is_empty() {
        let rows = extract_rows(b"city,timestamp,demand\n", "d.csv", SourceFormat::Delimited).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_delimited_empty_buffer_is_empty() {
        let rows = extract_rows(b"", "d.csv", SourceFormat::Delimited).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_delimited_invalid_utf8_is_replaced() {
        let mut bytes = b"city,demand\nMA".to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(b"D,5\nBCN,3\n");
        let rows = extract_rows(&bytes, "d.csv", SourceFormat::Delimited).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(text(&rows[0], "city"), "MA\u{FFFD}D");
        assert_eq!(text(&rows[1], "city"), "BCN");
    }

    #[test]
    fn test_delimited_strips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"city,demand\nMAD,5\n");
        let rows = extract_rows(&bytes, "d.csv", SourceFormat::Delimited).unwrap();
        assert_eq!(text(&rows[0], "city"), "MAD");
    }

    #[test]
    fn test_delimited_utf16_le() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "city,demand\nMAD,5\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let rows = extract_rows(&bytes, "d.csv", SourceFormat::Delimited).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(text(&rows[0], "demand"), "5");
    }

    #[test]
    fn test_delimited_short_and_long_rows() {
        let csv = "a,b,c\n1\n1,2,3,4\n";
        let rows = extract_rows(csv.as_bytes(), "t.csv", SourceFormat::Delimited).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 3);
        assert!(rows[0]["c"].is_empty());
        assert_eq!(rows[1].len(), 3);
        assert_eq!(text(&rows[1], "c"), "3");
    }

    #[test]
    fn test_delimited_tab_separated() {
        let tsv = "rider_id\tstart\tend\n7\t2024-01-01 09:00\t2024-01-01 10:00\n";
        let rows = extract_rows(tsv.as_bytes(), "r.tsv", SourceFormat::Delimited).unwrap();
        assert_eq!(text(&rows[0], "start"), "2024-01-01 09:00");
    }

    #[test]
    fn test_delimited_duplicate_header_last_value_wins() {
        let csv = "city,demand,city\nMAD,5,BCN\n";
        let rows = extract_rows(csv.as_bytes(), "d.csv", SourceFormat::Delimited).unwrap();
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0].get_index(0).map(|(k, _)| k.as_str()), Some("city"));
        assert_eq!(text(&rows[0], "city"), "BCN");
    }

    #[test]
    fn test_delimited_values_are_not_trimmed() {
        let csv = "city , demand\n MAD ,5\n";
        let rows = extract_rows(csv.as_bytes(), "d.csv", SourceFormat::Delimited).unwrap();
        assert_eq!(text(&rows[0], "city "), " MAD ");
    }

    #[test]
    fn test_spreadsheet_garbage_is_malformed() {
        let err = extract_rows(b"definitely not a workbook", "riders.xlsx", SourceFormat::Spreadsheet)
            .unwrap_err();
        match err {
            CoverageError::MalformedInput {
                source_name,
                format,
                ..
            } => {
                assert_eq!(source_name, "riders.xlsx");
                assert_eq!(format, SourceFormat::Spreadsheet);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_convert_cell_empty_is_placeholder() {
        assert!(convert_cell(&Data::Empty).is_empty());
        assert_eq!(convert_cell(&Data::Int(4)), CellValue::Int(4));
        assert_eq!(convert_cell(&Data::String("x".into())), CellValue::from("x"));
    }

    #[test]
    fn test_header_name_placeholder() {
        assert_eq!(header_name(0, &Data::Empty), "column_1");
        assert_eq!(header_name(3, &Data::String("  ".into())), "column_4");
        assert_eq!(header_name(1, &Data::String("city".into())), "city");
    }

    #[test]
    fn test_zip_row_pads() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let row = zip_row(&headers, vec![CellValue::Int(1)]);
        assert_eq!(row["a"], CellValue::Int(1));
        assert!(row["b"].is_empty());
    }
}
