//! Parsing of tabular uploads into a [`Table`].

use crate::{error::WaterwatchError, table::Table};
use calamine::{open_workbook_auto_from_rs, Reader};
use serde_json::Value;
use std::io::Cursor;
use tracing::{debug, warn};
use waterwatch_schemas::file_formats::TabularFormat;

/// Turns the bytes of an upload in a declared format into a table.
pub trait TabularParser {
    fn parse(&self, bytes: &[u8], format: TabularFormat) -> Result<Table, WaterwatchError>;
}

/// Parser for CSV, JSON and the first worksheet of an Excel workbook.
///
/// Workbooks that cannot be opened are reported as [`WaterwatchError::UnsupportedFormat`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTabularParser;

impl TabularParser for BuiltinTabularParser {
    fn parse(&self, bytes: &[u8], format: TabularFormat) -> Result<Table, WaterwatchError> {
        let table = match format {
            TabularFormat::Csv => parse_csv(bytes)?,
            TabularFormat::Json => parse_json(bytes)?,
            TabularFormat::Excel => parse_excel(bytes)?,
        };
        debug!(
            "Parsed {} table with {} columns and {} rows",
            format,
            table.column_count(),
            table.row_count()
        );
        Ok(table)
    }
}

fn parse_csv(bytes: &[u8]) -> Result<Table, WaterwatchError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .map_err(WaterwatchError::CsvParsing)?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(WaterwatchError::EmptyTable);
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(WaterwatchError::CsvParsing)?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table::new(headers, rows))
}

/// First worksheet only; its first row is the header row.
fn parse_excel(bytes: &[u8]) -> Result<Table, WaterwatchError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(unreadable_workbook)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(unreadable_workbook)?,
        None => return Err(WaterwatchError::EmptyTable),
    };

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());
    let headers = rows.next().unwrap_or_default();
    if headers.is_empty() {
        return Err(WaterwatchError::EmptyTable);
    }
    Ok(Table::new(headers, rows.collect()))
}

fn unreadable_workbook(e: calamine::Error) -> WaterwatchError {
    warn!("Could not read Excel workbook: {}", e);
    WaterwatchError::UnsupportedFormat(TabularFormat::Excel)
}

fn parse_json(bytes: &[u8]) -> Result<Table, WaterwatchError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let table = match value {
        Value::Array(records) => records_to_table(records)?,
        Value::Object(columns) => columns_to_table(columns)?,
        _ => return Err(WaterwatchError::JsonShape),
    };
    if table.headers.is_empty() {
        return Err(WaterwatchError::EmptyTable);
    }
    Ok(table)
}

/// `[{"pH": 7.1, "site": "A"}, ...]`: headers are keys in first-seen order.
fn records_to_table(records: Vec<Value>) -> Result<Table, WaterwatchError> {
    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for record in records {
        let Value::Object(object) = record else {
            return Err(WaterwatchError::JsonShape);
        };
        for key in object.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(object);
    }

    let rows: Vec<Vec<String>> = objects
        .iter()
        .map(|object| {
            headers
                .iter()
                .map(|h| object.get(h).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();
    Ok(Table::new(headers, rows))
}

/// `{"pH": {"0": 7.1, "1": 6.8}, ...}` or `{"pH": [7.1, 6.8], ...}`.
fn columns_to_table(columns: serde_json::Map<String, Value>) -> Result<Table, WaterwatchError> {
    let headers: Vec<String> = columns.keys().cloned().collect();
    let mut index: Vec<String> = Vec::new();
    for column in columns.values() {
        match column {
            Value::Object(cells) => {
                for key in cells.keys() {
                    if !index.contains(key) {
                        index.push(key.clone());
                    }
                }
            }
            Value::Array(cells) => {
                for i in index.len()..cells.len() {
                    index.push(i.to_string());
                }
            }
            _ => return Err(WaterwatchError::JsonShape),
        }
    }

    let rows: Vec<Vec<String>> = index
        .iter()
        .enumerate()
        .map(|(position, key)| {
            columns
                .values()
                .map(|column| {
                    let cell = match column {
                        Value::Object(cells) => cells.get(key),
                        Value::Array(cells) => cells.get(position),
                        _ => None,
                    };
                    cell.map(cell_text).unwrap_or_default()
                })
                .collect()
        })
        .collect();
    Ok(Table::new(headers, rows))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_with_header_row() {
        let csv = b"site,pH,Turbidity\nA,7.1,2\nB,6.4,9.5\n";
        let table = BuiltinTabularParser.parse(csv, TabularFormat::Csv).unwrap();
        assert_eq!(table.headers, vec!["site", "pH", "Turbidity"]);
        assert_eq!(table.rows[1], vec!["B", "6.4", "9.5"]);
    }

    #[test]
    fn ragged_csv_is_a_parse_error() {
        let csv = b"a,b\n1,2,3\n";
        let err = BuiltinTabularParser.parse(csv, TabularFormat::Csv).unwrap_err();
        assert!(matches!(err, WaterwatchError::CsvParsing(_)));
    }

    #[test]
    fn empty_csv_has_no_columns() {
        let err = BuiltinTabularParser.parse(b"", TabularFormat::Csv).unwrap_err();
        assert!(matches!(err, WaterwatchError::EmptyTable));
    }

    #[test]
    fn parses_json_records_in_key_order() {
        let json = br#"[{"site": "A", "pH": 7.1}, {"site": "B", "Conductivity": 640, "pH": null}]"#;
        let table = BuiltinTabularParser.parse(json, TabularFormat::Json).unwrap();
        assert_eq!(table.headers, vec!["site", "pH", "Conductivity"]);
        assert_eq!(table.rows[0], vec!["A", "7.1", ""]);
        assert_eq!(table.rows[1], vec!["B", "", "640"]);
    }

    #[test]
    fn parses_column_oriented_json() {
        let json = br#"{"pH": {"0": 7.0, "1": 8.9}, "site": {"0": "A", "1": "B"}}"#;
        let table = BuiltinTabularParser.parse(json, TabularFormat::Json).unwrap();
        assert_eq!(table.headers, vec!["pH", "site"]);
        assert_eq!(table.rows, vec![vec!["7.0", "A"], vec!["8.9", "B"]]);
    }

    #[test]
    fn parses_json_columns_of_arrays() {
        let json = br#"{"Turbidity": [1.5, 3], "site": ["A"]}"#;
        let table = BuiltinTabularParser.parse(json, TabularFormat::Json).unwrap();
        assert_eq!(table.rows, vec![vec!["1.5", "A"], vec!["3", ""]]);
    }

    #[test]
    fn rejects_scalar_json_and_malformed_json() {
        let scalar = BuiltinTabularParser.parse(b"42", TabularFormat::Json).unwrap_err();
        assert!(matches!(scalar, WaterwatchError::JsonShape));
        let broken = BuiltinTabularParser.parse(b"{\"pH\": ", TabularFormat::Json).unwrap_err();
        assert!(matches!(broken, WaterwatchError::JsonParsing(_)));
    }

    #[test]
    fn parses_first_excel_worksheet() {
        let xlsx = include_bytes!("../tests/fixtures/readings.xlsx");
        let table = BuiltinTabularParser.parse(xlsx, TabularFormat::Excel).unwrap();
        assert_eq!(table.headers, vec!["site", "pH", "Turbidity"]);
        assert_eq!(table.rows, vec![vec!["A", "7.1", "2"], vec!["B", "6.4", "9.5"]]);
    }

    #[test]
    fn unreadable_workbook_is_unsupported() {
        let err = BuiltinTabularParser.parse(b"PK\x03\x04", TabularFormat::Excel).unwrap_err();
        assert!(matches!(err, WaterwatchError::UnsupportedFormat(TabularFormat::Excel)));
    }
}
