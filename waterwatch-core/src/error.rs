use thiserror::Error;
use waterwatch_schemas::{file_formats::TabularFormat, parameter::Parameter};

#[derive(Debug, Error)]
pub enum WaterwatchError {
    #[error("Unsupported file type '{0}'. Accepted types: csv, xlsx, xls, json, png, jpeg, jpg")]
    UnsupportedFileKind(String),

    #[error("{0} table could not be read")]
    UnsupportedFormat(TabularFormat),

    #[error("{parameter} value {value} is outside the control range {min} - {max}")]
    ManualValueOutOfRange {
        parameter: Parameter,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to process JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("JSON table must be an array of records or an object of columns")]
    JsonShape,

    #[error("Failed to parse CSV table: {0}")]
    CsvParsing(#[source] csv::Error),

    #[error("No columns to parse from the uploaded table")]
    EmptyTable,

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}
