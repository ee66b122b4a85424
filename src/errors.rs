use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading config file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse JSON configuration in {path}: {source}")]
    JsonParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Configuration file not found at {path}")]
    NotFound { path: PathBuf },
    #[error("Invalid value '{value}' for '{key}': {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

/// Raised by `MicroclimateEngine::try_compute` when the configured validation
/// mode rejects a reading. `compute` never produces these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Field '{field}' is not a finite number ({value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("Field '{field}' value {value} out of range ({min} to {max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Field '{field}' is 0% relative humidity, dew point is undefined")]
    ZeroHumidity { field: &'static str },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading data file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("JSON parsing error in {path} at record {record}: {source}")]
    JsonParseError {
        path: PathBuf,
        record: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("Invalid value in {path} at row {row}, column '{column}': '{value}'")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
    #[error("Delimiter '{delimiter}' is not a single-byte character")]
    InvalidDelimiter { delimiter: char },
    #[error("Unsupported input format '{format}' for file {path}")]
    UnsupportedFormat { format: String, path: PathBuf },
}
