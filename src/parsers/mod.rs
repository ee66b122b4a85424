pub mod csv_parser;
pub mod json_parser;

use crate::errors::ParseError;
use crate::models::SensorReading;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Guesses the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        Self::from_name(&ext, path)
    }

    pub fn from_name(name: &str, path: &Path) -> Result<Self, ParseError> {
        match name.to_lowercase().as_str() {
            "csv" | "tsv" | "txt" => Ok(InputFormat::Csv),
            "json" | "ndjson" | "jsonl" => Ok(InputFormat::Json),
            other => Err(ParseError::UnsupportedFormat {
                format: other.to_string(),
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Picks the input format and CSV delimiter from explicit choices, falling
/// back to the file extension. `.tsv` files default to tab.
pub fn resolve_input(
    path: &Path,
    format: Option<&str>,
    delimiter: Option<char>,
) -> Result<(InputFormat, u8), ParseError> {
    let format = match format {
        Some(name) => InputFormat::from_name(name, path)?,
        None => InputFormat::from_path(path)?,
    };

    let is_tsv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));

    let delimiter = match delimiter {
        Some(c) => u8::try_from(c).map_err(|_| ParseError::InvalidDelimiter { delimiter: c })?,
        None if is_tsv => b'\t',
        None => b',',
    };

    Ok((format, delimiter))
}

/// Reads all readings from `path` in the given format.
pub fn parse_readings(path: &Path, format: InputFormat, delimiter: u8) -> Result<Vec<SensorReading>, ParseError> {
    match format {
        InputFormat::Csv => csv_parser::parse_readings_csv(path, delimiter),
        InputFormat::Json => json_parser::parse_readings_json(path),
    }
}
