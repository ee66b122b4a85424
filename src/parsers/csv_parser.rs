use crate::errors::ParseError;
use crate::models::SensorReading;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

// Accepted header names per SensorReading field, matched case-insensitively.
const INSIDE_TEMP_HEADERS: &[&str] = &["inside_temperature_c", "tempinside", "temp_inside", "ti"];
const INSIDE_HUMIDITY_HEADERS: &[&str] = &["inside_humidity_pct", "humidityinside", "humidity_inside", "hi"];
const OUTSIDE_TEMP_HEADERS: &[&str] = &["outside_temperature_c", "tempoutside", "temp_outside", "to"];
const OUTSIDE_HUMIDITY_HEADERS: &[&str] = &["outside_humidity_pct", "humidityoutside", "humidity_outside", "ho"];

/// Greenhouse exports frequently use comma decimals ("21,5").
pub fn parse_comma_decimal(s: &str) -> Result<f64, std::num::ParseFloatError> {
    s.trim().trim_matches('"').replace(',', ".").parse::<f64>()
}

/// Reads paired indoor/outdoor readings from a CSV file with a header row.
pub fn parse_readings_csv(file_path: &Path, delimiter: u8) -> Result<Vec<SensorReading>, ParseError> {
    let file = File::open(file_path).map_err(|e| ParseError::IoError {
        path: file_path.to_path_buf(),
        source: e,
    })?;
    parse_readings_from_reader(file, delimiter, file_path)
}

/// Same as `parse_readings_csv` for any reader; `source` is only used in errors.
pub fn parse_readings_from_reader<R: Read>(
    input: R,
    delimiter: u8,
    source: &Path,
) -> Result<Vec<SensorReading>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| ParseError::Csv { path: source.to_path_buf(), source: e })?
        .clone();

    let columns = [
        find_column(&headers, INSIDE_TEMP_HEADERS, source)?,
        find_column(&headers, INSIDE_HUMIDITY_HEADERS, source)?,
        find_column(&headers, OUTSIDE_TEMP_HEADERS, source)?,
        find_column(&headers, OUTSIDE_HUMIDITY_HEADERS, source)?,
    ];

    let mut readings = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Header is line 1
        let row = idx + 2;
        let record = result.map_err(|e| ParseError::Csv { path: source.to_path_buf(), source: e })?;

        let mut values = [0.0f64; 4];
        for (slot, &col) in values.iter_mut().zip(columns.iter()) {
            let raw = record.get(col).unwrap_or("");
            *slot = parse_comma_decimal(raw).map_err(|_| ParseError::InvalidValue {
                path: source.to_path_buf(),
                row,
                column: headers.get(col).unwrap_or_default().to_string(),
                value: raw.to_string(),
            })?;
        }

        readings.push(SensorReading::new(values[0], values[1], values[2], values[3]));
    }

    debug!("Parsed {} readings from {}", readings.len(), source.display());
    Ok(readings)
}

fn find_column(headers: &StringRecord, names: &[&'static str], source: &Path) -> Result<usize, ParseError> {
    headers
        .iter()
        .position(|h| {
            let h = h.trim().to_lowercase();
            names.iter().any(|name| h == *name)
        })
        .ok_or(ParseError::MissingColumn {
            path: source.to_path_buf(),
            column: names[0],
        })
}
