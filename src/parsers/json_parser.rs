use crate::errors::ParseError;
use crate::models::SensorReading;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads readings from a JSON array or newline-delimited JSON objects.
pub fn parse_readings_json(file_path: &Path) -> Result<Vec<SensorReading>, ParseError> {
    let content = fs::read_to_string(file_path).map_err(|e| ParseError::IoError {
        path: file_path.to_path_buf(),
        source: e,
    })?;
    parse_readings_json_str(&content, file_path)
}

pub fn parse_readings_json_str(content: &str, source: &Path) -> Result<Vec<SensorReading>, ParseError> {
    let trimmed = content.trim_start();

    let readings = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<SensorReading>>(trimmed).map_err(|e| ParseError::JsonParseError {
            path: source.to_path_buf(),
            record: 0,
            source: e,
        })?
    } else {
        // One object per line, blank lines ignored
        let mut readings = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let reading = serde_json::from_str(line).map_err(|e| ParseError::JsonParseError {
                path: source.to_path_buf(),
                record: idx + 1,
                source: e,
            })?;
            readings.push(reading);
        }
        readings
    };

    debug!("Parsed {} readings from {}", readings.len(), source.display());
    Ok(readings)
}
