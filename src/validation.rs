//! Optional input checks applied by `MicroclimateEngine::try_compute`.

use crate::errors::ValidationError;
use crate::models::SensorReading;
use serde::{Deserialize, Serialize};

/// How strictly readings are checked before computing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// No checks, garbage in garbage out.
    #[default]
    Permissive,
    /// Reject NaN and infinities only.
    #[serde(alias = "finite")]
    RejectNonFinite,
    /// Finite values inside the configured physical limits.
    Strict,
}

impl std::str::FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "permissive" | "none" => Ok(ValidationMode::Permissive),
            "finite" | "reject_non_finite" => Ok(ValidationMode::RejectNonFinite),
            "strict" => Ok(ValidationMode::Strict),
            other => Err(format!(
                "unknown validation mode '{}', expected permissive, finite or strict",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub min_temperature_c: f64,
    pub max_temperature_c: f64,
    pub min_humidity_pct: f64,
    pub max_humidity_pct: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_temperature_c: -50.0,
            max_temperature_c: 60.0,
            min_humidity_pct: 0.0,
            max_humidity_pct: 100.0,
        }
    }
}

/// Validates a reading under the given mode.
///
/// Checks, in order, for each field:
/// - value is finite (all modes except `Permissive`)
/// - value sits inside its limits (`Strict`)
/// - humidity is not exactly zero (`Strict`)
pub fn validate_reading(
    reading: &SensorReading,
    mode: ValidationMode,
    limits: &ValidationLimits,
) -> Result<(), ValidationError> {
    if mode == ValidationMode::Permissive {
        return Ok(());
    }

    validate_finite(reading)?;

    if mode == ValidationMode::Strict {
        validate_ranges(reading, limits)?;
    }

    Ok(())
}

/// Every field must be a finite number.
pub fn validate_finite(reading: &SensorReading) -> Result<(), ValidationError> {
    for (field, value) in reading.fields() {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite { field, value });
        }
    }
    Ok(())
}

/// Temperature and humidity limits, plus the zero-humidity guard.
pub fn validate_ranges(
    reading: &SensorReading,
    limits: &ValidationLimits,
) -> Result<(), ValidationError> {
    for (field, value) in reading.fields() {
        let (min, max) = if field.ends_with("_pct") {
            (limits.min_humidity_pct, limits.max_humidity_pct)
        } else {
            (limits.min_temperature_c, limits.max_temperature_c)
        };

        if !(min..=max).contains(&value) {
            return Err(ValidationError::OutOfRange { field, value, min, max });
        }
        if field.ends_with("_pct") && value == 0.0 {
            return Err(ValidationError::ZeroHumidity { field });
        }
    }
    Ok(())
}
