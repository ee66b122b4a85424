//! Psychrometric formulas used by the microclimate engine.
//!
//! All temperatures are °C, relative humidity is % (0-100), vapour pressures
//! are kPa. Nothing here validates its input: `ln(0)` and friends propagate
//! as ±inf/NaN.

// Magnus formula constants for dew point
pub const DEW_POINT_A: f64 = 17.27;
pub const DEW_POINT_B: f64 = 237.7;

// Tetens saturation vapour pressure. B differs from DEW_POINT_B on purpose.
pub const SVP_COEFF_KPA: f64 = 0.6108;
pub const SVP_A: f64 = 17.27;
pub const SVP_B: f64 = 237.3;

pub const ABSOLUTE_HUMIDITY_FACTOR: f64 = 216.7;
pub const KELVIN_OFFSET: f64 = 273.15;

/// Comfort band used for degree-hours.
pub const HEATING_BASE_C: f64 = 18.0;
pub const COOLING_BASE_C: f64 = 24.0;

/// Dew point temperature (°C).
pub fn dew_point(temperature_c: f64, rel_humidity_pct: f64) -> f64 {
    let alpha = (DEW_POINT_A * temperature_c) / (DEW_POINT_B + temperature_c)
        + (rel_humidity_pct / 100.0).ln();
    (DEW_POINT_B * alpha) / (DEW_POINT_A - alpha)
}

/// Saturation vapour pressure (kPa).
pub fn saturation_vapor_pressure(temperature_c: f64) -> f64 {
    SVP_COEFF_KPA * (SVP_A * temperature_c / (temperature_c + SVP_B)).exp()
}

/// Actual vapour pressure (kPa).
pub fn actual_vapor_pressure(temperature_c: f64, rel_humidity_pct: f64) -> f64 {
    (rel_humidity_pct / 100.0) * saturation_vapor_pressure(temperature_c)
}

/// Absolute humidity (g/m³) from actual vapour pressure in kPa.
pub fn absolute_humidity(vapor_pressure_kpa: f64, temperature_c: f64) -> f64 {
    // kPa -> hPa
    ABSOLUTE_HUMIDITY_FACTOR * (vapor_pressure_kpa * 10.0) / (temperature_c + KELVIN_OFFSET)
}

pub fn vapor_pressure_deficit(temperature_c: f64, rel_humidity_pct: f64) -> f64 {
    saturation_vapor_pressure(temperature_c) - actual_vapor_pressure(temperature_c, rel_humidity_pct)
}

/// Temperature-humidity index on the Celsius scale.
pub fn temperature_humidity_index(temperature_c: f64, rel_humidity_pct: f64) -> f64 {
    temperature_c - (0.55 - 0.0055 * rel_humidity_pct) * (temperature_c - 14.5)
}

pub fn heating_degree_hours(temperature_c: f64) -> f64 {
    (HEATING_BASE_C - temperature_c).max(0.0)
}

pub fn cooling_degree_hours(temperature_c: f64) -> f64 {
    (temperature_c - COOLING_BASE_C).max(0.0)
}

/// Round half away from zero to `decimals` places. Non-finite input, and
/// values too large to scale without overflowing, are returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
