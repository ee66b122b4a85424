use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// serde_json writes NaN and ±inf as null; read those back as NaN so stored
// metrics from unvalidated readings still load.
pub(crate) fn deserialize_nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<f64> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or(f64::NAN))
}

/// One paired indoor/outdoor temperature-humidity sample.
///
/// No range constraints are enforced here; out-of-range values flow straight
/// into the formulas unless the engine is configured to validate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(alias = "tempInside", alias = "ti")]
    pub inside_temperature_c: f64,
    #[serde(alias = "humidityInside", alias = "hi")]
    pub inside_humidity_pct: f64,
    #[serde(alias = "tempOutside", alias = "to")]
    pub outside_temperature_c: f64,
    #[serde(alias = "humidityOutside", alias = "ho")]
    pub outside_humidity_pct: f64,
}

impl SensorReading {
    pub const fn new(
        inside_temperature_c: f64,
        inside_humidity_pct: f64,
        outside_temperature_c: f64,
        outside_humidity_pct: f64,
    ) -> Self {
        Self {
            inside_temperature_c,
            inside_humidity_pct,
            outside_temperature_c,
            outside_humidity_pct,
        }
    }

    /// Field names paired with values, in declaration order.
    pub fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("inside_temperature_c", self.inside_temperature_c),
            ("inside_humidity_pct", self.inside_humidity_pct),
            ("outside_temperature_c", self.outside_temperature_c),
            ("outside_humidity_pct", self.outside_humidity_pct),
        ]
    }
}

/// Crop suitability of the indoor vapour pressure deficit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VpdStatus {
    #[serde(rename = "too low")]
    TooLow,
    #[serde(rename = "optimal")]
    Optimal,
    #[serde(rename = "too high")]
    TooHigh,
}

impl fmt::Display for VpdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VpdStatus::TooLow => "too low",
            VpdStatus::Optimal => "optimal",
            VpdStatus::TooHigh => "too high",
        };
        f.write_str(label)
    }
}

/// Qualitative rating shared by insulation and ventilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceRating {
    Good,
    Moderate,
    Poor,
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PerformanceRating::Good => "good",
            PerformanceRating::Moderate => "moderate",
            PerformanceRating::Poor => "poor",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalMetrics {
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub delta_t: f64,
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub thermal_stability: f64,
    /// Reserved for time-series input; always `None` for a single reading.
    pub thermal_lag: Option<f64>,
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub heating_degree_hours: f64,
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub cooling_degree_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HygrometricMetrics {
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub dew_point_inside: f64,
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub dew_point_outside: f64,
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub vapor_pressure_inside: f64,  // kPa
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub vapor_pressure_outside: f64, // kPa
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub absolute_humidity_inside: f64,  // g/m³
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub absolute_humidity_outside: f64, // g/m³
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub vapor_pressure_deficit: f64, // kPa
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub humidity_gradient: f64,
    pub condensation_risk: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateIndices {
    #[serde(deserialize_with = "deserialize_nullable_f64")]
    pub temperature_humidity_index: f64,
    #[serde(rename = "cropVPDStatus")]
    pub crop_vpd_status: VpdStatus,
    pub insulation_performance: PerformanceRating,
    pub ventilation_efficiency: PerformanceRating,
}

/// Derived indicators for one reading. Serializes to a single flat object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MicroclimateMetrics {
    #[serde(flatten)]
    pub thermal: ThermalMetrics,
    #[serde(flatten)]
    pub hygrometric: HygrometricMetrics,
    #[serde(flatten)]
    pub indices: ClimateIndices,
}
