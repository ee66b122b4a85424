//! Microclimate analytics engine.
//!
//! Turns one paired indoor/outdoor reading into the full set of thermal,
//! hygrometric and classification metrics. Pure and stateless: the engine only
//! holds its configuration, so it can be shared freely across threads.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::classification::{classify_insulation, classify_ventilation, classify_vpd};
use crate::config::EngineConfig;
use crate::errors::ValidationError;
use crate::models::{
    ClimateIndices, HygrometricMetrics, MicroclimateMetrics, SensorReading, ThermalMetrics,
};
use crate::psychrometrics::{
    absolute_humidity, actual_vapor_pressure, cooling_degree_hours, dew_point,
    heating_degree_hours, round_to, saturation_vapor_pressure, temperature_humidity_index,
};
use crate::validation::validate_reading;

#[derive(Debug, Clone, Default)]
pub struct MicroclimateEngine {
    config: EngineConfig,
}

impl MicroclimateEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes metrics without any validation.
    ///
    /// Never fails. Out-of-range input gives meaningless numbers and
    /// NaN/inf input propagates into the affected fields.
    pub fn compute(&self, reading: &SensorReading) -> MicroclimateMetrics {
        let ti = reading.inside_temperature_c;
        let hi = reading.inside_humidity_pct;
        let to = reading.outside_temperature_c;
        let ho = reading.outside_humidity_pct;

        // Thermal
        let delta_t = ti - to;
        let heating = heating_degree_hours(ti);
        let cooling = cooling_degree_hours(ti);

        // Hygrometric
        let dew_point_inside = dew_point(ti, hi);
        let dew_point_outside = dew_point(to, ho);

        let saturation_inside = saturation_vapor_pressure(ti);
        let vapor_pressure_inside = actual_vapor_pressure(ti, hi);
        let vapor_pressure_outside = actual_vapor_pressure(to, ho);

        let absolute_humidity_inside = absolute_humidity(vapor_pressure_inside, ti);
        let absolute_humidity_outside = absolute_humidity(vapor_pressure_outside, to);

        let vapor_pressure_deficit = saturation_inside - vapor_pressure_inside;
        let humidity_gradient = hi - ho;

        // Compared unrounded so the flag agrees with the raw dew point
        let condensation_risk = ti <= dew_point_inside;

        // Indices
        let thi = temperature_humidity_index(ti, hi);

        let metrics = MicroclimateMetrics {
            thermal: ThermalMetrics {
                delta_t: round_to(delta_t, 2),
                thermal_stability: self.config.thermal_stability,
                thermal_lag: None,
                heating_degree_hours: round_to(heating, 2),
                cooling_degree_hours: round_to(cooling, 2),
            },
            hygrometric: HygrometricMetrics {
                dew_point_inside: round_to(dew_point_inside, 2),
                dew_point_outside: round_to(dew_point_outside, 2),
                vapor_pressure_inside: round_to(vapor_pressure_inside, 3),
                vapor_pressure_outside: round_to(vapor_pressure_outside, 3),
                absolute_humidity_inside: round_to(absolute_humidity_inside, 2),
                absolute_humidity_outside: round_to(absolute_humidity_outside, 2),
                vapor_pressure_deficit: round_to(vapor_pressure_deficit, 3),
                humidity_gradient: round_to(humidity_gradient, 2),
                condensation_risk,
            },
            indices: ClimateIndices {
                temperature_humidity_index: round_to(thi, 2),
                crop_vpd_status: classify_vpd(vapor_pressure_deficit),
                insulation_performance: classify_insulation(delta_t),
                ventilation_efficiency: classify_ventilation(humidity_gradient, delta_t),
            },
        };

        trace!(?reading, ?metrics, "Computed microclimate metrics");
        metrics
    }

    /// Validates according to the configured mode, then computes.
    pub fn try_compute(&self, reading: &SensorReading) -> Result<MicroclimateMetrics, ValidationError> {
        validate_reading(reading, self.config.validation, &self.config.limits).map_err(|e| {
            debug!("Rejected reading {:?}: {}", reading, e);
            e
        })?;
        Ok(self.compute(reading))
    }

    /// Computes every reading in parallel. Output order matches input order.
    pub fn compute_batch(&self, readings: &[SensorReading]) -> Vec<MicroclimateMetrics> {
        readings.par_iter().map(|reading| self.compute(reading)).collect()
    }

    /// Validating variant of `compute_batch`; one result per reading.
    pub fn try_compute_batch(
        &self,
        readings: &[SensorReading],
    ) -> Vec<Result<MicroclimateMetrics, ValidationError>> {
        readings.par_iter().map(|reading| self.try_compute(reading)).collect()
    }
}

/// Splits batch results into accepted metrics and rejected readings.
/// Rejections carry the 1-based position of the reading in the batch.
pub fn split_results(
    results: Vec<Result<MicroclimateMetrics, ValidationError>>,
) -> (Vec<MicroclimateMetrics>, Vec<(usize, ValidationError)>) {
    let mut accepted = Vec::with_capacity(results.len());
    let mut rejected = Vec::new();

    for (idx, result) in results.into_iter().enumerate() {
        match result {
            Ok(m) => accepted.push(m),
            Err(e) => rejected.push((idx + 1, e)),
        }
    }

    (accepted, rejected)
}

/// Computes metrics with the default (permissive) engine.
pub fn compute(reading: &SensorReading) -> MicroclimateMetrics {
    MicroclimateEngine::default().compute(reading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PerformanceRating, VpdStatus};
    use crate::validation::ValidationMode;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_greenhouse_afternoon() {
        let metrics = compute(&SensorReading::new(28.4, 62.0, 21.1, 44.0));

        assert_eq!(metrics.thermal.delta_t, 7.3);
        assert_eq!(metrics.hygrometric.dew_point_inside, 20.4);
        assert_eq!(metrics.hygrometric.dew_point_outside, 8.36);
        assert_eq!(metrics.hygrometric.vapor_pressure_inside, 2.399);
        assert_eq!(metrics.hygrometric.vapor_pressure_outside, 1.101);
        assert_eq!(metrics.hygrometric.absolute_humidity_inside, 17.24);
        assert_eq!(metrics.hygrometric.absolute_humidity_outside, 8.11);
        assert_eq!(metrics.hygrometric.vapor_pressure_deficit, 1.47);
        assert_eq!(metrics.hygrometric.humidity_gradient, 18.0);
        assert!(!metrics.hygrometric.condensation_risk);
        assert_eq!(metrics.indices.temperature_humidity_index, 25.49);
        assert_eq!(metrics.indices.crop_vpd_status, VpdStatus::Optimal);
        assert_eq!(metrics.indices.insulation_performance, PerformanceRating::Good);
        assert_eq!(metrics.indices.ventilation_efficiency, PerformanceRating::Moderate);
    }

    #[test]
    fn test_thermal_placeholders() {
        let metrics = compute(&SensorReading::new(21.0, 55.0, 8.0, 75.0));

        assert_eq!(metrics.thermal.thermal_stability, 0.8);
        assert!(metrics.thermal.thermal_lag.is_none());
    }

    #[test]
    fn test_thermal_stability_follows_config() {
        let engine = MicroclimateEngine::new(EngineConfig {
            thermal_stability: 0.5,
            ..EngineConfig::default()
        });
        let metrics = engine.compute(&SensorReading::new(21.0, 55.0, 8.0, 75.0));
        assert_eq!(metrics.thermal.thermal_stability, engine.config().thermal_stability);
        assert_eq!(metrics.thermal.thermal_stability, 0.5);
    }

    #[test]
    fn test_cold_night_heating_load() {
        let metrics = compute(&SensorReading::new(10.0, 80.0, -5.0, 70.0));

        assert_eq!(metrics.thermal.heating_degree_hours, 8.0);
        assert_eq!(metrics.thermal.cooling_degree_hours, 0.0);
        assert_eq!(metrics.hygrometric.dew_point_outside, -9.61);
        assert_eq!(metrics.indices.crop_vpd_status, VpdStatus::TooLow);
        assert_eq!(metrics.indices.insulation_performance, PerformanceRating::Good);
    }

    #[test]
    fn test_hot_dry_inside_cooling_load() {
        let metrics = compute(&SensorReading::new(26.0, 40.0, 30.0, 70.0));

        assert_eq!(metrics.thermal.delta_t, -4.0);
        assert_eq!(metrics.thermal.cooling_degree_hours, 2.0);
        assert_eq!(metrics.thermal.heating_degree_hours, 0.0);
        assert_eq!(metrics.hygrometric.humidity_gradient, -30.0);
        assert_eq!(metrics.indices.crop_vpd_status, VpdStatus::TooHigh);
        assert_eq!(metrics.indices.insulation_performance, PerformanceRating::Moderate);
        assert_eq!(metrics.indices.ventilation_efficiency, PerformanceRating::Good);
    }

    #[test]
    fn test_thi_uses_unrounded_inputs() {
        let reading = SensorReading::new(23.456, 47.891, 11.0, 60.0);
        let expected = 23.456 - (0.55 - 0.0055 * 47.891) * (23.456 - 14.5);

        let metrics = compute(&reading);
        assert_abs_diff_eq!(metrics.indices.temperature_humidity_index, expected, epsilon = 0.005);
    }

    #[test]
    fn test_zero_humidity_propagates_without_panic() {
        let metrics = compute(&SensorReading::new(20.0, 0.0, 10.0, 50.0));

        assert!(!metrics.hygrometric.dew_point_inside.is_finite());
        assert_eq!(metrics.hygrometric.vapor_pressure_inside, 0.0);
        assert_eq!(metrics.hygrometric.absolute_humidity_inside, 0.0);
    }

    #[test]
    fn test_nan_input_propagates() {
        let metrics = compute(&SensorReading::new(f64::NAN, 50.0, 10.0, 50.0));

        assert!(metrics.thermal.delta_t.is_nan());
        assert!(metrics.hygrometric.dew_point_inside.is_nan());
        assert!(!metrics.hygrometric.condensation_risk);
    }

    #[test]
    fn test_huge_finite_input_stays_finite() {
        let metrics = compute(&SensorReading::new(1e307, 50.0, 0.0, 50.0));

        assert_eq!(metrics.thermal.delta_t, 1e307);
        assert!(metrics.thermal.cooling_degree_hours.is_finite());
        assert_eq!(metrics.thermal.heating_degree_hours, 0.0);
    }

    #[test]
    fn test_try_compute_respects_mode() {
        let reading = SensorReading::new(20.0, 150.0, 10.0, 50.0);

        assert!(MicroclimateEngine::default().try_compute(&reading).is_ok());

        let strict = MicroclimateEngine::new(EngineConfig {
            validation: ValidationMode::Strict,
            ..EngineConfig::default()
        });
        assert!(matches!(
            strict.try_compute(&reading),
            Err(ValidationError::OutOfRange { field: "inside_humidity_pct", .. })
        ));
    }

    #[test]
    fn test_batch_preserves_order() {
        let readings: Vec<_> = (0..64)
            .map(|i| SensorReading::new(10.0 + i as f64 * 0.25, 60.0, 12.0, 70.0))
            .collect();

        let engine = MicroclimateEngine::default();
        let batch = engine.compute_batch(&readings);

        assert_eq!(batch.len(), readings.len());
        for (reading, metrics) in readings.iter().zip(&batch) {
            assert_eq!(*metrics, engine.compute(reading));
        }
    }

    #[test]
    fn test_try_compute_batch_mixes_results() {
        let engine = MicroclimateEngine::new(EngineConfig {
            validation: ValidationMode::RejectNonFinite,
            ..EngineConfig::default()
        });
        let readings = [
            SensorReading::new(20.0, 50.0, 10.0, 50.0),
            SensorReading::new(20.0, f64::INFINITY, 10.0, 50.0),
            SensorReading::new(22.0, 55.0, 12.0, 45.0),
        ];

        let results = engine.try_compute_batch(&readings);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ValidationError::NonFinite { .. })));
        assert!(results[2].is_ok());

        let (accepted, rejected) = split_results(results);
        assert_eq!(accepted.len(), 2);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].0, 2);
        assert!(matches!(rejected[0].1, ValidationError::NonFinite { field: "inside_humidity_pct", .. }));
    }
}
