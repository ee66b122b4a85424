use crate::errors::ConfigError;
use crate::validation::{ValidationLimits, ValidationMode};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Placeholder stability score reported until historical data feeds the engine.
pub const DEFAULT_THERMAL_STABILITY: f64 = 0.8;

pub const ENV_THERMAL_STABILITY: &str = "MICROCLIMATE_THERMAL_STABILITY";
pub const ENV_VALIDATION: &str = "MICROCLIMATE_VALIDATION";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reported verbatim as `thermalStability`; not derived from the reading.
    pub thermal_stability: f64,
    pub validation: ValidationMode,
    pub limits: ValidationLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thermal_stability: DEFAULT_THERMAL_STABILITY,
            validation: ValidationMode::default(),
            limits: ValidationLimits::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `MICROCLIMATE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_THERMAL_STABILITY) {
            self.thermal_stability = raw.trim().parse().map_err(|e: std::num::ParseFloatError| {
                ConfigError::InvalidValue {
                    key: ENV_THERMAL_STABILITY.to_string(),
                    value: raw.clone(),
                    message: e.to_string(),
                }
            })?;
        }

        if let Some(raw) = lookup(ENV_VALIDATION) {
            self.validation = raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: ENV_VALIDATION.to_string(),
                value: raw.clone(),
                message,
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Forces `Strict` validation when `strict` is set, otherwise unchanged.
    pub fn with_strict_override(mut self, strict: bool) -> Self {
        if strict {
            self.validation = ValidationMode::Strict;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.thermal_stability.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "thermal_stability".to_string(),
                value: self.thermal_stability.to_string(),
                message: "must be a finite number".to_string(),
            });
        }

        let limits = &self.limits;
        if !(limits.min_temperature_c <= limits.max_temperature_c) {
            return Err(ConfigError::InvalidValue {
                key: "limits.temperature".to_string(),
                value: format!("{}..{}", limits.min_temperature_c, limits.max_temperature_c),
                message: "minimum exceeds maximum".to_string(),
            });
        }
        if !(limits.min_humidity_pct <= limits.max_humidity_pct) {
            return Err(ConfigError::InvalidValue {
                key: "limits.humidity".to_string(),
                value: format!("{}..{}", limits.min_humidity_pct, limits.max_humidity_pct),
                message: "minimum exceeds maximum".to_string(),
            });
        }

        Ok(())
    }
}

/// Loads engine configuration from a JSON file. Missing keys take defaults.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path.to_path_buf() });
    }

    let file = File::open(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    let config: EngineConfig = serde_json::from_reader(reader).map_err(|e| ConfigError::JsonParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("Loaded engine config from {}: {:?}", path.display(), config);

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.thermal_stability, 0.8);
        assert_eq!(config.validation, ValidationMode::Permissive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_applied() {
        let config = EngineConfig::default()
            .with_overrides(lookup_from(&[
                (ENV_THERMAL_STABILITY, "0.65"),
                (ENV_VALIDATION, "strict"),
            ]))
            .unwrap();

        assert_eq!(config.thermal_stability, 0.65);
        assert_eq!(config.validation, ValidationMode::Strict);
    }

    #[test]
    fn test_invalid_override_reported() {
        let result = EngineConfig::default().with_overrides(lookup_from(&[(ENV_THERMAL_STABILITY, "high")]));
        match result {
            Err(ConfigError::InvalidValue { key, value, .. }) => {
                assert_eq!(key, ENV_THERMAL_STABILITY);
                assert_eq!(value, "high");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }

        let result = EngineConfig::default().with_overrides(lookup_from(&[(ENV_VALIDATION, "loose")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_strict_override() {
        let config = EngineConfig::default().with_strict_override(true);
        assert_eq!(config.validation, ValidationMode::Strict);

        let mut finite = EngineConfig::default();
        finite.validation = ValidationMode::RejectNonFinite;
        assert_eq!(finite.with_strict_override(false).validation, ValidationMode::RejectNonFinite);
    }

    #[test]
    fn test_inverted_limits_rejected() {
        let mut config = EngineConfig::default();
        config.limits.min_humidity_pct = 90.0;
        config.limits.max_humidity_pct = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_partial_file() {
        let path = std::env::temp_dir().join(format!("microclimate_config_{}.json", std::process::id()));
        {
            let mut file = File::create(&path).unwrap();
            write!(file, r#"{{"validation": "strict", "limits": {{"max_temperature_c": 45.0}}}}"#).unwrap();
        }

        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.validation, ValidationMode::Strict);
        assert_eq!(config.limits.max_temperature_c, 45.0);
        assert_eq!(config.limits.min_temperature_c, -50.0);
        assert_eq!(config.thermal_stability, DEFAULT_THERMAL_STABILITY);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Path::new("/definitely/not/here/microclimate.json"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }
}
