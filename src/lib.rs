pub mod classification;
pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod parsers;
pub mod psychrometrics;
pub mod validation;

pub use config::EngineConfig;
pub use engine::{compute, MicroclimateEngine};
pub use errors::{ConfigError, ParseError, ValidationError};
pub use models::{MicroclimateMetrics, PerformanceRating, SensorReading, VpdStatus};
