//! Configuration management for the fraud risk demo

use crate::types::assessment::RiskTierThresholds;
use crate::types::record::Gender;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Environment variable prefix for overrides, e.g. `FRAUD_DEMO__MODELS__MODEL_PATH`
pub const ENV_PREFIX: &str = "FRAUD_DEMO";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub models: ModelsConfig,
    pub detection: DetectionConfig,
    pub features: FeatureDefaults,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// Classifier artifact configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Path to the ONNX classifier artifact
    pub model_path: String,
    /// Number of threads for ONNX inference (default: 1)
    pub onnx_threads: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            model_path: "models/xgb_fraud_model.onnx".to_string(),
            onnx_threads: 1,
        }
    }
}

/// Detection configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DetectionConfig {
    /// Risk tier boundaries
    pub risk_tiers: RiskTierThresholds,
}

// Serving-schema columns the form does not collect.
pub const DEFAULT_TRANSACTION_MONTH: u8 = 6;
pub const DEFAULT_IS_HOLIDAY_SEASON: u8 = 0;
pub const DEFAULT_COUNT_30_DAYS: f64 = 2.0;
pub const DEFAULT_COUNT_7_DAYS: f64 = 1.0;
pub const DEFAULT_COUNT_1_DAY: f64 = 0.0;
pub const DEFAULT_GENDER: Gender = Gender::M;
pub const DEFAULT_HOME_LAT: f64 = 43.65;
pub const DEFAULT_HOME_LONG: f64 = -79.38;
pub const DEFAULT_MERCHANT_LAT: f64 = 43.70;
pub const DEFAULT_MERCHANT_LONG: f64 = -79.40;
pub const DEFAULT_DAY_OF_WEEK: u8 = 3;
pub const DEFAULT_USUAL_LAT: f64 = 43.65;
pub const DEFAULT_USUAL_LONG: f64 = -79.38;
pub const DEFAULT_CITY_POPULATION: u64 = 1_000_000;

/// Fixed values for every feature column that cannot be derived from the form.
///
/// The classifier was trained on richer upstream data than the form collects;
/// keeping these in one table makes the gap visible and overridable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeatureDefaults {
    pub transaction_month: u8,
    pub is_holiday_season: u8,
    pub count_30_days: f64,
    pub count_7_days: f64,
    pub count_1_day: f64,
    pub gender: Gender,
    pub home_lat: f64,
    pub home_long: f64,
    pub merchant_lat: f64,
    pub merchant_long: f64,
    pub day_of_week: u8,
    pub usual_lat: f64,
    pub usual_long: f64,
    pub city_population: u64,
}

impl Default for FeatureDefaults {
    fn default() -> Self {
        Self {
            transaction_month: DEFAULT_TRANSACTION_MONTH,
            is_holiday_season: DEFAULT_IS_HOLIDAY_SEASON,
            count_30_days: DEFAULT_COUNT_30_DAYS,
            count_7_days: DEFAULT_COUNT_7_DAYS,
            count_1_day: DEFAULT_COUNT_1_DAY,
            gender: DEFAULT_GENDER,
            home_lat: DEFAULT_HOME_LAT,
            home_long: DEFAULT_HOME_LONG,
            merchant_lat: DEFAULT_MERCHANT_LAT,
            merchant_long: DEFAULT_MERCHANT_LONG,
            day_of_week: DEFAULT_DAY_OF_WEEK,
            usual_lat: DEFAULT_USUAL_LAT,
            usual_long: DEFAULT_USUAL_LONG,
            city_population: DEFAULT_CITY_POPULATION,
        }
    }
}

/// How the assessment is printed
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// The assessment as a JSON document
    Json,
}

/// Display configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DisplayConfig {
    pub format: OutputFormat,
}

/// Log line format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific path.
    ///
    /// A missing file is not an error: every section falls back to its
    /// defaults, and `FRAUD_DEMO__*` environment variables are layered on top.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config
            .detection
            .risk_tiers
            .validate()
            .context("Invalid detection configuration")?;

        Ok(app_config)
    }
}
