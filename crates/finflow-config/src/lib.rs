//! Configuration management for finflow
//!
//! This module handles loading, validation, and management of
//! finflow configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

/// Environment variable naming the (unused) remote backend
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Longest forecast horizon, in days
pub const MAX_FORECAST_PERIOD: u32 = 365;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding persisted UI layout state
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Layout store file name (relative to data path)
    #[serde(default = "default_layout_file")]
    pub layout_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            layout_file: default_layout_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_layout_file() -> String {
    "layout.json".to_string()
}

/// Mock data service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Simulated network latency per call, in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Remote backend address; recorded but never dispatched to
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_latency_ms() -> u64 {
    800
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

/// How the aging classifier interprets the sign of the day difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingConvention {
    /// Thresholds applied to `now - due` as the bucket labels are written:
    /// future due dates land in the buckets, past ones are unbucketed.
    AsWritten,
    /// Buckets count days past due; not-yet-due items fall in 0-30.
    DaysPastDue,
}

impl Default for AgingConvention {
    fn default() -> Self {
        AgingConvention::AsWritten
    }
}

impl std::str::FromStr for AgingConvention {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "as_written" => Ok(AgingConvention::AsWritten),
            "days_past_due" => Ok(AgingConvention::DaysPastDue),
            _ => Err(format!("Invalid aging convention: {}", s)),
        }
    }
}

impl std::fmt::Display for AgingConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgingConvention::AsWritten => write!(f, "as_written"),
            AgingConvention::DaysPastDue => write!(f, "days_past_due"),
        }
    }
}

/// Accounting basis toggle shown on the finance flow page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinanceBasis {
    Accrual,
    Cash,
}

impl Default for FinanceBasis {
    fn default() -> Self {
        FinanceBasis::Accrual
    }
}

impl std::str::FromStr for FinanceBasis {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accrual" => Ok(FinanceBasis::Accrual),
            "cash" => Ok(FinanceBasis::Cash),
            _ => Err(format!("Invalid finance basis: {}", s)),
        }
    }
}

impl std::fmt::Display for FinanceBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinanceBasis::Accrual => write!(f, "accrual"),
            FinanceBasis::Cash => write!(f, "cash"),
        }
    }
}

/// Payables/receivables settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FinanceConfig {
    #[serde(default)]
    pub aging_convention: AgingConvention,
    #[serde(default)]
    pub default_basis: FinanceBasis,
}

/// Forecast generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Amplitude of the uniform noise added to each chart point
    #[serde(default = "default_noise")]
    pub noise: f64,
    /// Default forecast horizon in days
    #[serde(default = "default_period")]
    pub default_period: u32,
    #[serde(default = "default_metric")]
    pub default_metric: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            noise: default_noise(),
            default_period: default_period(),
            default_metric: default_metric(),
        }
    }
}

fn default_noise() -> f64 {
    500.0
}

fn default_period() -> u32 {
    30
}

fn default_metric() -> String {
    "revenue".to_string()
}

/// Split-view layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_splitter_initial")]
    pub splitter_initial: f64,
    #[serde(default = "default_splitter_min")]
    pub splitter_min: f64,
    #[serde(default = "default_splitter_max")]
    pub splitter_max: f64,
    /// Key under which the finance flow splitter position is stored
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            splitter_initial: default_splitter_initial(),
            splitter_min: default_splitter_min(),
            splitter_max: default_splitter_max(),
            storage_key: default_storage_key(),
        }
    }
}

fn default_splitter_initial() -> f64 {
    50.0
}

fn default_splitter_min() -> f64 {
    30.0
}

fn default_splitter_max() -> f64 {
    70.0
}

fn default_storage_key() -> String {
    "finance-flow-splitter".to_string()
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
        }
    }
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            records_per_page: default_records_per_page(),
        }
    }
}

fn default_records_per_page() -> usize {
    50
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error (RUST_LOG takes precedence)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub finance: FinanceConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        Ok(config)
    }

    /// Load the file if present, falling back to defaults when it is missing
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound { path }) => {
                log::warn!("Config file {} not found, using defaults", path);
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Override values from the process environment
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.service.api_base_url = url;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(invalid("server.port", "Port must be greater than 0"));
        }

        if self.service.latency_ms > 10_000 {
            return Err(invalid("service.latency_ms", "Latency must be at most 10000 ms"));
        }

        if self.forecast.default_period == 0 || self.forecast.default_period > MAX_FORECAST_PERIOD {
            return Err(invalid(
                "forecast.default_period",
                "Forecast period must be between 1 and 365 days",
            ));
        }

        if !(self.forecast.noise.is_finite() && self.forecast.noise >= 0.0) {
            return Err(invalid("forecast.noise", "Noise amplitude must be a finite, non-negative number"));
        }

        let layout = &self.layout;
        let ordered = 0.0 <= layout.splitter_min
            && layout.splitter_min <= layout.splitter_initial
            && layout.splitter_initial <= layout.splitter_max
            && layout.splitter_max <= 100.0;
        if !ordered {
            return Err(invalid(
                "layout.splitter_min",
                "Splitter bounds must satisfy 0 <= min <= initial <= max <= 100",
            ));
        }

        if self.currency.decimal_places > 10 {
            return Err(invalid("currency.decimal_places", "Decimal places must be between 0 and 10"));
        }

        if self.pagination.records_per_page == 0 {
            return Err(invalid("pagination.records_per_page", "Records per page must be greater than 0"));
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Full path to the layout store file
    pub fn layout_path(&self) -> PathBuf {
        self.data.path.join(&self.data.layout_file)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.layout.splitter_initial, 50.0);
        assert_eq!(config.finance.aging_convention, AgingConvention::AsWritten);
    }

    #[test]
    fn test_bundled_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.layout.storage_key, "finance-flow-splitter");
        assert_eq!(config.forecast.default_period, 30);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("server:\n  port: 9000\nfinance:\n  aging_convention: days_past_due\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.finance.aging_convention, AgingConvention::DaysPastDue);
        assert_eq!(config.service.latency_ms, 800);
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.port"));
    }

    #[test]
    fn test_rejects_unusable_forecast_settings() {
        for yaml in [
            "forecast:\n  noise: .inf\n",
            "forecast:\n  noise: .nan\n",
            "forecast:\n  noise: -1\n",
        ] {
            let err = Config::from_yaml(yaml).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "forecast.noise"));
        }

        let err = Config::from_yaml("forecast:\n  default_period: 366\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "forecast.default_period"));
        assert!(Config::from_yaml("forecast:\n  noise: 0\n  default_period: 365\n").is_ok());
    }

    #[test]
    fn test_rejects_inverted_splitter_bounds() {
        let yaml = "layout:\n  splitter_min: 80\n  splitter_max: 20\n";
        assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_rejects_bad_yaml() {
        assert!(matches!(Config::from_yaml("server: ["), Err(ConfigError::InvalidYaml { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        assert!(matches!(Config::load(&path), Err(ConfigError::FileNotFound { .. })));
        assert!(Config::load_or_default(&path).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "service:\n  latency_ms: 0\ncurrency:\n  symbol: \"€\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.service.latency_ms, 0);
        assert_eq!(config.currency.symbol, "€");
    }

    #[test]
    fn test_enum_round_trip_strings() {
        assert_eq!("cash".parse::<FinanceBasis>().unwrap(), FinanceBasis::Cash);
        assert_eq!(FinanceBasis::Accrual.to_string(), "accrual");
        assert_eq!("days_past_due".parse::<AgingConvention>().unwrap(), AgingConvention::DaysPastDue);
        assert!("sideways".parse::<AgingConvention>().is_err());
    }
}
