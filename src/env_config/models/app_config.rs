use crate::env_config::build_env::parse_var;
use crate::env_config::error::ConfigError;
use crate::env_config::models::app_env::Env;
use crate::services::indicators::params::IndicatorParams;
use chrono::NaiveTime;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub log: LogConfig,
    pub postgres: PostgresConfig,
    pub tables: TablesConfig,
    #[serde(default)]
    pub indicators: IndicatorParams,
    pub indicators_updater: IndicatorsUpdaterConfig,
}

#[derive(Debug, Deserialize)]
pub struct IndicatorsUpdaterConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
    #[serde(default)]
    pub start_time: Option<String>, // UTC, "HH:MM:SS"
    #[serde(default)]
    pub end_time: Option<String>, // UTC, "HH:MM:SS"
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize)]
pub struct PostgresConfig {
    pub timeout: u64,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: u64,
    pub idle_timeout: u64,
    /// Pause between connection attempts at startup.
    #[serde(default = "default_connect_retry_seconds")]
    pub connect_retry_seconds: u64,
    /// 0 keeps retrying until the database shows up.
    #[serde(default)]
    pub connect_max_attempts: u32,
}

fn default_connect_retry_seconds() -> u64 {
    5
}

#[derive(Debug, Deserialize)]
pub struct TablesConfig {
    /// Source of `(timestamp, close)` rows.
    pub source: String,
    /// Destination of the computed indicators.
    pub indicators: String,
}

impl AppConfig {
    /// Loads `config/<env>.toml` (or `$CONFIG_DIR/<env>.toml`), applies
    /// environment overrides and validates the result.
    pub fn new(env: &Env) -> Result<Self, ConfigError> {
        let dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
        let path = Path::new(&dir).join(format!("{}.toml", env));
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|name| env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: PathBuf::from(path),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Lets a deployment tune the service with the same variables the
    /// container images already set.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("SYMBOL_TABLE") {
            self.tables.source = value;
        }
        if let Some(value) = lookup("IND_TABLE") {
            self.tables.indicators = value;
        }
        if let Some(value) = lookup("LOG_LEVEL") {
            self.log.level = value.to_lowercase();
        }
        if let Some(value) = lookup("RSI_PERIOD") {
            self.indicators.rsi_period = parse_var("RSI_PERIOD", &value)?;
        }
        if let Some(value) = lookup("MACD_FAST") {
            self.indicators.macd_fast = parse_var("MACD_FAST", &value)?;
        }
        if let Some(value) = lookup("MACD_SLOW") {
            self.indicators.macd_slow = parse_var("MACD_SLOW", &value)?;
        }
        if let Some(value) = lookup("MACD_SIGNAL") {
            self.indicators.macd_signal = parse_var("MACD_SIGNAL", &value)?;
        }
        if let Some(value) = lookup("INTERVAL") {
            self.indicators_updater.interval_seconds = parse_var("INTERVAL", &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_table_name("tables.source", &self.tables.source)?;
        validate_table_name("tables.indicators", &self.tables.indicators)?;
        self.indicators.validate()?;
        if self.indicators_updater.interval_seconds == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

/// Table names end up inside SQL text, so only plain (optionally
/// schema-qualified) identifiers are accepted.
pub fn validate_table_name(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = value.split('.').collect();
    let valid = parts.len() <= 2 && parts.iter().all(|part| is_identifier(part));

    if !valid {
        return Err(ConfigError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    part.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl IndicatorsUpdaterConfig {
    /// Checks if the current time is within the allowed operation window
    pub fn is_operation_allowed(&self) -> bool {
        self.is_operation_allowed_at(chrono::Utc::now().time())
    }

    pub fn is_operation_allowed_at(&self, now: NaiveTime) -> bool {
        let (Some(start_str), Some(end_str)) = (&self.start_time, &self.end_time) else {
            return true;
        };

        match (
            NaiveTime::parse_from_str(start_str, "%H:%M:%S"),
            NaiveTime::parse_from_str(end_str, "%H:%M:%S"),
        ) {
            (Ok(start), Ok(end)) if start <= end => start <= now && now <= end,
            // Window crosses midnight, e.g. 21:00:00 -> 04:00:00
            (Ok(start), Ok(end)) => start <= now || now <= end,
            // An unparsable window never blocks updates
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
        [log]
        level = "info"
        format = "plain"

        [postgres]
        timeout = 5
        max_connections = 4
        min_connections = 1
        max_lifetime = 1800
        idle_timeout = 600

        [tables]
        source = "btc_usdt_ohlcv"
        indicators = "btc_usdt_indicators"

        [indicators_updater]
        enabled = true
        interval_seconds = 60
    "#;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn window(start: Option<&str>, end: Option<&str>) -> IndicatorsUpdaterConfig {
        IndicatorsUpdaterConfig {
            enabled: true,
            interval_seconds: 60,
            start_time: start.map(str::to_string),
            end_time: end.map(str::to_string),
        }
    }

    #[test]
    fn test_sample_config_defaults() {
        let config = AppConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.indicators, IndicatorParams::default());
        assert_eq!(config.postgres.connect_retry_seconds, 5);
        assert_eq!(config.postgres.connect_max_attempts, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::from_toml_str(SAMPLE).unwrap();
        let vars: HashMap<&str, &str> = [
            ("SYMBOL_TABLE", "market.eth_usdt_ohlcv"),
            ("IND_TABLE", "market.eth_usdt_indicators"),
            ("RSI_PERIOD", "21"),
            ("INTERVAL", "30"),
            ("LOG_LEVEL", "DEBUG"),
        ]
        .into_iter()
        .collect();

        config
            .apply_env_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.tables.source, "market.eth_usdt_ohlcv");
        assert_eq!(config.tables.indicators, "market.eth_usdt_indicators");
        assert_eq!(config.indicators.rsi_period, 21);
        assert_eq!(config.indicators.macd_slow, 26);
        assert_eq!(config.indicators_updater.interval_seconds, 30);
        assert_eq!(config.log.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = AppConfig::from_toml_str(SAMPLE).unwrap();
        let result = config.apply_env_overrides(|name| {
            (name == "MACD_FAST").then(|| "twelve".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidVar { .. })));
    }

    #[test]
    fn test_validate_catches_bad_values() {
        let mut config = AppConfig::from_toml_str(SAMPLE).unwrap();
        config.tables.indicators = "ind; DROP TABLE x".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidIdentifier { field: "tables.indicators", .. })
        ));

        let mut config = AppConfig::from_toml_str(SAMPLE).unwrap();
        config.indicators.macd_fast = 40;
        assert!(matches!(config.validate(), Err(ConfigError::Indicators(_))));

        let mut config = AppConfig::from_toml_str(SAMPLE).unwrap();
        config.indicators_updater.interval_seconds = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroInterval)));
    }

    #[test]
    fn test_table_names() {
        assert!(validate_table_name("t", "btc_usdt_ohlcv").is_ok());
        assert!(validate_table_name("t", "public.btc_usdt_ohlcv").is_ok());
        assert!(validate_table_name("t", "_x1").is_ok());
        assert!(validate_table_name("t", "").is_err());
        assert!(validate_table_name("t", "1table").is_err());
        assert!(validate_table_name("t", "a.b.c").is_err());
        assert!(validate_table_name("t", "a-b").is_err());
    }

    #[test]
    fn test_operation_window() {
        assert!(window(None, None).is_operation_allowed_at(at(3, 0)));
        assert!(window(Some("09:00:00"), None).is_operation_allowed_at(at(3, 0)));

        let day = window(Some("09:00:00"), Some("17:00:00"));
        assert!(day.is_operation_allowed_at(at(12, 0)));
        assert!(!day.is_operation_allowed_at(at(18, 0)));

        let night = window(Some("21:00:00"), Some("04:00:00"));
        assert!(night.is_operation_allowed_at(at(23, 30)));
        assert!(night.is_operation_allowed_at(at(2, 0)));
        assert!(!night.is_operation_allowed_at(at(12, 0)));

        assert!(window(Some("9am"), Some("5pm")).is_operation_allowed_at(at(3, 0)));
    }
}
