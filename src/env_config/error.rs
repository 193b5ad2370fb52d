use crate::services::indicators::error::IndicatorError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ENV -> {0} is not set")]
    MissingVar(String),

    #[error("ENV -> {name}={value:?} is invalid: {reason}")]
    InvalidVar {
        name: String,
        value: String,
        reason: String,
    },

    #[error("unknown environment: {0:?} (expected local, dev or prod)")]
    UnknownEnv(String),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field} is not a valid table name: {value:?}")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("interval_seconds must be positive")]
    ZeroInterval,

    #[error("invalid indicator settings: {0}")]
    Indicators(#[from] IndicatorError),
}
