use std::fmt;
use std::io::{Error, ErrorKind};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Supported log format types
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Plain,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Plain => write!(f, "plain"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl From<&str> for LogFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Plain,
        }
    }
}

/// Installs the global subscriber. Outside local mode timestamps are left to
/// the log collector.
pub fn init_logger(log_level: &str, log_format: &str, is_local: bool) -> Result<(), Error> {
    let filter = EnvFilter::try_new(log_level)
        .map_err(|e| Error::new(ErrorKind::InvalidInput, format!("Invalid log level: {}", e)))?;
    let format = LogFormat::from(log_format);

    let result = if is_local {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

        match format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Plain => builder.try_init(),
        }
    } else {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
            .without_time();

        match format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Plain => builder.try_init(),
        }
    };

    result.map_err(|e| Error::new(ErrorKind::AlreadyExists, e.to_string()))
}
