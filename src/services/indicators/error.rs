// File: src/services/indicators/error.rs
use thiserror::Error;

/// Contract violations detected by the indicator engine.
///
/// Not having enough history is never an error: it shows up as undefined
/// (`None`) values in the computed series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("invalid {name} period: {value} (must be >= 1)")]
    InvalidPeriod { name: &'static str, value: usize },

    #[error("invalid MACD periods: fast={fast} must not exceed slow={slow}")]
    InvalidMacdPeriods { fast: usize, slow: usize },

    #[error("series length mismatch: {series} has {actual} entries, expected {expected}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{series} is undefined at index {index} while MACD is defined")]
    MisalignedSeries { series: &'static str, index: usize },
}

/// Reasons a single update cycle can fail. The scheduler logs these and moves
/// on to the next cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("close series is not strictly ordered by timestamp at index {index}")]
    UnorderedSeries { index: usize },
}
