// src/db/postgres/models/indicator_row.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A fully defined set of indicator values for one timestamp.
///
/// Warm-up positions never become rows, so every column is populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub rsi14: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
}
