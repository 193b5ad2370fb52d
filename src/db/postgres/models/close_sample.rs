// src/db/postgres/models/close_sample.rs
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One row of the source OHLCV table, reduced to what the indicators need.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CloseSample {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}
