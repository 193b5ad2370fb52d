// File: src/services/indicators/status.rs
use super::calculator::CycleReport;
use super::error::CycleError;
use crate::db::postgres::models::indicator_row::IndicatorRow;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the last cycles did, as served by `/indicators/status`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndicatorsStatus {
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub last_samples_loaded: usize,
    pub last_rows_upserted: u64,
    pub latest: Option<IndicatorRow>,
    pub cycles_ok: u64,
    pub cycles_failed: u64,
}

impl IndicatorsStatus {
    pub fn record_success(&mut self, report: &CycleReport) {
        self.last_success = Some(report.finished_at);
        self.last_samples_loaded = report.samples_loaded;
        self.last_rows_upserted = report.rows_upserted;
        if report.latest.is_some() {
            self.latest = report.latest.clone();
        }
        self.cycles_ok += 1;
    }

    pub fn record_failure(&mut self, error: &CycleError) {
        self.last_error = Some(error.to_string());
        self.last_error_at = Some(Utc::now());
        self.cycles_failed += 1;
    }
}
