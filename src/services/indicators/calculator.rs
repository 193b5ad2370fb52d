// File: src/services/indicators/calculator.rs
use super::error::{CycleError, IndicatorError};
use super::macd::compute_macd;
use super::params::IndicatorParams;
use super::rsi::compute_rsi;
use super::synchronizer::synchronize;
use crate::db::postgres::models::close_sample::CloseSample;
use crate::db::postgres::models::indicator_row::IndicatorRow;
use crate::db::postgres::repository::close_repository::TraitCloseRepository;
use crate::db::postgres::repository::indicator_repository::TraitIndicatorRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one successful update cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub samples_loaded: usize,
    pub rows_upserted: u64,
    pub latest: Option<IndicatorRow>,
    pub finished_at: DateTime<Utc>,
}

/// Runs one load -> compute -> persist pass over the full close history.
pub struct IndicatorCalculator {
    close_repository: Arc<dyn TraitCloseRepository + Send + Sync>,
    indicator_repository: Arc<dyn TraitIndicatorRepository + Send + Sync>,
    params: IndicatorParams,
}

impl IndicatorCalculator {
    pub fn new(
        close_repository: Arc<dyn TraitCloseRepository + Send + Sync>,
        indicator_repository: Arc<dyn TraitIndicatorRepository + Send + Sync>,
        params: IndicatorParams,
    ) -> Self {
        Self {
            close_repository,
            indicator_repository,
            params,
        }
    }

    /// Nothing is written until every indicator has been computed, so a failed
    /// cycle leaves the sink exactly as it was.
    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let samples = self.close_repository.load_closes().await?;
        debug!("Loaded {} close samples", samples.len());

        check_strictly_ordered(&samples)?;

        let rows = compute_rows(&samples, &self.params)?;
        if rows.is_empty() {
            warn!(
                "Not enough history for indicators: {} samples, {} needed",
                samples.len(),
                self.params.warmup_len() + 1
            );
        }

        let rows_upserted = self.indicator_repository.upsert(&rows).await?;

        info!(
            "Wrote {} indicator rows from {} samples",
            rows_upserted,
            samples.len()
        );

        Ok(CycleReport {
            samples_loaded: samples.len(),
            rows_upserted,
            latest: rows.last().cloned(),
            finished_at: Utc::now(),
        })
    }
}

/// Pure part of a cycle: closes in, fully defined indicator rows out.
pub fn compute_rows(
    samples: &[CloseSample],
    params: &IndicatorParams,
) -> Result<Vec<IndicatorRow>, IndicatorError> {
    let (timestamps, closes): (Vec<DateTime<Utc>>, Vec<f64>) = samples
        .iter()
        .map(|sample| (sample.timestamp, sample.close))
        .unzip();

    let rsi = compute_rsi(&closes, params.rsi_period)?;
    let macd = compute_macd(
        &closes,
        params.macd_fast,
        params.macd_slow,
        params.macd_signal,
    )?;

    synchronize(
        &timestamps,
        &rsi,
        &macd.macd,
        &macd.signal_line,
        &macd.histogram,
    )
}

fn check_strictly_ordered(samples: &[CloseSample]) -> Result<(), CycleError> {
    match samples
        .windows(2)
        .position(|pair| pair[0].timestamp >= pair[1].timestamp)
    {
        Some(index) => Err(CycleError::UnorderedSeries { index: index + 1 }),
        None => Ok(()),
    }
}
