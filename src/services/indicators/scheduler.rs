// File: src/services/indicators/scheduler.rs
use super::calculator::{CycleReport, IndicatorCalculator};
use super::error::CycleError;
use super::status::IndicatorsStatus;
use crate::app_state::models::AppState;
use crate::env_config::models::app_setting::AppSettings;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct IndicatorsScheduler {
    settings: Arc<AppSettings>,
    calculator: Arc<IndicatorCalculator>,
    status: Arc<RwLock<IndicatorsStatus>>,
}

impl IndicatorsScheduler {
    pub fn new(app_state: Arc<AppState>) -> Self {
        let postgres = &app_state.postgres_service;
        let calculator = IndicatorCalculator::new(
            postgres.repository_close.clone(),
            postgres.repository_indicator.clone(),
            app_state.settings.app_config.indicators,
        );

        Self::with_calculator(
            app_state.settings.clone(),
            calculator,
            app_state.indicators_status.clone(),
        )
    }

    pub fn with_calculator(
        settings: Arc<AppSettings>,
        calculator: IndicatorCalculator,
        status: Arc<RwLock<IndicatorsStatus>>,
    ) -> Self {
        Self {
            settings,
            calculator: Arc::new(calculator),
            status,
        }
    }

    /// Runs a single update cycle and records its outcome.
    pub async fn trigger_update(&self) -> Result<CycleReport, CycleError> {
        info!("Starting indicators update");

        let result = self.calculator.run_cycle().await;

        let mut status = self.status.write().await;
        match &result {
            Ok(report) => {
                status.record_success(report);
                info!(
                    "Indicators update completed: {} rows from {} samples",
                    report.rows_upserted, report.samples_loaded
                );
            }
            Err(e) => {
                status.record_failure(e);
                error!("Indicators update failed: {}", e);
            }
        }

        result
    }

    /// Spawns the periodic update loop. Returns `None` when the updater is
    /// disabled in configuration.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        let updater_config = &self.settings.app_config.indicators_updater;

        if !updater_config.enabled {
            info!("Indicators scheduler is disabled in configuration");
            return None;
        }

        if let (Some(start), Some(end)) = (&updater_config.start_time, &updater_config.end_time) {
            info!(
                "Scheduler operation window configured: {} to {} UTC",
                start, end
            );
        }

        info!(
            "Starting indicators scheduler with {} second interval",
            updater_config.interval_seconds,
        );

        let mut interval = time::interval(Duration::from_secs(updater_config.interval_seconds));
        // A slow cycle pushes the next one back instead of triggering a burst.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let scheduler = self.clone();

        Some(tokio::spawn(async move {
            loop {
                interval.tick().await;

                let updater_config = &scheduler.settings.app_config.indicators_updater;
                if !updater_config.is_operation_allowed() {
                    debug!(
                        "Scheduler: skipping update - outside operation window (current time: {})",
                        chrono::Utc::now().format("%H:%M:%S")
                    );
                    continue;
                }

                // Errors are already logged and recorded; the next tick retries.
                let _ = scheduler.trigger_update().await;
            }
        }))
    }
}
