use crate::db::postgres::postgres_service::PostgresService;
use crate::env_config::models::app_setting::AppSettings;
use crate::services::indicators::status::IndicatorsStatus;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct AppState {
    pub settings: Arc<AppSettings>,
    pub postgres_service: Arc<PostgresService>,
    pub indicators_status: Arc<RwLock<IndicatorsStatus>>,
}

impl AppState {
    pub fn new(settings: Arc<AppSettings>, postgres_service: Arc<PostgresService>) -> Self {
        Self {
            settings,
            postgres_service,
            indicators_status: Arc::new(RwLock::new(IndicatorsStatus::default())),
        }
    }
}
