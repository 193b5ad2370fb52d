use crate::db::postgres::{
    connection::PostgresConnection,
    repository::{
        close_repository::{StructCloseRepository, TraitCloseRepository},
        health_check_repository::{StructHealthCheckRepository, TraitHealthCheckRepository},
        indicator_repository::{StructIndicatorRepository, TraitIndicatorRepository},
    },
};
use crate::env_config::models::app_setting::AppSettings;
use std::sync::Arc;
use tracing::{error, info};

pub struct PostgresService {
    // Connection
    pub connection: Arc<PostgresConnection>,

    // Repositories
    pub repository_health_check: Arc<dyn TraitHealthCheckRepository + Send + Sync>,
    pub repository_close: Arc<dyn TraitCloseRepository + Send + Sync>,
    pub repository_indicator: Arc<dyn TraitIndicatorRepository + Send + Sync>,
}

impl PostgresService {
    pub async fn new(settings: &Arc<AppSettings>) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing PostgreSQL service components");

        let postgres_connection = match PostgresConnection::new(settings.clone()).await {
            Ok(conn) => {
                info!("PostgreSQL connection established successfully");
                Arc::new(conn)
            }
            Err(e) => {
                error!("Failed to establish PostgreSQL connection: {}", e);
                return Err(Box::new(e));
            }
        };

        info!("Initializing repositories");
        let tables = &settings.app_config.tables;

        let health_check_repository = Arc::new(StructHealthCheckRepository::new(
            postgres_connection.clone(),
        )) as Arc<dyn TraitHealthCheckRepository + Send + Sync>;

        let close_repository = Arc::new(StructCloseRepository::new(
            postgres_connection.clone(),
            tables.source.clone(),
        )) as Arc<dyn TraitCloseRepository + Send + Sync>;

        let indicator_repository = Arc::new(StructIndicatorRepository::new(
            postgres_connection.clone(),
            tables.indicators.clone(),
        )) as Arc<dyn TraitIndicatorRepository + Send + Sync>;

        if let Err(e) = indicator_repository.ensure_table().await {
            error!("Failed to create table {}: {}", tables.indicators, e);
            return Err(Box::new(e));
        }

        info!("PostgreSQL service initialized successfully");
        Ok(Self {
            connection: postgres_connection,
            repository_health_check: health_check_repository,
            repository_close: close_repository,
            repository_indicator: indicator_repository,
        })
    }
}
