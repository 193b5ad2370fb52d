use crate::env_config::models::app_setting::AppSettings;
use crate::utils::retry::{RetryPolicy, retry_with_backoff};
use sqlx::{
    Pool, Postgres,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct PostgresConnection {
    pool: Pool<Postgres>,
}

impl PostgresConnection {
    /// Builds the pool, waiting for the database according to the configured
    /// retry policy.
    pub async fn new(settings: Arc<AppSettings>) -> Result<Self, sqlx::Error> {
        info!("Initializing PostgreSQL connection...");

        let env = &settings.app_env;
        let pg = &settings.app_config.postgres;

        let connect_options = PgConnectOptions::new()
            .host(&env.postgres_host)
            .port(env.postgres_port)
            .username(&env.postgres_user)
            .password(&env.postgres_password)
            .database(&env.postgres_database);

        let pool_options = PgPoolOptions::new()
            .max_connections(pg.max_connections)
            .min_connections(pg.min_connections)
            .max_lifetime(Duration::from_secs(pg.max_lifetime))
            .idle_timeout(Duration::from_secs(pg.idle_timeout))
            .acquire_timeout(Duration::from_secs(pg.timeout));

        let policy = RetryPolicy::new(
            Duration::from_secs(pg.connect_retry_seconds),
            pg.connect_max_attempts,
        );

        let pool = retry_with_backoff(policy, "PostgreSQL", || {
            pool_options
                .clone()
                .connect_with(connect_options.clone())
        })
        .await?;

        // Test connection
        debug!("Executing test query on PostgreSQL");
        match sqlx::query("SELECT 1").execute(&pool).await {
            Ok(_) => info!("PostgreSQL connection successful"),
            Err(e) => {
                error!("Failed to connect to PostgreSQL: {}", e);
                return Err(e);
            }
        }

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}
