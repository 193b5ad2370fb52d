// src/db/postgres/repository/close_repository.rs
use crate::db::postgres::connection::PostgresConnection;
use crate::db::postgres::models::close_sample::CloseSample;
use async_trait::async_trait;
use sqlx::Error as SqlxError;
use std::sync::Arc;
use tracing::{debug, error};

#[async_trait]
pub trait TraitCloseRepository {
    /// Loads the full close history, oldest first.
    async fn load_closes(&self) -> Result<Vec<CloseSample>, SqlxError>;
}

pub struct StructCloseRepository {
    connection: Arc<PostgresConnection>,
    table: String,
}

impl StructCloseRepository {
    /// `table` must already be a validated identifier; it is spliced into SQL.
    pub fn new(connection: Arc<PostgresConnection>, table: String) -> Self {
        Self { connection, table }
    }
}

#[async_trait]
impl TraitCloseRepository for StructCloseRepository {
    async fn load_closes(&self) -> Result<Vec<CloseSample>, SqlxError> {
        let pool = self.connection.get_pool();

        debug!("Fetching close history from {}", self.table);

        let query = format!(
            "SELECT timestamp, close::DOUBLE PRECISION AS close FROM {} ORDER BY timestamp",
            self.table
        );

        let result = sqlx::query_as::<_, CloseSample>(&query)
            .fetch_all(pool)
            .await;

        match &result {
            Ok(samples) => debug!("Fetched {} closes from {}", samples.len(), self.table),
            Err(e) => error!("Error fetching closes from {}: {}", self.table, e),
        }

        result
    }
}
