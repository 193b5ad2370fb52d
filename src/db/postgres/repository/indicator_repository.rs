// src/db/postgres/repository/indicator_repository.rs
use crate::db::postgres::connection::PostgresConnection;
use crate::db::postgres::models::indicator_row::IndicatorRow;
use async_trait::async_trait;
use sqlx::{Error as SqlxError, Postgres, QueryBuilder};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Rows per INSERT statement; keeps the bind count well under the
/// PostgreSQL limit of 65535 parameters.
const UPSERT_CHUNK_SIZE: usize = 1000;

#[async_trait]
pub trait TraitIndicatorRepository {
    /// Creates the indicator table if it does not exist yet.
    async fn ensure_table(&self) -> Result<(), SqlxError>;

    /// Inserts or overwrites rows keyed on timestamp, atomically.
    /// Returns the number of rows written.
    async fn upsert(&self, rows: &[IndicatorRow]) -> Result<u64, SqlxError>;

    /// Number of rows currently stored.
    async fn count(&self) -> Result<i64, SqlxError>;
}

pub struct StructIndicatorRepository {
    connection: Arc<PostgresConnection>,
    table: String,
}

impl StructIndicatorRepository {
    /// `table` must already be a validated identifier; it is spliced into SQL.
    pub fn new(connection: Arc<PostgresConnection>, table: String) -> Self {
        Self { connection, table }
    }
}

#[async_trait]
impl TraitIndicatorRepository for StructIndicatorRepository {
    async fn ensure_table(&self) -> Result<(), SqlxError> {
        let pool = self.connection.get_pool();

        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
               timestamp    TIMESTAMPTZ PRIMARY KEY,
               rsi14        DOUBLE PRECISION,
               macd         DOUBLE PRECISION,
               macd_signal  DOUBLE PRECISION,
               macd_hist    DOUBLE PRECISION
             )",
            self.table
        );

        sqlx::query(&ddl).execute(pool).await?;

        info!("Indicator table {} is ready", self.table);
        Ok(())
    }

    async fn upsert(&self, rows: &[IndicatorRow]) -> Result<u64, SqlxError> {
        if rows.is_empty() {
            debug!("No indicator rows to upsert");
            return Ok(0);
        }

        let pool = self.connection.get_pool();
        let mut tx = pool.begin().await?;
        let mut written = 0;

        for chunk in rows.chunks(UPSERT_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
                "INSERT INTO {} (timestamp, rsi14, macd, macd_signal, macd_hist) ",
                self.table
            ));

            builder.push_values(chunk, |mut values, row| {
                values
                    .push_bind(row.timestamp)
                    .push_bind(row.rsi14)
                    .push_bind(row.macd)
                    .push_bind(row.macd_signal)
                    .push_bind(row.macd_hist);
            });

            builder.push(
                " ON CONFLICT (timestamp) DO UPDATE
                   SET rsi14       = EXCLUDED.rsi14,
                       macd        = EXCLUDED.macd,
                       macd_signal = EXCLUDED.macd_signal,
                       macd_hist   = EXCLUDED.macd_hist",
            );

            match builder.build().execute(&mut *tx).await {
                Ok(result) => {
                    written += result.rows_affected();
                    debug!(
                        "Upserted chunk of {} rows into {} ({}/{})",
                        chunk.len(),
                        self.table,
                        written,
                        rows.len()
                    );
                }
                Err(e) => {
                    // Dropping the transaction rolls back earlier chunks.
                    error!("Upsert into {} failed: {}", self.table, e);
                    return Err(e);
                }
            }
        }

        tx.commit().await?;

        debug!("Committed {} indicator rows into {}", written, self.table);
        Ok(written)
    }

    async fn count(&self) -> Result<i64, SqlxError> {
        let pool = self.connection.get_pool();

        let query = format!("SELECT COUNT(*) FROM {}", self.table);
        sqlx::query_scalar::<_, i64>(&query).fetch_one(pool).await
    }
}
