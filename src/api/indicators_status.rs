use axum::{Json, extract::Extension};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::app_state::models::AppState;
use crate::services::indicators::status::IndicatorsStatus;

#[derive(Debug, Serialize)]
pub struct IndicatorsStatusResponse {
    #[serde(flatten)]
    pub status: IndicatorsStatus,
    /// `None` when the count query fails.
    pub stored_rows: Option<i64>,
}

/// Outcome of the most recent update cycles plus the current table size.
pub async fn indicators_status(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Json<IndicatorsStatusResponse> {
    let status = app_state.indicators_status.read().await.clone();

    let stored_rows = match app_state
        .postgres_service
        .repository_indicator
        .count()
        .await
    {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("Failed to count indicator rows: {}", e);
            None
        }
    };

    Json(IndicatorsStatusResponse {
        status,
        stored_rows,
    })
}
