use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::EngineError;
use crate::services::client_service::ClientMetrics;
use crate::services::streak_service::StreakSummary;

use super::routes::AppState;

pub async fn client_streak(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<StreakSummary>, EngineError> {
    let summary = state.streaks.streak(client_id).await?;
    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    pub dietitian_id: Uuid,
}

pub async fn client_metrics(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<ClientMetrics>, EngineError> {
    let metrics = state
        .clients
        .metrics(query.dietitian_id, client_id)
        .await?;
    Ok(Json(metrics))
}
