use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{DietPlan, PlanStatus};

use super::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: PlanStatus,
}

pub async fn transition_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
    Json(payload): Json<TransitionRequest>,
) -> Result<Json<DietPlan>, EngineError> {
    let plan = state.plans.transition(plan_id, payload.status).await?;
    Ok(Json(plan))
}
