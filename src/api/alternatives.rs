use axum::{extract::State, response::Json};

use crate::error::EngineError;
use crate::services::alternative_meal_service::{Decision, DecisionRequest};

use super::routes::AppState;

pub async fn decide_alternative(
    State(state): State<AppState>,
    Json(payload): Json<DecisionRequest>,
) -> Result<Json<Decision>, EngineError> {
    let decision = state.alternatives.decide(payload).await?;
    Ok(Json(decision))
}
