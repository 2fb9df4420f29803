use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::ComplianceStatus;
use crate::services::compliance_calculator::DayComplianceBreakdown;
use crate::services::compliance_service::MarkRequest;

use super::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct MarkComplianceRequest {
    pub client_id: Uuid,
    pub meal_item_id: Uuid,
    pub status: ComplianceStatus,
    pub alternative_ingredient_id: Option<Uuid>,
    pub tz_offset_minutes: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct MarkComplianceResponse {
    pub success: bool,
    pub day_percentage: f64,
    pub record_id: Uuid,
}

pub async fn mark_compliance(
    State(state): State<AppState>,
    Json(payload): Json<MarkComplianceRequest>,
) -> Result<Json<MarkComplianceResponse>, EngineError> {
    let record = state
        .compliance
        .mark(MarkRequest {
            client_id: payload.client_id,
            meal_item_id: payload.meal_item_id,
            status: payload.status,
            alternative_ingredient_id: payload.alternative_ingredient_id,
            tz_offset_minutes: payload.tz_offset_minutes,
        })
        .await?;

    // The mark itself does not aggregate; ask the calculator for a fresh
    // day percentage to hand back.
    let day_percentage = state
        .calculator
        .day_percentage_for_day(record.client_id, record.plan_day_id)
        .await?;

    Ok(Json(MarkComplianceResponse {
        success: true,
        day_percentage,
        record_id: record.id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DailyComplianceQuery {
    pub dietitian_id: Uuid,
    pub client_id: Uuid,
    pub date: NaiveDate,
}

pub async fn daily_compliance(
    State(state): State<AppState>,
    Query(query): Query<DailyComplianceQuery>,
) -> Result<Json<DayComplianceBreakdown>, EngineError> {
    state
        .clients
        .verify_dietitian_client(query.dietitian_id, query.client_id)
        .await?;
    let breakdown = state
        .calculator
        .daily_breakdown_for_client(query.client_id, query.date)
        .await?;
    Ok(Json(breakdown))
}
