use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{client_local_date, ComplianceStatus, MealItemCompliance};
use crate::store::{ComplianceStore, PlanStore};

/// A client's request to mark one meal item for the day it is planned on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkRequest {
    pub client_id: Uuid,
    pub meal_item_id: Uuid,
    pub status: ComplianceStatus,
    pub alternative_ingredient_id: Option<Uuid>,
    pub tz_offset_minutes: Option<i32>,
}

/// Records per-meal-item compliance marks. One mark per
/// (client, meal item, plan-day); repeating a mark updates the existing
/// record and the latest writer wins.
#[derive(Clone)]
pub struct ComplianceService {
    plans: Arc<dyn PlanStore>,
    marks: Arc<dyn ComplianceStore>,
}

impl ComplianceService {
    pub fn new(plans: Arc<dyn PlanStore>, marks: Arc<dyn ComplianceStore>) -> Self {
        Self { plans, marks }
    }

    pub async fn mark(&self, request: MarkRequest) -> EngineResult<MealItemCompliance> {
        if request.status == ComplianceStatus::Alternative
            && request.alternative_ingredient_id.is_none()
        {
            return Err(EngineError::InvalidArgument(
                "an alternative mark requires an alternative ingredient".to_string(),
            ));
        }

        let item = self
            .plans
            .meal_item(request.meal_item_id)
            .await?
            .ok_or(EngineError::NotFound("meal item"))?;
        let meal = self
            .plans
            .meal(item.meal_id)
            .await?
            .ok_or(EngineError::NotFound("meal"))?;
        let day = self
            .plans
            .plan_day(meal.day_id)
            .await?
            .ok_or(EngineError::NotFound("plan day"))?;
        let plan = self
            .plans
            .plan(day.plan_id)
            .await?
            .ok_or(EngineError::NotFound("diet plan"))?;

        if plan.client_id != request.client_id {
            return Err(EngineError::Unauthorized(
                "the plan does not belong to this client",
            ));
        }

        let marked_at = Utc::now();
        let record = MealItemCompliance {
            id: Uuid::new_v4(),
            client_id: request.client_id,
            plan_id: plan.id,
            plan_day_id: day.id,
            meal_id: meal.id,
            meal_item_id: item.id,
            ingredient_id: item.ingredient_id,
            status: request.status,
            alternative_ingredient_id: request.alternative_ingredient_id,
            marked_at,
            tz_offset_minutes: request.tz_offset_minutes,
            local_date: client_local_date(marked_at, request.tz_offset_minutes, day.date),
        };
        // Enforced on the request above and again on the record so that an
        // update path can never smuggle in an incomplete alternative.
        record.validate()?;

        let stored = self.marks.upsert_mark(record).await?;
        info!(
            client_id = %request.client_id,
            meal_item_id = %request.meal_item_id,
            status = ?request.status,
            "Recorded compliance mark"
        );
        Ok(stored)
    }
}
