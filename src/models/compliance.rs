use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "compliance_status", rename_all = "snake_case")]
pub enum ComplianceStatus {
    Done,
    Skipped,
    Alternative,
}

/// A client's report of how one meal item was handled on one plan-day.
///
/// Unique per (client_id, meal_item_id, plan_day_id): a later mark for the
/// same triple overwrites status, alternative ingredient and timestamp in
/// place, keeping the original row id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealItemCompliance {
    pub id: Uuid,
    pub client_id: Uuid,
    pub plan_id: Uuid,
    pub plan_day_id: Uuid,
    pub meal_id: Uuid,
    pub meal_item_id: Uuid,
    pub ingredient_id: Uuid,
    pub status: ComplianceStatus,
    pub alternative_ingredient_id: Option<Uuid>,
    pub marked_at: DateTime<Utc>,
    pub tz_offset_minutes: Option<i32>,
    pub local_date: NaiveDate,
}

impl MealItemCompliance {
    pub fn validate(&self) -> EngineResult<()> {
        if self.status == ComplianceStatus::Alternative && self.alternative_ingredient_id.is_none()
        {
            return Err(EngineError::InvalidArgument(
                "an alternative mark requires an alternative ingredient".to_string(),
            ));
        }
        Ok(())
    }
}

/// The client's local calendar date for a mark: the UTC timestamp shifted by
/// the reported offset, or the plan-day's own date when no offset came in.
pub fn client_local_date(
    marked_at: DateTime<Utc>,
    tz_offset_minutes: Option<i32>,
    plan_day_date: NaiveDate,
) -> NaiveDate {
    match tz_offset_minutes {
        Some(offset) => (marked_at + Duration::minutes(offset as i64)).date_naive(),
        None => plan_day_date,
    }
}
