use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "plan_status", rename_all = "snake_case")]
pub enum PlanStatus {
    Draft,
    Active,
    Completed,
    Expired,
}

impl PlanStatus {
    /// Allowed lifecycle edges: Draft -> Active -> Completed | Expired.
    pub fn can_transition_to(self, next: PlanStatus) -> bool {
        matches!(
            (self, next),
            (PlanStatus::Draft, PlanStatus::Active)
                | (PlanStatus::Active, PlanStatus::Completed)
                | (PlanStatus::Active, PlanStatus::Expired)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Active => "active",
            PlanStatus::Completed => "completed",
            PlanStatus::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "meal_type", rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

/// A dietitian-authored plan for one client over a date range.
///
/// Authored externally; this engine only reads it and drives the status
/// lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DietPlan {
    pub id: Uuid,
    pub dietitian_id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PlanStatus,
}

/// One calendar date within a plan. Unique per (plan, date).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DietPlanDay {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub date: NaiveDate,
    pub calorie_target: Option<i32>,
}

/// A planned meal: either a recipe reference or a free-text custom name,
/// never both and never neither.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DietPlanMeal {
    pub id: Uuid,
    pub day_id: Uuid,
    pub meal_type: MealType,
    pub recipe_id: Option<Uuid>,
    pub custom_name: Option<String>,
    pub mandatory: bool,
}

impl DietPlanMeal {
    pub fn validate(&self) -> EngineResult<()> {
        match (self.recipe_id.is_some(), self.custom_name.is_some()) {
            (true, true) => Err(EngineError::InvalidArgument(
                "a meal cannot carry both a recipe and a custom name".to_string(),
            )),
            (false, false) => Err(EngineError::InvalidArgument(
                "a meal requires either a recipe or a custom name".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub fn label(&self) -> String {
        self.custom_name
            .clone()
            .unwrap_or_else(|| self.meal_type.as_str().to_string())
    }
}

/// One ingredient entry within a planned meal. Unique per (meal, ingredient).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealItem {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub ingredient_id: Uuid,
    pub mandatory: bool,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(recipe_id: Option<Uuid>, custom_name: Option<&str>) -> DietPlanMeal {
        DietPlanMeal {
            id: Uuid::new_v4(),
            day_id: Uuid::new_v4(),
            meal_type: MealType::Lunch,
            recipe_id,
            custom_name: custom_name.map(str::to_string),
            mandatory: true,
        }
    }

    #[test]
    fn meal_requires_exactly_one_source() {
        assert!(meal(Some(Uuid::new_v4()), None).validate().is_ok());
        assert!(meal(None, Some("overnight oats")).validate().is_ok());
        assert!(meal(None, None).validate().is_err());
        assert!(meal(Some(Uuid::new_v4()), Some("both")).validate().is_err());
    }

    #[test]
    fn plan_status_edges() {
        assert!(PlanStatus::Draft.can_transition_to(PlanStatus::Active));
        assert!(PlanStatus::Active.can_transition_to(PlanStatus::Completed));
        assert!(PlanStatus::Active.can_transition_to(PlanStatus::Expired));
        assert!(!PlanStatus::Draft.can_transition_to(PlanStatus::Completed));
        assert!(!PlanStatus::Completed.can_transition_to(PlanStatus::Active));
        assert!(!PlanStatus::Expired.can_transition_to(PlanStatus::Active));
    }
}
