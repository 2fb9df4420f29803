use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    ComplianceScoreConfig, ComplianceStatus, MealItem, MealItemCompliance, MealType,
};
use crate::services::ScoreConfigService;
use crate::store::{ComplianceStore, PlanStore};

/// Per-item detail behind a meal percentage.
#[derive(Debug, Clone, Serialize)]
pub struct ItemComplianceBreakdown {
    pub meal_item_id: Uuid,
    pub ingredient_id: Uuid,
    pub mandatory: bool,
    pub status: Option<ComplianceStatus>,
    pub achieved_points: i32,
    pub max_points: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealComplianceBreakdown {
    pub meal_id: Uuid,
    pub label: String,
    pub meal_type: MealType,
    pub percentage: f64,
    pub items: Vec<ItemComplianceBreakdown>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayComplianceBreakdown {
    pub plan_id: Uuid,
    pub date: NaiveDate,
    pub day_percentage: f64,
    pub meals: Vec<MealComplianceBreakdown>,
}

/// Aggregates compliance marks into meal- and day-level percentages using
/// the resolved score config. An unmarked item scores zero but keeps its
/// full weight in the denominator.
#[derive(Clone)]
pub struct ComplianceCalculator {
    plans: Arc<dyn PlanStore>,
    marks: Arc<dyn ComplianceStore>,
    configs: ScoreConfigService,
}

impl ComplianceCalculator {
    pub fn new(
        plans: Arc<dyn PlanStore>,
        marks: Arc<dyn ComplianceStore>,
        configs: ScoreConfigService,
    ) -> Self {
        Self {
            plans,
            marks,
            configs,
        }
    }

    /// Percentage for a single meal on the given date; 0 when the meal has
    /// no items or its day does not fall on that date.
    pub async fn meal_compliance(
        &self,
        client_id: Uuid,
        meal_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<f64> {
        let meal = self
            .plans
            .meal(meal_id)
            .await?
            .ok_or(EngineError::NotFound("meal"))?;
        let day = self
            .plans
            .plan_day(meal.day_id)
            .await?
            .ok_or(EngineError::NotFound("plan day"))?;
        if day.date != date {
            return Ok(0.0);
        }
        let plan = self
            .plans
            .plan(day.plan_id)
            .await?
            .ok_or(EngineError::NotFound("diet plan"))?;

        let config = self
            .configs
            .resolve(Some(plan.dietitian_id), Some(plan.id))
            .await?;
        let items = self.plans.items_for_meal(meal.id).await?;
        let marks = self.marks.marks_for_day(client_id, day.id).await?;
        Ok(meal_percentage(&items, &index_by_item(&marks), &config))
    }

    /// Unweighted mean of the day's meal percentages; 0 when the plan has
    /// no day for the date or the day has no meals.
    pub async fn daily_compliance(
        &self,
        client_id: Uuid,
        plan_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<f64> {
        let breakdown = self.daily_breakdown(client_id, plan_id, date).await?;
        Ok(breakdown.day_percentage)
    }

    /// Recomputes the day percentage after a mark landed, starting from the
    /// stored record's plan-day.
    pub async fn day_percentage_for_day(
        &self,
        client_id: Uuid,
        plan_day_id: Uuid,
    ) -> EngineResult<f64> {
        let day = self
            .plans
            .plan_day(plan_day_id)
            .await?
            .ok_or(EngineError::NotFound("plan day"))?;
        self.daily_compliance(client_id, day.plan_id, day.date)
            .await
    }

    /// The per-meal/per-item detail behind a day percentage.
    pub async fn daily_breakdown(
        &self,
        client_id: Uuid,
        plan_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<DayComplianceBreakdown> {
        let plan = self
            .plans
            .plan(plan_id)
            .await?
            .ok_or(EngineError::NotFound("diet plan"))?;
        if plan.client_id != client_id {
            return Err(EngineError::Unauthorized(
                "the plan does not belong to this client",
            ));
        }

        let empty = DayComplianceBreakdown {
            plan_id,
            date,
            day_percentage: 0.0,
            meals: Vec::new(),
        };
        let Some(day) = self.plans.plan_day_by_date(plan_id, date).await? else {
            return Ok(empty);
        };
        let meals = self.plans.meals_for_day(day.id).await?;
        if meals.is_empty() {
            return Ok(empty);
        }

        let config = self
            .configs
            .resolve(Some(plan.dietitian_id), Some(plan.id))
            .await?;
        let marks = self.marks.marks_for_day(client_id, day.id).await?;
        let marks_by_item = index_by_item(&marks);

        let mut meal_breakdowns = Vec::with_capacity(meals.len());
        for meal in &meals {
            let items = self.plans.items_for_meal(meal.id).await?;
            let item_breakdowns: Vec<ItemComplianceBreakdown> = items
                .iter()
                .map(|item| {
                    let status = marks_by_item.get(&item.id).map(|m| m.status);
                    ItemComplianceBreakdown {
                        meal_item_id: item.id,
                        ingredient_id: item.ingredient_id,
                        mandatory: item.mandatory,
                        status,
                        achieved_points: config.points(item.mandatory, status),
                        max_points: config.max_points(item.mandatory),
                    }
                })
                .collect();
            meal_breakdowns.push(MealComplianceBreakdown {
                meal_id: meal.id,
                label: meal.label(),
                meal_type: meal.meal_type,
                percentage: meal_percentage(&items, &marks_by_item, &config),
                items: item_breakdowns,
            });
        }

        let day_percentage = meal_breakdowns
            .iter()
            .map(|m| m.percentage)
            .sum::<f64>()
            / meal_breakdowns.len() as f64;

        Ok(DayComplianceBreakdown {
            plan_id,
            date,
            day_percentage,
            meals: meal_breakdowns,
        })
    }

    /// The dietitian-facing view: locate the client's plan-day for the
    /// date among their active plans.
    pub async fn daily_breakdown_for_client(
        &self,
        client_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<DayComplianceBreakdown> {
        for plan in self.plans.active_plans_for_client(client_id).await? {
            if self.plans.plan_day_by_date(plan.id, date).await?.is_some() {
                return self.daily_breakdown(client_id, plan.id, date).await;
            }
        }
        Err(EngineError::NotFound("plan day"))
    }
}

fn index_by_item(marks: &[MealItemCompliance]) -> HashMap<Uuid, &MealItemCompliance> {
    marks.iter().map(|m| (m.meal_item_id, m)).collect()
}

/// 100 * achieved / max over the meal's items; 0 when max is 0.
fn meal_percentage(
    items: &[MealItem],
    marks_by_item: &HashMap<Uuid, &MealItemCompliance>,
    config: &ComplianceScoreConfig,
) -> f64 {
    let mut achieved = 0i64;
    let mut max = 0i64;
    for item in items {
        max += config.max_points(item.mandatory) as i64;
        let status = marks_by_item.get(&item.id).map(|m| m.status);
        achieved += config.points(item.mandatory, status) as i64;
    }
    if max == 0 {
        0.0
    } else {
        100.0 * achieved as f64 / max as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(mandatory: bool) -> MealItem {
        MealItem {
            id: Uuid::new_v4(),
            meal_id: Uuid::new_v4(),
            ingredient_id: Uuid::new_v4(),
            mandatory,
            amount: None,
            unit: None,
        }
    }

    fn mark_for(item: &MealItem, status: ComplianceStatus) -> MealItemCompliance {
        MealItemCompliance {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            plan_day_id: Uuid::new_v4(),
            meal_id: item.meal_id,
            meal_item_id: item.id,
            ingredient_id: item.ingredient_id,
            status,
            alternative_ingredient_id: None,
            marked_at: Utc::now(),
            tz_offset_minutes: None,
            local_date: Utc::now().date_naive(),
        }
    }

    #[test]
    fn unmarked_items_stay_in_the_denominator() {
        let config = ComplianceScoreConfig::global_default();
        let items = vec![item(true), item(true)];
        let marks = vec![mark_for(&items[0], ComplianceStatus::Done)];
        let pct = meal_percentage(&items, &index_by_item(&marks), &config);
        assert!((pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_meal_scores_zero() {
        let config = ComplianceScoreConfig::global_default();
        let pct = meal_percentage(&[], &HashMap::new(), &config);
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn mixed_statuses_use_the_score_table() {
        let config = ComplianceScoreConfig::global_default();
        let items = vec![item(true), item(true), item(false)];
        let marks = vec![
            mark_for(&items[0], ComplianceStatus::Done),
            mark_for(&items[1], ComplianceStatus::Alternative),
            mark_for(&items[2], ComplianceStatus::Done),
        ];
        // (10 + 7 + 3) / (10 + 10 + 3)
        let pct = meal_percentage(&items, &index_by_item(&marks), &config);
        assert!((pct - 100.0 * 20.0 / 23.0).abs() < 1e-9);
    }
}
