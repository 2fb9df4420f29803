use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{DietPlan, PlanStatus};
use crate::store::PlanStore;

/// Drives the plan status lifecycle. Everything else about a plan is
/// read-only to this engine.
#[derive(Clone)]
pub struct PlanService {
    plans: Arc<dyn PlanStore>,
}

impl PlanService {
    pub fn new(plans: Arc<dyn PlanStore>) -> Self {
        Self { plans }
    }

    pub async fn transition(&self, plan_id: Uuid, next: PlanStatus) -> EngineResult<DietPlan> {
        let plan = self
            .plans
            .plan(plan_id)
            .await?
            .ok_or(EngineError::NotFound("diet plan"))?;
        if !plan.status.can_transition_to(next) {
            return Err(EngineError::InvalidArgument(format!(
                "a {} plan cannot move to {}",
                plan.status.as_str(),
                next.as_str()
            )));
        }
        self.plans.update_plan_status(plan_id, next).await
    }

    /// Marks active plans whose end date has passed as expired. Returns the
    /// number of plans swept.
    pub async fn expire_overdue(&self, today: NaiveDate) -> EngineResult<u32> {
        let overdue = self.plans.overdue_plans(today).await?;
        let mut expired = 0u32;
        for plan in overdue {
            self.plans
                .update_plan_status(plan.id, PlanStatus::Expired)
                .await?;
            expired += 1;
        }
        if expired > 0 {
            info!(expired, "Expired overdue diet plans");
        }
        Ok(expired)
    }
}
