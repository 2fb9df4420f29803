// Read/write contracts the engine needs from persistence. Plan authoring,
// catalog maintenance and client identity are owned by external
// collaborators; the traits here cover only the lookups and the two
// contended writes (compliance upsert, config insert) the engine performs.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    Client, ComplianceScoreConfig, DietPlan, DietPlanDay, DietPlanMeal, Ingredient, MealItem,
    MealItemCompliance, PlanStatus, Recipe,
};

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn plan(&self, id: Uuid) -> EngineResult<Option<DietPlan>>;
    async fn plan_day(&self, id: Uuid) -> EngineResult<Option<DietPlanDay>>;
    async fn plan_day_by_date(
        &self,
        plan_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<Option<DietPlanDay>>;
    async fn meal(&self, id: Uuid) -> EngineResult<Option<DietPlanMeal>>;
    async fn meal_item(&self, id: Uuid) -> EngineResult<Option<MealItem>>;
    async fn meals_for_day(&self, day_id: Uuid) -> EngineResult<Vec<DietPlanMeal>>;
    async fn items_for_meal(&self, meal_id: Uuid) -> EngineResult<Vec<MealItem>>;
    async fn active_plans_for_client(&self, client_id: Uuid) -> EngineResult<Vec<DietPlan>>;
    async fn days_in_range(
        &self,
        plan_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<DietPlanDay>>;
    async fn update_plan_status(&self, plan_id: Uuid, status: PlanStatus)
        -> EngineResult<DietPlan>;
    /// Active plans whose end date lies strictly before `today`.
    async fn overdue_plans(&self, today: NaiveDate) -> EngineResult<Vec<DietPlan>>;
}

#[async_trait]
pub trait ComplianceStore: Send + Sync {
    async fn find_mark(
        &self,
        client_id: Uuid,
        meal_item_id: Uuid,
        plan_day_id: Uuid,
    ) -> EngineResult<Option<MealItemCompliance>>;
    /// Insert-or-update on (client_id, meal_item_id, plan_day_id). An
    /// existing row keeps its id; status, alternative ingredient, timestamp,
    /// offset and local date take the new values.
    async fn upsert_mark(&self, record: MealItemCompliance) -> EngineResult<MealItemCompliance>;
    /// Snapshot of one client's marks for one plan-day.
    async fn marks_for_day(
        &self,
        client_id: Uuid,
        plan_day_id: Uuid,
    ) -> EngineResult<Vec<MealItemCompliance>>;
}

#[async_trait]
pub trait ScoreConfigStore: Send + Sync {
    async fn config_for_plan(&self, plan_id: Uuid) -> EngineResult<Option<ComplianceScoreConfig>>;
    /// The dietitian-default config: dietitian set, plan null.
    async fn config_for_dietitian(
        &self,
        dietitian_id: Uuid,
    ) -> EngineResult<Option<ComplianceScoreConfig>>;
    /// The global default config: both scope ids null.
    async fn global_config(&self) -> EngineResult<Option<ComplianceScoreConfig>>;
    /// Fails with `EngineError::Conflict` when the (dietitian_id, plan_id)
    /// scope is already occupied; callers recover by re-reading the winner.
    async fn insert_config(
        &self,
        config: ComplianceScoreConfig,
    ) -> EngineResult<ComplianceScoreConfig>;
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn recipe(&self, id: Uuid) -> EngineResult<Option<Recipe>>;
    async fn recipes_for_dietitian(&self, dietitian_id: Uuid) -> EngineResult<Vec<Recipe>>;
    async fn ingredients_by_ids(&self, ids: &[Uuid]) -> EngineResult<Vec<Ingredient>>;
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn client(&self, id: Uuid) -> EngineResult<Option<Client>>;
}
