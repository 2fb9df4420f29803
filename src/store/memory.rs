use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Client, ComplianceScoreConfig, DietPlan, DietPlanDay, DietPlanMeal, Ingredient, MealItem,
    MealItemCompliance, PlanStatus, Recipe,
};
use crate::store::{ClientStore, ComplianceStore, PlanStore, RecipeStore, ScoreConfigStore};

/// In-memory store used by the integration tests and local development.
///
/// Vectors keep insertion order, which is the enumeration order the decision
/// service's tie-break documents. The containment invariants (unique date
/// per plan, unique ingredient per meal) and the two unique write keys are
/// enforced here the same way the Postgres schema enforces them.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    clients: Vec<Client>,
    ingredients: Vec<Ingredient>,
    plans: Vec<DietPlan>,
    days: Vec<DietPlanDay>,
    meals: Vec<DietPlanMeal>,
    items: Vec<MealItem>,
    recipes: Vec<Recipe>,
    marks: Vec<MealItemCompliance>,
    configs: Vec<ComplianceScoreConfig>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_client(&self, client: Client) -> EngineResult<()> {
        self.inner.write().await.clients.push(client);
        Ok(())
    }

    pub async fn insert_ingredient(&self, ingredient: Ingredient) -> EngineResult<()> {
        self.inner.write().await.ingredients.push(ingredient);
        Ok(())
    }

    pub async fn insert_plan(&self, plan: DietPlan) -> EngineResult<()> {
        self.inner.write().await.plans.push(plan);
        Ok(())
    }

    pub async fn insert_day(&self, day: DietPlanDay) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        if inner
            .days
            .iter()
            .any(|d| d.plan_id == day.plan_id && d.date == day.date)
        {
            return Err(EngineError::InvalidArgument(
                "the plan already has a day for that date".to_string(),
            ));
        }
        inner.days.push(day);
        Ok(())
    }

    pub async fn insert_meal(&self, meal: DietPlanMeal) -> EngineResult<()> {
        meal.validate()?;
        self.inner.write().await.meals.push(meal);
        Ok(())
    }

    pub async fn insert_meal_item(&self, item: MealItem) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        if inner
            .items
            .iter()
            .any(|i| i.meal_id == item.meal_id && i.ingredient_id == item.ingredient_id)
        {
            return Err(EngineError::InvalidArgument(
                "the meal already contains that ingredient".to_string(),
            ));
        }
        inner.items.push(item);
        Ok(())
    }

    pub async fn insert_recipe(&self, recipe: Recipe) -> EngineResult<()> {
        recipe.validate()?;
        self.inner.write().await.recipes.push(recipe);
        Ok(())
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn plan(&self, id: Uuid) -> EngineResult<Option<DietPlan>> {
        let inner = self.inner.read().await;
        Ok(inner.plans.iter().find(|p| p.id == id).cloned())
    }

    async fn plan_day(&self, id: Uuid) -> EngineResult<Option<DietPlanDay>> {
        let inner = self.inner.read().await;
        Ok(inner.days.iter().find(|d| d.id == id).cloned())
    }

    async fn plan_day_by_date(
        &self,
        plan_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<Option<DietPlanDay>> {
        let inner = self.inner.read().await;
        Ok(inner
            .days
            .iter()
            .find(|d| d.plan_id == plan_id && d.date == date)
            .cloned())
    }

    async fn meal(&self, id: Uuid) -> EngineResult<Option<DietPlanMeal>> {
        let inner = self.inner.read().await;
        Ok(inner.meals.iter().find(|m| m.id == id).cloned())
    }

    async fn meal_item(&self, id: Uuid) -> EngineResult<Option<MealItem>> {
        let inner = self.inner.read().await;
        Ok(inner.items.iter().find(|i| i.id == id).cloned())
    }

    async fn meals_for_day(&self, day_id: Uuid) -> EngineResult<Vec<DietPlanMeal>> {
        let inner = self.inner.read().await;
        Ok(inner
            .meals
            .iter()
            .filter(|m| m.day_id == day_id)
            .cloned()
            .collect())
    }

    async fn items_for_meal(&self, meal_id: Uuid) -> EngineResult<Vec<MealItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .iter()
            .filter(|i| i.meal_id == meal_id)
            .cloned()
            .collect())
    }

    async fn active_plans_for_client(&self, client_id: Uuid) -> EngineResult<Vec<DietPlan>> {
        let inner = self.inner.read().await;
        let mut plans: Vec<DietPlan> = inner
            .plans
            .iter()
            .filter(|p| p.client_id == client_id && p.status == PlanStatus::Active)
            .cloned()
            .collect();
        plans.sort_by_key(|p| p.start_date);
        Ok(plans)
    }

    async fn days_in_range(
        &self,
        plan_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<DietPlanDay>> {
        let inner = self.inner.read().await;
        let mut days: Vec<DietPlanDay> = inner
            .days
            .iter()
            .filter(|d| d.plan_id == plan_id && d.date >= from && d.date <= to)
            .cloned()
            .collect();
        days.sort_by_key(|d| d.date);
        Ok(days)
    }

    async fn update_plan_status(
        &self,
        plan_id: Uuid,
        status: PlanStatus,
    ) -> EngineResult<DietPlan> {
        let mut inner = self.inner.write().await;
        let plan = inner
            .plans
            .iter_mut()
            .find(|p| p.id == plan_id)
            .ok_or(EngineError::NotFound("diet plan"))?;
        plan.status = status;
        Ok(plan.clone())
    }

    async fn overdue_plans(&self, today: NaiveDate) -> EngineResult<Vec<DietPlan>> {
        let inner = self.inner.read().await;
        Ok(inner
            .plans
            .iter()
            .filter(|p| p.status == PlanStatus::Active && p.end_date < today)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ComplianceStore for MemoryStore {
    async fn find_mark(
        &self,
        client_id: Uuid,
        meal_item_id: Uuid,
        plan_day_id: Uuid,
    ) -> EngineResult<Option<MealItemCompliance>> {
        let inner = self.inner.read().await;
        Ok(inner
            .marks
            .iter()
            .find(|m| {
                m.client_id == client_id
                    && m.meal_item_id == meal_item_id
                    && m.plan_day_id == plan_day_id
            })
            .cloned())
    }

    async fn upsert_mark(&self, record: MealItemCompliance) -> EngineResult<MealItemCompliance> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.marks.iter_mut().find(|m| {
            m.client_id == record.client_id
                && m.meal_item_id == record.meal_item_id
                && m.plan_day_id == record.plan_day_id
        }) {
            // Update in place; the original row id survives.
            existing.status = record.status;
            existing.alternative_ingredient_id = record.alternative_ingredient_id;
            existing.marked_at = record.marked_at;
            existing.tz_offset_minutes = record.tz_offset_minutes;
            existing.local_date = record.local_date;
            return Ok(existing.clone());
        }
        inner.marks.push(record.clone());
        Ok(record)
    }

    async fn marks_for_day(
        &self,
        client_id: Uuid,
        plan_day_id: Uuid,
    ) -> EngineResult<Vec<MealItemCompliance>> {
        let inner = self.inner.read().await;
        Ok(inner
            .marks
            .iter()
            .filter(|m| m.client_id == client_id && m.plan_day_id == plan_day_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ScoreConfigStore for MemoryStore {
    async fn config_for_plan(&self, plan_id: Uuid) -> EngineResult<Option<ComplianceScoreConfig>> {
        let inner = self.inner.read().await;
        Ok(inner
            .configs
            .iter()
            .find(|c| c.plan_id == Some(plan_id))
            .cloned())
    }

    async fn config_for_dietitian(
        &self,
        dietitian_id: Uuid,
    ) -> EngineResult<Option<ComplianceScoreConfig>> {
        let inner = self.inner.read().await;
        Ok(inner
            .configs
            .iter()
            .find(|c| c.dietitian_id == Some(dietitian_id) && c.plan_id.is_none())
            .cloned())
    }

    async fn global_config(&self) -> EngineResult<Option<ComplianceScoreConfig>> {
        let inner = self.inner.read().await;
        Ok(inner
            .configs
            .iter()
            .find(|c| c.dietitian_id.is_none() && c.plan_id.is_none())
            .cloned())
    }

    async fn insert_config(
        &self,
        config: ComplianceScoreConfig,
    ) -> EngineResult<ComplianceScoreConfig> {
        config.validate()?;
        let mut inner = self.inner.write().await;
        if inner
            .configs
            .iter()
            .any(|c| c.dietitian_id == config.dietitian_id && c.plan_id == config.plan_id)
        {
            return Err(EngineError::Conflict);
        }
        inner.configs.push(config.clone());
        Ok(config)
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn recipe(&self, id: Uuid) -> EngineResult<Option<Recipe>> {
        let inner = self.inner.read().await;
        Ok(inner.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn recipes_for_dietitian(&self, dietitian_id: Uuid) -> EngineResult<Vec<Recipe>> {
        let inner = self.inner.read().await;
        Ok(inner
            .recipes
            .iter()
            .filter(|r| r.dietitian_id == dietitian_id)
            .cloned()
            .collect())
    }

    async fn ingredients_by_ids(&self, ids: &[Uuid]) -> EngineResult<Vec<Ingredient>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ingredients
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn client(&self, id: Uuid) -> EngineResult<Option<Client>> {
        let inner = self.inner.read().await;
        Ok(inner.clients.iter().find(|c| c.id == id).cloned())
    }
}
