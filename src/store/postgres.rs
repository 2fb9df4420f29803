use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Client, ComplianceScoreConfig, DietPlan, DietPlanDay, DietPlanMeal, Ingredient, MealItem,
    MealItemCompliance, PlanStatus, Recipe,
};
use crate::store::{ClientStore, ComplianceStore, PlanStore, RecipeStore, ScoreConfigStore};

/// Sentinel used by the unique scope index on score configs so that the two
/// nullable scope columns still collide. Must match the migration.
const NIL_SCOPE: &str = "00000000-0000-0000-0000-000000000000";

/// Postgres-backed store. All queries are runtime-checked so the crate
/// builds without a live database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanStore for PgStore {
    async fn plan(&self, id: Uuid) -> EngineResult<Option<DietPlan>> {
        let plan = sqlx::query_as::<_, DietPlan>(
            r#"
            SELECT id, dietitian_id, client_id, name, start_date, end_date, status
            FROM diet_plans
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(plan)
    }

    async fn plan_day(&self, id: Uuid) -> EngineResult<Option<DietPlanDay>> {
        let day = sqlx::query_as::<_, DietPlanDay>(
            r#"
            SELECT id, plan_id, date, calorie_target
            FROM diet_plan_days
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(day)
    }

    async fn plan_day_by_date(
        &self,
        plan_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<Option<DietPlanDay>> {
        let day = sqlx::query_as::<_, DietPlanDay>(
            r#"
            SELECT id, plan_id, date, calorie_target
            FROM diet_plan_days
            WHERE plan_id = $1 AND date = $2
            "#,
        )
        .bind(plan_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(day)
    }

    async fn meal(&self, id: Uuid) -> EngineResult<Option<DietPlanMeal>> {
        let meal = sqlx::query_as::<_, DietPlanMeal>(
            r#"
            SELECT id, day_id, meal_type, recipe_id, custom_name, mandatory
            FROM diet_plan_meals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(meal)
    }

    async fn meal_item(&self, id: Uuid) -> EngineResult<Option<MealItem>> {
        let item = sqlx::query_as::<_, MealItem>(
            r#"
            SELECT id, meal_id, ingredient_id, mandatory, amount, unit
            FROM meal_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn meals_for_day(&self, day_id: Uuid) -> EngineResult<Vec<DietPlanMeal>> {
        let meals = sqlx::query_as::<_, DietPlanMeal>(
            r#"
            SELECT id, day_id, meal_type, recipe_id, custom_name, mandatory
            FROM diet_plan_meals
            WHERE day_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(day_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(meals)
    }

    async fn items_for_meal(&self, meal_id: Uuid) -> EngineResult<Vec<MealItem>> {
        let items = sqlx::query_as::<_, MealItem>(
            r#"
            SELECT id, meal_id, ingredient_id, mandatory, amount, unit
            FROM meal_items
            WHERE meal_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(meal_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn active_plans_for_client(&self, client_id: Uuid) -> EngineResult<Vec<DietPlan>> {
        let plans = sqlx::query_as::<_, DietPlan>(
            r#"
            SELECT id, dietitian_id, client_id, name, start_date, end_date, status
            FROM diet_plans
            WHERE client_id = $1 AND status = 'active'
            ORDER BY start_date, id
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(plans)
    }

    async fn days_in_range(
        &self,
        plan_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<DietPlanDay>> {
        let days = sqlx::query_as::<_, DietPlanDay>(
            r#"
            SELECT id, plan_id, date, calorie_target
            FROM diet_plan_days
            WHERE plan_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date
            "#,
        )
        .bind(plan_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(days)
    }

    async fn update_plan_status(
        &self,
        plan_id: Uuid,
        status: PlanStatus,
    ) -> EngineResult<DietPlan> {
        let plan = sqlx::query_as::<_, DietPlan>(
            r#"
            UPDATE diet_plans
            SET status = $2
            WHERE id = $1
            RETURNING id, dietitian_id, client_id, name, start_date, end_date, status
            "#,
        )
        .bind(plan_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        plan.ok_or(EngineError::NotFound("diet plan"))
    }

    async fn overdue_plans(&self, today: NaiveDate) -> EngineResult<Vec<DietPlan>> {
        let plans = sqlx::query_as::<_, DietPlan>(
            r#"
            SELECT id, dietitian_id, client_id, name, start_date, end_date, status
            FROM diet_plans
            WHERE status = 'active' AND end_date < $1
            ORDER BY end_date, id
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(plans)
    }
}

#[async_trait]
impl ComplianceStore for PgStore {
    async fn find_mark(
        &self,
        client_id: Uuid,
        meal_item_id: Uuid,
        plan_day_id: Uuid,
    ) -> EngineResult<Option<MealItemCompliance>> {
        let mark = sqlx::query_as::<_, MealItemCompliance>(
            r#"
            SELECT id, client_id, plan_id, plan_day_id, meal_id, meal_item_id, ingredient_id,
                   status, alternative_ingredient_id, marked_at, tz_offset_minutes, local_date
            FROM compliance_marks
            WHERE client_id = $1 AND meal_item_id = $2 AND plan_day_id = $3
            "#,
        )
        .bind(client_id)
        .bind(meal_item_id)
        .bind(plan_day_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(mark)
    }

    async fn upsert_mark(&self, record: MealItemCompliance) -> EngineResult<MealItemCompliance> {
        // The unique key on (client_id, meal_item_id, plan_day_id) makes two
        // racing marks serialize into one surviving row; the existing row
        // keeps its id and the latest writer wins.
        let stored = sqlx::query_as::<_, MealItemCompliance>(
            r#"
            INSERT INTO compliance_marks (
                id, client_id, plan_id, plan_day_id, meal_id, meal_item_id, ingredient_id,
                status, alternative_ingredient_id, marked_at, tz_offset_minutes, local_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (client_id, meal_item_id, plan_day_id) DO UPDATE SET
                status = EXCLUDED.status,
                alternative_ingredient_id = EXCLUDED.alternative_ingredient_id,
                marked_at = EXCLUDED.marked_at,
                tz_offset_minutes = EXCLUDED.tz_offset_minutes,
                local_date = EXCLUDED.local_date
            RETURNING id, client_id, plan_id, plan_day_id, meal_id, meal_item_id, ingredient_id,
                      status, alternative_ingredient_id, marked_at, tz_offset_minutes, local_date
            "#,
        )
        .bind(record.id)
        .bind(record.client_id)
        .bind(record.plan_id)
        .bind(record.plan_day_id)
        .bind(record.meal_id)
        .bind(record.meal_item_id)
        .bind(record.ingredient_id)
        .bind(record.status)
        .bind(record.alternative_ingredient_id)
        .bind(record.marked_at)
        .bind(record.tz_offset_minutes)
        .bind(record.local_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn marks_for_day(
        &self,
        client_id: Uuid,
        plan_day_id: Uuid,
    ) -> EngineResult<Vec<MealItemCompliance>> {
        let marks = sqlx::query_as::<_, MealItemCompliance>(
            r#"
            SELECT id, client_id, plan_id, plan_day_id, meal_id, meal_item_id, ingredient_id,
                   status, alternative_ingredient_id, marked_at, tz_offset_minutes, local_date
            FROM compliance_marks
            WHERE client_id = $1 AND plan_day_id = $2
            "#,
        )
        .bind(client_id)
        .bind(plan_day_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(marks)
    }
}

#[async_trait]
impl ScoreConfigStore for PgStore {
    async fn config_for_plan(&self, plan_id: Uuid) -> EngineResult<Option<ComplianceScoreConfig>> {
        let config = sqlx::query_as::<_, ComplianceScoreConfig>(
            r#"
            SELECT id, dietitian_id, plan_id, mandatory_done, mandatory_alternative,
                   mandatory_skipped, optional_done, optional_skipped
            FROM score_configs
            WHERE plan_id = $1
            "#,
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(config)
    }

    async fn config_for_dietitian(
        &self,
        dietitian_id: Uuid,
    ) -> EngineResult<Option<ComplianceScoreConfig>> {
        let config = sqlx::query_as::<_, ComplianceScoreConfig>(
            r#"
            SELECT id, dietitian_id, plan_id, mandatory_done, mandatory_alternative,
                   mandatory_skipped, optional_done, optional_skipped
            FROM score_configs
            WHERE dietitian_id = $1 AND plan_id IS NULL
            "#,
        )
        .bind(dietitian_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(config)
    }

    async fn global_config(&self) -> EngineResult<Option<ComplianceScoreConfig>> {
        let config = sqlx::query_as::<_, ComplianceScoreConfig>(
            r#"
            SELECT id, dietitian_id, plan_id, mandatory_done, mandatory_alternative,
                   mandatory_skipped, optional_done, optional_skipped
            FROM score_configs
            WHERE dietitian_id IS NULL AND plan_id IS NULL
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(config)
    }

    async fn insert_config(
        &self,
        config: ComplianceScoreConfig,
    ) -> EngineResult<ComplianceScoreConfig> {
        config.validate()?;
        let inserted = sqlx::query_as::<_, ComplianceScoreConfig>(&format!(
            r#"
            INSERT INTO score_configs (
                id, dietitian_id, plan_id, mandatory_done, mandatory_alternative,
                mandatory_skipped, optional_done, optional_skipped
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (coalesce(dietitian_id, '{NIL_SCOPE}'::uuid), coalesce(plan_id, '{NIL_SCOPE}'::uuid))
            DO NOTHING
            RETURNING id, dietitian_id, plan_id, mandatory_done, mandatory_alternative,
                      mandatory_skipped, optional_done, optional_skipped
            "#
        ))
        .bind(config.id)
        .bind(config.dietitian_id)
        .bind(config.plan_id)
        .bind(config.mandatory_done)
        .bind(config.mandatory_alternative)
        .bind(config.mandatory_skipped)
        .bind(config.optional_done)
        .bind(config.optional_skipped)
        .fetch_optional(&self.pool)
        .await?;
        inserted.ok_or(EngineError::Conflict)
    }
}

#[async_trait]
impl RecipeStore for PgStore {
    async fn recipe(&self, id: Uuid) -> EngineResult<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, dietitian_id, name, meal_type,
                   mandatory_ingredients, optional_ingredients, prohibited_ingredients
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(recipe)
    }

    async fn recipes_for_dietitian(&self, dietitian_id: Uuid) -> EngineResult<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, dietitian_id, name, meal_type,
                   mandatory_ingredients, optional_ingredients, prohibited_ingredients
            FROM recipes
            WHERE dietitian_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(dietitian_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(recipes)
    }

    async fn ingredients_by_ids(&self, ids: &[Uuid]) -> EngineResult<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name
            FROM ingredients
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(ingredients)
    }
}

#[async_trait]
impl ClientStore for PgStore {
    async fn client(&self, id: Uuid) -> EngineResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, dietitian_id, premium, height_cm, weight_kg, birth_date, sex
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }
}
