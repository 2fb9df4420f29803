#![allow(dead_code)]

use chrono::NaiveDate;
use uuid::Uuid;

use diet_coach::models::{
    Client, DietPlan, DietPlanDay, DietPlanMeal, Ingredient, MealItem, MealType, PlanStatus,
    Recipe,
};
use diet_coach::store::MemoryStore;

pub async fn seed_client(store: &MemoryStore, dietitian_id: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    store
        .insert_client(Client {
            id,
            name: "Test Client".to_string(),
            dietitian_id: Some(dietitian_id),
            premium: false,
            height_cm: None,
            weight_kg: None,
            birth_date: None,
            sex: None,
        })
        .await
        .unwrap();
    id
}

pub async fn seed_ingredient(store: &MemoryStore, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    store
        .insert_ingredient(Ingredient {
            id,
            name: name.to_string(),
        })
        .await
        .unwrap();
    id
}

pub async fn seed_plan(
    store: &MemoryStore,
    dietitian_id: Uuid,
    client_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: PlanStatus,
) -> Uuid {
    let id = Uuid::new_v4();
    store
        .insert_plan(DietPlan {
            id,
            dietitian_id,
            client_id,
            name: "Test Plan".to_string(),
            start_date,
            end_date,
            status,
        })
        .await
        .unwrap();
    id
}

pub async fn seed_day(store: &MemoryStore, plan_id: Uuid, date: NaiveDate) -> Uuid {
    let id = Uuid::new_v4();
    store
        .insert_day(DietPlanDay {
            id,
            plan_id,
            date,
            calorie_target: None,
        })
        .await
        .unwrap();
    id
}

pub async fn seed_meal(store: &MemoryStore, day_id: Uuid, meal_type: MealType, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    store
        .insert_meal(DietPlanMeal {
            id,
            day_id,
            meal_type,
            recipe_id: None,
            custom_name: Some(name.to_string()),
            mandatory: true,
        })
        .await
        .unwrap();
    id
}

pub async fn seed_item(
    store: &MemoryStore,
    meal_id: Uuid,
    ingredient_id: Uuid,
    mandatory: bool,
) -> Uuid {
    let id = Uuid::new_v4();
    store
        .insert_meal_item(MealItem {
            id,
            meal_id,
            ingredient_id,
            mandatory,
            amount: None,
            unit: None,
        })
        .await
        .unwrap();
    id
}

pub async fn seed_recipe(
    store: &MemoryStore,
    dietitian_id: Uuid,
    name: &str,
    meal_type: MealType,
    mandatory: Vec<Uuid>,
    optional: Vec<Uuid>,
    prohibited: Vec<Uuid>,
) -> Uuid {
    let id = Uuid::new_v4();
    store
        .insert_recipe(Recipe {
            id,
            dietitian_id,
            name: name.to_string(),
            meal_type,
            mandatory_ingredients: mandatory,
            optional_ingredients: optional,
            prohibited_ingredients: prohibited,
        })
        .await
        .unwrap();
    id
}

/// One active plan covering a single date with one meal; returns the chain
/// of ids the compliance tests walk.
pub struct SingleMealFixture {
    pub dietitian_id: Uuid,
    pub client_id: Uuid,
    pub plan_id: Uuid,
    pub day_id: Uuid,
    pub meal_id: Uuid,
    pub item_ids: Vec<Uuid>,
}

pub async fn single_meal_plan(
    store: &MemoryStore,
    date: NaiveDate,
    item_mandatory_flags: &[bool],
) -> SingleMealFixture {
    let dietitian_id = Uuid::new_v4();
    let client_id = seed_client(store, dietitian_id).await;
    let plan_id = seed_plan(store, dietitian_id, client_id, date, date, PlanStatus::Active).await;
    let day_id = seed_day(store, plan_id, date).await;
    let meal_id = seed_meal(store, day_id, MealType::Breakfast, "oatmeal bowl").await;

    let mut item_ids = Vec::new();
    for (i, &mandatory) in item_mandatory_flags.iter().enumerate() {
        let ingredient_id = seed_ingredient(store, &format!("ingredient {i}")).await;
        item_ids.push(seed_item(store, meal_id, ingredient_id, mandatory).await);
    }

    SingleMealFixture {
        dietitian_id,
        client_id,
        plan_id,
        day_id,
        meal_id,
        item_ids,
    }
}
