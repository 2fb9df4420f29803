mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use uuid::Uuid;

use diet_coach::api::AppState;
use diet_coach::models::MealType;
use diet_coach::services::alternative_meal_service::DecisionRequest;
use diet_coach::store::MemoryStore;

use common::*;

async fn seed_named_ingredients(store: &MemoryStore, names: &[&str]) -> Vec<Uuid> {
    let mut ids = Vec::new();
    for name in names {
        ids.push(seed_ingredient(store, name).await);
    }
    ids
}

fn request(
    dietitian_id: Uuid,
    planned_recipe_id: Uuid,
    meal_type: MealType,
    on_hand: Vec<Uuid>,
) -> DecisionRequest {
    DecisionRequest {
        dietitian_id,
        planned_recipe_id,
        meal_type,
        client_ingredient_ids: on_hand,
    }
}

#[tokio::test]
async fn eighty_percent_coverage_passes_the_gate() {
    let store = Arc::new(MemoryStore::new());
    let dietitian_id = Uuid::new_v4();
    let mandatory = seed_named_ingredients(
        &store,
        &["chicken", "rice", "onion", "garlic", "olive oil"],
    )
    .await;
    let optional =
        seed_named_ingredients(&store, &["pepper", "lemon", "parsley", "cumin", "yogurt"]).await;
    let recipe_id = seed_recipe(
        &store,
        dietitian_id,
        "chicken and rice",
        MealType::Dinner,
        mandatory.clone(),
        optional.clone(),
        Vec::new(),
    )
    .await;
    let state = AppState::from_store(store);

    // All 5 mandatory plus 3 of 5 optional: 8 of 10 planned ingredients.
    let mut on_hand = mandatory.clone();
    on_hand.extend(optional.iter().take(3));
    let decision = state
        .alternatives
        .decide(request(dietitian_id, recipe_id, MealType::Dinner, on_hand))
        .await
        .unwrap();
    assert!(decision.can_cook_original);
    assert!(decision.alternative.is_none());
    assert!(decision.explanation.contains("80%"));

    // Dropping to 2 optional lands at 70% and the gate closes.
    let mut fewer = mandatory;
    fewer.extend(optional.iter().take(2));
    let decision = state
        .alternatives
        .decide(request(dietitian_id, recipe_id, MealType::Dinner, fewer))
        .await
        .unwrap();
    assert!(!decision.can_cook_original);
    assert!(decision.explanation.contains("70%"));
    // No sibling recipe exists, so the search comes back empty-handed.
    assert!(decision.alternative.is_none());
    assert!(decision.explanation.contains("No suitable alternative"));
}

#[tokio::test]
async fn prohibited_ingredient_always_blocks_the_original() {
    let store = Arc::new(MemoryStore::new());
    let dietitian_id = Uuid::new_v4();
    let mandatory = seed_named_ingredients(&store, &["salmon", "quinoa"]).await;
    let prohibited = seed_named_ingredients(&store, &["peanuts"]).await;
    let recipe_id = seed_recipe(
        &store,
        dietitian_id,
        "salmon bowl",
        MealType::Lunch,
        mandatory.clone(),
        Vec::new(),
        prohibited.clone(),
    )
    .await;
    let state = AppState::from_store(store);

    // Full mandatory coverage cannot save a pantry holding a prohibited
    // ingredient.
    let mut on_hand = mandatory;
    on_hand.push(prohibited[0]);
    let decision = state
        .alternatives
        .decide(request(dietitian_id, recipe_id, MealType::Lunch, on_hand))
        .await
        .unwrap();
    assert!(!decision.can_cook_original);
    assert!(decision.explanation.contains("prohibited"));
    assert!(decision.explanation.contains("peanuts"));
}

#[tokio::test]
async fn missing_mandatory_ingredients_are_named() {
    let store = Arc::new(MemoryStore::new());
    let dietitian_id = Uuid::new_v4();
    let mandatory = seed_named_ingredients(&store, &["eggs", "flour", "milk"]).await;
    let recipe_id = seed_recipe(
        &store,
        dietitian_id,
        "pancakes",
        MealType::Breakfast,
        mandatory.clone(),
        Vec::new(),
        Vec::new(),
    )
    .await;
    let state = AppState::from_store(store);

    let decision = state
        .alternatives
        .decide(request(
            dietitian_id,
            recipe_id,
            MealType::Breakfast,
            vec![mandatory[0]],
        ))
        .await
        .unwrap();
    assert!(!decision.can_cook_original);
    assert_eq!(decision.missing_ingredients, vec!["flour", "milk"]);
    assert!(decision.explanation.contains("flour"));
}

#[tokio::test]
async fn missing_recipe_is_a_decision_not_an_error() {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::from_store(store);

    let decision = state
        .alternatives
        .decide(request(
            Uuid::new_v4(),
            Uuid::new_v4(),
            MealType::Dinner,
            Vec::new(),
        ))
        .await
        .unwrap();
    assert!(!decision.can_cook_original);
    assert!(decision.alternative.is_none());
    assert!(decision.explanation.contains("no longer exists"));
}

#[tokio::test]
async fn alternative_search_ranks_and_filters_candidates() {
    let store = Arc::new(MemoryStore::new());
    let dietitian_id = Uuid::new_v4();

    let planned_mandatory = seed_named_ingredients(&store, &["beef", "noodles"]).await;
    let planned_id = seed_recipe(
        &store,
        dietitian_id,
        "beef noodles",
        MealType::Dinner,
        planned_mandatory.clone(),
        Vec::new(),
        Vec::new(),
    )
    .await;

    let on_hand = seed_named_ingredients(&store, &["tofu", "rice", "broccoli", "soy sauce"]).await;

    // Same meal type, all mandatory covered, half the optionals on hand:
    // 70 + 15 = 85.
    let partial_optional = seed_named_ingredients(&store, &["sesame", "ginger"]).await;
    seed_recipe(
        &store,
        dietitian_id,
        "tofu rice",
        MealType::Dinner,
        vec![on_hand[0], on_hand[1]],
        vec![on_hand[3], partial_optional[0]],
        Vec::new(),
    )
    .await;

    // Full coverage, no optionals: mandatory alone scores 100.
    let winner_id = seed_recipe(
        &store,
        dietitian_id,
        "broccoli stir fry",
        MealType::Dinner,
        vec![on_hand[2], on_hand[3]],
        Vec::new(),
        Vec::new(),
    )
    .await;

    // Wrong meal slot: filtered out despite full coverage.
    seed_recipe(
        &store,
        dietitian_id,
        "tofu scramble",
        MealType::Breakfast,
        vec![on_hand[0]],
        Vec::new(),
        Vec::new(),
    )
    .await;

    // Conflicting pantry: the client holds one of its prohibited
    // ingredients.
    seed_recipe(
        &store,
        dietitian_id,
        "plain rice",
        MealType::Dinner,
        vec![on_hand[1]],
        Vec::new(),
        vec![on_hand[3]],
    )
    .await;

    // Unmet mandatory ingredient: filtered out.
    let unavailable = seed_ingredient(&store, "duck").await;
    seed_recipe(
        &store,
        dietitian_id,
        "duck noodles",
        MealType::Dinner,
        vec![unavailable],
        Vec::new(),
        Vec::new(),
    )
    .await;

    let state = AppState::from_store(store);
    let decision = state
        .alternatives
        .decide(request(
            dietitian_id,
            planned_id,
            MealType::Dinner,
            on_hand,
        ))
        .await
        .unwrap();

    assert!(!decision.can_cook_original);
    let alternative = decision.alternative.expect("an alternative should be found");
    assert_eq!(alternative.recipe_id, winner_id);
    assert_eq!(alternative.recipe_name, "broccoli stir fry");
    assert_eq!(alternative.match_percentage, 100.0);
    assert!(alternative.missing_ingredients.is_empty());
}

#[tokio::test]
async fn tied_candidates_keep_the_first_enumerated() {
    let store = Arc::new(MemoryStore::new());
    let dietitian_id = Uuid::new_v4();

    let missing = seed_ingredient(&store, "saffron").await;
    let planned_id = seed_recipe(
        &store,
        dietitian_id,
        "saffron risotto",
        MealType::Dinner,
        vec![missing],
        Vec::new(),
        Vec::new(),
    )
    .await;

    let on_hand = seed_named_ingredients(&store, &["pasta", "tomato"]).await;
    let first_id = seed_recipe(
        &store,
        dietitian_id,
        "pasta pomodoro",
        MealType::Dinner,
        on_hand.clone(),
        Vec::new(),
        Vec::new(),
    )
    .await;
    seed_recipe(
        &store,
        dietitian_id,
        "tomato pasta",
        MealType::Dinner,
        on_hand.clone(),
        Vec::new(),
        Vec::new(),
    )
    .await;

    let state = AppState::from_store(store);
    let decision = state
        .alternatives
        .decide(request(dietitian_id, planned_id, MealType::Dinner, on_hand))
        .await
        .unwrap();

    let alternative = decision.alternative.expect("an alternative should be found");
    assert_eq!(alternative.recipe_id, first_id);
}
