mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, Utc};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use diet_coach::api::AppState;
use diet_coach::error::EngineError;
use diet_coach::models::{Client, PlanStatus, Sex};
use diet_coach::store::MemoryStore;

use common::*;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
}

#[tokio::test]
async fn plan_status_follows_the_lifecycle() {
    let store = Arc::new(MemoryStore::new());
    let dietitian_id = Uuid::new_v4();
    let client_id = seed_client(&store, dietitian_id).await;
    let plan_id = seed_plan(
        &store,
        dietitian_id,
        client_id,
        date(),
        date(),
        PlanStatus::Draft,
    )
    .await;
    let state = AppState::from_store(store);

    // Draft cannot jump straight to Completed.
    let result = state.plans.transition(plan_id, PlanStatus::Completed).await;
    assert_matches!(result, Err(EngineError::InvalidArgument(_)));

    let plan = state
        .plans
        .transition(plan_id, PlanStatus::Active)
        .await
        .unwrap();
    assert_eq!(plan.status, PlanStatus::Active);

    let plan = state
        .plans
        .transition(plan_id, PlanStatus::Completed)
        .await
        .unwrap();
    assert_eq!(plan.status, PlanStatus::Completed);

    // Completed is terminal.
    let result = state.plans.transition(plan_id, PlanStatus::Active).await;
    assert_matches!(result, Err(EngineError::InvalidArgument(_)));
}

#[tokio::test]
async fn overdue_active_plans_are_expired_by_the_sweep() {
    let store = Arc::new(MemoryStore::new());
    let dietitian_id = Uuid::new_v4();
    let client_id = seed_client(&store, dietitian_id).await;
    let today = date();

    let overdue_id = seed_plan(
        &store,
        dietitian_id,
        client_id,
        today - Duration::days(14),
        today - Duration::days(7),
        PlanStatus::Active,
    )
    .await;
    let running_id = seed_plan(
        &store,
        dietitian_id,
        client_id,
        today - Duration::days(3),
        today + Duration::days(4),
        PlanStatus::Active,
    )
    .await;

    let state = AppState::from_store(store.clone());
    let swept = state.plans.expire_overdue(today).await.unwrap();
    assert_eq!(swept, 1);

    let overdue = diet_coach::store::PlanStore::plan(&*store, overdue_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(overdue.status, PlanStatus::Expired);

    let running = diet_coach::store::PlanStore::plan(&*store, running_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(running.status, PlanStatus::Active);
}

#[tokio::test]
async fn client_metrics_require_the_owning_dietitian() {
    let store = Arc::new(MemoryStore::new());
    let dietitian_id = Uuid::new_v4();
    let client_id = Uuid::new_v4();
    store
        .insert_client(Client {
            id: client_id,
            name: "Metrics Client".to_string(),
            dietitian_id: Some(dietitian_id),
            premium: true,
            height_cm: Some(170.0),
            weight_kg: Some(65.0),
            birth_date: Some(Utc::now().date_naive() - Duration::days(30 * 365)),
            sex: Some(Sex::Female),
        })
        .await
        .unwrap();
    let state = AppState::from_store(store);

    let metrics = state
        .clients
        .metrics(dietitian_id, client_id)
        .await
        .unwrap();
    let bmi = metrics.bmi.unwrap();
    assert!((bmi - 65.0 / (1.7 * 1.7)).abs() < 1e-9);
    assert!(metrics.bmr.is_some());

    let result = state.clients.metrics(Uuid::new_v4(), client_id).await;
    assert_matches!(result, Err(EngineError::Unauthorized(_)));

    let result = state.clients.metrics(dietitian_id, Uuid::new_v4()).await;
    assert_matches!(result, Err(EngineError::NotFound(_)));
}
