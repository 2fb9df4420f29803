use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::{
    AlternativeMealService, ClientService, ComplianceCalculator, ComplianceService, PlanService,
    ScoreConfigService, StreakService,
};
use crate::store::{ClientStore, ComplianceStore, PlanStore, RecipeStore, ScoreConfigStore};

use super::alternatives::decide_alternative;
use super::clients::{client_metrics, client_streak};
use super::compliance::{daily_compliance, mark_compliance};
use super::health::health_check;
use super::plans::transition_plan;

#[derive(Clone)]
pub struct AppState {
    pub compliance: ComplianceService,
    pub calculator: ComplianceCalculator,
    pub streaks: StreakService,
    pub alternatives: AlternativeMealService,
    pub clients: ClientService,
    pub plans: PlanService,
}

impl AppState {
    /// Wire every service against one concrete store.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: PlanStore + ComplianceStore + ScoreConfigStore + RecipeStore + ClientStore + 'static,
    {
        let plan_store: Arc<dyn PlanStore> = store.clone();
        let mark_store: Arc<dyn ComplianceStore> = store.clone();
        let config_store: Arc<dyn ScoreConfigStore> = store.clone();
        let recipe_store: Arc<dyn RecipeStore> = store.clone();
        let client_store: Arc<dyn ClientStore> = store;

        let configs = ScoreConfigService::new(config_store);
        let calculator =
            ComplianceCalculator::new(plan_store.clone(), mark_store.clone(), configs);

        Self {
            compliance: ComplianceService::new(plan_store.clone(), mark_store),
            streaks: StreakService::new(plan_store.clone(), calculator.clone()),
            calculator,
            alternatives: AlternativeMealService::new(recipe_store),
            clients: ClientService::new(client_store),
            plans: PlanService::new(plan_store),
        }
    }
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/compliance/mark", post(mark_compliance))
        .route("/compliance/daily", get(daily_compliance))
        .route("/clients/:id/streak", get(client_streak))
        .route("/clients/:id/metrics", get(client_metrics))
        .route("/alternatives/decide", post(decide_alternative))
        .route("/plans/:id/status", post(transition_plan))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
