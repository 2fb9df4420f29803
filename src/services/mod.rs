// Business logic services

pub mod alternative_meal_service;
pub mod client_service;
pub mod compliance_calculator;
pub mod compliance_service;
pub mod plan_service;
pub mod score_config_service;
pub mod streak_service;

pub use alternative_meal_service::AlternativeMealService;
pub use client_service::ClientService;
pub use compliance_calculator::ComplianceCalculator;
pub use compliance_service::ComplianceService;
pub use plan_service::PlanService;
pub use score_config_service::ScoreConfigService;
pub use streak_service::StreakService;
