// API routes and handlers

pub mod alternatives;
pub mod clients;
pub mod compliance;
pub mod health;
pub mod plans;
pub mod routes;

pub use routes::{create_routes, AppState};
