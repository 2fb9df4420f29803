// Domain records for plans, compliance marks, scoring and recipes

pub mod client;
pub mod compliance;
pub mod plan;
pub mod recipe;
pub mod score_config;

pub use client::*;
pub use compliance::*;
pub use plan::*;
pub use recipe::*;
pub use score_config::*;
