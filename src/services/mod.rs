pub mod auth_provider;
pub mod comparison_engine;
pub mod estimate_engine;
