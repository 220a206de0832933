pub mod auth;
pub mod estimate;
