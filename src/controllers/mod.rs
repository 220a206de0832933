pub mod auth_controller;
pub mod calculator_controller;
pub mod system_controller;
