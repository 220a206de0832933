use axum::{
    routing::{get, post},
    Router,
};

use crate::controllers::auth_controller::{get_session, login, logout, signup};
use crate::controllers::calculator_controller::{
    get_comparison, get_latest_estimate, post_estimate, post_quick_estimate,
};
use crate::controllers::system_controller::get_health;
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router. Handlers extract `SharedState` or one of
/// its `FromRef` projections — a single `.with_state(shared)` covers all.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/calculator/estimate", post(post_estimate))
        .route("/calculator/estimate/latest", get(get_latest_estimate))
        .route("/calculator/comparison", get(get_comparison))
        .route("/calculator/quick-estimate", post(post_quick_estimate))
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(get_session))
        .route("/system/health", get(get_health))
        .with_state(shared)
}
