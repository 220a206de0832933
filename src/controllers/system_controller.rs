use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::shared_state::SharedState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// False when the provider URL or public key is missing — auth
    /// endpoints answer 503 in that state.
    pub provider_configured: bool,
    pub currency_symbol: String,
}

/// GET /api/system/health
///
/// Service liveness plus the degraded-configuration flag.
#[utoipa::path(
    get,
    path = "/api/system/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
pub async fn get_health(State(state): State<SharedState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        provider_configured: state.config.provider_configured(),
        currency_symbol: state.config.currency_symbol.clone(),
    })
}
