use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

use crate::errors::ValidationError;
use crate::models::estimate::{
    ComparisonResult, EstimateInput, EstimateResult, QuickEstimate, QuickEstimateRequest,
};
use crate::services::{comparison_engine, estimate_engine};
use crate::shared_state::SharedState;

/// POST /api/calculator/estimate
///
/// Run the investment calculator for one form submission. Validates the
/// input, computes the projection bundle, and publishes it to the shared
/// result panel. When a simulated network delay is configured, a request
/// superseded by a resubmission during the delay is abandoned: it never
/// overwrites the newer result.
#[utoipa::path(
    post,
    path = "/api/calculator/estimate",
    request_body = EstimateInput,
    responses(
        (status = 200, description = "Computed projection bundle", body = EstimateResult),
        (status = 422, description = "Invalid input (empty location, non-positive usage or budget)")
    )
)]
pub async fn post_estimate(
    State(state): State<SharedState>,
    Json(input): Json<EstimateInput>,
) -> Result<Json<EstimateResult>, ValidationError> {
    input.validate()?;

    let ticket = state.panel.take_ticket();
    let result = estimate_engine::compute_estimate(&input, &mut rand::thread_rng());

    let delay_ms = state.config.calculator.simulated_delay_ms;
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    if !state.panel.publish(ticket, result.clone()) {
        debug!(ticket, "estimate superseded before publishing");
    }
    Ok(Json(result))
}

/// GET /api/calculator/estimate/latest
///
/// Most recently published estimate, for dashboard re-reads.
#[utoipa::path(
    get,
    path = "/api/calculator/estimate/latest",
    responses(
        (status = 200, description = "Latest published estimate", body = EstimateResult),
        (status = 404, description = "No estimate computed yet")
    )
)]
pub async fn get_latest_estimate(State(state): State<SharedState>) -> impl IntoResponse {
    match state.panel.latest() {
        Some(result) => (StatusCode::OK, Json(result)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "no estimate computed yet" })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ComparisonQuery {
    /// Shared budget applied to every system type
    pub budget: f64,
}

/// GET /api/calculator/comparison
///
/// Side-by-side metrics for all four system types at one budget.
#[utoipa::path(
    get,
    path = "/api/calculator/comparison",
    params(ComparisonQuery),
    responses(
        (status = 200, description = "Comparison table", body = ComparisonResult),
        (status = 422, description = "Non-positive budget")
    )
)]
pub async fn get_comparison(
    Query(query): Query<ComparisonQuery>,
) -> Result<Json<ComparisonResult>, ValidationError> {
    let result = comparison_engine::compute_comparison(query.budget)?;
    Ok(Json(result))
}

/// POST /api/calculator/quick-estimate
///
/// ZIP-code teaser estimate for the landing page.
#[utoipa::path(
    post,
    path = "/api/calculator/quick-estimate",
    request_body = QuickEstimateRequest,
    responses(
        (status = 200, description = "Illustrative quick estimate", body = QuickEstimate),
        (status = 422, description = "Invalid ZIP code")
    )
)]
pub async fn post_quick_estimate(
    Json(request): Json<QuickEstimateRequest>,
) -> Result<Json<QuickEstimate>, ValidationError> {
    request.validate()?;
    Ok(Json(estimate_engine::quick_estimate(&mut rand::thread_rng())))
}
