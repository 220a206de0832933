use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Rejected user input. Recovered locally: surfaced as a 422 with an
/// inline message, never reaches the calculation engines.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("location must not be empty")]
    EmptyLocation,
    #[error("monthly usage must be greater than zero (got {0})")]
    NonPositiveUsage(f64),
    #[error("budget must be greater than zero (got {0})")]
    NonPositiveBudget(f64),
    #[error("ZIP code must be at least 5 characters")]
    InvalidZipCode,
}

/// Failures from the external identity provider. Transient from the
/// caller's point of view: session state is never corrupted by one.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("identity provider is not configured")]
    NotConfigured,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("identity provider unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected provider response ({status}): {message}")]
    Unexpected { status: u16, message: String },
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
    }
}

impl IntoResponse for ProviderError {
    fn into_response(self) -> Response {
        let status = match self {
            ProviderError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ProviderError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ProviderError::Network(_) | ProviderError::Unexpected { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
