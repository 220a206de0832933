use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::errors::ProviderError;
use crate::models::auth::{LoginRequest, Session, SessionResponse, SignupRequest};
use crate::shared_state::SharedState;

/// POST /api/auth/login
///
/// Delegate a password sign-in to the identity provider. On success the
/// session mirror picks up the provider push; failure leaves session state
/// untouched.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = Session),
        (status = 401, description = "Invalid credentials"),
        (status = 502, description = "Provider unreachable"),
        (status = 503, description = "Provider not configured")
    )
)]
pub async fn login(
    State(state): State<SharedState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Session>, ProviderError> {
    let session = state.mirror.login(&request.email, &request.password).await?;
    Ok(Json(session))
}

/// POST /api/auth/signup
///
/// Register a new account with the name attached as profile metadata.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created and signed in", body = Session),
        (status = 401, description = "Rejected by provider"),
        (status = 502, description = "Provider unreachable"),
        (status = 503, description = "Provider not configured")
    )
)]
pub async fn signup(
    State(state): State<SharedState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<Session>, ProviderError> {
    let session = state
        .mirror
        .signup(&request.name, &request.email, &request.password)
        .await?;
    Ok(Json(session))
}

/// POST /api/auth/logout
///
/// Sign out. The mirror transitions to anonymous before this returns.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Signed out"),
        (status = 502, description = "Provider unreachable"),
        (status = 503, description = "Provider not configured")
    )
)]
pub async fn logout(State(state): State<SharedState>) -> Result<StatusCode, ProviderError> {
    state.mirror.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/session
///
/// Current mirrored session: user (if any) plus derived flags.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session state", body = SessionResponse)
    )
)]
pub async fn get_session(State(state): State<SharedState>) -> Json<SessionResponse> {
    Json(SessionResponse::from(&state.mirror.state()))
}
