mod api_docs;
mod config;
mod controllers;
mod errors;
mod models;
mod routes;
mod services;
mod session_mirror;
mod shared_state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{response::Html, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::routes::api_routes::api_routes;
use crate::services::auth_provider::{HttpAuthProvider, IdentityProvider, UnconfiguredProvider};
use crate::session_mirror::SessionMirror;
use crate::shared_state::SharedState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // 1. Load configuration
    let config = match Config::load("config.json") {
        Ok(c) => c,
        Err(e) => {
            error!("failed to load config.json: {e}");
            return;
        }
    };

    // 2. Wire the identity provider and session mirror.
    // Missing provider settings degrade to a visible "not configured"
    // state instead of refusing to start.
    let provider: Arc<dyn IdentityProvider> = match &config.provider {
        Some(p) if config.provider_configured() => {
            info!("identity provider: {}", p.url);
            Arc::new(HttpAuthProvider::new(p))
        }
        _ => {
            warn!("identity provider not configured, auth endpoints will answer 503");
            Arc::new(UnconfiguredProvider::new())
        }
    };
    let mirror = Arc::new(SessionMirror::start(provider).await);

    // 3. Shared application state
    let state = SharedState::new(config.clone(), mirror);

    // 4. HTTP server
    let app = Router::new()
        .nest("/api", api_routes(state))
        .route(
            "/scalar",
            get(|| async { Html(Scalar::new(ApiDoc::openapi()).to_html()) }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("API server listening on http://{addr}");
    info!("Scalar UI: http://{addr}/scalar");

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
