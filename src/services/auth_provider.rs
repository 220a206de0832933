//! Identity-provider capability.
//!
//! The rest of the application only ever sees the `IdentityProvider` trait;
//! the production implementation speaks a GoTrue-style REST API (password
//! grant, signup with profile metadata, sign-out) over reqwest and decodes
//! the provider's dynamic response shapes into explicit `Result<Session>`
//! values. Session-change pushes go out on a watch channel with a
//! monotonically increasing sequence number.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::watch;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::errors::ProviderError;
use crate::models::auth::{Session, SessionChange, TokenResponse};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Session held by the provider right now, if any. Queried once by the
    /// session mirror at startup.
    async fn current_session(&self) -> Result<Option<Session>, ProviderError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ProviderError>;

    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Session-change notifications. The channel keeps only the newest
    /// change, so slow consumers observe last-write-wins ordering.
    fn changes(&self) -> watch::Receiver<SessionChange>;
}

// ─── Production HTTP implementation ─────────────────────────────────────────

pub struct HttpAuthProvider {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    /// Latest session issued through this provider instance.
    session: RwLock<Option<Session>>,
    seq: AtomicU64,
    tx: watch::Sender<SessionChange>,
}

impl HttpAuthProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        let (tx, _rx) = watch::channel(SessionChange::initial());
        HttpAuthProvider {
            http: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            session: RwLock::new(None),
            seq: AtomicU64::new(0),
            tx,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Record the new session and notify subscribers in issue order.
    fn push(&self, session: Option<Session>) {
        if let Ok(mut guard) = self.session.write() {
            *guard = session.clone();
        }
        let seq = self.seq.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(seq, authenticated = session.is_some(), "session change");
        // send_replace keeps updating even while nobody is subscribed yet
        self.tx.send_replace(SessionChange { seq, session });
    }

    async fn decode_session(&self, response: reqwest::Response) -> Result<Session, ProviderError> {
        let status = response.status();
        if status.is_success() {
            let token: TokenResponse = response.json().await?;
            let session = token.into_session();
            self.push(Some(session.clone()));
            return Ok(session);
        }
        let message = response.text().await.unwrap_or_default();
        match status {
            StatusCode::BAD_REQUEST
            | StatusCode::UNAUTHORIZED
            | StatusCode::UNPROCESSABLE_ENTITY => Err(ProviderError::InvalidCredentials),
            _ => Err(ProviderError::Unexpected {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpAuthProvider {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        // The service holds no token at startup; the session lives here
        // once sign-in/sign-up succeeds.
        Ok(self.session.read().ok().and_then(|s| s.clone()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ProviderError> {
        let response = self
            .http
            .post(self.endpoint("token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        self.decode_session(response).await
    }

    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError> {
        let response = self
            .http
            .post(self.endpoint("signup"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": { "name": name },
            }))
            .send()
            .await?;
        self.decode_session(response).await
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let token = self
            .session
            .read()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.access_token.clone()));

        if let Some(token) = token {
            let response = self
                .http
                .post(self.endpoint("logout"))
                .header("apikey", &self.anon_key)
                .bearer_auth(token)
                .send()
                .await?;
            let status = response.status();
            // 401 here means the token already expired server-side; the
            // local session is cleared either way.
            if !status.is_success() && status != StatusCode::UNAUTHORIZED {
                return Err(ProviderError::Unexpected {
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
            }
        }
        self.push(None);
        Ok(())
    }

    fn changes(&self) -> watch::Receiver<SessionChange> {
        self.tx.subscribe()
    }
}

// ─── Degraded no-op implementation ───────────────────────────────────────────

/// Stands in when the provider URL or public key is missing from the
/// configuration: the service stays up, the session is permanently
/// anonymous, and every auth operation reports "not configured".
pub struct UnconfiguredProvider {
    tx: watch::Sender<SessionChange>,
}

impl UnconfiguredProvider {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionChange::initial());
        UnconfiguredProvider { tx }
    }
}

impl Default for UnconfiguredProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for UnconfiguredProvider {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        Ok(None)
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, ProviderError> {
        Err(ProviderError::NotConfigured)
    }

    async fn sign_up(
        &self,
        _name: &str,
        _email: &str,
        _password: &str,
    ) -> Result<Session, ProviderError> {
        Err(ProviderError::NotConfigured)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        Err(ProviderError::NotConfigured)
    }

    fn changes(&self) -> watch::Receiver<SessionChange> {
        self.tx.subscribe()
    }
}
