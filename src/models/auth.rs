use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ─── Identity records ────────────────────────────────────────────────────────

/// Opaque identity record mirrored from the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

/// An authenticated provider session: the access token plus the user it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

// ─── Session mirror state ────────────────────────────────────────────────────

/// Current reflection of the provider's session.
/// `Loading` only occurs during the initial query at startup; provider
/// pushes afterwards move between `Authenticated` and `Anonymous` directly.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Loading,
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Loading | SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

/// One provider-pushed session change. `seq` increases monotonically per
/// provider so consumers can discard superseded events.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionChange {
    pub seq: u64,
    pub session: Option<Session>,
}

impl SessionChange {
    pub fn initial() -> Self {
        SessionChange { seq: 0, session: None }
    }
}

// ─── REST API request/response types ────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl From<&SessionState> for SessionResponse {
    fn from(state: &SessionState) -> Self {
        SessionResponse {
            user: state.user().cloned(),
            is_authenticated: state.is_authenticated(),
            is_loading: state.is_loading(),
        }
    }
}

// ─── Provider wire types (GoTrue-style) ──────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user: ProviderUser,
}

#[derive(Debug, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub user_metadata: Option<serde_json::Value>,
}

impl TokenResponse {
    /// Decode the provider's dynamic response shape into an explicit session.
    pub fn into_session(self) -> Session {
        let name = self
            .user
            .user_metadata
            .as_ref()
            .and_then(|m| m.get("name"))
            .and_then(|n| n.as_str())
            .map(str::to_string);
        Session {
            access_token: self.access_token,
            user: User {
                id: self.user.id,
                email: self.user.email,
                name,
            },
        }
    }
}
