//! Observable reflection of the identity provider's session.
//!
//! One mirror instance per application runtime, injected through shared
//! state rather than held as a hidden global. The mirror starts in
//! `Loading`, resolves to `Authenticated`/`Anonymous` from an initial
//! provider query, and afterwards follows provider pushes through a single
//! forwarder task. Pushes carry sequence numbers; anything not newer than
//! the last applied change is discarded, so a superseded event can never
//! resurrect stale state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::errors::ProviderError;
use crate::models::auth::{Session, SessionChange, SessionState};
use crate::services::auth_provider::IdentityProvider;

pub struct SessionMirror {
    provider: Arc<dyn IdentityProvider>,
    state_tx: watch::Sender<SessionState>,
    /// Sequence number of the newest applied provider change.
    last_seq: Arc<AtomicU64>,
    forwarder: JoinHandle<()>,
}

impl SessionMirror {
    /// Query the provider once, then attach the single change
    /// subscription for this mirror's lifetime.
    pub async fn start(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Loading);
        let last_seq = Arc::new(AtomicU64::new(0));

        let initial = match provider.current_session().await {
            Ok(Some(session)) => SessionState::Authenticated(session.user),
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                warn!("initial session query failed: {e}");
                SessionState::Anonymous
            }
        };
        state_tx.send_replace(initial);

        let forwarder = tokio::spawn(forward_changes(
            provider.changes(),
            state_tx.clone(),
            Arc::clone(&last_seq),
        ));

        SessionMirror {
            provider,
            state_tx,
            last_seq,
            forwarder,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state_tx.borrow().is_authenticated()
    }

    /// Observe mirror state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Delegate sign-in to the provider. State is updated by the provider's
    /// own push; the call reports success or failure to the caller and a
    /// failure leaves the session untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ProviderError> {
        self.provider.sign_in(email, password).await
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError> {
        self.provider.sign_up(name, email, password).await
    }

    /// Sign out and move to `Anonymous` immediately rather than waiting for
    /// the async push, so the UI never shows a stale authenticated flash.
    /// The sequence floor advances past everything the provider has issued
    /// so far; an in-flight older push can no longer win.
    pub async fn logout(&self) -> Result<(), ProviderError> {
        self.provider.sign_out().await?;
        let issued = self.provider.changes().borrow().seq;
        self.last_seq.fetch_max(issued, Ordering::AcqRel);
        self.state_tx.send_replace(SessionState::Anonymous);
        info!("session ended");
        Ok(())
    }
}

impl Drop for SessionMirror {
    // Tearing down the mirror must release the provider subscription,
    // otherwise the forwarder task leaks.
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}

/// Apply provider pushes in delivery order. The watch channel collapses
/// rapid successive events to the newest one, which matches the
/// last-write-wins contract.
async fn forward_changes(
    mut rx: watch::Receiver<SessionChange>,
    state_tx: watch::Sender<SessionState>,
    last_seq: Arc<AtomicU64>,
) {
    while rx.changed().await.is_ok() {
        let change = rx.borrow_and_update().clone();
        let prev = last_seq.fetch_max(change.seq, Ordering::AcqRel);
        if prev >= change.seq {
            // Superseded (e.g. delivered after a logout advanced the floor).
            continue;
        }
        let next = match change.session {
            Some(session) => SessionState::Authenticated(session.user),
            None => SessionState::Anonymous,
        };
        state_tx.send_replace(next);
    }
}
