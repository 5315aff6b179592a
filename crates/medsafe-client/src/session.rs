//! Session context shared by every clone of a client.
//!
//! Owns the credential store handle, the observable [`SessionState`], the
//! event channel and the refresh gate. Storage is the source of truth for
//! tokens; nothing here caches them.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use medsafe_core::error::Error;
use medsafe_core::models::{AuthResponse, LoginOutput, Profile, RefreshResponse};
use medsafe_core::{
    AccessToken, Credential, CredentialStore, RefreshToken, Result, SessionEvent, SessionState,
    StoreKey,
};

const EVENT_CAPACITY: usize = 16;

pub(crate) struct SessionContext {
    store: Arc<dyn CredentialStore>,
    /// `None` until first read from the store.
    state: Mutex<Option<SessionState>>,
    /// Held for the whole of a refresh, login or logout.
    gate: Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionContext {
    pub(crate) fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            state: Mutex::new(None),
            gate: Mutex::new(()),
            events,
        }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Serialize refreshes, logins and logouts.
    pub(crate) async fn lock_gate(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }

    fn emit(&self, event: SessionEvent) {
        debug!(?event, receivers = self.events.receiver_count(), "Session event");
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    async fn resolve(&self, slot: &mut Option<SessionState>) -> SessionState {
        if let Some(state) = *slot {
            return state;
        }
        let state = match self.access_token().await {
            Ok(Some(_)) => SessionState::Authenticated,
            Ok(None) => SessionState::Unauthenticated,
            Err(err) => {
                warn!(error = %err, "Could not read credential store");
                SessionState::Unauthenticated
            }
        };
        *slot = Some(state);
        state
    }

    pub(crate) async fn state(&self) -> SessionState {
        let mut slot = self.state.lock().await;
        self.resolve(&mut slot).await
    }

    async fn set_state(&self, state: SessionState) {
        *self.state.lock().await = Some(state);
    }

    pub(crate) async fn access_token(&self) -> Result<Option<AccessToken>> {
        Ok(self
            .store
            .get(StoreKey::AccessToken)
            .await?
            .filter(|t| !t.is_empty())
            .map(AccessToken::new))
    }

    pub(crate) async fn refresh_token(&self) -> Result<Option<RefreshToken>> {
        Ok(self
            .store
            .get(StoreKey::RefreshToken)
            .await?
            .filter(|t| !t.is_empty())
            .map(RefreshToken::new))
    }

    pub(crate) async fn credential(&self) -> Result<Option<Credential>> {
        let Some(access_token) = self.access_token().await? else {
            return Ok(None);
        };
        let refresh_token = self.refresh_token().await?;
        Ok(Some(Credential::new(access_token, refresh_token)))
    }

    /// The profile stored at login, if any. An unreadable entry counts as absent.
    pub(crate) async fn profile(&self) -> Result<Option<Profile>> {
        let Some(raw) = self.store.get(StoreKey::User).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(err) => {
                warn!(error = %err, "Ignoring unreadable stored profile");
                Ok(None)
            }
        }
    }

    pub(crate) async fn remember_profile(&self, profile: &Profile) -> Result<()> {
        let json = serde_json::to_string(profile).map_err(|e| Error::Decode {
            message: e.to_string(),
        })?;
        self.store.set(StoreKey::User, &json).await
    }

    /// Persist a login or signup response and announce the new session.
    ///
    /// Both tokens are stored or neither is: a failed write clears the store
    /// before the error is returned. Caller must hold the gate.
    pub(crate) async fn establish(&self, response: AuthResponse) -> Result<LoginOutput> {
        if response.access_token.trim().is_empty() {
            return Err(Error::Decode {
                message: "login response carried an empty access token".to_string(),
            });
        }

        let credential = Credential::new(
            AccessToken::new(response.access_token),
            response
                .refresh_token
                .filter(|t| !t.is_empty())
                .map(RefreshToken::new),
        );

        if let Err(err) = self.persist(&credential, response.user.as_ref()).await {
            warn!(error = %err, "Failed to persist credential, rolling back");
            if let Err(cleanup) = self.store.clear().await {
                warn!(error = %cleanup, "Rollback of partial credential failed");
            }
            self.set_state(SessionState::Unauthenticated).await;
            return Err(err);
        }

        self.set_state(SessionState::Authenticated).await;
        info!(
            has_refresh_token = credential.refresh_token.is_some(),
            "Session established"
        );
        self.emit(SessionEvent::LoggedIn);

        Ok(LoginOutput {
            credential,
            profile: response.user,
        })
    }

    async fn persist(&self, credential: &Credential, profile: Option<&Profile>) -> Result<()> {
        self.store
            .set(StoreKey::AccessToken, credential.access_token.as_str())
            .await?;
        match &credential.refresh_token {
            Some(token) => self.store.set(StoreKey::RefreshToken, token.as_str()).await?,
            None => self.store.delete(StoreKey::RefreshToken).await?,
        }
        match profile {
            Some(profile) => self.remember_profile(profile).await?,
            None => self.store.delete(StoreKey::User).await?,
        }
        Ok(())
    }

    /// Mark a refresh as in flight. Caller must hold the gate.
    pub(crate) async fn begin_refresh(&self) {
        self.set_state(SessionState::Refreshing).await;
    }

    /// Store a refreshed pair. A missing refresh token in the response keeps
    /// the current one. Caller must hold the gate.
    pub(crate) async fn complete_refresh(&self, response: RefreshResponse) -> Result<AccessToken> {
        if response.access_token.trim().is_empty() {
            return Err(Error::Decode {
                message: "refresh response carried an empty access token".to_string(),
            });
        }

        let access_token = AccessToken::new(response.access_token);
        self.store
            .set(StoreKey::AccessToken, access_token.as_str())
            .await?;
        if let Some(refresh_token) = response.refresh_token.filter(|t| !t.is_empty()) {
            self.store
                .set(StoreKey::RefreshToken, &refresh_token)
                .await?;
        }

        self.set_state(SessionState::Authenticated).await;
        debug!("Access token refreshed");
        self.emit(SessionEvent::Refreshed);
        Ok(access_token)
    }

    /// End the session without the user asking.
    ///
    /// Clears the store and announces [`SessionEvent::Expired`], unless the
    /// session was already unauthenticated. Storage failures are logged
    /// rather than returned so the caller's own error is what surfaces.
    pub(crate) async fn expire(&self) {
        let mut slot = self.state.lock().await;
        let previous = self.resolve(&mut slot).await;

        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "Failed to clear credential store");
        }
        *slot = Some(SessionState::Unauthenticated);
        drop(slot);

        if previous != SessionState::Unauthenticated {
            info!("Session expired");
            self.emit(SessionEvent::Expired);
        }
    }

    /// End the session at the user's request. Caller must hold the gate.
    pub(crate) async fn end(&self) -> Result<()> {
        let mut slot = self.state.lock().await;
        let previous = self.resolve(&mut slot).await;

        let cleared = self.store.clear().await;
        *slot = Some(SessionState::Unauthenticated);
        drop(slot);
        cleared?;

        if previous != SessionState::Unauthenticated {
            info!("Logged out");
            self.emit(SessionEvent::LoggedOut);
        }
        Ok(())
    }
}
