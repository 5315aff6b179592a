//! The authenticated API client.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use medsafe_core::error::{AuthError, Error};
use medsafe_core::models::{AuthResponse, LoginOutput, Profile, RefreshRequest, RefreshResponse};
use medsafe_core::{
    AccessToken, Credential, CredentialStore, HttpResponse, LoginCredentials, MultipartForm,
    OutgoingRequest, RefreshToken, Result, SessionEvent, SessionState, SignupData, Transport,
};

use crate::config::ClientConfig;
use crate::http::endpoints;
use crate::http::HttpTransport;
use crate::session::SessionContext;

/// Client for the medsafe backend.
///
/// Every request goes out with the stored access token as a bearer
/// credential. A 401 triggers one token refresh and one retry of the
/// original request; concurrent 401s share a single refresh. When the
/// session cannot be recovered the store is cleared and subscribers receive
/// [`SessionEvent::Expired`].
///
/// Cloning is cheap; clones share the session.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use medsafe_client::{ApiClient, ClientConfig};
/// use medsafe_core::LoginCredentials;
/// use medsafe_store::MemoryStore;
///
/// # async fn example() -> medsafe_core::Result<()> {
/// let client = ApiClient::from_config(&ClientConfig::from_env()?, Arc::new(MemoryStore::new()));
/// client.login(&LoginCredentials::new("alice", "hunter2")).await?;
/// let allergies = client.list_allergies().await?;
/// # Ok(())
/// # }
/// ```
pub struct ApiClient<T = HttpTransport> {
    inner: Arc<ClientInner<T>>,
}

struct ClientInner<T> {
    transport: T,
    session: SessionContext,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

impl ApiClient<HttpTransport> {
    /// Create a client speaking HTTP to the configured backend.
    pub fn from_config(config: &ClientConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self::new(HttpTransport::from_config(config), store)
    }
}

impl<T: Transport> ApiClient<T> {
    /// Create a client over any transport.
    pub fn new(transport: T, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                session: SessionContext::new(store),
            }),
        }
    }

    fn session(&self) -> &SessionContext {
        &self.inner.session
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Receive session transitions. Events sent before subscribing are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session().subscribe()
    }

    pub async fn state(&self) -> SessionState {
        self.session().state().await
    }

    /// True when an access token is stored (including mid-refresh).
    pub async fn is_authenticated(&self) -> bool {
        self.state().await.is_authenticated()
    }

    /// The stored credential, if any.
    pub async fn credential(&self) -> Result<Option<Credential>> {
        self.session().credential().await
    }

    /// The profile stored at login, without a network call.
    pub async fn stored_profile(&self) -> Result<Option<Profile>> {
        self.session().profile().await
    }

    // ------------------------------------------------------------------------
    // Request pipeline
    // ------------------------------------------------------------------------

    /// Send a request, attaching the bearer token and recovering from a 401.
    ///
    /// Returns the response for any 2xx status. Other statuses become
    /// [`Error::Api`]; a 403 is returned untouched and never triggers a refresh.
    #[instrument(
        skip_all,
        fields(method = %request.method(), path = request.path(), request_id = %Uuid::new_v4())
    )]
    pub async fn execute(&self, mut request: OutgoingRequest) -> Result<HttpResponse> {
        let sent_with = self.session().access_token().await?;
        if let Some(token) = &sent_with {
            request.set_bearer(token);
        }

        let response = self.transport().send(&request).await?;
        if !response.is_unauthorized() {
            return response.error_for_status();
        }
        if request.is_retried() {
            return self.reject(response).await;
        }

        debug!("Received 401, attempting recovery");
        let original = response.to_api_error();
        let Some(token) = self.recover(sent_with.as_ref()).await? else {
            return Err(Error::Api(original));
        };

        request.mark_retried();
        request.set_bearer(&token);
        debug!("Retrying with refreshed token");

        let retry = self.transport().send(&request).await?;
        if retry.is_unauthorized() {
            return self.reject(retry).await;
        }
        retry.error_for_status()
    }

    /// A 401 on a request that was already retried ends the session.
    async fn reject(&self, response: HttpResponse) -> Result<HttpResponse> {
        warn!("Request rejected after token refresh, ending session");
        self.session().expire().await;
        response.error_for_status()
    }

    /// Find a usable access token after a 401 sent with `stale`.
    ///
    /// Returns `Ok(None)` when no refresh token exists; the session has then
    /// been ended and the caller should surface the original 401.
    async fn recover(&self, stale: Option<&AccessToken>) -> Result<Option<AccessToken>> {
        let _gate = self.session().lock_gate().await;

        // Another request refreshed while this one waited for the gate.
        if let Some(current) = self.session().access_token().await?
            && Some(&current) != stale
        {
            debug!("Token already refreshed by a concurrent request");
            return Ok(Some(current));
        }

        let Some(refresh_token) = self.session().refresh_token().await? else {
            info!("No refresh token stored, ending session");
            self.session().expire().await;
            return Ok(None);
        };

        self.refresh_locked(&refresh_token).await.map(Some)
    }

    /// Exchange the refresh token and store the new pair. Caller holds the gate.
    ///
    /// Any failure ends the session and is returned as-is.
    async fn refresh_locked(&self, refresh_token: &RefreshToken) -> Result<AccessToken> {
        self.session().begin_refresh().await;

        let outcome = match self.exchange(refresh_token).await {
            Ok(response) => self.session().complete_refresh(response).await,
            Err(err) => Err(err),
        };

        if let Err(err) = &outcome {
            warn!(error = %err, "Token refresh failed, ending session");
            self.session().expire().await;
        }
        outcome
    }

    /// `POST /auth/refresh`, sent directly so it never re-enters the 401 path.
    async fn exchange(&self, refresh_token: &RefreshToken) -> Result<RefreshResponse> {
        let request = OutgoingRequest::post(endpoints::AUTH_REFRESH).json(&RefreshRequest {
            refresh_token: refresh_token.as_str(),
        })?;
        self.transport()
            .send(&request)
            .await?
            .error_for_status()?
            .json()
    }

    /// Send a request and decode the JSON response.
    pub async fn request<R: DeserializeOwned>(&self, request: OutgoingRequest) -> Result<R> {
        self.execute(request).await?.json()
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.request(OutgoingRequest::get(path)).await
    }

    pub async fn get_with_query<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<R> {
        let request = query
            .iter()
            .fold(OutgoingRequest::get(path), |request, (key, value)| {
                request.query(*key, value)
            });
        self.request(request).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(OutgoingRequest::post(path).json(body)?).await
    }

    /// `POST` without a body.
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.request(OutgoingRequest::post(path)).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(OutgoingRequest::put(path).json(body)?).await
    }

    /// `DELETE`, ignoring any response body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(OutgoingRequest::delete(path)).await.map(|_| ())
    }

    /// Multipart upload. The form is resent unchanged if a retry is needed.
    pub async fn upload<R: DeserializeOwned>(&self, path: &str, form: MultipartForm) -> Result<R> {
        self.request(OutgoingRequest::post(path).multipart(form)).await
    }

    // ------------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------------

    /// Log in and store the returned credential.
    #[instrument(skip_all, fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutput> {
        info!("Logging in");
        let request = OutgoingRequest::post(endpoints::AUTH_LOGIN).json(credentials)?;
        self.authenticate(request).await
    }

    /// Register a new account and store the returned credential.
    #[instrument(skip_all, fields(username = %data.username))]
    pub async fn signup(&self, data: &SignupData) -> Result<LoginOutput> {
        info!("Signing up");
        let request = OutgoingRequest::post(endpoints::AUTH_SIGNUP).json(data)?;
        self.authenticate(request).await
    }

    /// Login and signup are sent without a bearer token and bypass refresh.
    async fn authenticate(&self, request: OutgoingRequest) -> Result<LoginOutput> {
        let response: AuthResponse = self
            .transport()
            .send(&request)
            .await?
            .error_for_status()?
            .json()?;

        let _gate = self.session().lock_gate().await;
        self.session().establish(response).await
    }

    /// Log out.
    ///
    /// The backend is told first, best-effort; its failure is logged and
    /// ignored. Local credentials are always cleared afterwards. Calling this
    /// while logged out is harmless.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let _gate = self.session().lock_gate().await;

        let token = self.session().access_token().await.unwrap_or_else(|err| {
            warn!(error = %err, "Could not read access token for logout");
            None
        });

        let mut request = OutgoingRequest::post(endpoints::AUTH_LOGOUT);
        if let Some(token) = &token {
            request.set_bearer(token);
        }
        match self
            .transport()
            .send(&request)
            .await
            .and_then(HttpResponse::error_for_status)
        {
            Ok(_) => debug!("Backend session invalidated"),
            Err(err) => warn!(error = %err, "Logout notification failed, clearing locally"),
        }

        self.session().end().await
    }

    /// Refresh the access token now, without waiting for a 401.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<AccessToken> {
        let _gate = self.session().lock_gate().await;
        let refresh_token = self
            .session()
            .refresh_token()
            .await?
            .ok_or(AuthError::RefreshTokenMissing)?;
        info!("Refreshing session");
        self.refresh_locked(&refresh_token).await
    }

    /// Fetch the current user's profile and update the stored copy.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<Profile> {
        if !self.is_authenticated().await {
            return Err(AuthError::NotLoggedIn.into());
        }
        let profile: Profile = self.get(endpoints::AUTH_ME).await?;
        if let Err(err) = self.session().remember_profile(&profile).await {
            warn!(error = %err, "Could not store refreshed profile");
        }
        Ok(profile)
    }
}
