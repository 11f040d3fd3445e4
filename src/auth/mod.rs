//! Session lifecycle: signup/login, restore across restarts, and
//! expiry-driven automatic logout

mod claims;
mod session;

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::Error;
use crate::fetch::Fetch;
use crate::token::TokenStore;

pub use claims::{decode_claims, Claims};
pub use session::{AuthUser, Session};

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Manages the single process-wide session.
///
/// Two observable states: anonymous (no usable token) and active (decodable,
/// unexpired token). A token past its expiry collapses to anonymous
/// immediately, either on inspection or through the auto-logout task.
pub struct SessionManager {
    /// The base URL for the Snaplist API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Per-request timeout
    timeout: Duration,

    /// Token slot shared with the other sub-clients
    token_store: Arc<TokenStore>,

    /// The current session
    session: Arc<RwLock<Option<Session>>>,

    /// Pending auto-logout task; at most one per session
    logout_timer: Mutex<Option<JoinHandle<()>>>,
}

impl SessionManager {
    /// Create a new session manager
    pub(crate) fn new(
        url: &str,
        client: Client,
        timeout: Duration,
        token_store: Arc<TokenStore>,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            timeout,
            token_store,
            session: Arc::new(RwLock::new(None)),
            logout_timer: Mutex::new(None),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth{}", self.url, path)
    }

    /// Log in with username and password.
    ///
    /// A non-2xx answer surfaces the server's error body verbatim. A 2xx
    /// answer whose token fails to decode surfaces `Error::Decode` and leaves
    /// the session anonymous; a malformed token must never produce a
    /// half-authenticated state.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthUser, Error> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("username and password are required"));
        }

        let payload = serde_json::json!({
            "username": username,
            "password": password,
        });

        let result = Fetch::post(&self.client, &self.auth_url("/login"))
            .timeout(self.timeout)
            .json(&payload)?
            .execute::<LoginResponse>()
            .await?;

        let user = self.set_credentials(&result.token)?;
        debug!("logged in as {}", user.username);
        Ok(user)
    }

    /// Register a new account. The server answers with an empty 2xx; the
    /// caller logs in separately afterwards.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), Error> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("username, email and password are required"));
        }

        let payload = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });

        Fetch::post(&self.client, &self.auth_url("/register"))
            .timeout(self.timeout)
            .json(&payload)?
            .execute_empty()
            .await
    }

    /// Install a session from a raw token: decode, persist, arm auto-logout.
    ///
    /// Decode failure (or an already-expired token) clears everything and
    /// returns the error; callers decide whether to surface it (login) or
    /// swallow it (restore).
    pub fn set_credentials(&self, token: &str) -> Result<AuthUser, Error> {
        let claims = match decode_claims(token) {
            Ok(claims) => claims,
            Err(err) => {
                self.clear();
                return Err(err);
            }
        };

        let session = Session::from_claims(token, claims);
        if session.is_expired() {
            self.clear();
            return Err(Error::decode("token is already expired"));
        }

        self.token_store.set(Some(token));
        let user = session.user.clone();
        let remaining = session.remaining();
        *self.session.write().unwrap() = Some(session);
        self.arm_logout_timer(remaining);

        Ok(user)
    }

    /// Restore a persisted session at process start. Never touches the
    /// network; a missing, undecodable or expired token leaves the session
    /// anonymous, purging the stale persisted copy.
    pub fn restore_session(&self) -> Option<AuthUser> {
        let token = match self.token_store.load_persisted() {
            Some(token) => token,
            None => {
                debug!("no persisted token, staying anonymous");
                return None;
            }
        };

        match self.set_credentials(&token) {
            Ok(user) => {
                debug!("session restored for {}", user.username);
                Some(user)
            }
            Err(err) => {
                // A corrupt or stale stored token fails silently to the
                // logged-out state; set_credentials already purged it.
                warn!("persisted token rejected: {}", err);
                None
            }
        }
    }

    /// Log out: cancel any pending auto-logout, clear the token slot and the
    /// session. Purely client-side; the API has no logout endpoint.
    pub fn logout(&self) {
        self.cancel_logout_timer();
        self.clear();
        debug!("logged out");
    }

    /// Whether an unexpired session is present
    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .unwrap()
            .as_ref()
            .map(|session| !session.is_expired())
            .unwrap_or(false)
    }

    /// The current user, if authenticated
    pub fn current_user(&self) -> Option<AuthUser> {
        let guard = self.session.read().unwrap();
        guard
            .as_ref()
            .filter(|session| !session.is_expired())
            .map(|session| session.user.clone())
    }

    /// The current session, if any
    pub fn session(&self) -> Option<Session> {
        self.session.read().unwrap().clone()
    }

    fn clear(&self) {
        self.token_store.set(None);
        *self.session.write().unwrap() = None;
    }

    fn cancel_logout_timer(&self) {
        if let Some(handle) = self.logout_timer.lock().unwrap().take() {
            handle.abort();
        }
    }

    /// Arm the auto-logout task. The previous task is always cancelled first,
    /// so at most one logout is pending per session.
    fn arm_logout_timer(&self, delay: Duration) {
        let token_store = Arc::clone(&self.token_store);
        let session = Arc::clone(&self.session);

        let mut timer = self.logout_timer.lock().unwrap();
        if let Some(old) = timer.take() {
            old.abort();
        }
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("session expired, clearing credentials");
            token_store.set(None);
            *session.write().unwrap() = None;
        }));
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.cancel_logout_timer();
    }
}
