use std::fmt;

use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::User;
use crate::validate::validate_login;

use super::{AuthError, TokenStore};

/// Opaque bearer token. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the `Authorization` header or persisting
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// The active credential and, once confirmed by the backend, the user it belongs to.
///
/// A session restored from storage starts without an identity; `identity` is
/// filled in by `SessionStore::confirm`.
#[derive(Debug, Clone)]
pub struct Session {
    credential: Credential,
    identity: Option<User>,
}

impl Session {
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn identity(&self) -> Option<&User> {
        self.identity.as_ref()
    }

    /// True once the backend has accepted the credential and returned the user
    pub fn is_confirmed(&self) -> bool {
        self.identity.is_some()
    }
}

/// Session validity as seen from the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    /// Credential present; optimistic until the backend rejects it
    LoggedIn,
    /// Credential was rejected by the backend. Collapses to `LoggedOut` on the next action.
    Expired,
}

enum Phase {
    LoggedOut,
    LoggedIn(Session),
    Expired,
}

/// Single owner of the session and its durable copy.
///
/// Durable storage is the source of truth across runs; the in-memory phase is
/// a cache of it, refreshed by `restore`.
pub struct SessionStore {
    storage: Box<dyn TokenStore>,
    phase: Phase,
}

impl SessionStore {
    pub fn new(storage: Box<dyn TokenStore>) -> Self {
        Self {
            storage,
            phase: Phase::LoggedOut,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::LoggedOut => SessionState::LoggedOut,
            Phase::LoggedIn(_) => SessionState::LoggedIn,
            Phase::Expired => SessionState::Expired,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self.phase {
            Phase::LoggedIn(ref session) => Some(session),
            _ => None,
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.session().map(Session::credential)
    }

    /// The confirmed user, if any. Does not touch the network.
    pub fn current_user(&self) -> Option<&User> {
        self.session().and_then(Session::identity)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.phase, Phase::LoggedIn(_))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Reload the session from durable storage.
    ///
    /// A stored token puts the store in an optimistic `LoggedIn` state without
    /// contacting the backend. An unreadable slot is treated as empty.
    pub fn restore(&mut self) -> Option<&Session> {
        self.phase = match self.storage.load() {
            Ok(Some(credential)) => {
                debug!("Restored stored credential");
                Phase::LoggedIn(Session {
                    credential,
                    identity: None,
                })
            }
            Ok(None) => {
                debug!("No stored credential");
                Phase::LoggedOut
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored credential, starting logged out");
                Phase::LoggedOut
            }
        };
        self.session()
    }

    /// Exchange credentials for a token, confirm the user, then persist.
    ///
    /// Nothing is written, in memory or on disk, unless every step succeeds.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        self.collapse_expired();
        validate_login(email, password)?;

        let token = api.anonymous().login(email.trim(), password).await.map_err(|e| {
            warn!(error = %e, "Login rejected");
            AuthError::from(e)
        })?;
        let credential = Credential::new(token.access_token);

        // The password was accepted here, so a rejection is not a credentials problem
        let identity = api.with_token(credential.clone()).fetch_me().await.map_err(|e| {
            warn!(error = %e, "Failed to fetch user after login");
            match e {
                e @ ApiError::Unauthorized => AuthError::Api(e),
                other => AuthError::from(other),
            }
        })?;

        self.storage.save(&credential).map_err(AuthError::Storage)?;

        info!(user_id = identity.id, "Login successful");
        let session = Session {
            credential,
            identity: Some(identity),
        };
        self.phase = Phase::LoggedIn(session.clone());
        Ok(session)
    }

    /// Forget the session in memory and in durable storage. Safe to call when logged out.
    ///
    /// In-memory state is cleared even if the storage backend fails.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        if matches!(self.phase, Phase::LoggedIn(_)) {
            info!("Logging out");
        }
        self.phase = Phase::LoggedOut;
        self.storage.clear().map_err(AuthError::Storage)
    }

    /// Fetch the user for a restored, not yet confirmed session.
    ///
    /// Returns the confirmed user, or `None` when logged out. A rejected
    /// credential moves the store to `Expired`.
    pub async fn confirm(&mut self, api: &ApiClient) -> Result<Option<&User>, ApiError> {
        self.collapse_expired();
        let pending = match self.phase {
            Phase::LoggedIn(ref session) if !session.is_confirmed() => {
                Some(session.credential.clone())
            }
            _ => None,
        };

        if let Some(credential) = pending {
            let result = api.with_token(credential).fetch_me().await;
            let identity = self.observe(result)?;
            debug!(user_id = identity.id, "Restored session confirmed");
            self.replace_identity(identity);
        }
        Ok(self.current_user())
    }

    /// Client carrying the current credential, or an anonymous one when logged out
    pub fn client(&mut self, api: &ApiClient) -> ApiClient {
        self.collapse_expired();
        match self.credential() {
            Some(credential) => api.with_token(credential.clone()),
            None => api.anonymous(),
        }
    }

    /// Record the outcome of an authenticated call.
    ///
    /// `Unauthorized` while logged in expires the session and empties durable
    /// storage so the rejected token is not restored on the next run.
    pub fn observe<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(ref e) = result {
            if e.is_unauthorized() && matches!(self.phase, Phase::LoggedIn(_)) {
                warn!("Credential rejected by backend, session expired");
                self.phase = Phase::Expired;
                if let Err(e) = self.storage.clear() {
                    warn!(error = %e, "Failed to clear expired credential");
                }
            }
        }
        result
    }

    /// Replace the user wholesale, e.g. after a profile update
    pub fn replace_identity(&mut self, identity: User) {
        if let Phase::LoggedIn(ref mut session) = self.phase {
            session.identity = Some(identity);
        }
    }

    /// Move an expired session to `LoggedOut`. Returns whether the session had expired.
    pub fn acknowledge_expiry(&mut self) -> bool {
        self.collapse_expired()
    }

    fn collapse_expired(&mut self) -> bool {
        if matches!(self.phase, Phase::Expired) {
            debug!("Expired session cleared");
            self.phase = Phase::LoggedOut;
            true
        } else {
            false
        }
    }
}
