//! Session store: who is logged in and with which credential.

use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

use crate::storage::{CredentialStore, StoredCredentials};

/// Login identity and transient request status.
#[derive(Clone, Default, PartialEq, Eq, Getters)]
pub struct SessionState {
    is_logged_in: bool,
    username: String,
    credential: Option<String>,
    is_loading: bool,
    error: Option<String>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("is_logged_in", &self.is_logged_in)
            .field("username", &self.username)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("is_loading", &self.is_loading)
            .field("error", &self.error)
            .finish()
    }
}

impl SessionState {
    /// Builds the start-up state from what was persisted.
    ///
    /// The session counts as logged in exactly when a credential was stored.
    #[instrument]
    pub fn from_stored(stored: &StoredCredentials) -> Self {
        Self {
            is_logged_in: stored.token().is_some(),
            username: stored.username().clone().unwrap_or_default(),
            credential: stored.token().clone(),
            is_loading: false,
            error: None,
        }
    }
}

/// Changes that can be applied to a [`SessionState`].
#[derive(Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// The service accepted a login.
    Login {
        /// Username echoed by the service.
        username: String,
        /// Bearer credential issued by the service.
        token: String,
    },
    /// Forget the identity and credential.
    Logout,
    /// A session command started or finished.
    SetLoading(bool),
    /// Replace the current error.
    SetError(Option<String>),
}

impl std::fmt::Debug for SessionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("token", &"<redacted>")
                .finish(),
            Self::Logout => f.write_str("Logout"),
            Self::SetLoading(loading) => f.debug_tuple("SetLoading").field(loading).finish(),
            Self::SetError(error) => f.debug_tuple("SetError").field(error).finish(),
        }
    }
}

/// Pure session reducer.
#[instrument(skip(state))]
pub fn reduce_session(state: &SessionState, action: SessionAction) -> SessionState {
    match action {
        SessionAction::Login { username, token } => SessionState {
            is_logged_in: true,
            username,
            credential: Some(token),
            ..state.clone()
        },
        SessionAction::Logout => SessionState::default(),
        SessionAction::SetLoading(is_loading) => SessionState {
            is_loading,
            ..state.clone()
        },
        SessionAction::SetError(error) => SessionState {
            error,
            ..state.clone()
        },
    }
}

/// Session state plus the durable storage behind it.
///
/// [`dispatch`](SessionStore::dispatch) applies [`reduce_session`] and writes
/// through to storage on login and logout.
#[derive(Debug)]
pub struct SessionStore {
    state: SessionState,
    storage: Box<dyn CredentialStore>,
}

impl SessionStore {
    /// Restores the session from storage.
    ///
    /// Unreadable storage is logged and treated as logged out.
    #[instrument(skip(storage))]
    pub fn load(storage: Box<dyn CredentialStore>) -> Self {
        let stored = storage.load().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read stored credentials, starting logged out");
            StoredCredentials::default()
        });
        let state = SessionState::from_stored(&stored);
        info!(
            is_logged_in = state.is_logged_in,
            username = %state.username,
            "Session restored"
        );
        Self { state, storage }
    }

    /// Returns the current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the bearer credential, if logged in.
    pub fn credential(&self) -> Option<&str> {
        self.state.credential.as_deref()
    }

    /// Applies an action, persisting identity changes.
    #[instrument(skip(self))]
    pub fn dispatch(&mut self, action: SessionAction) {
        match &action {
            SessionAction::Login { username, token } => {
                let stored = StoredCredentials::new(username.clone(), token.clone());
                if let Err(e) = self.storage.save(&stored) {
                    warn!(error = %e, "Failed to persist credentials");
                }
                info!(username = %username, "Logged in");
            }
            SessionAction::Logout => {
                if let Err(e) = self.storage.clear() {
                    warn!(error = %e, "Failed to clear persisted credentials");
                }
                info!("Logged out");
            }
            SessionAction::SetLoading(_) | SessionAction::SetError(_) => {
                debug!("Updating session status");
            }
        }
        self.state = reduce_session(&self.state, action);
    }
}
