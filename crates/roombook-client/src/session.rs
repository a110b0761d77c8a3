//! Session store.
//!
//! Single source of truth for "who is logged in", synchronized with durable
//! storage. The storage layout is two entries in the session directory:
//! `token` (the raw bearer string) and `user.json` (the serialized user
//! record), read once at startup and written on every successful auth
//! mutation, removed on logout.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, warn};

use roombook_core::models::{User, UserRole};
use roombook_core::validation::{RegistrationForm, ValidationErrors, validate_registration};

use crate::api::{ApiClient, ApiError, LoginRequest, RegisterRequest, TokenHandle};

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

/// Auth operation failure: rejected client-side, or a classified API error.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Message suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errs) => errs
                .errors
                .first()
                .map_or_else(String::new, |e| e.message.clone()),
            Self::Api(err) => err.user_message(),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    token: Option<String>,
    authenticated: bool,
}

/// Immutable view of the session for guards and views.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub user: Option<User>,
}

impl SessionSnapshot {
    /// Stored role; `None` for an anonymous visitor.
    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_admin(&self) -> bool {
        self.authenticated && self.role().is_some_and(UserRole::is_admin)
    }
}

/// In-memory session state plus its durable-storage synchronization.
#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    token_handle: TokenHandle,
    dir: PathBuf,
    state: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    /// Create a store over the given API client and session directory. Call
    /// [`Self::restore`] once before routing begins.
    pub fn new(api: ApiClient, dir: PathBuf) -> Self {
        let token_handle = api.token_handle();
        Self {
            api,
            token_handle,
            dir,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Seed in-memory state from durable storage without contacting the
    /// network. `authenticated` is true iff a token is present; validity is
    /// confirmed lazily by the first authenticated request.
    pub fn restore(&self) {
        let token = std::fs::read_to_string(self.dir.join(TOKEN_FILE))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let user = std::fs::read_to_string(self.dir.join(USER_FILE))
            .ok()
            .and_then(|s| serde_json::from_str::<User>(&s).ok());

        let authenticated = token.is_some();
        self.set_shared_token(token.clone());
        let mut state = self.write_state();
        state.authenticated = authenticated;
        state.token = token;
        state.user = user;
        debug!(authenticated, "session restored from storage");
    }

    /// Log in against the remote API. On success both storage entries are
    /// written; on failure the session stays unauthenticated and storage is
    /// untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionSnapshot, AuthError> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self.api.login(&credentials).await?;
        self.apply_auth(resp.token, resp.user);
        Ok(self.snapshot())
    }

    /// Register a new account. The form is validated client-side before any
    /// network call; server-side errors are surfaced verbatim when present.
    pub async fn register(&self, form: &RegistrationForm) -> Result<SessionSnapshot, AuthError> {
        validate_registration(form)?;
        let profile = RegisterRequest {
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
            phone: form.phone.clone().filter(|p| !p.is_empty()),
        };
        let resp = self.api.register(&profile).await?;
        self.apply_auth(resp.token, resp.user);
        Ok(self.snapshot())
    }

    /// Clear the in-memory session and both storage entries. Idempotent:
    /// logging out twice has the same effect as once.
    pub fn logout(&self) {
        {
            let mut state = self.write_state();
            *state = SessionState::default();
        }
        self.set_shared_token(None);
        for file in [TOKEN_FILE, USER_FILE] {
            match std::fs::remove_file(self.dir.join(file)) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(file, error = %e, "failed to remove session entry"),
            }
        }
        debug!("session cleared");
    }

    /// Current snapshot of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read_state();
        SessionSnapshot {
            authenticated: state.authenticated,
            user: state.user.clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state().authenticated
    }

    fn apply_auth(&self, token: String, user: User) {
        self.set_shared_token(Some(token.clone()));
        {
            let mut state = self.write_state();
            state.authenticated = true;
            state.token = Some(token.clone());
            state.user = Some(user.clone());
        }
        self.persist(&token, &user);
    }

    /// Write both storage entries. Failures are logged but do not fail the
    /// auth operation and are not rolled back; the in-memory session is
    /// already live at this point (known consistency gap of the original).
    fn persist(&self, token: &str, user: &User) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!(error = %e, "failed to create session directory");
            return;
        }
        if let Err(e) = std::fs::write(self.dir.join(TOKEN_FILE), token) {
            warn!(error = %e, "failed to persist token");
        }
        match serde_json::to_string_pretty(user) {
            Ok(json) => {
                if let Err(e) = std::fs::write(self.dir.join(USER_FILE), json) {
                    warn!(error = %e, "failed to persist user record");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize user record"),
        }
    }

    fn set_shared_token(&self, token: Option<String>) {
        let mut guard = self
            .token_handle
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = token;
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
