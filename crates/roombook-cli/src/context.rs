//! Shared application context for the command handlers.

use std::path::PathBuf;

use anyhow::Context as _;
use tracing::debug;

use roombook_client::{ApiClient, MutationDispatcher, ResourceCache, SessionStore};
use roombook_core::Config;

/// Everything a command handler needs: configuration, the API client, the
/// restored session, the resource cache, and the mutation dispatcher.
pub struct AppContext {
    pub config: Config,
    pub api: ApiClient,
    pub session: SessionStore,
    pub cache: ResourceCache<ApiClient>,
    pub dispatcher: MutationDispatcher,
}

impl AppContext {
    /// Build the context from loaded configuration. The session is restored
    /// from storage synchronously, so guards and authenticated requests work
    /// from the first command onward.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let api = ApiClient::new(&config.api_base_url)
            .with_context(|| format!("invalid API base URL: {}", config.api_base_url))?;

        let session_dir = config
            .session_dir()
            .context("cannot determine a session directory (no home directory?)")?;
        let session = SessionStore::new(api.clone(), session_dir);
        session.restore();
        debug!(authenticated = session.is_authenticated(), "session restored");

        let cache = ResourceCache::new(api.clone());
        let dispatcher = MutationDispatcher::new(api.clone(), cache.clone());

        Ok(Self {
            config,
            api,
            session,
            cache,
            dispatcher,
        })
    }

    /// Override the session storage directory (used by tests).
    pub fn with_session_dir(config: Config, dir: PathBuf) -> anyhow::Result<Self> {
        let api = ApiClient::new(&config.api_base_url)
            .with_context(|| format!("invalid API base URL: {}", config.api_base_url))?;
        let session = SessionStore::new(api.clone(), dir);
        session.restore();
        let cache = ResourceCache::new(api.clone());
        let dispatcher = MutationDispatcher::new(api.clone(), cache.clone());
        Ok(Self {
            config,
            api,
            session,
            cache,
            dispatcher,
        })
    }

    /// Fail unless the restored session is an authenticated admin. Admin
    /// commands call this before issuing any request.
    pub fn require_admin(&self) -> anyhow::Result<()> {
        let snapshot = self.session.snapshot();
        anyhow::ensure!(
            snapshot.is_admin(),
            "this command requires an authenticated administrator session"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn context_in(dir: &std::path::Path) -> AppContext {
        AppContext::with_session_dir(Config::default(), dir.to_path_buf()).expect("context builds")
    }

    #[test]
    fn empty_session_dir_starts_anonymous() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_in(dir.path());
        assert!(!ctx.session.is_authenticated());
        assert!(ctx.require_admin().is_err());
    }

    #[test]
    fn stored_token_restores_an_authenticated_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("token"), "abc").expect("write token");

        let ctx = context_in(dir.path());
        assert!(ctx.session.is_authenticated());
        // A token alone is not an admin session.
        assert!(ctx.require_admin().is_err());

        ctx.session.logout();
        assert!(!ctx.session.is_authenticated());
        assert!(!dir.path().join("token").exists());
    }

    #[test]
    fn admin_record_passes_the_admin_check() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("token"), "abc").expect("write token");
        std::fs::write(
            dir.path().join("user.json"),
            r#"{"id": 1, "firstName": "Анна", "lastName": "Иванова",
                "email": "anna@example.com", "role": "ADMIN"}"#,
        )
        .expect("write user");

        let ctx = context_in(dir.path());
        assert!(ctx.require_admin().is_ok());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = Config {
            api_base_url: String::new(),
            ..Config::default()
        };
        assert!(AppContext::with_session_dir(config, std::env::temp_dir()).is_err());
    }
}
