//! Session state: token ownership, persistence and the silent re-login policy.

use crate::retry_policy::{self, Attempt, Authorized, RetryDecision};
use roster_core::config::ClientConfig;
use roster_core::error::{Result, RosterError};
use roster_core::gateway::RosterGateway;
use roster_core::model::User;
use roster_core::session::{AuthStatus, Credentials, PersistedSession, Session};
use roster_core::storage::SessionStore;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, watch};

/// Owns the current session and decides when it is persisted or dropped.
///
/// Status changes are published on a `watch` channel so the navigation layer
/// can force the login route after a logout, without polling.
///
/// The generation counter changes whenever the session is replaced or ended
/// (restore, login, logout) but not on a silent re-login, which keeps the
/// same user. Callers that cache results tag them with the generation they
/// were fetched under.
pub struct SessionState {
    gateway: Arc<dyn RosterGateway>,
    store: Arc<dyn SessionStore>,
    session: RwLock<Session>,
    credentials: RwLock<Option<Credentials>>,
    remember_credentials: bool,
    dev_account_id: String,
    status: watch::Sender<AuthStatus>,
    generation: AtomicU64,
}

impl SessionState {
    pub fn new(
        gateway: Arc<dyn RosterGateway>,
        store: Arc<dyn SessionStore>,
        config: &ClientConfig,
    ) -> Self {
        let (status, _) = watch::channel(AuthStatus::Anonymous);
        Self {
            gateway,
            store,
            session: RwLock::new(Session::default()),
            credentials: RwLock::new(None),
            remember_credentials: config.remember_credentials,
            dev_account_id: config.dev_account_id.clone(),
            status,
            generation: AtomicU64::new(0),
        }
    }

    /// Loads the persisted token and credentials, e.g. at start-up.
    pub async fn restore(&self) -> Result<()> {
        let persisted = self.store.load().await?;
        let token = persisted.token.unwrap_or_default();
        tracing::debug!(
            has_token = !token.is_empty(),
            has_credentials = persisted.credentials.is_some(),
            "Restoring session"
        );

        {
            let mut session = self.session.write().await;
            session.token = token;
            session.identity = None;
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        *self.credentials.write().await = persisted.credentials;
        self.publish().await;
        Ok(())
    }

    /// Logs in and persists the new token.
    ///
    /// Gateway failures are returned unchanged; nothing is retried.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let token = self.gateway.login(username, password).await?;
        let credentials = self
            .remember_credentials
            .then(|| Credentials::new(username, password));

        self.store
            .save(&PersistedSession {
                token: Some(token.clone()),
                credentials: credentials.clone(),
            })
            .await?;

        {
            let mut session = self.session.write().await;
            session.token = token;
            session.identity = None;
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        *self.credentials.write().await = credentials;
        tracing::info!(user = %username, "Logged in");
        self.publish().await;
        Ok(())
    }

    /// Clears token, identity and cached credentials, in memory and on disk.
    ///
    /// Safe to call when already logged out. The in-memory session is cleared
    /// even when durable storage fails; the storage error is returned.
    pub async fn logout(&self) -> Result<()> {
        self.clear_session(None).await
    }

    /// Fetches the identity behind the current token.
    ///
    /// No-op without a token. A rejected token ends the session; no silent
    /// re-login is attempted here.
    pub async fn check_identity(&self) -> Result<()> {
        let generation = self.generation();
        let token = self.token().await;
        if token.is_empty() {
            return Ok(());
        }

        match self.gateway.fetch_me(&token).await {
            Ok(user) => {
                tracing::debug!(user.id = %user.id, "Identity confirmed");
                let mut session = self.session.write().await;
                // a concurrent logout or re-login wins over this result
                if session.token == token {
                    session.identity = Some(user);
                }
                Ok(())
            }
            Err(RosterError::Unauthorized) => {
                tracing::warn!("Token rejected while checking identity");
                self.end_session(generation).await;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Returns the current token or fails with `Unauthenticated`.
    pub async fn require_token(&self) -> Result<String> {
        let token = self.token().await;
        if token.is_empty() {
            return Err(RosterError::Unauthenticated);
        }
        Ok(token)
    }

    /// Runs an authenticated call under the silent re-login policy.
    ///
    /// `call` receives the token to use. It runs at most twice: once with the
    /// current token and, after a successful silent re-login, once more with
    /// the renewed token.
    pub async fn authorized<T, F, Fut>(&self, call: F) -> Result<Authorized<T>>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let generation = self.generation();
        let token = self.require_token().await?;

        let err = match call(token).await {
            Ok(value) => return Ok(Authorized::Fresh(value)),
            Err(err) => err,
        };

        let credentials = self.credentials.read().await.clone();
        let credentials = match retry_policy::decide(Attempt::First, &err, credentials.is_some()) {
            RetryDecision::Propagate => return Err(err),
            RetryDecision::Logout => {
                tracing::warn!("Token rejected and no credentials cached");
                self.end_session(generation).await;
                return Ok(Authorized::SessionEnded);
            }
            RetryDecision::SilentRelogin => match credentials {
                Some(credentials) => credentials,
                None => return Err(RosterError::internal("re-login without credentials")),
            },
        };

        let token = match self.relogin(&credentials, generation).await {
            Ok(Some(token)) => token,
            // a logout or another login replaced the session meanwhile
            Ok(None) => return Ok(Authorized::SessionEnded),
            Err(e) => {
                tracing::warn!(error = %e, "Silent re-login failed");
                self.end_session(generation).await;
                return Ok(Authorized::SessionEnded);
            }
        };

        match call(token).await {
            Ok(value) => Ok(Authorized::Recovered(value)),
            Err(err) => match retry_policy::decide(Attempt::Retried, &err, true) {
                RetryDecision::Propagate => Err(err),
                RetryDecision::SilentRelogin | RetryDecision::Logout => {
                    tracing::warn!("Renewed token rejected as well");
                    self.end_session(generation).await;
                    Ok(Authorized::SessionEnded)
                }
            },
        }
    }

    pub async fn token(&self) -> String {
        self.session.read().await.token.clone()
    }

    pub async fn identity(&self) -> Option<User> {
        self.session.read().await.identity.clone()
    }

    /// Whether the identity is the internal test account.
    ///
    /// A presentation flag for the UI, not an access control decision.
    pub async fn is_dev(&self) -> bool {
        self.session
            .read()
            .await
            .identity
            .as_ref()
            .is_some_and(|user| user.id == self.dev_account_id)
    }

    pub async fn has_cached_credentials(&self) -> bool {
        self.credentials.read().await.is_some()
    }

    /// Identifies the current session; see the type-level docs.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Current status without awaiting, for the navigation guard.
    pub fn is_authenticated(&self) -> bool {
        *self.status.borrow() == AuthStatus::Authenticated
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }

    /// Installs a renewed token unless the session of `generation` is gone.
    async fn relogin(&self, credentials: &Credentials, generation: u64) -> Result<Option<String>> {
        tracing::info!(user = %credentials.username, "Attempting silent re-login");
        let token = self
            .gateway
            .login(&credentials.username, &credentials.password)
            .await?;

        {
            // held across the save so a concurrent logout clears storage after us
            let mut session = self.session.write().await;
            if self.generation() != generation {
                tracing::debug!("Session replaced during re-login, dropping renewed token");
                return Ok(None);
            }

            let persisted = PersistedSession {
                token: Some(token.clone()),
                credentials: Some(credentials.clone()),
            };
            if let Err(e) = self.store.save(&persisted).await {
                // the renewed token still works for this process
                tracing::warn!(error = %e, "Failed to persist renewed token");
            }
            session.token = token.clone();
            session.identity = None;
        }
        self.publish().await;
        Ok(Some(token))
    }

    /// Ends the session of `generation`; a newer session is left alone.
    /// Storage failures are only logged.
    async fn end_session(&self, generation: u64) {
        if let Err(e) = self.clear_session(Some(generation)).await {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
    }

    async fn clear_session(&self, expected: Option<u64>) -> Result<()> {
        let was_authenticated = {
            let mut session = self.session.write().await;
            if expected.is_some_and(|generation| generation != self.generation()) {
                return Ok(());
            }
            let was = session.is_authenticated();
            session.clear();
            self.generation.fetch_add(1, Ordering::SeqCst);
            was
        };
        *self.credentials.write().await = None;
        self.publish().await;

        if was_authenticated {
            tracing::info!("Logged out");
        }
        self.store.clear().await
    }

    async fn publish(&self) {
        let status = if self.session.read().await.is_authenticated() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        };
        self.status.send_if_modified(|current| {
            let changed = *current != status;
            *current = status;
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemorySessionStore, MockGateway, YieldingGateway};

    fn config(remember_credentials: bool) -> ClientConfig {
        ClientConfig {
            remember_credentials,
            ..ClientConfig::default()
        }
    }

    fn setup(remember: bool) -> (Arc<MockGateway>, Arc<MemorySessionStore>, SessionState) {
        let gateway = Arc::new(MockGateway::new());
        let store = Arc::new(MemorySessionStore::default());
        let state = SessionState::new(gateway.clone(), store.clone(), &config(remember));
        (gateway, store, state)
    }

    async fn fetch_calendar(
        state: &SessionState,
        gateway: &Arc<MockGateway>,
    ) -> Result<Authorized<usize>> {
        state
            .authorized(|token| async move {
                gateway.fetch_calendar(&token).await.map(|c| c.len())
            })
            .await
    }

    #[tokio::test]
    async fn test_login_stores_and_persists_token() {
        let (_, store, state) = setup(false);
        state.login("alice", "pw1").await.unwrap();

        assert_eq!(state.token().await, "T1");
        assert!(state.is_authenticated());
        let persisted = store.snapshot();
        assert_eq!(persisted.token.as_deref(), Some("T1"));
        assert!(persisted.credentials.is_none());
    }

    #[tokio::test]
    async fn test_login_remembers_credentials_when_enabled() {
        let (_, store, state) = setup(true);
        state.login("alice", "pw1").await.unwrap();

        assert!(state.has_cached_credentials().await);
        assert_eq!(
            store.snapshot().credentials,
            Some(Credentials::new("alice", "pw1"))
        );
    }

    #[tokio::test]
    async fn test_login_failure_propagates_without_retry() {
        let (gateway, store, state) = setup(true);
        let err = state.login("alice", "wrong").await.unwrap_err();

        assert_eq!(err, RosterError::Unauthorized);
        assert_eq!(gateway.count("login"), 1);
        assert!(!state.is_authenticated());
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let (_, store, state) = setup(true);
        state.login("alice", "pw1").await.unwrap();

        state.logout().await.unwrap();
        let after_once = (state.token().await, state.identity().await, store.snapshot());
        state.logout().await.unwrap();
        let after_twice = (state.token().await, state.identity().await, store.snapshot());

        assert_eq!(after_once, after_twice);
        assert_eq!(after_once.0, "");
        assert!(after_once.2.is_empty());
        assert!(!state.has_cached_credentials().await);
    }

    #[tokio::test]
    async fn test_logout_publishes_anonymous_status() {
        let (_, _, state) = setup(false);
        let mut status = state.subscribe();
        state.login("alice", "pw1").await.unwrap();
        assert_eq!(*status.borrow_and_update(), AuthStatus::Authenticated);

        state.logout().await.unwrap();
        assert!(status.has_changed().unwrap());
        assert_eq!(*status.borrow_and_update(), AuthStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_generation_survives_silent_relogin_only() {
        let (gateway, _, state) = setup(true);
        state.login("alice", "pw1").await.unwrap();
        let logged_in = state.generation();

        gateway.revoke_tokens();
        fetch_calendar(&state, &gateway).await.unwrap();
        assert_eq!(state.token().await, "T2");
        assert_eq!(state.generation(), logged_in);

        state.logout().await.unwrap();
        assert_ne!(state.generation(), logged_in);
        let logged_out = state.generation();
        state.login("alice", "pw1").await.unwrap();
        assert_ne!(state.generation(), logged_out);
    }

    #[tokio::test]
    async fn test_relogin_finishing_after_logout_keeps_session_ended() {
        let gateway = Arc::new(MockGateway::new());
        let store = Arc::new(MemorySessionStore::default());
        let slow = Arc::new(YieldingGateway::new(gateway.clone(), 5));
        let state = SessionState::new(slow.clone(), store.clone(), &config(true));
        state.login("alice", "pw1").await.unwrap();
        gateway.revoke_tokens();

        let (result, _) = tokio::join!(
            state.authorized(|token| {
                let slow = slow.clone();
                async move { slow.fetch_calendar(&token).await }
            }),
            async {
                // lands while the re-login is in flight
                for _ in 0..8 {
                    tokio::task::yield_now().await;
                }
                state.logout().await.unwrap();
            }
        );

        assert_eq!(result.unwrap(), Authorized::SessionEnded);
        assert_eq!(gateway.count("login"), 2);
        assert_eq!(state.token().await, "");
        assert!(!state.is_authenticated());
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_restore_reads_persisted_session() {
        let gateway = Arc::new(MockGateway::new());
        let store = Arc::new(MemorySessionStore::with_session(
            Some("T7"),
            Some(Credentials::new("alice", "pw1")),
        ));
        let state = SessionState::new(gateway, store, &config(true));

        state.restore().await.unwrap();
        assert_eq!(state.token().await, "T7");
        assert!(state.is_authenticated());
        assert!(state.has_cached_credentials().await);
    }

    #[tokio::test]
    async fn test_check_identity_without_token_is_noop() {
        let (gateway, _, state) = setup(false);
        state.check_identity().await.unwrap();
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_check_identity_sets_dev_flag() {
        let (gateway, _, state) = setup(false);
        gateway.set_me(User {
            id: "dev".to_string(),
            name: "Test Account".to_string(),
            settings: Default::default(),
        });
        state.login("alice", "pw1").await.unwrap();

        state.check_identity().await.unwrap();
        assert_eq!(state.identity().await.unwrap().name, "Test Account");
        assert!(state.is_dev().await);
    }

    #[tokio::test]
    async fn test_check_identity_regular_member_is_not_dev() {
        let (_, _, state) = setup(false);
        state.login("alice", "pw1").await.unwrap();
        state.check_identity().await.unwrap();
        assert!(!state.is_dev().await);
    }

    #[tokio::test]
    async fn test_check_identity_unauthorized_logs_out() {
        let (gateway, store, state) = setup(true);
        state.login("alice", "pw1").await.unwrap();
        gateway.revoke_tokens();

        state.check_identity().await.unwrap();
        assert_eq!(state.token().await, "");
        assert!(store.snapshot().is_empty());
        // identity checks never re-login silently
        assert_eq!(gateway.count("login"), 1);
    }

    #[tokio::test]
    async fn test_require_token() {
        let (_, _, state) = setup(false);
        assert_eq!(state.require_token().await, Err(RosterError::Unauthenticated));
        state.login("alice", "pw1").await.unwrap();
        assert_eq!(state.require_token().await.unwrap(), "T1");
    }

    #[tokio::test]
    async fn test_authorized_without_token_makes_no_call() {
        let (gateway, _, state) = setup(true);
        let result = fetch_calendar(&state, &gateway).await;
        assert_eq!(result, Err(RosterError::Unauthenticated));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_silent_relogin_retries_exactly_once() {
        let (gateway, store, state) = setup(true);
        state.login("alice", "pw1").await.unwrap();
        gateway.revoke_tokens();

        let result = fetch_calendar(&state, &gateway).await.unwrap();
        assert_eq!(result, Authorized::Recovered(1));
        assert_eq!(gateway.count("login"), 2);
        assert_eq!(gateway.count("fetch_calendar"), 2);
        assert_eq!(state.token().await, "T2");
        assert_eq!(store.snapshot().token.as_deref(), Some("T2"));
    }

    #[tokio::test]
    async fn test_failed_relogin_ends_session() {
        let (gateway, store, state) = setup(true);
        state.login("alice", "pw1").await.unwrap();
        gateway.revoke_tokens();
        gateway.remove_account("alice");

        let result = fetch_calendar(&state, &gateway).await.unwrap();
        assert_eq!(result, Authorized::SessionEnded);
        assert_eq!(gateway.count("login"), 2);
        assert_eq!(gateway.count("fetch_calendar"), 1);
        assert_eq!(state.token().await, "");
        assert!(store.snapshot().token.is_none());
    }

    #[tokio::test]
    async fn test_rejected_retry_does_not_loop() {
        let (gateway, _, state) = setup(true);
        state.login("alice", "pw1").await.unwrap();
        gateway.reject_all_tokens();

        let result = fetch_calendar(&state, &gateway).await.unwrap();
        assert_eq!(result, Authorized::SessionEnded);
        assert_eq!(gateway.count("login"), 2);
        assert_eq!(gateway.count("fetch_calendar"), 2);
        assert!(!state.is_authenticated());
    }

    #[tokio::test]
    async fn test_unauthorized_without_credentials_logs_out_directly() {
        let (gateway, store, state) = setup(false);
        state.login("alice", "pw1").await.unwrap();
        gateway.revoke_tokens();

        let result = fetch_calendar(&state, &gateway).await.unwrap();
        assert_eq!(result, Authorized::SessionEnded);
        assert_eq!(gateway.count("login"), 1);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_network_error_propagates_and_keeps_session() {
        let (gateway, _, state) = setup(true);
        state.login("alice", "pw1").await.unwrap();
        gateway.fail_next("fetch_calendar");

        let err = fetch_calendar(&state, &gateway).await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(gateway.count("login"), 1);
        assert!(state.is_authenticated());
    }
}
