//! Session store: the credential lifecycle state machine.
//!
//! [`SessionContext`] is the single slot holding the signed-in session. It is
//! shared by `Arc` with everything that sends requests; readers take the
//! credential at send time, and only the transitions in this module write
//! it. [`SessionStore`] drives the transitions against the identity gateway.
//!
//! ```text
//! Unauthenticated -> Authenticating -> Authenticated
//!        ^                 |                 |
//!        +-----------------+-----------------+  (failure, logout, denial)
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{DashboardError, DashboardResult};
use crate::domain::models::{AccountStatus, BearerToken, PersistedSession, Session, SessionState};
use crate::domain::ports::{CredentialStore, IdentityGateway};
use crate::services::access_policy;

/// Message shown when the exchange fails without a server explanation.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";

#[derive(Debug)]
struct Slot {
    state: SessionState,
    session: Option<Session>,
}

/// Process-wide holder of the current session and its persisted copy.
pub struct SessionContext {
    slot: RwLock<Slot>,
    store: Arc<dyn CredentialStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn CredentialStore>) -> Arc<Self> {
        Arc::new(Self {
            slot: RwLock::new(Slot {
                state: SessionState::Unauthenticated,
                session: None,
            }),
            store,
        })
    }

    pub fn state(&self) -> SessionState {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).state
    }

    /// Snapshot of the signed-in session, if any.
    pub fn current(&self) -> Option<Session> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .session
            .clone()
    }

    /// Credential to attach to an outbound request right now.
    pub fn credential(&self) -> Option<BearerToken> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .session
            .as_ref()
            .map(|s| s.credential.clone())
    }

    /// Forget the session in memory and on disk.
    ///
    /// This is the logout transition. The HTTP layer calls it when any
    /// request is answered with an authorization denial. Idempotent.
    pub fn revoke(&self, reason: &str) {
        let was = {
            let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
            let was = slot.state;
            slot.state = SessionState::Unauthenticated;
            slot.session = None;
            was
        };

        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear persisted session");
        }

        if was != SessionState::Unauthenticated {
            info!(reason, "session cleared");
        } else {
            debug!(reason, "session already clear");
        }
    }

    fn set_state(&self, state: SessionState) {
        self.slot.write().unwrap_or_else(PoisonError::into_inner).state = state;
    }

    /// Take `session` as current without touching the persisted copy.
    fn adopt(&self, session: Session) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.state = SessionState::Authenticated;
        slot.session = Some(session);
    }

    /// Persist `session`, then make it current.
    fn establish(&self, session: Session) -> DashboardResult<()> {
        self.store.save(&PersistedSession::from_session(&session))?;
        self.adopt(session);
        Ok(())
    }

    fn load_persisted(&self) -> DashboardResult<PersistedSession> {
        self.store.load()
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

pub struct SessionStore<G: IdentityGateway + ?Sized> {
    context: Arc<SessionContext>,
    gateway: Arc<G>,
}

impl<G: IdentityGateway + ?Sized> SessionStore<G> {
    pub fn new(context: Arc<SessionContext>, gateway: Arc<G>) -> Self {
        Self { context, gateway }
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    pub fn state(&self) -> SessionState {
        self.context.state()
    }

    pub fn current(&self) -> Option<Session> {
        self.context.current()
    }

    /// Restore a persisted session if the server still honours it.
    ///
    /// Anything short of a validated credential leaves the store
    /// unauthenticated with nothing persisted. Never fails.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> SessionState {
        let record = match self.context.load_persisted() {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "persisted session unreadable, discarding");
                self.context.revoke("unreadable persisted session");
                return SessionState::Unauthenticated;
            }
        };

        if record.is_empty() {
            debug!("no persisted session");
            return SessionState::Unauthenticated;
        }

        let Some(session) = record.into_session() else {
            self.context.revoke("incomplete persisted session");
            return SessionState::Unauthenticated;
        };

        self.context.set_state(SessionState::Authenticating);
        match self.gateway.validate(&session.credential).await {
            Ok(true) => {
                info!(email = %session.identity().email, "restored persisted session");
                self.context.adopt(session);
                SessionState::Authenticated
            }
            Ok(false) => {
                self.context.revoke("persisted credential rejected");
                SessionState::Unauthenticated
            }
            Err(err) => {
                warn!(error = %err, "credential validation failed");
                self.context.revoke("credential validation failed");
                SessionState::Unauthenticated
            }
        }
    }

    /// Exchange an external identity credential for a session.
    #[instrument(skip_all)]
    pub async fn login(&self, external_token: &str) -> DashboardResult<Session> {
        if external_token.trim().is_empty() {
            return Err(DashboardError::AuthExchangeFailed(
                "Google token is required".to_string(),
            ));
        }

        self.context.set_state(SessionState::Authenticating);

        let session = match self.gateway.exchange(external_token).await {
            Ok(session) => session,
            Err(err) => {
                self.context.set_state(SessionState::Unauthenticated);
                warn!(error = %err, "identity exchange failed");
                return Err(match err {
                    DashboardError::AuthExchangeFailed(msg) => {
                        DashboardError::AuthExchangeFailed(msg)
                    }
                    _ => DashboardError::AuthExchangeFailed(LOGIN_FAILED_MESSAGE.to_string()),
                });
            }
        };

        if session.status() == AccountStatus::Disabled {
            self.context.set_state(SessionState::Unauthenticated);
            return Err(DashboardError::AuthExchangeFailed(
                "User account is disabled. Please contact administrator.".to_string(),
            ));
        }

        if let Err(err) = self.context.establish(session.clone()) {
            self.context.revoke("failed to persist session");
            return Err(err);
        }

        info!(
            email = %session.identity().email,
            role = %session.role(),
            "signed in"
        );
        Ok(session)
    }

    /// Sign out. Always succeeds.
    pub fn logout(&self) {
        self.context.revoke("logout");
    }

    /// Swap the current credential for a fresh one.
    ///
    /// A denial clears the session; transport trouble leaves it in place.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> DashboardResult<Session> {
        let current = self.current().ok_or(DashboardError::NotAuthenticated)?;

        let mut fresh = match self.gateway.refresh(&current.credential).await {
            Ok(fresh) => fresh,
            Err(err @ (DashboardError::AuthDenied(_) | DashboardError::AuthExchangeFailed(_))) => {
                self.context.revoke("refresh denied");
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        // The refresh answer carries no display name or picture.
        if fresh.profile.identity.name.is_empty() {
            fresh.profile.identity.name = current.profile.identity.name.clone();
        }
        if fresh.profile.identity.picture.is_none() {
            fresh.profile.identity.picture = current.profile.identity.picture.clone();
        }

        if fresh.status() == AccountStatus::Disabled {
            self.context.revoke("account disabled");
            return Err(DashboardError::AuthDenied(
                "User account is no longer active".to_string(),
            ));
        }

        self.context.establish(fresh.clone())?;
        debug!(role = %fresh.role(), "credential refreshed");
        Ok(fresh)
    }

    /// Whether the current session may open `route`.
    pub fn can_access(&self, route: &str) -> bool {
        access_policy::can_access(self.current().as_ref(), route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Identity, Profile, Role};
    use crate::infrastructure::credentials::InMemoryCredentialStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn profile(role: &str, status: AccountStatus) -> Profile {
        Profile {
            identity: Identity {
                email: "ravi@example.com".to_string(),
                name: "Ravi".to_string(),
                picture: Some("https://example.com/ravi.png".to_string()),
            },
            role: Role::parse(role),
            status,
        }
    }

    /// Scripted gateway: answers are queued per method.
    #[derive(Default)]
    struct ScriptedGateway {
        exchange: Mutex<Vec<DashboardResult<Session>>>,
        validate: Mutex<Vec<DashboardResult<bool>>>,
        refresh: Mutex<Vec<DashboardResult<Session>>>,
        validated: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IdentityGateway for ScriptedGateway {
        async fn exchange(&self, _external_token: &str) -> DashboardResult<Session> {
            self.exchange.lock().unwrap().remove(0)
        }

        async fn validate(&self, credential: &BearerToken) -> DashboardResult<bool> {
            self.validated
                .lock()
                .unwrap()
                .push(credential.expose().to_string());
            self.validate.lock().unwrap().remove(0)
        }

        async fn refresh(&self, _credential: &BearerToken) -> DashboardResult<Session> {
            self.refresh.lock().unwrap().remove(0)
        }
    }

    fn setup(
        gateway: ScriptedGateway,
    ) -> (
        SessionStore<ScriptedGateway>,
        Arc<InMemoryCredentialStore>,
        Arc<ScriptedGateway>,
    ) {
        let persisted = Arc::new(InMemoryCredentialStore::default());
        let context = SessionContext::new(persisted.clone());
        let gateway = Arc::new(gateway);
        (
            SessionStore::new(context, Arc::clone(&gateway)),
            persisted,
            gateway,
        )
    }

    fn staff_session(token: &str) -> Session {
        Session::new(
            profile("Staff", AccountStatus::Enabled),
            BearerToken::new(token),
        )
    }

    #[tokio::test]
    async fn test_initialize_without_persisted_state() {
        let (store, persisted, gateway) = setup(ScriptedGateway::default());
        assert_eq!(store.initialize().await, SessionState::Unauthenticated);
        assert!(store.current().is_none());
        assert!(persisted.snapshot().is_empty());
        assert!(gateway.validated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_restores_valid_session() {
        let gateway = ScriptedGateway::default();
        gateway.validate.lock().unwrap().push(Ok(true));
        let (store, persisted, gateway) = setup(gateway);
        persisted
            .save(&PersistedSession::from_session(&staff_session("jwt-1")))
            .unwrap();

        assert_eq!(store.initialize().await, SessionState::Authenticated);
        assert_eq!(store.context().credential().unwrap().expose(), "jwt-1");
        assert_eq!(*gateway.validated.lock().unwrap(), vec!["jwt-1".to_string()]);
    }

    #[tokio::test]
    async fn test_initialize_clears_rejected_credential() {
        let gateway = ScriptedGateway::default();
        gateway.validate.lock().unwrap().push(Ok(false));
        let (store, persisted, _) = setup(gateway);
        persisted
            .save(&PersistedSession::from_session(&staff_session("expired")))
            .unwrap();

        assert_eq!(store.initialize().await, SessionState::Unauthenticated);
        assert!(persisted.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_clears_on_validation_error() {
        let gateway = ScriptedGateway::default();
        gateway
            .validate
            .lock()
            .unwrap()
            .push(Err(DashboardError::FetchFailed("timeout".to_string())));
        let (store, persisted, _) = setup(gateway);
        persisted
            .save(&PersistedSession::from_session(&staff_session("jwt")))
            .unwrap();

        assert_eq!(store.initialize().await, SessionState::Unauthenticated);
        assert!(persisted.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_discards_half_persisted_state() {
        let (store, persisted, gateway) = setup(ScriptedGateway::default());
        persisted
            .save(&PersistedSession {
                credential: Some(BearerToken::new("orphan")),
                profile: None,
            })
            .unwrap();

        assert_eq!(store.initialize().await, SessionState::Unauthenticated);
        assert!(persisted.snapshot().is_empty());
        assert!(gateway.validated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_persists_both_halves() {
        let gateway = ScriptedGateway::default();
        gateway.exchange.lock().unwrap().push(Ok(staff_session("jwt-9")));
        let (store, persisted, _) = setup(gateway);

        let session = store.login("google-id-token").await.unwrap();
        assert_eq!(session.role(), &Role::Staff);
        assert_eq!(store.state(), SessionState::Authenticated);

        let saved = persisted.snapshot();
        assert_eq!(saved.credential.unwrap().expose(), "jwt-9");
        assert_eq!(saved.profile.unwrap().identity.email, "ravi@example.com");
    }

    #[tokio::test]
    async fn test_login_failure_keeps_server_message() {
        let gateway = ScriptedGateway::default();
        gateway.exchange.lock().unwrap().push(Err(DashboardError::AuthExchangeFailed(
            "User not authorized. Please contact administrator.".to_string(),
        )));
        let (store, persisted, _) = setup(gateway);

        let err = store.login("google-id-token").await.unwrap_err();
        assert_eq!(
            err,
            DashboardError::AuthExchangeFailed(
                "User not authorized. Please contact administrator.".to_string()
            )
        );
        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert!(persisted.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_login_transport_failure_uses_generic_message() {
        let gateway = ScriptedGateway::default();
        gateway
            .exchange
            .lock()
            .unwrap()
            .push(Err(DashboardError::FetchFailed("connection reset".to_string())));
        let (store, _, _) = setup(gateway);

        let err = store.login("google-id-token").await.unwrap_err();
        assert_eq!(
            err,
            DashboardError::AuthExchangeFailed(LOGIN_FAILED_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_login_rejects_empty_token_locally() {
        let (store, _, _) = setup(ScriptedGateway::default());
        let err = store.login("   ").await.unwrap_err();
        assert!(matches!(err, DashboardError::AuthExchangeFailed(_)));
        assert_eq!(store.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_login_rejects_disabled_account() {
        let gateway = ScriptedGateway::default();
        gateway.exchange.lock().unwrap().push(Ok(Session::new(
            profile("Admin", AccountStatus::Disabled),
            BearerToken::new("jwt"),
        )));
        let (store, persisted, _) = setup(gateway);

        assert!(store.login("google-id-token").await.is_err());
        assert!(store.current().is_none());
        assert!(persisted.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let gateway = ScriptedGateway::default();
        gateway.exchange.lock().unwrap().push(Ok(staff_session("jwt")));
        let (store, persisted, _) = setup(gateway);
        store.login("google-id-token").await.unwrap();

        store.logout();
        store.logout();
        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert!(store.context().credential().is_none());
        assert!(persisted.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_logout_then_initialize_stays_signed_out() {
        let gateway = ScriptedGateway::default();
        gateway.exchange.lock().unwrap().push(Ok(staff_session("jwt")));
        let (store, persisted, gateway) = setup(gateway);
        store.login("google-id-token").await.unwrap();

        store.logout();
        assert_eq!(store.initialize().await, SessionState::Unauthenticated);
        assert!(persisted.snapshot().is_empty());
        assert!(gateway.validated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_keeps_display_fields() {
        let gateway = ScriptedGateway::default();
        gateway.exchange.lock().unwrap().push(Ok(staff_session("old")));
        gateway.refresh.lock().unwrap().push(Ok(Session::new(
            Profile {
                identity: Identity {
                    email: "ravi@example.com".to_string(),
                    name: String::new(),
                    picture: None,
                },
                role: Role::Admin,
                status: AccountStatus::Enabled,
            },
            BearerToken::new("new"),
        )));
        let (store, persisted, _) = setup(gateway);
        store.login("google-id-token").await.unwrap();

        let fresh = store.refresh().await.unwrap();
        assert_eq!(fresh.role(), &Role::Admin);
        assert_eq!(fresh.identity().name, "Ravi");
        assert!(fresh.identity().picture.is_some());
        assert_eq!(persisted.snapshot().credential.unwrap().expose(), "new");
    }

    #[tokio::test]
    async fn test_refresh_denied_clears_session() {
        let gateway = ScriptedGateway::default();
        gateway.exchange.lock().unwrap().push(Ok(staff_session("old")));
        gateway
            .refresh
            .lock()
            .unwrap()
            .push(Err(DashboardError::AuthDenied("inactive".to_string())));
        let (store, persisted, _) = setup(gateway);
        store.login("google-id-token").await.unwrap();

        assert!(store.refresh().await.is_err());
        assert!(store.current().is_none());
        assert!(persisted.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_requires_session() {
        let (store, _, _) = setup(ScriptedGateway::default());
        assert_eq!(
            store.refresh().await.unwrap_err(),
            DashboardError::NotAuthenticated
        );
    }

    #[tokio::test]
    async fn test_can_access_follows_session_role() {
        let gateway = ScriptedGateway::default();
        gateway.exchange.lock().unwrap().push(Ok(staff_session("jwt")));
        let (store, _, _) = setup(gateway);

        assert!(!store.can_access("/"));
        store.login("google-id-token").await.unwrap();
        assert!(store.can_access("/"));
        assert!(!store.can_access("/users"));
    }
}
