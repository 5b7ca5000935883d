//! Explicit session object owning the shared auth state the interceptors consult.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::config::{Config, RoutePolicy};
use crate::credential::Credential;
use crate::errors::Error;
use crate::refresh::RefreshCoordinator;
use crate::store::{ACCESS_TOKEN_KEY, CredentialStore, REFRESH_TOKEN_KEY, load_credential};
use crate::telemetry::session::SessionExpiredSignal;

/// Controlled-lifecycle replacement for process-global auth state: the credential
/// store handle, the refresh coordinator, the route policy, and the session-expired
/// signal all live here and are passed to the interceptors by reference.
#[derive(Clone)]
pub struct AuthSession {
    store: Arc<dyn CredentialStore>,
    coordinator: RefreshCoordinator,
    routes: RoutePolicy,
    renewal_margin: Duration,
    expired: Arc<SessionExpiredSignal>,
}

impl AuthSession {
    pub fn create(
        config: &Config,
        store: Arc<dyn CredentialStore>,
        http: Client,
    ) -> Result<Self, Error> {
        let base_url = config.validated_base_url()?;
        let endpoints = config
            .refresh_candidates()?
            .iter()
            .map(|path| {
                if path.starts_with('/') {
                    format!("{base_url}{path}")
                } else {
                    format!("{base_url}/{path}")
                }
            })
            .collect();
        let coordinator = RefreshCoordinator::new(http, Arc::clone(&store), endpoints);
        Ok(Self {
            store,
            coordinator,
            routes: config.route_policy(),
            renewal_margin: config.renewal_margin(),
            expired: Arc::new(SessionExpiredSignal::new()),
        })
    }

    /// Installs a credential pair (login) and re-arms the session-expired signal.
    pub fn install_credentials(&self, access_token: &str, refresh_token: &str) {
        self.store.set(ACCESS_TOKEN_KEY, access_token);
        self.store.set(REFRESH_TOKEN_KEY, refresh_token);
        self.expired.reset();
    }

    /// Clears the store and re-arms the signal; the session is reusable after a
    /// subsequent `install_credentials`.
    pub fn dispose(&self) {
        self.store.clear();
        self.expired.reset();
    }

    pub fn on_session_expired(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.expired.subscribe(hook);
    }

    pub fn current_credential(&self) -> Option<Credential> {
        load_credential(self.store.as_ref())
    }

    pub(crate) fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    pub(crate) fn routes(&self) -> &RoutePolicy {
        &self.routes
    }

    pub(crate) fn renewal_margin(&self) -> Duration {
        self.renewal_margin
    }

    pub(crate) fn expired_signal(&self) -> &SessionExpiredSignal {
        &self.expired
    }

    pub(crate) fn purge(&self) {
        self.store.clear();
    }
}
