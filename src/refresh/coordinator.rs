use std::sync::Arc;
use std::time::SystemTime;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::credential::Credential;
use crate::errors::Error;
use crate::store::{ACCESS_TOKEN_KEY, CredentialStore, REFRESH_TOKEN_KEY};
use crate::telemetry::refresh::RefreshTelemetry;

use super::{RefreshFailure, RefreshOutcome};

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshGrant {
    access_token: String,
    refresh_token: Option<String>,
}

type SharedOutcome = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Single-flight controller for the credential refresh exchange. Concurrent callers
/// attach to the same pending outcome; at most one network exchange is ever in flight.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    http: Client,
    store: Arc<dyn CredentialStore>,
    endpoints: Vec<String>,
    pending: Mutex<Option<SharedOutcome>>,
}

impl RefreshCoordinator {
    /// `endpoints` are absolute refresh URLs in fallback order; each candidate is
    /// tried at most once per cycle.
    pub fn new(http: Client, store: Arc<dyn CredentialStore>, endpoints: Vec<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                store,
                endpoints,
                pending: Mutex::new(None),
            }),
        }
    }

    /// Callable concurrently from arbitrarily many sites; every caller inside one
    /// coordination window observes the outcome of the same exchange.
    pub async fn refresh(&self) -> RefreshOutcome {
        let cycle = {
            let mut pending = self.inner.pending.lock().await;
            match pending.as_ref() {
                Some(in_flight) => {
                    debug!("refresh.join_in_flight");
                    in_flight.clone()
                }
                None => {
                    let inner = Arc::clone(&self.inner);
                    let cycle: SharedOutcome = async move {
                        let telemetry = RefreshTelemetry::new("gateway.refresh");
                        let outcome = inner.exchange(&telemetry).await;
                        // Clear the pending slot before any waiter's continuation runs
                        // so a new expiry can start a fresh cycle.
                        inner.pending.lock().await.take();
                        outcome.log();
                        outcome
                    }
                    .boxed()
                    .shared();
                    *pending = Some(cycle.clone());
                    cycle
                }
            }
        };
        cycle.await
    }
}

impl Inner {
    async fn exchange(&self, telemetry: &RefreshTelemetry) -> RefreshOutcome {
        let Some(refresh_token) = self.store.get(REFRESH_TOKEN_KEY) else {
            telemetry.emit_failure(
                &Error::RefreshExchange("no refresh token resident".to_string()),
                SystemTime::now(),
            );
            return RefreshOutcome::Failed(RefreshFailure::NoRefreshToken);
        };
        telemetry.emit_start(SystemTime::now());
        for endpoint in &self.endpoints {
            match self.try_endpoint(endpoint, &refresh_token).await {
                Ok(grant) => {
                    let renewed_refresh = grant.refresh_token.unwrap_or(refresh_token);
                    self.store.set(ACCESS_TOKEN_KEY, &grant.access_token);
                    self.store.set(REFRESH_TOKEN_KEY, &renewed_refresh);
                    telemetry.emit_success(endpoint, SystemTime::now());
                    return RefreshOutcome::Renewed(Credential::from_tokens(
                        grant.access_token,
                        renewed_refresh,
                    ));
                }
                Err(err) => telemetry.emit_endpoint_fallback(endpoint, &err),
            }
        }
        telemetry.emit_failure(
            &Error::RefreshExchange(format!(
                "all {} endpoint candidates failed",
                self.endpoints.len()
            )),
            SystemTime::now(),
        );
        RefreshOutcome::Failed(RefreshFailure::AllCandidatesFailed)
    }

    async fn try_endpoint(
        &self,
        endpoint: &str,
        refresh_token: &str,
    ) -> Result<RefreshGrant, Error> {
        let resp = self
            .http
            .post(endpoint)
            .header("User-Agent", "gateway-client-rust/0.1.0")
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }
}
