use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::errors::Error;
use crate::intercept;
use crate::intercept::Disposition;
use crate::request_context::RequestContext;
use crate::session::AuthSession;
use crate::store::CredentialStore;
use crate::transport::{HttpTransport, Transport, TransportRequest, TransportResponse};

/// Authenticated client for the backend gateway. Business consumers (catalog, cart,
/// orders, notifications) call `send` and receive a response or a classified
/// rejection; credential repair happens here, never at the call sites.
pub struct GatewayClient {
    session: AuthSession,
    transport: Arc<dyn Transport>,
}

impl GatewayClient {
    pub fn new(config: &Config, store: Arc<dyn CredentialStore>) -> Result<Self, Error> {
        let http = reqwest::Client::new();
        let base_url = config.validated_base_url()?;
        let session = AuthSession::create(config, store, http.clone())?;
        let transport = Arc::new(HttpTransport::new(http, base_url));
        Ok(Self { session, transport })
    }

    /// Builds a client over a caller-supplied transport; the refresh exchange still
    /// uses its own HTTP client against the configured endpoints.
    pub fn with_transport(
        config: &Config,
        store: Arc<dyn CredentialStore>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, Error> {
        let session = AuthSession::create(config, store, reqwest::Client::new())?;
        Ok(Self { session, transport })
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<TransportResponse, Error> {
        let mut ctx = RequestContext::new(path);
        let request =
            intercept::request::prepare(&self.session, TransportRequest::new(method, path, body))
                .await?;
        let mut response = self.transport.execute(request.clone()).await?;
        // The resubmitted flag on the context bounds this loop to two iterations.
        loop {
            match intercept::response::disposition(&self.session, &mut ctx, response).await? {
                Disposition::Deliver(delivered) => {
                    debug!(path = %ctx.path(), status = %delivered.status, "request.delivered");
                    return Ok(delivered);
                }
                Disposition::Resubmit(credential) => {
                    response = self
                        .transport
                        .execute(request.clone().with_bearer(credential.access_token))
                        .await?;
                }
            }
        }
    }

    pub async fn get(&self, path: &str) -> Result<TransportResponse, Error> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<TransportResponse, Error> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<TransportResponse, Error> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<TransportResponse, Error> {
        self.send(Method::DELETE, path, None).await
    }
}
