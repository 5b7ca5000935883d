//! Authenticated HTTP client layer for the shopping-platform gateway: attaches
//! short-lived bearer credentials, repairs expiry transparently, and guarantees at
//! most one refresh exchange is in flight at any time.

mod client;
mod config;
mod credential;
mod errors;
mod intercept;
mod refresh;
mod request_context;
mod session;
mod store;
pub mod telemetry;
mod transport;

pub use client::GatewayClient;
pub use config::{Config, DEFAULT_RENEWAL_MARGIN, RoutePolicy};
pub use credential::{Credential, TokenHealth, classify};
pub use errors::Error;
pub use refresh::{RefreshCoordinator, RefreshFailure, RefreshOutcome};
pub use request_context::RequestContext;
pub use session::AuthSession;
pub use store::{
    ACCESS_TOKEN_KEY, CredentialStore, MemoryCredentialStore, REFRESH_TOKEN_KEY, load_credential,
};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
