use std::time::SystemTime;

use tracing::{debug, warn};

use crate::credential::{TokenHealth, classify};
use crate::errors::Error;
use crate::session::AuthSession;
use crate::transport::TransportRequest;

/// Pre-send hook: fails closed on protected paths with no credential, renews
/// proactively, and attaches the bearer header.
pub(crate) async fn prepare(
    session: &AuthSession,
    request: TransportRequest,
) -> Result<TransportRequest, Error> {
    let Some(credential) = session.current_credential() else {
        if session.routes().is_protected(&request.path) {
            debug!(path = %request.path, "request.blocked_no_credential");
            return Err(Error::NoCredential(request.path.clone()));
        }
        return Ok(request);
    };

    let health = classify(&credential, SystemTime::now(), session.renewal_margin());
    if !health.requires_refresh() {
        return Ok(request.with_bearer(credential.access_token));
    }

    debug!(path = %request.path, health = ?health, "request.proactive_refresh");
    if let Some(renewed) = session.coordinator().refresh().await.credential() {
        return Ok(request.with_bearer(renewed.access_token.clone()));
    }

    if health.is_usable() {
        // Proactive renewal failed but the resident credential is still valid.
        warn!(path = %request.path, "refresh failed; proceeding with near-expiry credential");
        return Ok(request.with_bearer(credential.access_token));
    }

    // Proceed bare and let the backend's 401 drive recovery post-receive.
    warn!(path = %request.path, "refresh failed; proceeding without credential");
    Ok(request)
}
