use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::credential::Credential;
use crate::errors::Error;
use crate::refresh::RefreshOutcome;
use crate::request_context::RequestContext;
use crate::session::AuthSession;
use crate::transport::TransportResponse;

/// What the dispatch loop should do with a received response.
pub(crate) enum Disposition {
    Deliver(TransportResponse),
    /// Resubmit the original request once, carrying the renewed credential.
    Resubmit(Credential),
}

/// Post-receive hook: classifies the response and drives the 401 recovery path.
pub(crate) async fn disposition(
    session: &AuthSession,
    ctx: &mut RequestContext,
    response: TransportResponse,
) -> Result<Disposition, Error> {
    let status = response.status;
    if status.is_success() {
        return Ok(Disposition::Deliver(response));
    }

    match status {
        StatusCode::UNAUTHORIZED => {
            if ctx.resubmitted() {
                warn!(path = %ctx.path(), "second 401 after resubmission");
                return Err(reject_expired(session, ctx.path()));
            }
            match session.coordinator().refresh().await {
                RefreshOutcome::Renewed(credential) => {
                    debug!(path = %ctx.path(), "resubmitting with renewed credential");
                    ctx.mark_resubmitted();
                    Ok(Disposition::Resubmit(credential))
                }
                RefreshOutcome::Failed(_) => Err(reject_expired(session, ctx.path())),
            }
        }
        // 403 is never a credential problem; no refresh is attempted.
        StatusCode::FORBIDDEN => Err(Error::Forbidden(response.body)),
        StatusCode::NOT_FOUND => Err(Error::NotFound(ctx.path().to_string())),
        StatusCode::UNPROCESSABLE_ENTITY => Err(Error::Validation(response.json_body())),
        status if status.is_server_error() => Err(Error::Server(status, response.body)),
        status => Err(Error::UnexpectedStatus(status, response.body)),
    }
}

fn reject_expired(session: &AuthSession, path: &str) -> Error {
    if session.routes().preserves_on_401(path) {
        debug!(path = %path, "session expired on preserve-on-401 path; keeping credentials");
    } else {
        session.purge();
        if session.routes().is_protected(path) {
            session.expired_signal().raise(path);
        }
    }
    Error::SessionExpired
}
