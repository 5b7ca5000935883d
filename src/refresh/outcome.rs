use tracing::{Level, event};

use crate::credential::Credential;

/// Why a refresh cycle resolved without a credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshFailure {
    /// No refresh token was resident; no exchange was attempted.
    NoRefreshToken,
    /// Every configured endpoint candidate was tried once and failed.
    AllCandidatesFailed,
}

/// The single result every waiter on a refresh cycle receives.
#[derive(Clone, Debug)]
pub enum RefreshOutcome {
    Renewed(Credential),
    Failed(RefreshFailure),
}

impl RefreshOutcome {
    pub fn success(&self) -> bool {
        matches!(self, RefreshOutcome::Renewed(_))
    }

    pub fn credential(&self) -> Option<&Credential> {
        match self {
            RefreshOutcome::Renewed(credential) => Some(credential),
            RefreshOutcome::Failed(_) => None,
        }
    }

    pub fn log(&self) {
        match self {
            RefreshOutcome::Renewed(_) => {
                event!(Level::INFO, success = true, "refresh.outcome")
            }
            RefreshOutcome::Failed(failure) => {
                event!(Level::INFO, success = false, reason = ?failure, "refresh.outcome")
            }
        }
    }
}
