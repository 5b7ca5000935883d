//! Credential pair with derived expiry, plus the pure expiry evaluator.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Access/refresh token pair plus expiry metadata decoded from the access token.
/// Replaced wholesale on refresh, never mutated in place.
#[derive(Clone, Debug)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub issued_at: SystemTime,
    pub expires_at: SystemTime,
    parsed: bool,
}

impl Credential {
    /// Builds a credential, deriving `expires_at` from the access token's `exp` claim.
    /// A token that fails to decode is treated as already expired.
    pub fn from_tokens(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        let access_token = access_token.into();
        match decode_expiry_claims(&access_token) {
            Some(claims) => {
                let issued_at = claims
                    .iat
                    .map(epoch_secs_to_time)
                    .unwrap_or_else(SystemTime::now);
                Self {
                    access_token,
                    refresh_token: refresh_token.into(),
                    issued_at,
                    expires_at: epoch_secs_to_time(claims.exp),
                    parsed: true,
                }
            }
            None => Self {
                access_token,
                refresh_token: refresh_token.into(),
                issued_at: UNIX_EPOCH,
                expires_at: UNIX_EPOCH,
                parsed: false,
            },
        }
    }

    /// Returns how long until the credential expires relative to the provided time.
    pub fn remaining(&self, now: SystemTime) -> Option<Duration> {
        self.expires_at.duration_since(now).ok()
    }
}

/// Expiry classification relative to a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenHealth {
    Valid,
    ExpiringSoon,
    Expired,
    Unparseable,
}

impl TokenHealth {
    /// `Unparseable` and `Expired` both require a refresh attempt before reuse.
    pub fn requires_refresh(&self) -> bool {
        !matches!(self, TokenHealth::Valid)
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, TokenHealth::Valid | TokenHealth::ExpiringSoon)
    }
}

/// Pure function of `(credential, now, margin)`.
pub fn classify(credential: &Credential, now: SystemTime, margin: Duration) -> TokenHealth {
    if !credential.parsed {
        return TokenHealth::Unparseable;
    }
    if credential.expires_at <= now {
        return TokenHealth::Expired;
    }
    if credential.expires_at <= now + margin {
        return TokenHealth::ExpiringSoon;
    }
    TokenHealth::Valid
}

struct ExpiryClaims {
    exp: u64,
    iat: Option<u64>,
}

/// Decodes the payload segment of a JWT-shaped token. Requires three dot-separated
/// base64url segments and a numeric `exp` claim; `iat` is optional.
fn decode_expiry_claims(token: &str) -> Option<ExpiryClaims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    let _signature = segments.next()?;
    if segments.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?.as_u64()?;
    let iat = claims.get("iat").and_then(|v| v.as_u64());
    Some(ExpiryClaims { exp, iat })
}

fn epoch_secs_to_time(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}
