//! Gateway client configuration: base URL, refresh endpoint candidates, route policy.

use std::time::Duration;

use crate::errors::Error;

/// Default proactive-renewal margin: refresh when less than this remains on the token.
pub const DEFAULT_RENEWAL_MARGIN: Duration = Duration::from_secs(5 * 60);

/// Ordered refresh endpoint candidates kept for backend compatibility. Callers with a
/// single live refresh route should override this list.
const DEFAULT_REFRESH_ENDPOINTS: &[&str] = &[
    "/api/auth/refresh",
    "/api/auth/token/refresh",
    "/api/token/refresh",
];

const DEFAULT_PROTECTED_PATHS: &[&str] = &[
    "/api/notifications",
    "/api/cart",
    "/api/wishlist",
    "/api/orders",
    "/api/payments",
    "/api/recipes",
];

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Config {
    pub base_url: String,
    pub refresh_endpoints: Option<Vec<String>>,
    pub protected_paths: Option<Vec<String>>,
    pub preserve_on_401: Option<Vec<String>>,
    pub renewal_margin_secs: Option<u64>,
}

impl Config {
    pub fn from_values(
        base_url: impl Into<String>,
        refresh_endpoints: Option<Vec<String>>,
        protected_paths: Option<Vec<String>>,
        preserve_on_401: Option<Vec<String>>,
        renewal_margin_secs: Option<u64>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            refresh_endpoints,
            protected_paths,
            preserve_on_401,
            renewal_margin_secs,
        }
    }

    pub fn from_file(path: &str) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// # ENV Vars
    /// * `GATEWAY_BASE_URL` - Backend gateway base URL (required)
    /// * `GATEWAY_REFRESH_ENDPOINTS` - Comma-separated refresh endpoint paths
    /// * `GATEWAY_PROTECTED_PATHS` - Comma-separated protected path prefixes
    /// * `GATEWAY_PRESERVE_ON_401` - Comma-separated preserve-on-401 path prefixes
    /// * `GATEWAY_RENEWAL_MARGIN_SECS` - Proactive renewal margin in seconds
    pub fn from_env() -> Result<Self, Error> {
        let base_url = std::env::var("GATEWAY_BASE_URL")
            .map_err(|_| Error::Config("Missing GATEWAY_BASE_URL env var".to_string()))?;
        let renewal_margin_secs = match std::env::var("GATEWAY_RENEWAL_MARGIN_SECS") {
            Ok(raw) => Some(raw.parse().map_err(|_| {
                Error::Config(format!("Invalid GATEWAY_RENEWAL_MARGIN_SECS '{}'", raw))
            })?),
            Err(_) => None,
        };
        Ok(Self {
            base_url,
            refresh_endpoints: env_list("GATEWAY_REFRESH_ENDPOINTS"),
            protected_paths: env_list("GATEWAY_PROTECTED_PATHS"),
            preserve_on_401: env_list("GATEWAY_PRESERVE_ON_401"),
            renewal_margin_secs,
        })
    }

    /// Normalizes and validates the base URL before any network call is made.
    pub(crate) fn validated_base_url(&self) -> Result<String, Error> {
        let base = if self.base_url.starts_with("http") {
            self.base_url.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", self.base_url.trim_end_matches('/'))
        };
        let _ = reqwest::Url::parse(&base)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", base, e)))?;
        Ok(base)
    }

    pub(crate) fn refresh_candidates(&self) -> Result<Vec<String>, Error> {
        let candidates = match &self.refresh_endpoints {
            Some(list) if !list.is_empty() => list.clone(),
            Some(_) => {
                return Err(Error::Config(
                    "refresh_endpoints must not be empty".to_string(),
                ));
            }
            None => DEFAULT_REFRESH_ENDPOINTS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        };
        Ok(candidates)
    }

    pub(crate) fn renewal_margin(&self) -> Duration {
        self.renewal_margin_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RENEWAL_MARGIN)
    }

    pub(crate) fn route_policy(&self) -> RoutePolicy {
        let protected = self.protected_paths.clone().unwrap_or_else(|| {
            DEFAULT_PROTECTED_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect()
        });
        RoutePolicy::new(protected, self.preserve_on_401.clone().unwrap_or_default())
    }
}

fn env_list(var: &str) -> Option<Vec<String>> {
    std::env::var(var).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

/// Prefix-matching policy over the protected-path set and the preserve-on-401 allow-list.
#[derive(Clone, Debug)]
pub struct RoutePolicy {
    protected: Vec<String>,
    preserve_on_401: Vec<String>,
}

impl RoutePolicy {
    pub fn new(protected: Vec<String>, preserve_on_401: Vec<String>) -> Self {
        Self {
            protected: protected.into_iter().map(normalize_prefix).collect(),
            preserve_on_401: preserve_on_401.into_iter().map(normalize_prefix).collect(),
        }
    }

    /// True when the path requires a resident credential to be meaningful.
    pub fn is_protected(&self, path: &str) -> bool {
        let path = ensure_leading_slash(path);
        self.protected.iter().any(|p| path.starts_with(p.as_str()))
    }

    /// True when a 401 on this path must not evict local credential state.
    pub fn preserves_on_401(&self, path: &str) -> bool {
        let path = ensure_leading_slash(path);
        self.preserve_on_401
            .iter()
            .any(|p| path.starts_with(p.as_str()))
    }
}

fn normalize_prefix(prefix: String) -> String {
    ensure_leading_slash(&prefix)
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
