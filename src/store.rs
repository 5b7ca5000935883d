//! Key/value credential persistence behind a capability trait.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::credential::Credential;

pub const ACCESS_TOKEN_KEY: &str = "gateway.access_token";
pub const REFRESH_TOKEN_KEY: &str = "gateway.refresh_token";

/// Storage abstraction for the resident credential pair. Memory-backed in tests,
/// persistent in production. Refreshed values are written only by the coordinator.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn clear(&self);
}

/// In-process store over a mutexed map.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.slots.lock() {
            Ok(slots) => slots.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self.slots.lock() {
            Ok(mut slots) => {
                slots.insert(key.to_string(), value.to_string());
            }
            Err(poisoned) => {
                poisoned
                    .into_inner()
                    .insert(key.to_string(), value.to_string());
            }
        }
    }

    fn clear(&self) {
        match self.slots.lock() {
            Ok(mut slots) => slots.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

/// Reads the resident credential, deriving expiry from the stored access token.
pub fn load_credential(store: &dyn CredentialStore) -> Option<Credential> {
    let access = store.get(ACCESS_TOKEN_KEY)?;
    let refresh = store.get(REFRESH_TOKEN_KEY).unwrap_or_default();
    Some(Credential::from_tokens(access, refresh))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
        store.set(ACCESS_TOKEN_KEY, "a");
        store.set(REFRESH_TOKEN_KEY, "r");
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("a"));
        store.clear();
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
        assert!(store.get(REFRESH_TOKEN_KEY).is_none());
    }

    #[test]
    fn load_credential_requires_access_slot() {
        let store = MemoryCredentialStore::new();
        store.set(REFRESH_TOKEN_KEY, "r");
        assert!(load_credential(&store).is_none());
        store.set(ACCESS_TOKEN_KEY, "not-a-jwt");
        let cred = load_credential(&store).unwrap();
        assert_eq!(cred.refresh_token, "r");
    }
}
