#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use gateway_client::{
    ACCESS_TOKEN_KEY, Config, CredentialStore, GatewayClient, MemoryCredentialStore,
    REFRESH_TOKEN_KEY,
};
use tracing::subscriber::{DefaultGuard, set_default};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Registry, fmt};
use wiremock::MockServer;

/// Builds a JWT-shaped token whose `exp` claim sits `offset_secs` from now.
pub fn jwt_expiring_in(offset_secs: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    let exp = now + offset_secs;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        format!(r#"{{"sub":"user-1","iat":{},"exp":{}}}"#, exp - 3600, exp).as_bytes(),
    );
    format!("{header}.{payload}.sig")
}

pub fn config(server: &MockServer) -> Config {
    Config::from_values(
        server.uri(),
        Some(vec!["/api/auth/refresh".to_string()]),
        None,
        None,
        None,
    )
}

pub fn grant_body(access_token: &str, refresh_token: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
    })
}

pub fn seeded_client(
    server: &MockServer,
    access: &str,
    refresh: &str,
) -> (GatewayClient, Arc<MemoryCredentialStore>) {
    client_with_config(config(server), access, refresh)
}

pub fn client_with_config(
    config: Config,
    access: &str,
    refresh: &str,
) -> (GatewayClient, Arc<MemoryCredentialStore>) {
    let store = Arc::new(MemoryCredentialStore::new());
    store.set(ACCESS_TOKEN_KEY, access);
    store.set(REFRESH_TOKEN_KEY, refresh);
    let client = GatewayClient::new(&config, store.clone()).expect("client builds");
    (client, store)
}

struct VecWriter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl std::io::Write for VecWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.lines.lock().unwrap();
        guard.push(String::from_utf8_lossy(buf).into_owned());
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn capture_logs() -> (Arc<Mutex<Vec<String>>>, DefaultGuard) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let writer_lines = lines.clone();
    let subscriber = Registry::default().with(
        fmt::Layer::default()
            .with_writer(move || VecWriter {
                lines: writer_lines.clone(),
            })
            .with_target(false)
            .with_level(true)
            .with_ansi(false),
    );
    let guard = set_default(subscriber);
    (lines, guard)
}
