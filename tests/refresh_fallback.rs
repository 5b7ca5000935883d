mod common;

use std::sync::Arc;

use common::{client_with_config, grant_body, jwt_expiring_in};
use gateway_client::{
    ACCESS_TOKEN_KEY, Config, CredentialStore, MemoryCredentialStore, REFRESH_TOKEN_KEY,
    RefreshCoordinator, RefreshFailure, RefreshOutcome,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fallback_config(server: &MockServer) -> Config {
    Config::from_values(
        server.uri(),
        Some(vec![
            "/auth/refresh-a".to_string(),
            "/auth/refresh-b".to_string(),
            "/auth/refresh-c".to_string(),
        ]),
        None,
        None,
        None,
    )
}

#[tokio::test]
async fn falls_back_through_endpoint_candidates_in_order() {
    let server = MockServer::start().await;
    let renewed = jwt_expiring_in(3600);

    Mock::given(method("POST"))
        .and(path("/auth/refresh-a"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant_body(&renewed, "r2")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh-c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant_body(&renewed, "r2")))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/cart/items"))
        .and(header("Authorization", format!("Bearer {renewed}")))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_with_config(fallback_config(&server), &jwt_expiring_in(-10), "r1");
    client.get("/api/cart/items").await.expect("delivered");
    assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some(renewed.as_str()));
}

#[tokio::test]
async fn concurrent_callers_observe_one_exchange_and_each_candidate_once() {
    let server = MockServer::start().await;

    for candidate in ["/auth/refresh-a", "/auth/refresh-b", "/auth/refresh-c"] {
        Mock::given(method("POST"))
            .and(path(candidate))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
    }

    let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
    store.set(REFRESH_TOKEN_KEY, "r1");
    let endpoints = ["/auth/refresh-a", "/auth/refresh-b", "/auth/refresh-c"]
        .iter()
        .map(|p| format!("{}{}", server.uri(), p))
        .collect();
    let coordinator = RefreshCoordinator::new(reqwest::Client::new(), store, endpoints);

    let (a, b, c) = tokio::join!(
        coordinator.refresh(),
        coordinator.refresh(),
        coordinator.refresh(),
    );
    for outcome in [a, b, c] {
        assert!(!outcome.success());
        assert!(matches!(
            outcome,
            RefreshOutcome::Failed(RefreshFailure::AllCandidatesFailed)
        ));
    }
}

#[tokio::test]
async fn refresh_without_resident_refresh_token_fails_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh-a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
    let coordinator = RefreshCoordinator::new(
        reqwest::Client::new(),
        store,
        vec![format!("{}/auth/refresh-a", server.uri())],
    );
    assert!(matches!(
        coordinator.refresh().await,
        RefreshOutcome::Failed(RefreshFailure::NoRefreshToken)
    ));
}
