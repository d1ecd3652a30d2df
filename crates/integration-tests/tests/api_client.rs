//! Integration tests for the API client: credential attachment and error
//! classification.

use std::sync::Arc;

use pass_client::{ApiError, Auth, Credential, MemoryTokenStore, RequestOptions};
use pass_integration_tests::{ADVISOR_TOKEN, MockBackend};
use serde_json::{Value, json};

// ============================================================================
// Credential Attachment
// ============================================================================

#[tokio::test]
async fn test_stored_token_is_sent_as_bearer() {
    let backend = MockBackend::spawn().await;
    let api = backend.client(Arc::new(MemoryTokenStore::with_token(ADVISOR_TOKEN)));

    let echoed: Value = api.get("/echo").await.expect("echo failed");

    assert_eq!(echoed["authorization"], "Bearer T1");
    assert_eq!(echoed["method"], "GET");
}

#[tokio::test]
async fn test_no_token_sends_no_authorization_header() {
    let backend = MockBackend::spawn().await;
    let api = backend.client(Arc::new(MemoryTokenStore::new()));

    let echoed: Value = api.get("/echo").await.expect("echo failed");

    assert_eq!(echoed["authorization"], Value::Null);
}

#[tokio::test]
async fn test_bearer_override_ignores_store() {
    let backend = MockBackend::spawn().await;
    let api = backend.client(Arc::new(MemoryTokenStore::with_token(ADVISOR_TOKEN)));

    let options = RequestOptions::get().with_auth(Auth::Bearer(Credential::new("fresh")));
    let echoed = api.request("/echo", options).await.expect("echo failed");
    assert_eq!(echoed["authorization"], "Bearer fresh");

    let options = RequestOptions::get().with_auth(Auth::Anonymous);
    let echoed = api.request("/echo", options).await.expect("echo failed");
    assert_eq!(echoed["authorization"], Value::Null);
}

#[tokio::test]
async fn test_json_body_and_content_type() {
    let backend = MockBackend::spawn().await;
    let api = backend.client(Arc::new(MemoryTokenStore::new()));

    let echoed: Value = api
        .post("/echo", Some(&json!({"note": "hello"})))
        .await
        .expect("echo failed");

    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["body"], json!({"note": "hello"}));

    let recorded = backend.requests();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].path, "/echo");
    assert_eq!(recorded[0].content_type.as_deref(), Some("application/json"));
}

// ============================================================================
// Error Classification
// ============================================================================

#[tokio::test]
async fn test_backend_error_message_is_surfaced() {
    let backend = MockBackend::spawn().await;
    let api = backend.client(Arc::new(MemoryTokenStore::new()));

    let body = json!({"email": "advisor@example.edu", "password": "wrong"});
    let err = api
        .request("/login", RequestOptions::post(Some(body)))
        .await
        .expect_err("login should fail");

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "bad credentials");
}

#[tokio::test]
async fn test_unparseable_error_body_uses_generic_message() {
    let backend = MockBackend::spawn().await;
    let api = backend.client(Arc::new(MemoryTokenStore::new()));

    let err = api
        .request("/broken", RequestOptions::get())
        .await
        .expect_err("broken endpoint should fail");

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Request failed (500)");
}

#[tokio::test]
async fn test_schema_mismatch_is_decode_error() {
    let backend = MockBackend::spawn().await;
    let api = backend.client(Arc::new(MemoryTokenStore::new()));

    let err = api
        .get::<pass_core::Identity>("/echo")
        .await
        .expect_err("echo is not an identity");
    assert!(matches!(err, ApiError::Decode { .. }));
    assert_eq!(err.status(), None);
}

// ============================================================================
// Mock Backend
// ============================================================================

#[tokio::test]
async fn test_mock_requires_bearer_for_identity() {
    let backend = MockBackend::spawn().await;
    let http = reqwest::Client::new();

    let resp = http
        .get(format!("{}/me", backend.base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    let resp = http
        .get(format!("{}/me", backend.base_url()))
        .bearer_auth(ADVISOR_TOKEN)
        .send()
        .await
        .expect("request failed");
    assert!(resp.status().is_success());
    let identity: Value = resp.json().await.expect("identity body");
    assert_eq!(identity, json!({"id": 1, "name": "A", "role": "advisor"}));
}
