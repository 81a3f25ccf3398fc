//! End-to-end tests for the HTTP contract, driving the router in-process.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use warden_server::routes;
use warden_server::state::AppState;
use warden_storage::key_provider::InMemoryKeyProvider;
use warden_storage::user_file_store::EncryptedUserStore;

/// Fresh app backed by an encrypted store in a temp dir. The `TempDir`
/// must stay alive for the duration of the test.
fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = EncryptedUserStore::new(
        dir.path().join("users.json.enc"),
        InMemoryKeyProvider::default(),
    );
    let app = routes::router(AppState::new(Arc::new(store)));
    (app, dir)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

fn alice() -> Value {
    json!({"username": "alice", "password": "p1", "name": "Alice"})
}

#[tokio::test]
async fn register_succeeds_then_rejects_duplicate() {
    let (app, _dir) = test_app();

    let (status, body) = send(&app, Method::POST, "/register", Some(alice())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = send(&app, Method::POST, "/register", Some(alice())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "user already exists"}));
}

#[tokio::test]
async fn register_rejects_missing_or_empty_fields() {
    let (app, _dir) = test_app();

    let bad_bodies = [
        json!({"username": "alice", "password": "p1"}),
        json!({"username": "", "password": "p1", "name": "Alice"}),
        json!({}),
    ];
    for body in bad_bodies {
        let (status, response) = send(&app, Method::POST, "/register", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": "missing fields"}));
    }
}

#[tokio::test]
async fn login_checks_exact_credentials() {
    let (app, _dir) = test_app();
    send(&app, Method::POST, "/register", Some(alice())).await;

    let wrong = json!({"username": "alice", "password": "wrong"});
    let (status, body) = send(&app, Method::POST, "/login", Some(wrong)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "invalid credentials"}));

    let right = json!({"username": "alice", "password": "p1"});
    let (status, body) = send(&app, Method::POST, "/login", Some(right)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "name": "Alice"}));
}

#[tokio::test]
async fn login_with_unknown_user_is_unauthorized() {
    let (app, _dir) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        Some(json!({"username": "ghost", "password": "p"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "invalid credentials"}));
}

#[tokio::test]
async fn admin_create_list_delete_lifecycle() {
    let (app, _dir) = test_app();

    let bob = json!({"username": "bob", "password": "p2", "name": "Bob"});
    let (status, body) = send(&app, Method::POST, "/admins", Some(bob)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = send(&app, Method::GET, "/admins", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"username": "bob", "name": "Bob"}]));

    let (status, body) = send(&app, Method::DELETE, "/admins/bob", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = send(&app, Method::DELETE, "/admins/bob", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "user not found"}));
}

#[tokio::test]
async fn listing_never_exposes_password_material() {
    let (app, _dir) = test_app();
    send(&app, Method::POST, "/register", Some(alice())).await;

    let (_, body) = send(&app, Method::GET, "/admins", None).await;
    let entries = body.as_array().expect("array body");
    for entry in entries {
        assert!(entry.get("password").is_none());
        assert!(entry.get("password_hash").is_none());
    }
}

#[tokio::test]
async fn bootstrap_starts_empty_and_persists_registrations() {
    let (app, _dir) = test_app();

    let (status, body) = send(&app, Method::GET, "/admins", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    send(&app, Method::POST, "/register", Some(alice())).await;

    let (status, body) = send(&app, Method::GET, "/admins", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"username": "alice", "name": "Alice"}]));
}

#[tokio::test]
async fn listing_preserves_insertion_order() {
    let (app, _dir) = test_app();

    for (username, name) in [("a", "A"), ("b", "B"), ("c", "C")] {
        let body = json!({"username": username, "password": "p", "name": name});
        send(&app, Method::POST, "/admins", Some(body)).await;
    }

    let (_, body) = send(&app, Method::GET, "/admins", None).await;
    let usernames: Vec<_> = body
        .as_array()
        .expect("array body")
        .iter()
        .map(|v| v["username"].as_str().expect("username").to_string())
        .collect();
    assert_eq!(usernames, ["a", "b", "c"]);
}

#[tokio::test]
async fn failed_mutations_leave_no_trace() {
    let (app, _dir) = test_app();
    send(&app, Method::POST, "/register", Some(alice())).await;

    // Duplicate insert and unknown delete both fail before save.
    send(&app, Method::POST, "/register", Some(alice())).await;
    send(&app, Method::DELETE, "/admins/nobody", None).await;

    let (_, body) = send(&app, Method::GET, "/admins", None).await;
    assert_eq!(body, json!([{"username": "alice", "name": "Alice"}]));
}
