/// Common test utilities for 10x Cards integration tests
///
/// This file contains shared functions and utilities for all integration
/// tests: test application setup over an in-memory database with the mock
/// AI client, plus helpers for registering users and issuing requests.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tenx_cards::{AppState, create_app, db::init_pool, run_migrations, services::OpenRouterClient};
use tower::{Service, ServiceExt};

/// Creates a test application with an in-memory SQLite database
///
/// This helper function:
/// 1. Creates a unique shared in-memory SQLite database
/// 2. Runs migrations to set up the schema
/// 3. Builds the app with a mock-mode AI client
///
/// Using an in-memory database ensures that:
/// - Tests run quickly
/// - Tests are isolated from each other
/// - No cleanup is needed after tests
///
/// ### Returns
///
/// An Axum Router configured with all routes and connected to an in-memory
/// database
pub fn create_test_app() -> Router {
    // Unique shared in-memory database per test; plain ":memory:" would give
    // every pooled connection its own empty database.
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = Arc::new(init_pool(&database_url));

    let mut conn = pool.get().expect("Failed to get connection");
    run_migrations(&mut conn);
    drop(conn);

    let state = Arc::new(AppState {
        pool,
        ai: OpenRouterClient::mock(),
    });

    create_app(state)
}

/// Builds a JSON request, attaching a bearer token when given
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Sends a request and parses the JSON response body
///
/// ### Returns
///
/// The response status and the parsed body (Null for empty bodies)
pub async fn send(app: &mut Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.call(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Registers an account and logs it in via the API
///
/// ### Arguments
///
/// * `app` - The test application
/// * `email` - The email for the new account
///
/// ### Returns
///
/// The bearer token of the fresh session
pub async fn register_and_login(app: &mut Router, email: &str) -> String {
    let register = json_request(
        "POST",
        "/api/auth/register",
        None,
        &json!({
            "email": email,
            "password": "password123",
            "confirmPassword": "password123",
        }),
    );
    let (status, _) = send(app, register).await;
    assert_eq!(status, StatusCode::OK);

    let login = json_request(
        "POST",
        "/api/auth/login",
        None,
        &json!({
            "email": email,
            "password": "password123",
        }),
    );
    let (status, body) = send(app, login).await;
    assert_eq!(status, StatusCode::OK);

    body["token"].as_str().unwrap().to_string()
}

/// Runs one generation via the API and returns its ID and suggestions
pub async fn generate(app: &mut Router, token: &str, source_text: &str) -> (String, Vec<Value>) {
    let request = json_request(
        "POST",
        "/api/generations",
        Some(token),
        &json!({ "sourceText": source_text }),
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let generation_id = body["generationId"].as_str().unwrap().to_string();
    let suggestions = body["flashcardsSuggestions"].as_array().unwrap().clone();
    (generation_id, suggestions)
}

/// oneshot variant for tests that only need a single request
pub async fn send_once(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
