/// Integration tests for the auth endpoints

mod common;

use axum::http::StatusCode;
use common::{create_test_app, json_request, register_and_login, send};
use serde_json::json;

#[tokio::test]
async fn test_register_login_roundtrip() {
    let mut app = create_test_app();

    let (status, body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({
                "email": "User@Example.com",
                "password": "password123",
                "confirmPassword": "password123",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Email normalized, no password material in the response
    assert_eq!(body["user"]["email"], "user@example.com");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({
                "email": "user@example.com",
                "password": "password123",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_register_duplicate_email_conflict() {
    let mut app = create_test_app();
    register_and_login(&mut app, "a@example.com").await;

    let (status, body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({
                "email": "a@example.com",
                "password": "password123",
                "confirmPassword": "password123",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "This user already exists. Please sign in.");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let mut app = create_test_app();

    // Bad email
    let (status, _) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({
                "email": "not-an-email",
                "password": "password123",
                "confirmPassword": "password123",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Short password
    let (status, _) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({
                "email": "a@example.com",
                "password": "short",
                "confirmPassword": "short",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Mismatched confirmation
    let (status, body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({
                "email": "a@example.com",
                "password": "password123",
                "confirmPassword": "password456",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Passwords do not match.");
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let mut app = create_test_app();
    register_and_login(&mut app, "a@example.com").await;

    // Wrong password for a real account
    let (status, body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({"email": "a@example.com", "password": "wrong-password"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let wrong_password_message = body["message"].clone();

    // Unknown account
    let (status, body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({"email": "ghost@example.com", "password": "password123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], wrong_password_message);
}

#[tokio::test]
async fn test_logout_redirects_and_revokes() {
    let mut app = create_test_app();
    let token = register_and_login(&mut app, "a@example.com").await;

    let request = json_request("POST", "/api/auth/logout", Some(&token), &json!({}));
    let response = tower::Service::call(&mut app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/login");

    // The token no longer authenticates
    let (status, _) = send(
        &mut app,
        json_request("GET", "/api/flashcards", Some(&token), &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reset_password_is_enumeration_safe() {
    let mut app = create_test_app();
    register_and_login(&mut app, "known@example.com").await;

    let (known_status, known_body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/reset-password",
            None,
            &json!({"email": "known@example.com"}),
        ),
    )
    .await;

    let (unknown_status, unknown_body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/reset-password",
            None,
            &json!({"email": "nobody@example.com"}),
        ),
    )
    .await;

    // Identical 200 responses whether or not the account exists
    assert_eq!(known_status, StatusCode::OK);
    assert_eq!(unknown_status, StatusCode::OK);
    assert_eq!(known_body, unknown_body);
}

#[tokio::test]
async fn test_update_password_with_session() {
    let mut app = create_test_app();
    let token = register_and_login(&mut app, "a@example.com").await;

    let (status, _) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/update-password",
            Some(&token),
            &json!({
                "password": "new-password-1",
                "confirmPassword": "new-password-1",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Old session revoked, new password works
    let (status, _) = send(
        &mut app,
        json_request("GET", "/api/flashcards", Some(&token), &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({"email": "a@example.com", "password": "new-password-1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_password_without_authorization_fails() {
    let mut app = create_test_app();
    register_and_login(&mut app, "a@example.com").await;

    let (status, body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/update-password",
            None,
            &json!({
                "resetToken": "bogus-token",
                "password": "new-password-1",
                "confirmPassword": "new-password-1",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Reset link is invalid or has expired.");
}
