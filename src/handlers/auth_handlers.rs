use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Redirect,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::AppState;
use crate::auth::{self, AuthUser};
use crate::dto::{
    LoginDto, LoginResponse, RegisterDto, RegisterResponse, ResetPasswordDto, UpdatePasswordDto,
};
use crate::errors::ApiError;
use crate::repo;

/// Handler for registering a new account
///
/// This function handles POST requests to `/api/auth/register`.
///
/// ### Arguments
///
/// * `state` - The shared application state
/// * `payload` - The request payload with email and password pair
///
/// ### Returns
///
/// The newly created user as JSON; 409 when the email is taken
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterDto>,
) -> Result<Json<RegisterResponse>, ApiError> {
    info!("Registering new account");

    payload.validate().map_err(ApiError::Validation)?;
    let email = payload.email.trim().to_lowercase();

    if repo::get_user_by_email(&state.pool, &email)?.is_some() {
        return Err(ApiError::Conflict(
            "This user already exists. Please sign in.".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let user = repo::create_user(&state.pool, email, password_hash)?;

    info!("Registered user {}", user.get_id());

    Ok(Json(RegisterResponse { user }))
}

/// Handler for logging in
///
/// This function handles POST requests to `/api/auth/login`.
///
/// A missing account and a wrong password produce the same 401 message, so
/// the endpoint cannot be used to probe which emails are registered.
///
/// ### Returns
///
/// The user and a fresh bearer token as JSON
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginDto>,
) -> Result<Json<LoginResponse>, ApiError> {
    debug!("Login attempt");

    payload.validate().map_err(ApiError::Validation)?;
    let email = payload.email.trim().to_lowercase();

    let user = repo::get_user_by_email(&state.pool, &email)?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !auth::verify_password(&payload.password, &user.get_password_hash()) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = auth::generate_token();
    repo::create_session(
        &state.pool,
        &user.get_id(),
        auth::sha256_hex(&token),
        auth::session_ttl(),
    )?;

    info!("User {} logged in", user.get_id());

    Ok(Json(LoginResponse { user, token }))
}

/// Handler for logging out
///
/// This function handles POST requests to `/api/auth/logout`. The session
/// behind the presented token is deleted and the client is redirected to
/// the login page.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Redirect, ApiError> {
    info!("Logging out");

    repo::delete_session(&state.pool, &user.session_id)?;

    Ok(Redirect::to("/login"))
}

/// Handler for requesting a password reset
///
/// This function handles POST requests to `/api/auth/reset-password`.
///
/// Always answers 200 whether or not the account exists, to prevent email
/// enumeration. When it does exist a single-use reset token is stored; with
/// no mailer configured the token is surfaced through the server log for
/// the operator to relay.
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn reset_password_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetPasswordDto>,
) -> Result<StatusCode, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let email = payload.email.trim().to_lowercase();

    match repo::get_user_by_email(&state.pool, &email) {
        Ok(Some(user)) => {
            let token = auth::generate_token();
            match repo::create_reset_token(
                &state.pool,
                &user.get_id(),
                auth::sha256_hex(&token),
                auth::reset_token_ttl(),
            ) {
                Ok(_) => debug!("Password reset token for {}: {}", email, token),
                Err(err) => warn!("Failed to store reset token: {:#}", err),
            }
        }
        Ok(None) => debug!("Password reset requested for unknown email"),
        Err(err) => warn!("Reset lookup failed: {:#}", err),
    }

    // Identical response for every outcome
    Ok(StatusCode::OK)
}

/// Handler for setting a new password
///
/// This function handles POST requests to `/api/auth/update-password`.
///
/// Authorized either by a live session or by a single-use reset token from
/// the reset flow. On success every existing session of the user is
/// revoked.
#[instrument(skip_all)]
pub async fn update_password_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<UpdatePasswordDto>,
) -> Result<StatusCode, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let user_id = if let Some(user) = auth::authenticate(&state, &headers)? {
        user.id
    } else if let Some(reset_token) = payload.reset_token.as_deref() {
        let token_row = repo::find_reset_token(&state.pool, &auth::sha256_hex(reset_token))?
            .filter(|row| row.is_usable(Utc::now()))
            .ok_or_else(|| {
                ApiError::Unauthorized("Reset link is invalid or has expired.".to_string())
            })?;
        repo::mark_reset_token_used(&state.pool, &token_row.get_id())?;
        token_row.get_user_id()
    } else {
        return Err(ApiError::Unauthorized(
            "Reset link is invalid or has expired.".to_string(),
        ));
    };

    let password_hash = auth::hash_password(&payload.password)?;
    repo::update_user_password(&state.pool, &user_id, password_hash)?;
    repo::delete_sessions_for_user(&state.pool, &user_id)?;

    info!("Password updated for user {}", user_id);

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_user_with_session, setup_test_state};

    fn register_dto(email: &str) -> RegisterDto {
        RegisterDto {
            email: email.to_string(),
            password: "password123".to_string(),
            confirm_password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_handler() {
        let state = setup_test_state();

        let result = register_handler(State(state.clone()), Json(register_dto("New@Example.com")))
            .await
            .unwrap();

        // Email is normalized to lowercase
        assert_eq!(result.0.user.get_email(), "new@example.com");
    }

    #[tokio::test]
    async fn test_register_handler_duplicate_email() {
        let state = setup_test_state();

        register_handler(State(state.clone()), Json(register_dto("a@example.com")))
            .await
            .unwrap();
        let result =
            register_handler(State(state.clone()), Json(register_dto("a@example.com"))).await;

        assert!(matches!(result.unwrap_err(), ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_handler_password_mismatch() {
        let state = setup_test_state();

        let payload = RegisterDto {
            confirm_password: "different123".to_string(),
            ..register_dto("a@example.com")
        };
        let result = register_handler(State(state), Json(payload)).await;

        assert!(matches!(result.unwrap_err(), ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_handler_roundtrip() {
        let state = setup_test_state();

        register_handler(State(state.clone()), Json(register_dto("a@example.com")))
            .await
            .unwrap();

        let result = login_handler(
            State(state.clone()),
            Json(LoginDto {
                email: "a@example.com".to_string(),
                password: "password123".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(result.0.token.len(), 64);

        // The issued token authenticates
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", result.0.token).parse().unwrap(),
        );
        let user = auth::authenticate(&state, &headers).unwrap().unwrap();
        assert_eq!(user.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_login_handler_wrong_password() {
        let state = setup_test_state();

        register_handler(State(state.clone()), Json(register_dto("a@example.com")))
            .await
            .unwrap();

        let result = login_handler(
            State(state),
            Json(LoginDto {
                email: "a@example.com".to_string(),
                password: "wrong-password".to_string(),
            }),
        )
        .await;

        match result.unwrap_err() {
            ApiError::Unauthorized(msg) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("expected unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_handler_unknown_email_same_message() {
        let state = setup_test_state();

        let result = login_handler(
            State(state),
            Json(LoginDto {
                email: "ghost@example.com".to_string(),
                password: "password123".to_string(),
            }),
        )
        .await;

        match result.unwrap_err() {
            ApiError::Unauthorized(msg) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("expected unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_logout_handler_revokes_session() {
        let state = setup_test_state();
        let (_user, auth_user, token) = create_user_with_session(&state, "a@example.com");

        logout_handler(State(state.clone()), auth_user).await.unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );
        assert!(auth::authenticate(&state, &headers).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_password_same_response_for_any_email() {
        let state = setup_test_state();
        let (_user, _auth, _token) = create_user_with_session(&state, "known@example.com");

        let known = reset_password_handler(
            State(state.clone()),
            Json(ResetPasswordDto {
                email: "known@example.com".to_string(),
            }),
        )
        .await
        .unwrap();

        let unknown = reset_password_handler(
            State(state),
            Json(ResetPasswordDto {
                email: "unknown@example.com".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(known, StatusCode::OK);
        assert_eq!(unknown, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_password_with_session_revokes_other_sessions() {
        let state = setup_test_state();
        let (user, _auth, token) = create_user_with_session(&state, "a@example.com");

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );

        let status = update_password_handler(
            State(state.clone()),
            headers.clone(),
            Json(UpdatePasswordDto {
                reset_token: None,
                password: "fresh-password".to_string(),
                confirm_password: "fresh-password".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::OK);

        // The old session is gone and the new password verifies
        assert!(auth::authenticate(&state, &headers).unwrap().is_none());
        let reloaded = repo::get_user(&state.pool, &user.get_id()).unwrap().unwrap();
        assert!(auth::verify_password("fresh-password", &reloaded.get_password_hash()));
    }

    #[tokio::test]
    async fn test_update_password_with_reset_token_is_single_use() {
        let state = setup_test_state();
        let (user, _auth, _token) = create_user_with_session(&state, "a@example.com");

        let reset_token = auth::generate_token();
        repo::create_reset_token(
            &state.pool,
            &user.get_id(),
            auth::sha256_hex(&reset_token),
            auth::reset_token_ttl(),
        )
        .unwrap();

        let payload = UpdatePasswordDto {
            reset_token: Some(reset_token.clone()),
            password: "reset-password".to_string(),
            confirm_password: "reset-password".to_string(),
        };

        let status = update_password_handler(
            State(state.clone()),
            HeaderMap::new(),
            Json(payload.clone()),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::OK);

        // Replaying the same token fails
        let replay =
            update_password_handler(State(state), HeaderMap::new(), Json(payload)).await;
        assert!(matches!(replay.unwrap_err(), ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_update_password_without_session_or_token() {
        let state = setup_test_state();

        let result = update_password_handler(
            State(state),
            HeaderMap::new(),
            Json(UpdatePasswordDto {
                reset_token: None,
                password: "whatever-pass".to_string(),
                confirm_password: "whatever-pass".to_string(),
            }),
        )
        .await;

        assert!(matches!(result.unwrap_err(), ApiError::Unauthorized(_)));
    }
}
