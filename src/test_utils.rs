/// Shared fixtures for unit tests inside the library crate.
///
/// Integration tests under `tests/` cannot see this module (it is compiled
/// only with `cfg(test)`), so they carry their own helpers in
/// `tests/common.rs`.

use std::sync::Arc;

use crate::AppState;
use crate::auth::{self, AuthUser};
use crate::models::User;
use crate::repo;
use crate::services::OpenRouterClient;

/// Builds an application state over a fresh in-memory database and a
/// mock-mode AI client
pub fn setup_test_state() -> Arc<AppState> {
    Arc::new(AppState {
        pool: repo::tests::setup_test_db(),
        ai: OpenRouterClient::mock(),
    })
}

/// Creates a user with a live session.
///
/// The stored password hash is a placeholder, so the fixture stays fast;
/// tests exercising real password verification go through the register and
/// login handlers instead.
///
/// ### Returns
///
/// The user row, a ready-made `AuthUser`, and the raw bearer token
pub fn create_user_with_session(state: &AppState, email: &str) -> (User, AuthUser, String) {
    let user = repo::create_user(
        &state.pool,
        email.to_string(),
        "fixture-password-hash".to_string(),
    )
    .expect("Failed to create test user");

    let token = auth::generate_token();
    let session = repo::create_session(
        &state.pool,
        &user.get_id(),
        auth::sha256_hex(&token),
        auth::session_ttl(),
    )
    .expect("Failed to create test session");

    let auth_user = AuthUser {
        id: user.get_id(),
        email: user.get_email(),
        session_id: session.get_id(),
    };

    (user, auth_user, token)
}
