use std::sync::Arc;

use anyhow::anyhow;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::AppState;
use crate::errors::ApiError;
use crate::repo;

/// How long a login session stays valid
pub const SESSION_TTL_HOURS: i64 = 24 * 30;

/// How long a password reset token stays valid
pub const RESET_TOKEN_TTL_HOURS: i64 = 2;

pub fn session_ttl() -> Duration {
    Duration::hours(SESSION_TTL_HOURS)
}

pub fn reset_token_ttl() -> Duration {
    Duration::hours(RESET_TOKEN_TTL_HOURS)
}

/// Hashes a password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored Argon2 hash.
///
/// An unparseable stored hash counts as a failed verification rather than an
/// error, so corrupted rows cannot be used to log in.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Generates an opaque token: 32 random bytes, hex-encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    to_hex(&bytes)
}

/// Hex SHA-256 digest, used for stored token hashes and source-text
/// reference hashes
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    to_hex(&hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// The authenticated caller, extracted from the `Authorization` header.
///
/// Resolves the bearer token to a live session and its user; requests with a
/// missing, unknown or expired token are rejected with 401 before the
/// handler runs. This is the axum-native form of a route-guard middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    /// The session backing this request, so logout can revoke exactly it
    pub session_id: String,
}

/// Resolves the `Authorization` header to its user, if any.
///
/// Returns `Ok(None)` when the header is missing, malformed, or names an
/// unknown or expired session; only genuine database failures error. The
/// extractor turns `None` into a 401, while the password-update route falls
/// back to reset-token authorization instead.
pub fn authenticate(
    state: &AppState,
    headers: &axum::http::HeaderMap,
) -> Result<Option<AuthUser>, ApiError> {
    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    else {
        return Ok(None);
    };

    let Some(session) = repo::find_session_by_token_hash(&state.pool, &sha256_hex(token))
        .map_err(ApiError::Database)?
    else {
        return Ok(None);
    };

    if session.is_expired(Utc::now()) {
        debug!("Ignoring expired session {}", session.get_id());
        return Ok(None);
    }

    let Some(user) =
        repo::get_user(&state.pool, &session.get_user_id()).map_err(ApiError::Database)?
    else {
        return Ok(None);
    };

    Ok(Some(AuthUser {
        id: user.get_id(),
        email: user.get_email(),
        session_id: session.get_id(),
    }))
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(state, &parts.headers)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))
    }
}
