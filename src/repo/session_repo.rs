use crate::db::DbPool;
use crate::models::{PasswordResetToken, Session};
use crate::schema::{password_reset_tokens, sessions};
use anyhow::Result;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new session for a user
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The ID of the user logging in
/// * `token_hash` - SHA-256 hex digest of the bearer token
/// * `ttl` - How long the session stays valid
#[instrument(skip(pool, token_hash), fields(user_id = %user_id))]
pub fn create_session(
    pool: &DbPool,
    user_id: &str,
    token_hash: String,
    ttl: Duration,
) -> Result<Session> {
    debug!("Creating new session");

    let conn = &mut pool.get()?;

    let new_session = Session::new(user_id.to_string(), token_hash, ttl);
    diesel::insert_into(sessions::table)
        .values(new_session.clone())
        .execute(conn)?;

    info!("Session created for user {}", user_id);

    Ok(new_session)
}

/// Looks up a session by the hash of its bearer token
///
/// Expiry is not checked here; callers decide what an expired session means.
#[instrument(skip(pool, token_hash))]
pub fn find_session_by_token_hash(pool: &DbPool, token_hash: &str) -> Result<Option<Session>> {
    debug!("Looking up session by token hash");

    let conn = &mut pool.get()?;

    let result = sessions::table
        .filter(sessions::token_hash.eq(token_hash))
        .first::<Session>(conn)
        .optional()?;

    Ok(result)
}

/// Deletes a single session (logout)
#[instrument(skip(pool), fields(session_id = %session_id))]
pub fn delete_session(pool: &DbPool, session_id: &str) -> Result<()> {
    debug!("Deleting session");

    let conn = &mut pool.get()?;

    diesel::delete(sessions::table.find(session_id)).execute(conn)?;

    Ok(())
}

/// Deletes every session a user holds, e.g. after a password change
///
/// ### Returns
///
/// The number of sessions revoked
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn delete_sessions_for_user(pool: &DbPool, user_id: &str) -> Result<usize> {
    debug!("Revoking all sessions for user");

    let conn = &mut pool.get()?;

    let deleted = diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id)))
        .execute(conn)?;

    info!("Revoked {} sessions for user {}", deleted, user_id);

    Ok(deleted)
}

/// Creates a password reset token for a user
#[instrument(skip(pool, token_hash), fields(user_id = %user_id))]
pub fn create_reset_token(
    pool: &DbPool,
    user_id: &str,
    token_hash: String,
    ttl: Duration,
) -> Result<PasswordResetToken> {
    debug!("Creating password reset token");

    let conn = &mut pool.get()?;

    let new_token = PasswordResetToken::new(user_id.to_string(), token_hash, ttl);
    diesel::insert_into(password_reset_tokens::table)
        .values(new_token.clone())
        .execute(conn)?;

    Ok(new_token)
}

/// Looks up a reset token by the hash of its secret
#[instrument(skip(pool, token_hash))]
pub fn find_reset_token(pool: &DbPool, token_hash: &str) -> Result<Option<PasswordResetToken>> {
    debug!("Looking up password reset token");

    let conn = &mut pool.get()?;

    let result = password_reset_tokens::table
        .filter(password_reset_tokens::token_hash.eq(token_hash))
        .first::<PasswordResetToken>(conn)
        .optional()?;

    Ok(result)
}

/// Marks a reset token as spent so it cannot redeem a second change
#[instrument(skip(pool), fields(token_id = %token_id))]
pub fn mark_reset_token_used(pool: &DbPool, token_id: &str) -> Result<()> {
    debug!("Marking reset token as used");

    let conn = &mut pool.get()?;

    diesel::update(password_reset_tokens::table.find(token_id))
        .set(password_reset_tokens::used_at.eq(Utc::now().naive_utc()))
        .execute(conn)?;

    Ok(())
}
