use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// A login session backing one bearer token.
///
/// Only the SHA-256 hash of the token is stored; the token itself is handed
/// to the client once at login and never persisted.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Session {
    id: String,
    user_id: String,
    token_hash: String,
    created_at: NaiveDateTime,
    expires_at: NaiveDateTime,
}

impl Session {
    /// Creates a new session for `user_id` expiring `ttl` from now
    pub fn new(user_id: String, token_hash: String, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            token_hash,
            created_at: now.naive_utc(),
            expires_at: (now + ttl).naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_token_hash(&self) -> String {
        self.token_hash.clone()
    }

    pub fn get_expires_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.expires_at, Utc)
    }

    /// Whether this session is past its expiry
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.get_expires_at() <= now
    }
}
