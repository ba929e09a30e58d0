use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// A single-use password reset token, stored hashed like session tokens.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::password_reset_tokens)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PasswordResetToken {
    id: String,
    user_id: String,
    token_hash: String,
    created_at: NaiveDateTime,
    expires_at: NaiveDateTime,
    used_at: Option<NaiveDateTime>,
}

impl PasswordResetToken {
    /// Creates a new reset token for `user_id` expiring `ttl` from now
    pub fn new(user_id: String, token_hash: String, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            token_hash,
            created_at: now.naive_utc(),
            expires_at: (now + ttl).naive_utc(),
            used_at: None,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_expires_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.expires_at, Utc)
    }

    pub fn get_used_at(&self) -> Option<DateTime<Utc>> {
        self.used_at
            .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
    }

    /// A token can redeem a password change only once, and only before expiry
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && now < self.get_expires_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_token_usable_window() {
        let token = PasswordResetToken::new(
            "user-1".to_string(),
            "hash".to_string(),
            Duration::hours(2),
        );
        assert!(token.is_usable(Utc::now()));
        assert!(!token.is_usable(Utc::now() + Duration::hours(3)));
    }
}
