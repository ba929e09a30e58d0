use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a registered user account
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier for the user (UUID v4 as string)
    id: String,

    /// The user's email address, unique across the system
    email: String,

    /// Argon2 hash of the user's password; never exposed over the API
    #[serde(skip_serializing, default)]
    password_hash: String,

    /// When this account was created
    created_at: NaiveDateTime,
}

impl User {
    /// Creates a new user with an already-hashed password
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Gets the user's ID
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets the user's email address
    pub fn get_email(&self) -> String {
        self.email.clone()
    }

    /// Gets the stored password hash
    pub fn get_password_hash(&self) -> String {
        self.password_hash.clone()
    }

    /// Gets the account creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
