use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::JsonValue;

/// A record of a failed AI generation call.
///
/// Written best-effort: a failure to insert this row is logged and swallowed,
/// never surfaced to the user.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::generation_error_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct GenerationErrorLog {
    id: String,

    #[serde(skip_serializing, default)]
    user_id: String,

    /// SHA-256 hex digest of the source text that triggered the failure
    source_text_hash: String,

    /// Length of the source text in characters
    source_text_length: i32,

    /// The upstream error message
    error_message: String,

    /// Structured failure detail from the AI client, if any
    error_context: Option<JsonValue>,

    /// The model the failed call targeted
    model: String,

    created_at: NaiveDateTime,
}

impl GenerationErrorLog {
    pub fn new(
        user_id: String,
        source_text_hash: String,
        source_text_length: i32,
        error_message: String,
        error_context: Option<JsonValue>,
        model: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            source_text_hash,
            source_text_length,
            error_message,
            error_context,
            model,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_error_message(&self) -> String {
        self.error_message.clone()
    }

    pub fn get_error_context(&self) -> Option<JsonValue> {
        self.error_context.clone()
    }

    pub fn get_model(&self) -> String {
        self.model.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
