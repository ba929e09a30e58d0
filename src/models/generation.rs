use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents one AI generation call and its review outcome
///
/// A row is inserted when the AI call succeeds; the accepted/edited/rejected
/// counters stay null until the user saves the reviewed batch, at which point
/// they are filled in once.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::generations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    /// Unique identifier for the generation (UUID v4 as string)
    id: String,

    /// The ID of the owning user; never exposed over the API
    #[serde(skip_serializing, default)]
    user_id: String,

    /// SHA-256 hex digest of the source text, kept for reference
    source_text_hash: String,

    /// Length of the source text in characters
    source_text_length: i32,

    /// How many suggestions the AI returned
    suggestions_count: i32,

    /// Accepted without edits, filled in when the batch is saved
    accepted_unedited_count: Option<i32>,

    /// Accepted after editing, filled in when the batch is saved
    accepted_edited_count: Option<i32>,

    /// Rejected outright, filled in when the batch is saved
    rejected_count: Option<i32>,

    /// Wall-clock duration of the AI call in milliseconds
    generation_duration_ms: i32,

    /// The model that produced the suggestions
    model: String,

    /// When this generation happened
    created_at: NaiveDateTime,
}

impl Generation {
    /// Creates a new generation record for a successful AI call
    ///
    /// ### Arguments
    ///
    /// * `user_id` - The ID of the requesting user
    /// * `source_text_hash` - SHA-256 hex digest of the source text
    /// * `source_text_length` - Length of the source text in characters
    /// * `suggestions_count` - Number of suggestions returned
    /// * `generation_duration_ms` - Duration of the AI call
    /// * `model` - The model identifier used
    pub fn new(
        user_id: String,
        source_text_hash: String,
        source_text_length: i32,
        suggestions_count: i32,
        generation_duration_ms: i32,
        model: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            source_text_hash,
            source_text_length,
            suggestions_count,
            accepted_unedited_count: None,
            accepted_edited_count: None,
            rejected_count: None,
            generation_duration_ms,
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

    pub fn get_source_text_hash(&self) -> String {
        self.source_text_hash.clone()
    }

    pub fn get_source_text_length(&self) -> i32 {
        self.source_text_length
    }

    pub fn get_suggestions_count(&self) -> i32 {
        self.suggestions_count
    }

    pub fn get_accepted_unedited_count(&self) -> Option<i32> {
        self.accepted_unedited_count
    }

    pub fn get_accepted_edited_count(&self) -> Option<i32> {
        self.accepted_edited_count
    }

    pub fn get_rejected_count(&self) -> Option<i32> {
        self.rejected_count
    }

    pub fn get_generation_duration_ms(&self) -> i32 {
        self.generation_duration_ms
    }

    pub fn get_model(&self) -> String {
        self.model.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_new_counters_start_empty() {
        let generation = Generation::new(
            "user-1".to_string(),
            "deadbeef".to_string(),
            1500,
            3,
            42,
            "openai/gpt-4o-mini".to_string(),
        );

        assert!(Uuid::parse_str(&generation.get_id()).is_ok());
        assert_eq!(generation.get_suggestions_count(), 3);
        assert_eq!(generation.get_accepted_unedited_count(), None);
        assert_eq!(generation.get_accepted_edited_count(), None);
        assert_eq!(generation.get_rejected_count(), None);
    }
}
