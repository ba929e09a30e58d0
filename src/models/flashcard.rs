use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::deserialize::{FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a flashcard came from, stored as TEXT.
///
/// `Manual` cards are typed in by the user; `AiFull` cards were accepted from
/// an AI generation unchanged; `AiEdited` cards were accepted after the user
/// edited them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "kebab-case")]
pub enum FlashcardSource {
    Manual,
    AiFull,
    AiEdited,
}

impl FlashcardSource {
    /// The wire/database representation of this source
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashcardSource::Manual => "manual",
            FlashcardSource::AiFull => "ai-full",
            FlashcardSource::AiEdited => "ai-edited",
        }
    }

    /// Parses the wire/database representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "manual" => Some(FlashcardSource::Manual),
            "ai-full" => Some(FlashcardSource::AiFull),
            "ai-edited" => Some(FlashcardSource::AiEdited),
            _ => None,
        }
    }
}

impl std::fmt::Display for FlashcardSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromSql<Text, Sqlite> for FlashcardSource {
    fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        FlashcardSource::parse(&text)
            .ok_or_else(|| format!("Unknown flashcard source: {}", text).into())
    }
}

impl ToSql<Text, Sqlite> for FlashcardSource {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str().to_string());
        Ok(IsNull::No)
    }
}

/// Represents a persisted flashcard belonging to a user
///
/// Invariant: `source == Manual` implies `generation_id` is `None`;
/// `source` in {AiFull, AiEdited} implies `generation_id` is `Some`.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::flashcards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    /// Unique identifier for the flashcard (UUID v4 as string)
    id: String,

    /// The ID of the owning user; never exposed over the API
    #[serde(skip_serializing, default)]
    user_id: String,

    /// The question side (at most 200 characters)
    front: String,

    /// The answer side (at most 500 characters)
    back: String,

    /// How the flashcard was created
    source: FlashcardSource,

    /// The generation this card was accepted from, if any
    generation_id: Option<String>,

    /// When this flashcard was created
    created_at: NaiveDateTime,

    /// When this flashcard was last updated
    updated_at: NaiveDateTime,
}

impl Flashcard {
    /// Creates a new flashcard owned by `user_id`
    ///
    /// ### Arguments
    ///
    /// * `user_id` - The ID of the owning user
    /// * `front` - The question side of the card
    /// * `back` - The answer side of the card
    /// * `source` - How the card was created
    /// * `generation_id` - The originating generation for AI cards
    pub fn new(
        user_id: String,
        front: String,
        back: String,
        source: FlashcardSource,
        generation_id: Option<String>,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            front,
            back,
            source,
            generation_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Gets the flashcard's ID
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets the owning user's ID
    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    /// Gets the question side
    pub fn get_front(&self) -> String {
        self.front.clone()
    }

    /// Gets the answer side
    pub fn get_back(&self) -> String {
        self.back.clone()
    }

    /// Gets the card's source
    pub fn get_source(&self) -> FlashcardSource {
        self.source
    }

    /// Gets the originating generation ID, if any
    pub fn get_generation_id(&self) -> Option<String> {
        self.generation_id.clone()
    }

    /// Gets the creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    /// Gets the last-update timestamp as a DateTime<Utc>
    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
