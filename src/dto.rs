use serde::{Deserialize, Serialize};

use crate::models::{Flashcard, FlashcardSource, User};

/// Bounds enforced on generation source text, in characters
pub const SOURCE_TEXT_MIN: usize = 1000;
pub const SOURCE_TEXT_MAX: usize = 10000;

/// Bounds enforced on flashcard text, in characters
pub const FRONT_MAX: usize = 200;
pub const BACK_MAX: usize = 500;

/// Minimum password length for registration and password updates
pub const PASSWORD_MIN: usize = 8;

/// Page size bounds for the flashcards list endpoint
pub const LIMIT_MAX: i64 = 100;

/// Checks that an email address is plausibly deliverable.
///
/// Intentionally loose: one `@` with a non-empty local part and a dotted
/// domain. Real verification happens when the user proves they can log in.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

fn validate_card_text(front: &str, back: &str) -> Result<(), String> {
    if front.is_empty() {
        return Err("Front cannot be empty.".to_string());
    }
    if front.chars().count() > FRONT_MAX {
        return Err(format!("Front cannot exceed {} characters.", FRONT_MAX));
    }
    if back.is_empty() {
        return Err("Back cannot be empty.".to_string());
    }
    if back.chars().count() > BACK_MAX {
        return Err(format!("Back cannot exceed {} characters.", BACK_MAX));
    }
    Ok(())
}

// ── Auth ─────────────────────────────────────────────────────────────────

/// Data transfer object for registering a new account
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDto {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterDto {
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_email(&self.email) {
            return Err("Invalid email address.".to_string());
        }
        if self.password.chars().count() < PASSWORD_MIN {
            return Err(format!(
                "Password must be at least {} characters long.",
                PASSWORD_MIN
            ));
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match.".to_string());
        }
        Ok(())
    }
}

/// Data transfer object for logging in
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

impl LoginDto {
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_email(&self.email) {
            return Err("Invalid email address.".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required.".to_string());
        }
        Ok(())
    }
}

/// Data transfer object for requesting a password reset
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordDto {
    pub email: String,
}

impl ResetPasswordDto {
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_email(&self.email) {
            return Err("Invalid email address.".to_string());
        }
        Ok(())
    }
}

/// Data transfer object for setting a new password
///
/// Authorized either by a live session (logged-in user changing their
/// password) or by a single-use reset token from the reset flow.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordDto {
    #[serde(default)]
    pub reset_token: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

impl UpdatePasswordDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.password.chars().count() < PASSWORD_MIN {
            return Err(format!(
                "Password must be at least {} characters long.",
                PASSWORD_MIN
            ));
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match.".to_string());
        }
        Ok(())
    }
}

/// Response body for a successful registration
#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub user: User,
}

/// Response body for a successful login
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub user: User,
    /// The bearer token for subsequent requests; shown exactly once
    pub token: String,
}

// ── Flashcards ───────────────────────────────────────────────────────────

/// One accepted AI-generated card inside a batch payload
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiCardDto {
    pub front: String,
    pub back: String,
    /// Either `ai-full` (accepted unchanged) or `ai-edited`
    pub source: FlashcardSource,
}

/// Data transfer object for persisting a reviewed generation batch
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BatchFlashcardsDto {
    pub generation_id: String,
    pub accepted_cards: Vec<AiCardDto>,
    pub rejected_count: i32,
}

impl BatchFlashcardsDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.generation_id.is_empty() {
            return Err("Invalid generationId format.".to_string());
        }
        if self.accepted_cards.is_empty() {
            return Err("At least one card must be accepted.".to_string());
        }
        if self.rejected_count < 0 {
            return Err("rejectedCount cannot be negative.".to_string());
        }
        for card in &self.accepted_cards {
            validate_card_text(&card.front, &card.back)?;
            if card.source == FlashcardSource::Manual {
                return Err("Batch cards must have source ai-full or ai-edited.".to_string());
            }
        }
        Ok(())
    }
}

/// Data transfer object for creating a single flashcard
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SingleFlashcardDto {
    pub front: String,
    pub back: String,
    /// Defaults to `manual` when omitted
    #[serde(default)]
    pub source: Option<FlashcardSource>,
    #[serde(default)]
    pub generation_id: Option<String>,
}

impl SingleFlashcardDto {
    /// The effective source, defaulting omitted values to manual
    pub fn source(&self) -> FlashcardSource {
        self.source.unwrap_or(FlashcardSource::Manual)
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_card_text(&self.front, &self.back)?;
        match (self.source(), &self.generation_id) {
            (FlashcardSource::Manual, Some(_)) => {
                Err("generationId must be null or omitted for manual flashcards.".to_string())
            }
            (FlashcardSource::AiFull | FlashcardSource::AiEdited, None) => {
                Err("generationId is required for AI-generated flashcards.".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Request payload for POST /api/flashcards.
///
/// A union of the single-card and batch shapes, discriminated by the
/// presence of `acceptedCards`: serde tries the batch variant first, and a
/// single-card body cannot match it because it lacks that field.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum CreateFlashcardsRequest {
    Batch(BatchFlashcardsDto),
    Single(SingleFlashcardDto),
}

impl CreateFlashcardsRequest {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            CreateFlashcardsRequest::Batch(batch) => batch.validate(),
            CreateFlashcardsRequest::Single(single) => single.validate(),
        }
    }
}

/// Data transfer object for partially updating a flashcard
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateFlashcardDto {
    pub front: Option<String>,
    pub back: Option<String>,
}

impl UpdateFlashcardDto {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref front) = self.front {
            if front.is_empty() {
                return Err("Front cannot be empty.".to_string());
            }
            if front.chars().count() > FRONT_MAX {
                return Err(format!("Front cannot exceed {} characters.", FRONT_MAX));
            }
        }
        if let Some(ref back) = self.back {
            if back.is_empty() {
                return Err("Back cannot be empty.".to_string());
            }
            if back.chars().count() > BACK_MAX {
                return Err(format!("Back cannot exceed {} characters.", BACK_MAX));
            }
        }
        Ok(())
    }
}

/// Sort column for the flashcards list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    CreatedAt,
    UpdatedAt,
}

/// Sort direction for the flashcards list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query parameters for GET /api/flashcards
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FlashcardsQueryDto {
    pub page: i64,
    pub limit: i64,
    pub sort: SortKey,
    pub order: SortOrder,
    /// Filter by card source; absent means all sources
    pub source: Option<FlashcardSource>,
}

impl Default for FlashcardsQueryDto {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            sort: SortKey::CreatedAt,
            order: SortOrder::Desc,
            source: None,
        }
    }
}

impl FlashcardsQueryDto {
    /// Clamps page and limit into their valid ranges
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.limit = self.limit.clamp(1, LIMIT_MAX);
        self
    }
}

/// Pagination metadata returned alongside a list page
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Builds pagination metadata from a normalized query and a total count
    pub fn for_page(query: &FlashcardsQueryDto, total_items: i64) -> Self {
        Self {
            page: query.page,
            limit: query.limit,
            total_items,
            total_pages: ((total_items + query.limit - 1) / query.limit).max(1),
        }
    }
}

/// Response body for GET /api/flashcards
#[derive(Serialize, Deserialize, Debug)]
pub struct FlashcardsListResponse {
    pub data: Vec<Flashcard>,
    pub pagination: Pagination,
}

/// Response body for flashcard creation (single and batch)
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateFlashcardsResponse {
    pub flashcards: Vec<Flashcard>,
}

// ── Generations ──────────────────────────────────────────────────────────

/// Data transfer object for requesting a generation
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateGenerationDto {
    pub source_text: String,
}

/// One suggested flashcard returned by a generation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionDto {
    pub front: String,
    pub back: String,
    /// Always `ai-full` when fresh from the model
    pub source: FlashcardSource,
}

/// Response body for POST /api/generations
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSuggestionsResponse {
    pub generation_id: String,
    pub flashcards_suggestions: Vec<SuggestionDto>,
    pub generation_count: i32,
}
