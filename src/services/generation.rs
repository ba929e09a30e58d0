use std::time::Instant;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::auth::sha256_hex;
use crate::db::DbPool;
use crate::dto::{GenerationSuggestionsResponse, SOURCE_TEXT_MAX, SOURCE_TEXT_MIN, SuggestionDto};
use crate::errors::ApiError;
use crate::models::{FlashcardSource, Generation, GenerationErrorLog, JsonValue};
use crate::repo;
use crate::services::openrouter::OpenRouterClient;

/// Failure taxonomy of the generation workflow.
///
/// Validation problems are the caller's to fix (400); AI and persistence
/// failures are server-side (500).
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    AiService {
        message: String,
        context: Option<serde_json::Value>,
    },
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Validation(msg) => ApiError::Validation(msg),
            GenerationError::AiService { message, .. } => ApiError::AiService(message),
            GenerationError::Database(err) => ApiError::Database(err),
        }
    }
}

fn validate_source_text(source_text: &str) -> Result<usize, GenerationError> {
    let length = source_text.chars().count();
    if length < SOURCE_TEXT_MIN {
        return Err(GenerationError::Validation(format!(
            "Source text must be at least {} characters long",
            SOURCE_TEXT_MIN
        )));
    }
    if length > SOURCE_TEXT_MAX {
        return Err(GenerationError::Validation(format!(
            "Source text cannot exceed {} characters",
            SOURCE_TEXT_MAX
        )));
    }
    Ok(length)
}

/// Generates flashcard suggestions from source text.
///
/// Validates the text, hashes it for reference, invokes the AI client, and
/// persists a generation record on success. On AI failure an error-log row
/// is written best-effort (its own failure is swallowed) and the typed error
/// propagates to the caller.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `ai` - The AI client to invoke
/// * `user_id` - The requesting user
/// * `source_text` - The pasted text, 1000 to 10000 characters
///
/// ### Returns
///
/// The generation ID, the tagged suggestions, and their count
#[instrument(skip(pool, ai, source_text), fields(user_id = %user_id, text_len = source_text.len()))]
pub async fn generate_suggestions(
    pool: &DbPool,
    ai: &OpenRouterClient,
    user_id: &str,
    source_text: &str,
) -> Result<GenerationSuggestionsResponse, GenerationError> {
    let started = Instant::now();

    let length = validate_source_text(source_text)?;
    let source_text_hash = sha256_hex(source_text);

    match ai.generate_flashcards(source_text).await {
        Ok(cards) => {
            let duration_ms = started.elapsed().as_millis() as i32;
            let generation = repo::create_generation(
                pool,
                Generation::new(
                    user_id.to_string(),
                    source_text_hash,
                    length as i32,
                    cards.len() as i32,
                    duration_ms,
                    ai.model().to_string(),
                ),
            )?;

            let suggestions: Vec<SuggestionDto> = cards
                .into_iter()
                .map(|card| SuggestionDto {
                    front: card.front,
                    back: card.back,
                    source: FlashcardSource::AiFull,
                })
                .collect();

            info!(
                "Generation {} produced {} suggestions in {}ms",
                generation.get_id(),
                suggestions.len(),
                duration_ms
            );

            Ok(GenerationSuggestionsResponse {
                generation_id: generation.get_id(),
                generation_count: suggestions.len() as i32,
                flashcards_suggestions: suggestions,
            })
        }
        Err(ai_err) => {
            warn!("AI generation failed: {}: {:?}", ai_err, ai_err.context());

            let log = GenerationErrorLog::new(
                user_id.to_string(),
                sha256_hex(source_text),
                length as i32,
                ai_err.to_string(),
                Some(JsonValue(ai_err.context())),
                ai.model().to_string(),
            );
            if let Err(log_err) = repo::create_error_log(pool, log) {
                warn!("Failed to record generation error log: {:#}", log_err);
            }

            Err(GenerationError::AiService {
                message: ai_err.to_string(),
                context: Some(ai_err.context()),
            })
        }
    }
}
