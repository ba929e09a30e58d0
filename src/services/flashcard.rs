use tracing::{info, instrument, warn};

use crate::db::DbPool;
use crate::dto::CreateFlashcardsRequest;
use crate::errors::ApiError;
use crate::models::Flashcard;
use crate::repo;

/// Review counters derived from a batch payload
struct GenerationStats {
    accepted_unedited: i32,
    accepted_edited: i32,
    rejected: i32,
}

/// The uniform shape both request variants normalize into
struct NormalizedCards {
    rows: Vec<Flashcard>,
    generation_id: Option<String>,
    stats: Option<GenerationStats>,
}

/// Normalizes a single-card or batch payload into rows to insert.
///
/// Batch payloads also yield the counters to write back onto the parent
/// generation; single-card payloads never touch counters, even when they
/// reference a generation.
fn normalize(request: &CreateFlashcardsRequest, user_id: &str) -> NormalizedCards {
    match request {
        CreateFlashcardsRequest::Batch(batch) => {
            let rows = batch
                .accepted_cards
                .iter()
                .map(|card| {
                    Flashcard::new(
                        user_id.to_string(),
                        card.front.clone(),
                        card.back.clone(),
                        card.source,
                        Some(batch.generation_id.clone()),
                    )
                })
                .collect();

            let accepted_unedited = batch
                .accepted_cards
                .iter()
                .filter(|card| card.source == crate::models::FlashcardSource::AiFull)
                .count() as i32;
            let accepted_edited = batch.accepted_cards.len() as i32 - accepted_unedited;

            NormalizedCards {
                rows,
                generation_id: Some(batch.generation_id.clone()),
                stats: Some(GenerationStats {
                    accepted_unedited,
                    accepted_edited,
                    rejected: batch.rejected_count,
                }),
            }
        }
        CreateFlashcardsRequest::Single(single) => NormalizedCards {
            rows: vec![Flashcard::new(
                user_id.to_string(),
                single.front.clone(),
                single.back.clone(),
                single.source(),
                single.generation_id.clone(),
            )],
            generation_id: single.generation_id.clone(),
            stats: None,
        },
    }
}

/// Creates one or more flashcards for a user.
///
/// Handles both single manual/AI creation and batch creation from a
/// generation review session. When a generation is referenced it must exist
/// and belong to the requesting user. For batch payloads the parent
/// generation's counters are updated after the insert; a counter-update
/// failure does not roll back the inserted cards.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `request` - The validated request payload, single or batch
/// * `user_id` - The authenticated user
///
/// ### Returns
///
/// The created flashcards in their public shape
#[instrument(skip(pool, request), fields(user_id = %user_id))]
pub fn create_flashcards(
    pool: &DbPool,
    request: CreateFlashcardsRequest,
    user_id: &str,
) -> Result<Vec<Flashcard>, ApiError> {
    request.validate().map_err(ApiError::Validation)?;

    let normalized = normalize(&request, user_id);

    if let Some(ref generation_id) = normalized.generation_id {
        let generation = repo::get_generation(pool, generation_id)
            .map_err(ApiError::Database)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Generation with ID {} not found.", generation_id))
            })?;

        if generation.get_user_id() != user_id {
            return Err(ApiError::Forbidden(format!(
                "Generation with ID {} does not belong to the current user.",
                generation_id
            )));
        }
    }

    let created = repo::create_flashcards(pool, normalized.rows).map_err(ApiError::Database)?;

    if let (Some(stats), Some(generation_id)) = (normalized.stats, normalized.generation_id) {
        // Cards are already inserted; a failed counter update is logged, not
        // rolled back.
        if let Err(err) = repo::update_generation_counts(
            pool,
            &generation_id,
            stats.accepted_unedited,
            stats.accepted_edited,
            stats.rejected,
        ) {
            warn!(
                "Failed to update counters for generation {}: {:#}",
                generation_id, err
            );
        }
    }

    info!("Created {} flashcards", created.len());

    Ok(created)
}
