use crate::db::DbPool;
use crate::models::{Generation, GenerationErrorLog};
use crate::schema::{generation_error_logs, generations};
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Inserts a generation record for a successful AI call
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `generation` - The generation row, built by the generation service
///
/// ### Returns
///
/// A Result containing the inserted Generation if successful
#[instrument(skip(pool, generation), fields(generation_id = %generation.get_id()))]
pub fn create_generation(pool: &DbPool, generation: Generation) -> Result<Generation> {
    debug!("Inserting generation record");

    let conn = &mut pool.get()?;

    diesel::insert_into(generations::table)
        .values(generation.clone())
        .execute(conn)?;

    info!(
        "Recorded generation {} with {} suggestions",
        generation.get_id(),
        generation.get_suggestions_count()
    );

    Ok(generation)
}

/// Retrieves a generation by ID
///
/// Not scoped to a user: the flashcard service needs to distinguish a
/// missing generation (404) from someone else's (403).
#[instrument(skip(pool), fields(generation_id = %generation_id))]
pub fn get_generation(pool: &DbPool, generation_id: &str) -> Result<Option<Generation>> {
    debug!("Retrieving generation by id");

    let conn = &mut pool.get()?;

    let result = generations::table
        .find(generation_id)
        .first::<Generation>(conn)
        .optional()?;

    Ok(result)
}

/// Fills in the review counters once the accepted batch is saved
#[instrument(skip(pool), fields(generation_id = %generation_id))]
pub fn update_generation_counts(
    pool: &DbPool,
    generation_id: &str,
    accepted_unedited: i32,
    accepted_edited: i32,
    rejected: i32,
) -> Result<()> {
    debug!("Updating generation review counters");

    let conn = &mut pool.get()?;

    diesel::update(generations::table.find(generation_id))
        .set((
            generations::accepted_unedited_count.eq(accepted_unedited),
            generations::accepted_edited_count.eq(accepted_edited),
            generations::rejected_count.eq(rejected),
        ))
        .execute(conn)?;

    info!(
        "Generation {} counters: {} unedited, {} edited, {} rejected",
        generation_id, accepted_unedited, accepted_edited, rejected
    );

    Ok(())
}

/// Inserts an error log row for a failed AI call
///
/// Callers treat this as best-effort; a failure here is logged and swallowed
/// rather than surfaced to the user.
#[instrument(skip(pool, log), fields(user_id = %log.get_user_id()))]
pub fn create_error_log(pool: &DbPool, log: GenerationErrorLog) -> Result<GenerationErrorLog> {
    debug!("Inserting generation error log");

    let conn = &mut pool.get()?;

    diesel::insert_into(generation_error_logs::table)
        .values(log.clone())
        .execute(conn)?;

    Ok(log)
}

/// Lists a user's error logs, newest first (admin/debug surface)
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn list_error_logs(pool: &DbPool, user_id: &str) -> Result<Vec<GenerationErrorLog>> {
    debug!("Listing generation error logs");

    let conn = &mut pool.get()?;

    let rows = generation_error_logs::table
        .filter(generation_error_logs::user_id.eq(user_id))
        .order(generation_error_logs::created_at.desc())
        .load::<GenerationErrorLog>(conn)?;

    Ok(rows)
}
