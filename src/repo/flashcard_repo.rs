use crate::db::DbPool;
use crate::dto::{FlashcardsQueryDto, SortKey, SortOrder};
use crate::models::Flashcard;
use crate::schema::flashcards;
use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Partial update applied to a flashcard; absent fields are left untouched
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::flashcards)]
struct FlashcardChanges {
    front: Option<String>,
    back: Option<String>,
    updated_at: NaiveDateTime,
}

/// Inserts a batch of already-constructed flashcards
///
/// Used by both the single-card and batch-accept paths, which normalize
/// their payloads into rows before calling here.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `rows` - The flashcards to insert
///
/// ### Returns
///
/// A Result containing the inserted flashcards if successful
#[instrument(skip(pool, rows), fields(count = rows.len()))]
pub fn create_flashcards(pool: &DbPool, rows: Vec<Flashcard>) -> Result<Vec<Flashcard>> {
    debug!("Inserting flashcards");

    let conn = &mut pool.get()?;

    diesel::insert_into(flashcards::table)
        .values(&rows)
        .execute(conn)?;

    info!("Inserted {} flashcards", rows.len());

    Ok(rows)
}

/// Retrieves one of a user's flashcards by ID
///
/// Scoped to the owning user: another user's card comes back as None, so a
/// foreign row is indistinguishable from a missing one.
#[instrument(skip(pool), fields(user_id = %user_id, flashcard_id = %flashcard_id))]
pub fn get_flashcard(
    pool: &DbPool,
    user_id: &str,
    flashcard_id: &str,
) -> Result<Option<Flashcard>> {
    debug!("Retrieving flashcard by id");

    let conn = &mut pool.get()?;

    let result = flashcards::table
        .find(flashcard_id)
        .filter(flashcards::user_id.eq(user_id))
        .first::<Flashcard>(conn)
        .optional()?;

    Ok(result)
}

/// Lists a page of a user's flashcards plus the total row count
///
/// The query is expected to be normalized (page >= 1, limit in range).
///
/// ### Returns
///
/// A Result containing the page of flashcards and the total number of
/// matching rows
#[instrument(skip(pool), fields(user_id = %user_id, page = query.page, limit = query.limit))]
pub fn list_flashcards(
    pool: &DbPool,
    user_id: &str,
    query: &FlashcardsQueryDto,
) -> Result<(Vec<Flashcard>, i64)> {
    debug!("Listing flashcards with filters: {:?}", query);

    let conn = &mut pool.get()?;

    // Count with the same filters, before pagination is applied. The select
    // clause of a boxed query is fixed, so count_star goes on before boxing.
    let mut count_query = flashcards::table
        .filter(flashcards::user_id.eq(user_id))
        .select(diesel::dsl::count_star())
        .into_boxed();
    if let Some(source) = query.source {
        count_query = count_query.filter(flashcards::source.eq(source));
    }
    let total = count_query.get_result::<i64>(conn)?;

    let mut rows_query = flashcards::table
        .filter(flashcards::user_id.eq(user_id))
        .into_boxed();
    if let Some(source) = query.source {
        rows_query = rows_query.filter(flashcards::source.eq(source));
    }
    rows_query = match (query.sort, query.order) {
        (SortKey::CreatedAt, SortOrder::Asc) => rows_query.order(flashcards::created_at.asc()),
        (SortKey::CreatedAt, SortOrder::Desc) => rows_query.order(flashcards::created_at.desc()),
        (SortKey::UpdatedAt, SortOrder::Asc) => rows_query.order(flashcards::updated_at.asc()),
        (SortKey::UpdatedAt, SortOrder::Desc) => rows_query.order(flashcards::updated_at.desc()),
    };

    let rows = rows_query
        .limit(query.limit)
        .offset((query.page - 1) * query.limit)
        .load::<Flashcard>(conn)?;

    info!("Retrieved {} of {} flashcards", rows.len(), total);

    Ok((rows, total))
}

/// Applies a partial update to one of a user's flashcards
///
/// ### Returns
///
/// The updated flashcard, or None when the card does not exist or belongs
/// to someone else
#[instrument(skip(pool, front, back), fields(user_id = %user_id, flashcard_id = %flashcard_id))]
pub fn update_flashcard(
    pool: &DbPool,
    user_id: &str,
    flashcard_id: &str,
    front: Option<String>,
    back: Option<String>,
) -> Result<Option<Flashcard>> {
    debug!("Updating flashcard");

    let conn = &mut pool.get()?;

    let updated = diesel::update(
        flashcards::table
            .find(flashcard_id)
            .filter(flashcards::user_id.eq(user_id)),
    )
    .set(FlashcardChanges {
        front,
        back,
        updated_at: Utc::now().naive_utc(),
    })
    .execute(conn)?;

    if updated == 0 {
        debug!("Flashcard not found for update");
        return Ok(None);
    }

    let row = flashcards::table
        .find(flashcard_id)
        .first::<Flashcard>(conn)
        .optional()?;

    info!("Updated flashcard {}", flashcard_id);

    Ok(row)
}

/// Deletes one of a user's flashcards
///
/// ### Returns
///
/// true when a row was deleted, false when the card does not exist or
/// belongs to someone else
#[instrument(skip(pool), fields(user_id = %user_id, flashcard_id = %flashcard_id))]
pub fn delete_flashcard(pool: &DbPool, user_id: &str, flashcard_id: &str) -> Result<bool> {
    debug!("Deleting flashcard");

    let conn = &mut pool.get()?;

    let deleted = diesel::delete(
        flashcards::table
            .find(flashcard_id)
            .filter(flashcards::user_id.eq(user_id)),
    )
    .execute(conn)?;

    if deleted > 0 {
        info!("Deleted flashcard {}", flashcard_id);
    }

    Ok(deleted > 0)
}

#[cfg(test)]
mod tests;
