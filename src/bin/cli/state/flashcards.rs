use tenx_cards::dto::{
    FlashcardsQueryDto, Pagination, SingleFlashcardDto, SortKey, SortOrder, UpdateFlashcardDto,
};
use tenx_cards::models::{Flashcard, FlashcardSource};

use super::FlashcardsApi;
use crate::client::ClientError;

/// Drives the flashcards list view: filter, sort, paginate, CRUD.
///
/// Mutations take the simple route: call the endpoint, then refetch the
/// whole page. No optimistic updates.
pub struct FlashcardsManager {
    flashcards: Vec<Flashcard>,
    pagination: Pagination,
    query: FlashcardsQueryDto,
    is_loading: bool,
    error: Option<String>,
}

impl FlashcardsManager {
    pub fn new() -> Self {
        let query = FlashcardsQueryDto::default();
        Self {
            flashcards: Vec::new(),
            pagination: Pagination {
                page: query.page,
                limit: query.limit,
                total_items: 0,
                total_pages: 1,
            },
            query,
            is_loading: false,
            error: None,
        }
    }

    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn query(&self) -> FlashcardsQueryDto {
        self.query
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sets the source filter and resets to the first page
    pub fn set_filter(&mut self, source: Option<FlashcardSource>) {
        self.query.source = source;
        self.query.page = 1;
    }

    /// Sets the sort key and direction and resets to the first page
    pub fn set_sorting(&mut self, sort: SortKey, order: SortOrder) {
        self.query.sort = sort;
        self.query.order = order;
        self.query.page = 1;
    }

    pub fn set_page(&mut self, page: i64) {
        self.query.page = page.max(1);
    }

    pub fn set_limit(&mut self, limit: i64) {
        self.query.limit = limit;
        self.query.page = 1;
    }

    /// Fetches the current page and replaces the list and pagination
    /// metadata. On failure the previous rows stay rendered and only the
    /// error is set.
    pub async fn fetch<A: FlashcardsApi>(&mut self, api: &A) {
        self.is_loading = true;
        self.error = None;

        match api.list_flashcards(&self.query).await {
            Ok(response) => {
                self.flashcards = response.data;
                self.pagination = response.pagination;
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }

        self.is_loading = false;
    }

    /// Creates a card, then refetches the list once
    pub async fn create_flashcard<A: FlashcardsApi>(
        &mut self,
        api: &A,
        card: &SingleFlashcardDto,
    ) -> Result<(), ClientError> {
        api.create_flashcard(card).await?;
        self.fetch(api).await;
        Ok(())
    }

    /// Updates a card, then refetches the list once
    pub async fn update_flashcard<A: FlashcardsApi>(
        &mut self,
        api: &A,
        id: &str,
        patch: &UpdateFlashcardDto,
    ) -> Result<Flashcard, ClientError> {
        let updated = api.update_flashcard(id, patch).await?;
        self.fetch(api).await;
        Ok(updated)
    }

    /// Deletes a card, then refetches the list once
    pub async fn delete_flashcard<A: FlashcardsApi>(
        &mut self,
        api: &A,
        id: &str,
    ) -> Result<(), ClientError> {
        api.delete_flashcard(id).await?;
        self.fetch(api).await;
        Ok(())
    }
}
