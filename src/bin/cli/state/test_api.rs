/// Scripted fakes standing in for the HTTP client in state-machine tests.
///
/// Results are queued up front and popped per call; every call and payload
/// is recorded so tests can assert on exactly what would have gone over
/// the wire.

use std::cell::{Cell, RefCell};

use tenx_cards::dto::{
    BatchFlashcardsDto, CreateFlashcardsResponse, FlashcardsListResponse, FlashcardsQueryDto,
    GenerationSuggestionsResponse, Pagination, SingleFlashcardDto, SuggestionDto,
    UpdateFlashcardDto,
};
use tenx_cards::models::{Flashcard, FlashcardSource};

use super::{FlashcardsApi, GenerationApi};
use crate::client::ClientError;

pub fn server_error(message: &str) -> ClientError {
    ClientError::Server {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        message: message.to_string(),
    }
}

/// A canned generation response with `count` suggestions
pub fn suggestions_response(generation_id: &str, count: usize) -> GenerationSuggestionsResponse {
    GenerationSuggestionsResponse {
        generation_id: generation_id.to_string(),
        generation_count: count as i32,
        flashcards_suggestions: (0..count)
            .map(|i| SuggestionDto {
                front: format!("Question {}?", i + 1),
                back: format!("Answer {}.", i + 1),
                source: FlashcardSource::AiFull,
            })
            .collect(),
    }
}

pub fn fixture_card(front: &str) -> Flashcard {
    Flashcard::new(
        "user-1".to_string(),
        front.to_string(),
        "back".to_string(),
        FlashcardSource::Manual,
        None,
    )
}

pub fn list_response(cards: Vec<Flashcard>, page: i64, total: i64) -> FlashcardsListResponse {
    FlashcardsListResponse {
        pagination: Pagination {
            page,
            limit: 10,
            total_items: total,
            total_pages: ((total + 9) / 10).max(1),
        },
        data: cards,
    }
}

fn created(cards: Vec<Flashcard>) -> CreateFlashcardsResponse {
    CreateFlashcardsResponse { flashcards: cards }
}

#[derive(Default)]
pub struct MockGenerationApi {
    pub generate_results: RefCell<Vec<Result<GenerationSuggestionsResponse, ClientError>>>,
    pub save_results: RefCell<Vec<Result<(), ClientError>>>,
    pub generate_calls: Cell<usize>,
    pub saved_batches: RefCell<Vec<BatchFlashcardsDto>>,
}

impl GenerationApi for MockGenerationApi {
    async fn create_generation(
        &self,
        _source_text: &str,
    ) -> Result<GenerationSuggestionsResponse, ClientError> {
        self.generate_calls.set(self.generate_calls.get() + 1);
        self.generate_results
            .borrow_mut()
            .pop()
            .expect("unexpected create_generation call")
    }

    async fn save_batch(
        &self,
        batch: &BatchFlashcardsDto,
    ) -> Result<CreateFlashcardsResponse, ClientError> {
        self.saved_batches.borrow_mut().push(batch.clone());
        self.save_results
            .borrow_mut()
            .pop()
            .expect("unexpected save_batch call")
            .map(|_| created(Vec::new()))
    }
}

#[derive(Default)]
pub struct MockFlashcardsApi {
    pub list_results: RefCell<Vec<Result<FlashcardsListResponse, ClientError>>>,
    pub list_calls: Cell<usize>,
    pub seen_queries: RefCell<Vec<FlashcardsQueryDto>>,
    pub mutation_results: RefCell<Vec<Result<(), ClientError>>>,
}

impl MockFlashcardsApi {
    fn next_mutation(&self) -> Result<(), ClientError> {
        // Mutations default to success unless a result was queued
        self.mutation_results.borrow_mut().pop().unwrap_or(Ok(()))
    }
}

impl FlashcardsApi for MockFlashcardsApi {
    async fn list_flashcards(
        &self,
        query: &FlashcardsQueryDto,
    ) -> Result<FlashcardsListResponse, ClientError> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.seen_queries.borrow_mut().push(*query);
        self.list_results
            .borrow_mut()
            .pop()
            .expect("unexpected list_flashcards call")
    }

    async fn create_flashcard(
        &self,
        _card: &SingleFlashcardDto,
    ) -> Result<CreateFlashcardsResponse, ClientError> {
        self.next_mutation().map(|_| created(Vec::new()))
    }

    async fn update_flashcard(
        &self,
        _id: &str,
        _patch: &UpdateFlashcardDto,
    ) -> Result<Flashcard, ClientError> {
        self.next_mutation().map(|_| fixture_card("updated"))
    }

    async fn delete_flashcard(&self, _id: &str) -> Result<(), ClientError> {
        self.next_mutation()
    }
}
