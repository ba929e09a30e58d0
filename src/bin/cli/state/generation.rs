use tenx_cards::dto::{
    AiCardDto, BatchFlashcardsDto, SOURCE_TEXT_MAX, SOURCE_TEXT_MIN,
};
use tenx_cards::models::FlashcardSource;
use uuid::Uuid;

use super::GenerationApi;

/// Where the generate call currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiState {
    Idle,
    Loading,
    Success,
    Error,
}

/// Review verdict on one suggestion.
///
/// Suggestions start as `New`; saving the batch only counts ones the user
/// explicitly accepted, edited or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionStatus {
    New,
    Accepted,
    Edited,
    Rejected,
}

/// One suggestion under review, alive only for the session
#[derive(Debug, Clone)]
pub struct SuggestionViewModel {
    /// Client-generated id; the server never sees individual suggestions
    pub id: String,
    pub front: String,
    pub back: String,
    pub source: FlashcardSource,
    pub status: SuggestionStatus,
}

/// A partial update to one suggestion
#[derive(Debug, Clone, Default)]
pub struct SuggestionPatch {
    pub front: Option<String>,
    pub back: Option<String>,
    pub status: Option<SuggestionStatus>,
}

/// Drives the generate → review → save workflow.
///
/// States go idle → loading → success | error; an emptied suggestion list
/// after a save is the "saved" signal. Save errors are tracked separately
/// from the generate state so a failed save never disturbs the rendered
/// suggestions.
pub struct GenerationManager {
    api_state: ApiState,
    suggestions: Vec<SuggestionViewModel>,
    generation_id: Option<String>,
    error_message: Option<String>,
    is_saving: bool,
    save_error: Option<String>,
}

impl GenerationManager {
    pub fn new() -> Self {
        Self {
            api_state: ApiState::Idle,
            suggestions: Vec::new(),
            generation_id: None,
            error_message: None,
            is_saving: false,
            save_error: None,
        }
    }

    pub fn api_state(&self) -> ApiState {
        self.api_state
    }

    pub fn suggestions(&self) -> &[SuggestionViewModel] {
        &self.suggestions
    }

    pub fn generation_id(&self) -> Option<&str> {
        self.generation_id.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    /// Requests suggestions for `source_text`.
    ///
    /// Guarded by the same length bounds the server enforces; an out-of-
    /// bounds text moves straight to the error state without a network
    /// call. Prior suggestions and errors are cleared before the call, and
    /// each returned suggestion gets a fresh client id with status `New`.
    pub async fn handle_generate<A: GenerationApi>(&mut self, api: &A, source_text: &str) {
        let length = source_text.chars().count();
        if !(SOURCE_TEXT_MIN..=SOURCE_TEXT_MAX).contains(&length) {
            self.api_state = ApiState::Error;
            self.error_message = Some(format!(
                "Source text must be between {} and {} characters (got {}).",
                SOURCE_TEXT_MIN, SOURCE_TEXT_MAX, length
            ));
            return;
        }

        self.api_state = ApiState::Loading;
        self.error_message = None;
        self.suggestions.clear();
        self.generation_id = None;

        match api.create_generation(source_text).await {
            Ok(response) => {
                self.generation_id = Some(response.generation_id);
                self.suggestions = response
                    .flashcards_suggestions
                    .into_iter()
                    .map(|suggestion| SuggestionViewModel {
                        id: Uuid::new_v4().to_string(),
                        front: suggestion.front,
                        back: suggestion.back,
                        source: suggestion.source,
                        status: SuggestionStatus::New,
                    })
                    .collect();
                self.api_state = ApiState::Success;
            }
            Err(err) => {
                self.api_state = ApiState::Error;
                self.error_message = Some(err.to_string());
            }
        }
    }

    /// Merges a patch into the suggestion with the given id.
    ///
    /// Unknown ids are a no-op, and the generate state is never touched.
    pub fn handle_update_suggestion(&mut self, id: &str, patch: SuggestionPatch) {
        let Some(suggestion) = self.suggestions.iter_mut().find(|s| s.id == id) else {
            return;
        };
        if let Some(front) = patch.front {
            suggestion.front = front;
        }
        if let Some(back) = patch.back {
            suggestion.back = back;
        }
        if let Some(status) = patch.status {
            suggestion.status = status;
        }
    }

    /// Persists the reviewed batch.
    ///
    /// Accepted suggestions become `ai-full` cards, edited ones `ai-edited`;
    /// rejected ones only bump the rejected counter. Suggestions still `New`
    /// are counted in neither tally and are dropped with the rest of the
    /// list once the save succeeds. On failure the list stays intact and
    /// only the save error is set.
    pub async fn handle_save_batch<A: GenerationApi>(&mut self, api: &A) {
        let Some(generation_id) = self.generation_id.clone() else {
            self.save_error = Some("No generation ID, cannot save flashcards.".to_string());
            return;
        };

        self.is_saving = true;
        self.save_error = None;

        let accepted_cards: Vec<AiCardDto> = self
            .suggestions
            .iter()
            .filter(|s| {
                matches!(
                    s.status,
                    SuggestionStatus::Accepted | SuggestionStatus::Edited
                )
            })
            .map(|s| AiCardDto {
                front: s.front.clone(),
                back: s.back.clone(),
                source: match s.status {
                    SuggestionStatus::Edited => FlashcardSource::AiEdited,
                    _ => FlashcardSource::AiFull,
                },
            })
            .collect();

        let rejected_count = self
            .suggestions
            .iter()
            .filter(|s| s.status == SuggestionStatus::Rejected)
            .count() as i32;

        let batch = BatchFlashcardsDto {
            generation_id,
            accepted_cards,
            rejected_count,
        };

        match api.save_batch(&batch).await {
            Ok(_) => {
                // An empty list is what tells the view "saved"
                self.suggestions.clear();
            }
            Err(err) => {
                self.save_error = Some(err.to_string());
            }
        }

        self.is_saving = false;
    }
}
