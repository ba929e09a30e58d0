use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// The model used when none is configured
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1024;

const SYSTEM_PROMPT: &str = "You are a study assistant that turns source text into flashcards. \
Extract the key facts and concepts and phrase each as a question/answer pair. \
Keep every front under 200 characters and every back under 500 characters. \
Respond with JSON of the form {\"flashcards\": [{\"front\": \"...\", \"back\": \"...\"}]}.";

/// One card produced by the model, before it is tagged as a suggestion
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedCard {
    pub front: String,
    pub back: String,
}

/// Failure talking to, or interpreting, the AI service.
///
/// Each variant keeps the upstream detail for the error log; the Display
/// message is what lands in `error_message`.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Authentication with OpenRouter failed.")]
    Authentication(String),
    #[error("Rate limit exceeded for OpenRouter.")]
    RateLimit(String),
    #[error("OpenRouter rejected the request.")]
    BadRequest(String),
    #[error("OpenRouter returned an error response.")]
    Upstream(String),
    #[error("Failed to reach OpenRouter.")]
    Transport(String),
    #[error("Model output failed validation.")]
    OutputValidation(String),
}

impl AiError {
    /// Structured context persisted alongside the error message
    pub fn context(&self) -> serde_json::Value {
        let (kind, detail) = match self {
            AiError::Authentication(d) => ("authentication", d),
            AiError::RateLimit(d) => ("rate_limit", d),
            AiError::BadRequest(d) => ("bad_request", d),
            AiError::Upstream(d) => ("upstream", d),
            AiError::Transport(d) => ("transport", d),
            AiError::OutputValidation(d) => ("output_validation", d),
        };
        json!({ "kind": kind, "detail": detail })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct FlashcardsPayload {
    flashcards: Vec<GeneratedCard>,
}

/// Client for the OpenRouter chat-completions API.
///
/// Without an API key the client runs in mock mode and returns canned
/// suggestions instead of making network calls; tests and keyless dev
/// environments rely on this.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    base_url: String,
}

impl OpenRouterClient {
    /// Creates a client; `api_key = None` selects mock mode
    pub fn new(api_key: Option<String>, model: Option<String>) -> Self {
        if api_key.is_none() {
            info!("No OpenRouter API key configured, running in mock mode");
        }
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// A mock-mode client for tests
    pub fn mock() -> Self {
        Self::new(None, None)
    }

    /// Overrides the API base URL (tests point this at an unroutable or
    /// fake endpoint)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn is_mock(&self) -> bool {
        self.api_key.is_none()
    }

    /// The model identifier recorded with generations and error logs
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Asks the model for flashcard suggestions covering `source_text`
    #[instrument(skip(self, source_text), fields(model = %self.model, mock = self.is_mock()))]
    pub async fn generate_flashcards(
        &self,
        source_text: &str,
    ) -> Result<Vec<GeneratedCard>, AiError> {
        if self.is_mock() {
            debug!("Returning mock suggestions");
            return Ok(mock_suggestions());
        }
        let api_key = self.api_key.as_deref().unwrap_or_default();

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Create flashcards from the following text:\n\n{}",
                        source_text
                    ),
                },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "flashcards",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "properties": {
                            "flashcards": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "front": { "type": "string" },
                                        "back": { "type": "string" },
                                    },
                                    "required": ["front", "back"],
                                    "additionalProperties": false,
                                },
                            },
                        },
                        "required": ["flashcards"],
                        "additionalProperties": false,
                    },
                },
            },
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => AiError::Authentication(detail),
                429 => AiError::RateLimit(detail),
                400 => AiError::BadRequest(detail),
                code => AiError::Upstream(format!("HTTP {}: {}", code, detail)),
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::OutputValidation(e.to_string()))?;
        let content = chat
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| AiError::OutputValidation("response contained no choices".to_string()))?;

        let payload: FlashcardsPayload = serde_json::from_str(content)
            .map_err(|e| AiError::OutputValidation(format!("unparseable content: {}", e)))?;

        info!("Model returned {} flashcards", payload.flashcards.len());

        Ok(payload.flashcards)
    }
}

/// Deterministic suggestions for mock mode
fn mock_suggestions() -> Vec<GeneratedCard> {
    vec![
        GeneratedCard {
            front: "What is the main concept discussed in the provided text?".to_string(),
            back: "The main concept is extracted from the source material and presented as a concise answer.".to_string(),
        },
        GeneratedCard {
            front: "What are the key points mentioned in the source text?".to_string(),
            back: "Key points include the essential information that was highlighted in the original material.".to_string(),
        },
        GeneratedCard {
            front: "How does this topic relate to broader concepts?".to_string(),
            back: "This topic connects to wider themes and principles within the subject area.".to_string(),
        },
    ]
}
