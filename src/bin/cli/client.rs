use reqwest::Client;
use tenx_cards::dto::{
    BatchFlashcardsDto, CreateFlashcardsResponse, CreateGenerationDto, FlashcardsListResponse,
    FlashcardsQueryDto, GenerationSuggestionsResponse, LoginDto, LoginResponse, RegisterDto,
    RegisterResponse, ResetPasswordDto, SingleFlashcardDto, UpdateFlashcardDto,
    UpdatePasswordDto,
};
use tenx_cards::models::Flashcard;

use crate::state::{FlashcardsApi, GenerationApi};

/// Error type for CLI client operations
#[derive(Debug)]
pub enum ClientError {
    /// Server returned an error status with a message body
    Server {
        status: reqwest::StatusCode,
        message: String,
    },
    /// Network/connection/request error
    Request(reqwest::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status.as_u16(), message)
            }
            ClientError::Request(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Request(err) => Some(err),
            ClientError::Server { .. } => None,
        }
    }
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() || self.status().is_redirection() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("message")
                .or_else(|| body.get("error"))
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// HTTP client wrapper for communicating with the 10x Cards server
pub struct TenxCardsClient {
    /// The base URL of the server (e.g. "http://localhost:3000")
    base_url: String,
    /// The bearer token of the logged-in user, if any
    token: Option<String>,
    /// The underlying HTTP client
    client: Client,
}

/// Builds query parameters from a FlashcardsQueryDto
fn build_query_params(query: &FlashcardsQueryDto) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = vec![
        ("page", query.page.to_string()),
        ("limit", query.limit.to_string()),
        (
            "sort",
            match query.sort {
                tenx_cards::dto::SortKey::CreatedAt => "created_at".to_string(),
                tenx_cards::dto::SortKey::UpdatedAt => "updated_at".to_string(),
            },
        ),
        (
            "order",
            match query.order {
                tenx_cards::dto::SortOrder::Asc => "asc".to_string(),
                tenx_cards::dto::SortOrder::Desc => "desc".to_string(),
            },
        ),
    ];
    if let Some(source) = query.source {
        params.push(("source", source.as_str().to_string()));
    }
    params
}

impl TenxCardsClient {
    /// Creates a new client
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the 10x Cards server
    /// * `token` - A stored bearer token from a previous login, if any
    pub fn new(base_url: String, token: Option<String>) -> Self {
        // Logout answers with a redirect to /login, which only exists in the
        // web client; don't follow it.
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");
        Self {
            base_url,
            token,
            client,
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ── Auth endpoints ───────────────────────────────────────────────

    /// Registers a new account
    pub async fn register(&self, dto: &RegisterDto) -> Result<RegisterResponse, ClientError> {
        let url = format!("{}/api/auth/register", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(dto)
            .send()
            .await
            .map_err(ClientError::Request)?
            .check()
            .await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Logs in and returns the user plus a fresh bearer token
    pub async fn login(&self, dto: &LoginDto) -> Result<LoginResponse, ClientError> {
        let url = format!("{}/api/auth/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(dto)
            .send()
            .await
            .map_err(ClientError::Request)?
            .check()
            .await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Logs out, revoking the current session
    pub async fn logout(&self) -> Result<(), ClientError> {
        let url = format!("{}/api/auth/logout", self.base_url);
        self.request(self.client.post(&url))
            .send()
            .await
            .map_err(ClientError::Request)?
            .check()
            .await?;
        Ok(())
    }

    /// Requests a password reset email/token
    pub async fn reset_password(&self, dto: &ResetPasswordDto) -> Result<(), ClientError> {
        let url = format!("{}/api/auth/reset-password", self.base_url);
        self.client
            .post(&url)
            .json(dto)
            .send()
            .await
            .map_err(ClientError::Request)?
            .check()
            .await?;
        Ok(())
    }

    /// Sets a new password via session or reset token
    pub async fn update_password(&self, dto: &UpdatePasswordDto) -> Result<(), ClientError> {
        let url = format!("{}/api/auth/update-password", self.base_url);
        self.request(self.client.post(&url))
            .json(dto)
            .send()
            .await
            .map_err(ClientError::Request)?
            .check()
            .await?;
        Ok(())
    }
}

impl FlashcardsApi for TenxCardsClient {
    /// Lists a page of flashcards
    async fn list_flashcards(
        &self,
        query: &FlashcardsQueryDto,
    ) -> Result<FlashcardsListResponse, ClientError> {
        let url = format!("{}/api/flashcards", self.base_url);
        let params = build_query_params(query);

        let response = self
            .request(self.client.get(&url).query(&params))
            .send()
            .await
            .map_err(ClientError::Request)?
            .check()
            .await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Creates a single flashcard
    async fn create_flashcard(
        &self,
        card: &SingleFlashcardDto,
    ) -> Result<CreateFlashcardsResponse, ClientError> {
        let url = format!("{}/api/flashcards", self.base_url);
        let response = self
            .request(self.client.post(&url))
            .json(card)
            .send()
            .await
            .map_err(ClientError::Request)?
            .check()
            .await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Updates a flashcard's text
    async fn update_flashcard(
        &self,
        id: &str,
        patch: &UpdateFlashcardDto,
    ) -> Result<Flashcard, ClientError> {
        let url = format!("{}/api/flashcards/{}", self.base_url, id);
        let response = self
            .request(self.client.put(&url))
            .json(patch)
            .send()
            .await
            .map_err(ClientError::Request)?
            .check()
            .await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Deletes a flashcard
    async fn delete_flashcard(&self, id: &str) -> Result<(), ClientError> {
        let url = format!("{}/api/flashcards/{}", self.base_url, id);
        self.request(self.client.delete(&url))
            .send()
            .await
            .map_err(ClientError::Request)?
            .check()
            .await?;
        Ok(())
    }
}

impl GenerationApi for TenxCardsClient {
    /// Requests flashcard suggestions for source text
    async fn create_generation(
        &self,
        source_text: &str,
    ) -> Result<GenerationSuggestionsResponse, ClientError> {
        let url = format!("{}/api/generations", self.base_url);
        let dto = CreateGenerationDto {
            source_text: source_text.to_string(),
        };
        let response = self
            .request(self.client.post(&url))
            .json(&dto)
            .send()
            .await
            .map_err(ClientError::Request)?
            .check()
            .await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Persists a reviewed batch of suggestions
    async fn save_batch(
        &self,
        batch: &BatchFlashcardsDto,
    ) -> Result<CreateFlashcardsResponse, ClientError> {
        let url = format!("{}/api/flashcards/batch", self.base_url);
        let response = self
            .request(self.client.post(&url))
            .json(batch)
            .send()
            .await
            .map_err(ClientError::Request)?
            .check()
            .await?;
        response.json().await.map_err(ClientError::Request)
    }
}
