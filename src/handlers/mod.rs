/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler is responsible for processing a specific type of HTTP
/// request, extracting the necessary data, calling the appropriate service
/// or repository functions, and returning a properly formatted response.

mod auth_handlers;
mod flashcard_handlers;
mod generation_handlers;

// Re-export all handlers
pub use auth_handlers::*;
pub use flashcard_handlers::*;
pub use generation_handlers::*;
