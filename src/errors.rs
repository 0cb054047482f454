//! Error types for StoreBuddy
//!
//! A single error enum covers the whole request path. The HTTP layer maps
//! each variant to a status code; everything else just propagates with `?`.

use thiserror::Error;

/// Main error type for the storefront assistant
#[derive(Error, Debug)]
pub enum ChatError {
    /// Request body was not valid JSON
    #[error("Invalid JSON")]
    InvalidJson,

    /// Request had no usable question
    #[error("Question not provided")]
    MissingQuestion,

    /// Pipeline state machine transition errors
    #[error("Invalid pipeline transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    /// Classifier or generator could not produce a usable response
    #[error("Model collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// Ollama API errors
    #[error("Ollama API error: {0}")]
    OllamaApi(String),

    /// Catalog backend errors
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout errors
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },
}

impl ChatError {
    /// True for errors caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, ChatError::InvalidJson | ChatError::MissingQuestion)
    }
}

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, ChatError>;
