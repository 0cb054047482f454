//! Model collaborators used by the pipeline
//!
//! The grader and the generator only see these traits, so tests can swap
//! in scripted fakes and production uses [`OllamaClient`] for both.

pub mod client;

use async_trait::async_trait;

use crate::errors::Result;

pub use client::OllamaClient;

/// Binary relevance judgement returned as structured data
#[async_trait]
pub trait RelevanceClassifier: Send + Sync {
    /// Send a fully rendered grading prompt and return the parsed JSON reply
    async fn classify(&self, prompt: &str) -> Result<serde_json::Value>;
}

/// Free-text generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a fully rendered prompt and return the generated text verbatim
    async fn generate(&self, prompt: &str) -> Result<String>;
}
