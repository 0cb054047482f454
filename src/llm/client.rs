//! Ollama API client
//!
//! Single request/response calls against `POST /api/generate`:
//! - `stream: false`, one JSON body per call
//! - `format: "json"` for grading calls
//! - temperature 0 so grading is repeatable

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{RelevanceClassifier, TextGenerator};
use crate::config::OllamaConfig;
use crate::errors::{ChatError, Result};

/// Ollama client shared by the grader and the generator
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create client from the `[ollama]` config section
    pub fn from_config(config: &OllamaConfig) -> Result<Self> {
        Self::with_config(
            &config.base_url(),
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Create Ollama client with custom configuration
    pub fn with_config(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ChatError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Run one non-streaming generation and return the `response` text
    pub async fn complete(&self, prompt: &str, format: Option<&str>) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format,
            options: GenerateOptions { temperature: 0.0 },
        };

        debug!(model = %self.model, json = format.is_some(), "sending generate request");

        let response = self.client.post(&url).json(&request).send().await.map_err(|e| {
            if e.is_timeout() {
                ChatError::CollaboratorUnavailable(format!("Ollama request timed out: {}", e))
            } else {
                ChatError::CollaboratorUnavailable(format!("Failed to reach Ollama: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChatError::OllamaApi(format!("HTTP {}: {}", status, error_text)));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ChatError::OllamaApi(format!("Failed to parse response: {}", e)))?;

        Ok(body.response)
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/version", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// List installed models
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ChatError::OllamaApi(format!("Failed to list models: {}", e)))?;

        if !response.status().is_success() {
            return Err(ChatError::OllamaApi(format!(
                "Failed to retrieve model list: HTTP {}",
                response.status()
            )));
        }

        let models_response: ModelsResponse = response
            .json()
            .await
            .map_err(|e| ChatError::OllamaApi(format!("Failed to parse models: {}", e)))?;

        Ok(models_response.models.into_iter().map(|m| m.name).collect())
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RelevanceClassifier for OllamaClient {
    async fn classify(&self, prompt: &str) -> Result<serde_json::Value> {
        let raw = self.complete(prompt, Some("json")).await?;
        serde_json::from_str(raw.trim()).map_err(|e| {
            ChatError::CollaboratorUnavailable(format!("Classifier returned malformed JSON: {}", e))
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(prompt, None).await
    }
}

/// Ollama generate request
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

/// Ollama generate response (non-streaming)
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama models list response
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

/// Model information
#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}
