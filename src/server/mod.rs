//! HTTP front end for the chat pipeline, built on axum.
//!
//! - `POST /chatbot/` with `{"question": "..."}` → `{"answer": "..."}`
//! - `GET /health` → model and catalog status

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info_span, Instrument};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::errors::ChatError;
use crate::rag::ChatPipeline;

/// Shared, read-only state for handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChatPipeline>,
    pub catalog: Arc<dyn Catalog>,
    pub model: String,
    pub request_timeout: Duration,
}

/// Successful chat reply
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerBody {
    pub answer: String,
}

/// Error reply
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match &self {
            ChatError::InvalidJson | ChatError::MissingQuestion => StatusCode::BAD_REQUEST,
            ChatError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self, "chat request failed");
        } else {
            debug!(error = %self, "rejected chat request");
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// Build an axum Router with `/chatbot/` and `/health` routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chatbot/", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pull a non-empty question out of a raw request body
pub fn parse_question(body: &[u8]) -> Result<String, ChatError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ChatError::InvalidJson)?;

    match value.get("question").and_then(|q| q.as_str()) {
        Some(q) if !q.is_empty() => Ok(q.to_string()),
        _ => Err(ChatError::MissingQuestion),
    }
}

/// Chat endpoint.
async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnswerBody>, ChatError> {
    let question = parse_question(&body)?;
    let request_id = Uuid::new_v4();

    let run = state
        .pipeline
        .ask(&question)
        .instrument(info_span!("chat", %request_id));

    let outcome = tokio::time::timeout(state.request_timeout, run)
        .await
        .map_err(|_| ChatError::Timeout {
            duration_ms: state.request_timeout.as_millis() as u64,
        })??;

    Ok(Json(AnswerBody {
        answer: outcome.into_answer(),
    }))
}

/// Health check endpoint.
async fn health_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ChatError> {
    let products = state.catalog.count().await?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "model": state.model,
        "products": products,
        "max_documents": state.pipeline.max_documents(),
    })))
}

/// Bind `addr` and serve until ctrl-c
pub async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "chat server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
