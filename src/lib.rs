//! StoreBuddy - storefront product assistant
//!
//! Answers customer questions about the Suchitra Cosmetics catalog with a
//! small retrieval-augmented pipeline on a local Ollama model.
//!
//! # Architecture
//!
//! - **catalog**: read-only product search
//! - **llm**: Ollama client behind classifier/generator traits
//! - **rag**: retrieve → grade → decide → generate state machine
//! - **server**: axum HTTP endpoint

pub mod errors;

// Re-export commonly used types
pub use errors::{ChatError, Result};

pub mod catalog;
pub mod cli;
pub mod config;
pub mod doctor;
pub mod llm;
pub mod rag;
pub mod server;
