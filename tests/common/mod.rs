//! Shared fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use storebuddy::catalog::{Catalog, InMemoryCatalog, Product};
use storebuddy::config::Config;
use storebuddy::llm::{RelevanceClassifier, TextGenerator};
use storebuddy::rag::ChatPipeline;
use storebuddy::{ChatError, Result};

pub fn product(id: u64, name: &str, description: &str, price: f64) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: description.to_string(),
        price,
        created_at: None,
    }
}

/// Small cosmetics catalog; undated, so default order is the order given
pub fn shop_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(vec![
        product(1, "Red Matte Lipstick", "Velvet finish in cherry red", 8.0),
        product(2, "Nude Gloss", "Sheer lip shine", 6.5),
        product(3, "Rose Face Cream", "Daily moisturiser", 12.5),
        product(4, "Kajal", "Smudge-proof black liner", 4.25),
    ])
}

/// Catalog where every product mentions "serum"
pub fn serum_catalog(count: u64) -> InMemoryCatalog {
    InMemoryCatalog::new(
        (1..=count)
            .map(|i| product(i, &format!("Serum No. {}", i), "Vitamin C serum", 10.0))
            .collect(),
    )
}

/// Reply a scripted classifier gives for prompts mentioning a product name
#[derive(Clone)]
pub enum Reply {
    Json(serde_json::Value),
    Fail,
}

/// Classifier answering by product name, `{"score": "no"}` otherwise
#[derive(Default)]
pub struct ScriptedClassifier {
    rules: Vec<(String, Reply)>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, name: &str, reply: Reply) -> Self {
        self.rules.push((name.to_string(), reply));
        self
    }

    pub fn yes(self, name: &str) -> Self {
        self.on(name, Reply::Json(json!({"score": "yes"})))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelevanceClassifier for ScriptedClassifier {
    async fn classify(&self, prompt: &str) -> Result<serde_json::Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let reply = self
            .rules
            .iter()
            .find(|(name, _)| prompt.contains(&format!("Product Name: {}\n", name)))
            .map(|(_, reply)| reply.clone())
            .unwrap_or(Reply::Json(json!({"score": "no"})));

        match reply {
            Reply::Json(value) => Ok(value),
            Reply::Fail => Err(ChatError::CollaboratorUnavailable("connection refused".to_string())),
        }
    }
}

/// Generator that records prompts and echoes a fixed answer
pub struct RecordingGenerator {
    answer: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
            .clone()
            .map_err(ChatError::CollaboratorUnavailable)
    }
}

pub fn pipeline(
    catalog: InMemoryCatalog,
    classifier: Arc<ScriptedClassifier>,
    generator: Arc<RecordingGenerator>,
) -> ChatPipeline {
    let catalog: Arc<dyn Catalog> = Arc::new(catalog);
    ChatPipeline::from_parts(catalog, classifier, generator, &Config::default())
}
