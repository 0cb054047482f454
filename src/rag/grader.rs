//! Relevance grading of retrieved documents
//!
//! One classifier call per document. A document survives only when the
//! reply is an object whose `score` is exactly the string `"yes"`.
//!
//! A failed call counts as "no" for that document alone. When every call of
//! a non-empty batch fails the model server is treated as down and the
//! last error is returned.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::errors::{ChatError, Result};
use crate::llm::RelevanceClassifier;
use crate::rag::prompts::PromptTemplates;

/// Key the classifier is asked to answer under
pub const SCORE_KEY: &str = "score";

/// Binary relevance verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    Relevant,
    Irrelevant,
}

impl Relevance {
    /// Interpret a classifier reply
    pub fn from_reply(reply: &serde_json::Value) -> Self {
        match reply.get(SCORE_KEY).and_then(|v| v.as_str()) {
            Some("yes") => Relevance::Relevant,
            _ => Relevance::Irrelevant,
        }
    }

    pub fn is_relevant(self) -> bool {
        self == Relevance::Relevant
    }
}

/// A document with its verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedDocument {
    pub text: String,
    pub relevance: Relevance,
}

/// Grades documents against the question
pub struct Grader {
    classifier: Arc<dyn RelevanceClassifier>,
    prompts: Arc<PromptTemplates>,
}

impl Grader {
    pub fn new(classifier: Arc<dyn RelevanceClassifier>, prompts: Arc<PromptTemplates>) -> Self {
        Self { classifier, prompts }
    }

    /// Grade every document, preserving order
    pub async fn grade_all(&self, question: &str, documents: Vec<String>) -> Result<Vec<GradedDocument>> {
        let total = documents.len();
        let mut graded = Vec::with_capacity(total);
        let mut last_error: Option<ChatError> = None;
        let mut failures = 0;

        for (index, text) in documents.into_iter().enumerate() {
            let prompt = self.prompts.render_grade(question, &text);

            let relevance = match self.classifier.classify(&prompt).await {
                Ok(reply) => Relevance::from_reply(&reply),
                Err(e) => {
                    warn!(document = index, error = %e, "grading failed, treating as irrelevant");
                    failures += 1;
                    last_error = Some(e);
                    Relevance::Irrelevant
                }
            };

            debug!(document = index, ?relevance, "graded document");
            graded.push(GradedDocument { text, relevance });
        }

        if total > 0 && failures == total {
            let reason = last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "classifier failed".to_string());
            return Err(ChatError::CollaboratorUnavailable(format!(
                "All {} grading calls failed: {}",
                total, reason
            )));
        }

        Ok(graded)
    }

    /// Keep only the relevant documents, in their original order
    pub async fn filter(&self, question: &str, documents: Vec<String>) -> Result<Vec<String>> {
        let retrieved = documents.len();
        let relevant: Vec<String> = self
            .grade_all(question, documents)
            .await?
            .into_iter()
            .filter(|d| d.relevance.is_relevant())
            .map(|d| d.text)
            .collect();

        info!(retrieved, relevant = relevant.len(), "graded documents");
        Ok(relevant)
    }
}
