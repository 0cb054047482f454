// End-to-end chat pipeline: retrieve -> grade -> decide -> generate
use std::sync::Arc;
use tracing::{info, instrument};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::errors::{ChatError, Result};
use crate::llm::{RelevanceClassifier, TextGenerator};
use crate::rag::generator::Generator;
use crate::rag::grader::Grader;
use crate::rag::prompts::PromptTemplates;
use crate::rag::retriever::Retriever;
use crate::rag::state::{decide, Decision, PipelineState};

/// Answer given when no product is relevant to the question
pub const FALLBACK_ANSWER: &str = "I'm sorry, I couldn't find an answer for that.";

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Grounded answer generated from at least one relevant product
    Answered(String),
    /// Nothing relevant was found; not an error
    NoRelevantContent,
}

impl PipelineOutcome {
    /// Text to show the customer
    pub fn answer(&self) -> &str {
        match self {
            PipelineOutcome::Answered(text) => text,
            PipelineOutcome::NoRelevantContent => FALLBACK_ANSWER,
        }
    }

    pub fn into_answer(self) -> String {
        match self {
            PipelineOutcome::Answered(text) => text,
            PipelineOutcome::NoRelevantContent => FALLBACK_ANSWER.to_string(),
        }
    }

    pub fn is_grounded(&self) -> bool {
        matches!(self, PipelineOutcome::Answered(_))
    }
}

/// Chat pipeline; shared across requests, holds no per-request state
pub struct ChatPipeline {
    retriever: Retriever,
    grader: Grader,
    generator: Generator,
}

impl ChatPipeline {
    /// Assemble from explicit components
    pub fn new(retriever: Retriever, grader: Grader, generator: Generator) -> Self {
        Self {
            retriever,
            grader,
            generator,
        }
    }

    /// Assemble from collaborators and configuration
    pub fn from_parts(
        catalog: Arc<dyn Catalog>,
        classifier: Arc<dyn RelevanceClassifier>,
        text_generator: Arc<dyn TextGenerator>,
        config: &Config,
    ) -> Self {
        let prompts: Arc<PromptTemplates> = Arc::new(config.prompts.clone());
        Self::new(
            Retriever::new(catalog),
            Grader::new(classifier, Arc::clone(&prompts)),
            Generator::new(text_generator, prompts),
        )
    }

    /// Walk the state machine for one question and return the final state
    #[instrument(name = "pipeline", skip_all, fields(question_chars = question.len()))]
    pub async fn run(&self, question: &str) -> Result<PipelineState> {
        // Whitespace-only questions are valid; they retrieve nothing and end
        if question.is_empty() {
            return Err(ChatError::MissingQuestion);
        }

        let state = PipelineState::new(question);

        let retrieved = self.retriever.retrieve(state.question()).await?;
        let state = state.retrieved(retrieved)?;

        let relevant = self
            .grader
            .filter(state.question(), state.documents().to_vec())
            .await?;
        let state = state.graded(relevant)?;

        match decide(state.documents()) {
            Decision::End => {
                info!("no relevant documents, ending");
                state.ended()
            }
            Decision::Generate => {
                info!(documents = state.documents().len(), "relevant documents found, generating");
                let answer = self
                    .generator
                    .generate(state.question(), state.documents())
                    .await?;
                state.generated(answer)
            }
        }
    }

    /// Run the pipeline and reduce the final state to an outcome
    pub async fn ask(&self, question: &str) -> Result<PipelineOutcome> {
        let state = self.run(question).await?;

        Ok(match state.generation() {
            Some(text) => PipelineOutcome::Answered(text.to_string()),
            None => PipelineOutcome::NoRelevantContent,
        })
    }

    /// Maximum number of documents handed to the grader
    pub fn max_documents(&self) -> usize {
        self.retriever.max_documents()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_answer_text() {
        let outcome = PipelineOutcome::Answered("Yes, in red.".to_string());
        assert_eq!(outcome.answer(), "Yes, in red.");
        assert!(outcome.is_grounded());

        let outcome = PipelineOutcome::NoRelevantContent;
        assert_eq!(outcome.answer(), FALLBACK_ANSWER);
        assert!(!outcome.is_grounded());
        assert_eq!(outcome.into_answer(), FALLBACK_ANSWER);
    }
}
