//! Answer generation from graded documents

use std::sync::Arc;
use tracing::info;

use crate::errors::Result;
use crate::llm::TextGenerator;
use crate::rag::prompts::PromptTemplates;

/// Separator between documents in the prompt context
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Join documents into prompt context
pub fn join_context(documents: &[String]) -> String {
    documents.join(CONTEXT_SEPARATOR)
}

/// Produces the final answer with one generation call
pub struct Generator {
    generator: Arc<dyn TextGenerator>,
    prompts: Arc<PromptTemplates>,
}

impl Generator {
    pub fn new(generator: Arc<dyn TextGenerator>, prompts: Arc<PromptTemplates>) -> Self {
        Self { generator, prompts }
    }

    /// Generate an answer; the text is returned exactly as the model produced it
    pub async fn generate(&self, question: &str, documents: &[String]) -> Result<String> {
        let context = join_context(documents);
        let prompt = self.prompts.render_generate(question, &context);

        let answer = self.generator.generate(&prompt).await?;
        info!(documents = documents.len(), answer_chars = answer.len(), "generated answer");

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_context() {
        let docs = vec!["one".to_string(), "two".to_string()];
        assert_eq!(join_context(&docs), "one\n\ntwo");
        assert_eq!(join_context(&docs[..1]), "one");
    }
}
