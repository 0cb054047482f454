//! Prompt templates for the grading and generation calls
//!
//! Templates are plain strings with `{name}` placeholders. They are part of
//! the configuration, so the shop can retune wording without a rebuild.

use serde::{Deserialize, Serialize};

/// Default grading instruction
pub const DEFAULT_GRADE_TEMPLATE: &str = "You are a grader assessing the relevance of a retrieved document to a user question.
If the document contains keywords related to the user question, grade it as relevant.
Give a binary score 'yes' or 'no' to indicate whether the document is relevant to the question.
Provide the binary score as a JSON with a single key 'score'.

Retrieved document:

 {document}


User question: {question}";

/// Default answer instruction
pub const DEFAULT_GENERATE_TEMPLATE: &str = "You are an assistant for an e-commerce website called 'Suchitra Cosmetics'.
Use the following retrieved context to answer the user's question.
If you don't know the answer, just say that you don't have information about it.
Be concise and helpful.

Question: {question}
Context: {context}
Answer:";

/// Prompt templates used by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplates {
    /// Grading template; placeholders `{question}` and `{document}`
    #[serde(default = "default_grade")]
    pub grade: String,
    /// Generation template; placeholders `{question}` and `{context}`
    #[serde(default = "default_generate")]
    pub generate: String,
}

fn default_grade() -> String {
    DEFAULT_GRADE_TEMPLATE.to_string()
}

fn default_generate() -> String {
    DEFAULT_GENERATE_TEMPLATE.to_string()
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            grade: default_grade(),
            generate: default_generate(),
        }
    }
}

impl PromptTemplates {
    /// Render the grading prompt for one document
    pub fn render_grade(&self, question: &str, document: &str) -> String {
        render(&self.grade, &[("question", question), ("document", document)])
    }

    /// Render the answer prompt for the joined context
    pub fn render_generate(&self, question: &str, context: &str) -> String {
        render(&self.generate, &[("question", question), ("context", context)])
    }

    /// Placeholders a template is missing, as `(template, placeholder)` pairs
    pub fn missing_placeholders(&self) -> Vec<(&'static str, &'static str)> {
        let mut missing = Vec::new();
        for (name, template, required) in [
            ("grade", &self.grade, ["{question}", "{document}"]),
            ("generate", &self.generate, ["{question}", "{context}"]),
        ] {
            for placeholder in required {
                if !template.contains(placeholder) {
                    missing.push((name, placeholder));
                }
            }
        }
        missing
    }
}

/// Substitute placeholders in a single pass so that values containing
/// `{...}` text are never expanded a second time.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];

        let replaced = tail.find('}').and_then(|end| {
            let key = &tail[..end];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end))
        });

        match replaced {
            Some((value, end)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}
