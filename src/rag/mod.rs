// Retrieval-augmented answering for storefront questions
//
// Components:
// - Retriever: keyword search over the catalog, rendered as documents
// - Grader: per-document relevance check by the model
// - Generator: one grounded answer from the relevant documents
// - State: the stage machine threading a request through the steps
// - Pipeline: end-to-end orchestration

pub mod generator;
pub mod grader;
pub mod pipeline;
pub mod prompts;
pub mod retriever;
pub mod state;

// Re-export key types
pub use generator::Generator;
pub use grader::{GradedDocument, Grader, Relevance};
pub use pipeline::{ChatPipeline, PipelineOutcome, FALLBACK_ANSWER};
pub use prompts::PromptTemplates;
pub use retriever::Retriever;
pub use state::{Decision, PipelineState, Stage};
