//! Pipeline state machine
//!
//! A chat request walks a fixed graph with one branch point:
//! - Start     → Retrieved (on: Retrieve)
//! - Retrieved → Graded    (on: Grade)
//! - Graded    → Generated (on: Generate)
//! - Graded    → Ended     (on: Terminate)
//!
//! Generated and Ended are terminal. Each step consumes the previous
//! [`PipelineState`] and returns a new one, so concurrent requests never
//! share anything mutable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{ChatError, Result};

/// Pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Question received, nothing retrieved yet
    Start,

    /// Candidate products retrieved from the catalog
    Retrieved,

    /// Candidates filtered by the relevance grader
    Graded,

    /// Answer generated (terminal)
    Generated,

    /// No relevant products, finished without an answer (terminal)
    Ended,
}

/// Events that trigger stage transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    Retrieve,
    Grade,
    Generate,
    Terminate,
}

/// Outcome of the decision step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// At least one relevant document, go on to generation
    Generate,
    /// Nothing relevant, stop without an answer
    End,
}

impl Decision {
    pub fn event(self) -> StageEvent {
        match self {
            Decision::Generate => StageEvent::Generate,
            Decision::End => StageEvent::Terminate,
        }
    }
}

/// Decide whether the graded documents justify a generation call
pub fn decide(documents: &[String]) -> Decision {
    if documents.is_empty() {
        Decision::End
    } else {
        Decision::Generate
    }
}

impl Stage {
    /// Check if this is a terminal stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Generated | Stage::Ended)
    }

    /// Transition function; there is no cycle and no re-entry
    pub fn transition(&self, event: StageEvent) -> Result<Stage> {
        use Stage::*;
        use StageEvent::*;

        let next = match (self, event) {
            (Start, Retrieve) => Retrieved,
            (Retrieved, Grade) => Graded,
            (Graded, StageEvent::Generate) => Generated,
            (Graded, Terminate) => Ended,

            (from, event) => {
                return Err(ChatError::InvalidTransition {
                    from: format!("{:?}", from),
                    to: format!("(via {:?})", event),
                    reason: format!("No valid transition from {:?} on {:?}", from, event),
                });
            }
        };

        Ok(next)
    }

    /// Get all valid events from this stage
    pub fn valid_events(&self) -> Vec<StageEvent> {
        match self {
            Stage::Start => vec![StageEvent::Retrieve],
            Stage::Retrieved => vec![StageEvent::Grade],
            Stage::Graded => vec![StageEvent::Generate, StageEvent::Terminate],
            Stage::Generated | Stage::Ended => vec![],
        }
    }
}

/// State threaded through one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    question: String,
    stage: Stage,
    documents: BTreeMap<Stage, Vec<String>>,
    generation: Option<String>,
}

impl PipelineState {
    /// Fresh state for one question
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            stage: Stage::Start,
            documents: BTreeMap::new(),
            generation: None,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Documents recorded for `stage`; empty when the stage produced none
    pub fn documents_at(&self, stage: Stage) -> &[String] {
        self.documents.get(&stage).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Documents produced by the most recent document-producing stage
    pub fn documents(&self) -> &[String] {
        self.documents
            .iter()
            .next_back()
            .map(|(_, docs)| docs.as_slice())
            .unwrap_or(&[])
    }

    pub fn generation(&self) -> Option<&str> {
        self.generation.as_deref()
    }

    /// Record retrieved candidates
    pub fn retrieved(self, documents: Vec<String>) -> Result<Self> {
        self.advance(StageEvent::Retrieve, Some(documents), None)
    }

    /// Record the graded subset
    pub fn graded(self, documents: Vec<String>) -> Result<Self> {
        self.advance(StageEvent::Grade, Some(documents), None)
    }

    /// Record the generated answer
    pub fn generated(self, answer: String) -> Result<Self> {
        self.advance(StageEvent::Generate, None, Some(answer))
    }

    /// Finish without an answer
    pub fn ended(self) -> Result<Self> {
        self.advance(StageEvent::Terminate, None, None)
    }

    fn advance(
        mut self,
        event: StageEvent,
        documents: Option<Vec<String>>,
        generation: Option<String>,
    ) -> Result<Self> {
        let next = self.stage.transition(event)?;
        if let Some(documents) = documents {
            self.documents.insert(next, documents);
        }
        if generation.is_some() {
            self.generation = generation;
        }
        self.stage = next;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_transitions() {
        assert_eq!(Stage::Start.transition(StageEvent::Retrieve).unwrap(), Stage::Retrieved);
        assert_eq!(Stage::Retrieved.transition(StageEvent::Grade).unwrap(), Stage::Graded);
        assert_eq!(Stage::Graded.transition(StageEvent::Generate).unwrap(), Stage::Generated);
        assert_eq!(Stage::Graded.transition(StageEvent::Terminate).unwrap(), Stage::Ended);
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(Stage::Start.transition(StageEvent::Generate).is_err());
        assert!(Stage::Retrieved.transition(StageEvent::Terminate).is_err());
        assert!(Stage::Generated.transition(StageEvent::Retrieve).is_err());
        assert!(Stage::Ended.transition(StageEvent::Generate).is_err());
    }

    #[test]
    fn test_terminal_stages() {
        assert!(Stage::Generated.is_terminal());
        assert!(Stage::Ended.is_terminal());
        assert!(!Stage::Graded.is_terminal());
        assert!(Stage::Ended.valid_events().is_empty());
        assert_eq!(Stage::Graded.valid_events().len(), 2);
    }

    #[test]
    fn test_decide() {
        assert_eq!(decide(&[]), Decision::End);
        assert_eq!(decide(&docs(&["a"])), Decision::Generate);
        assert_eq!(Decision::End.event(), StageEvent::Terminate);
    }

    #[test]
    fn test_state_threads_documents_per_stage() {
        let state = PipelineState::new("red lipstick?");
        assert!(state.documents().is_empty());

        let state = state.retrieved(docs(&["a", "b", "c"])).unwrap();
        assert_eq!(state.stage(), Stage::Retrieved);
        assert_eq!(state.documents(), docs(&["a", "b", "c"]).as_slice());

        let state = state.graded(docs(&["a", "c"])).unwrap();
        assert_eq!(state.documents(), docs(&["a", "c"]).as_slice());
        assert_eq!(state.documents_at(Stage::Retrieved).len(), 3);
        assert!(state.generation().is_none());

        let state = state.generated("We stock it.".to_string()).unwrap();
        assert_eq!(state.stage(), Stage::Generated);
        assert_eq!(state.generation(), Some("We stock it."));
        assert_eq!(state.documents(), docs(&["a", "c"]).as_slice());
    }

    #[test]
    fn test_ended_has_no_generation() {
        let state = PipelineState::new("perfume?")
            .retrieved(Vec::new())
            .unwrap()
            .graded(Vec::new())
            .unwrap()
            .ended()
            .unwrap();

        assert_eq!(state.stage(), Stage::Ended);
        assert!(state.generation().is_none());
        assert!(state.documents().is_empty());
        assert!(state.documents_at(Stage::Graded).is_empty());
    }

    #[test]
    fn test_skipping_grading_is_rejected() {
        let state = PipelineState::new("q").retrieved(docs(&["a"])).unwrap();
        let err = state.generated("x".to_string()).unwrap_err();
        assert!(matches!(err, ChatError::InvalidTransition { .. }));
    }
}
