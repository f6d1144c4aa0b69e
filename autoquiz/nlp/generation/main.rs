//! Question generation pipeline: filter → select → decide → assemble.

/// Token sequence rebuilding.
pub mod assembler;
/// Question type and truth value decisions.
pub mod decider;
/// Per-sentence engine tying the stages together.
pub mod engine;
/// Noun chunk cleanup.
pub mod filter;
/// Output and skip types.
pub mod question;
/// Answer candidate selection.
pub mod selector;
/// Ontology-driven false alternatives.
pub mod substitution;

pub use decider::{Decision, FALSE_ANSWER, TRUE_ANSWER};
pub use engine::{EngineSettings, QuestionEngine, DEFAULT_BLANK, DEFAULT_MIN_SENTENCE_CHARS};
pub use question::{
    GeneratedQuestion, QuestionDraft, QuestionKind, Resolution, SkipReason,
};
pub use selector::AnswerCandidate;
pub use substitution::{find_replacement, Replacement, SubstitutionError};
