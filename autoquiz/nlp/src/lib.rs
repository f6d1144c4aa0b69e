#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! AutoQuiz comprehension question generation.
//!
//! Parsed sentences flow through the question engine, which elides or swaps
//! a noun phrase to produce fill-in-the-blank and true/false questions. The
//! quiz generator drives the engine over stored paragraphs and persists the
//! results.

/// Tokens, part-of-speech tags and noun chunks.
#[path = "../sentence.rs"]
pub mod sentence;

/// Injected randomness.
#[path = "../random.rs"]
pub mod random;

/// Lexical ontology contract and in-memory implementation.
#[path = "../lexicon/main.rs"]
pub mod lexicon;

/// Sentence parser contract and annotation-backed parser.
#[path = "../parser.rs"]
pub mod parser;

/// Per-sentence question engine.
#[path = "../generation/main.rs"]
pub mod generation;

/// Quiz persistence.
#[path = "../store.rs"]
pub mod store;

/// Telemetry helpers.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// TOML configuration.
#[path = "../config.rs"]
pub mod config;

/// Batch quiz generation over stored paragraphs.
#[path = "../quiz.rs"]
pub mod quiz;

pub use config::AutoQuizConfig;
pub use generation::{
    EngineSettings, GeneratedQuestion, QuestionDraft, QuestionEngine, QuestionKind, Resolution,
    SkipReason,
};
pub use lexicon::{LexicalOntology, MemoryOntology, SenseId};
pub use parser::{AnnotatedParser, SentenceParser};
pub use quiz::{QuizError, QuizGenerator, QuizReport};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use sentence::{NounChunk, PartOfSpeech, Sentence, SentenceError, Token};
pub use store::{MemoryQuizStore, QuizStore, StoredQuestion};
pub use telemetry::QuizTelemetry;
