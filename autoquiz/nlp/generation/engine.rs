use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    generation::{
        assembler::assemble,
        decider::{decide, ensure_substantial},
        filter::filter_noun_chunks,
        question::{GeneratedQuestion, QuestionDraft, SkipReason},
        selector::{choose_candidate, eligible_candidates},
    },
    lexicon::LexicalOntology,
    random::RandomSource,
    sentence::Sentence,
};

/// Placeholder written over the elided span of fill-in-the-blank questions.
pub const DEFAULT_BLANK: &str = "__________";
/// Sentences with fewer characters than this are skipped.
pub const DEFAULT_MIN_SENTENCE_CHARS: usize = 3;

/// Tunables of the question engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Fill-in-the-blank placeholder.
    #[serde(default = "default_blank")]
    pub blank_placeholder: String,
    /// Minimum sentence length in characters.
    #[serde(default = "default_min_chars")]
    pub min_sentence_chars: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            blank_placeholder: default_blank(),
            min_sentence_chars: default_min_chars(),
        }
    }
}

/// Turns one parsed sentence and a topic keyword into at most one question.
///
/// The engine holds no per-sentence state; the only thing that changes
/// between calls is the random source.
pub struct QuestionEngine<R> {
    ontology: Arc<dyn LexicalOntology>,
    random: R,
    settings: EngineSettings,
}

impl<R: RandomSource> QuestionEngine<R> {
    /// Creates an engine with default settings.
    #[must_use]
    pub fn new(ontology: Arc<dyn LexicalOntology>, random: R) -> Self {
        Self::with_settings(ontology, random, EngineSettings::default())
    }

    /// Creates an engine with explicit settings.
    #[must_use]
    pub fn with_settings(
        ontology: Arc<dyn LexicalOntology>,
        random: R,
        settings: EngineSettings,
    ) -> Self {
        Self {
            ontology,
            random,
            settings,
        }
    }

    /// Generates a question, reporting why none was produced.
    pub fn generate(
        &mut self,
        sentence: &Sentence,
        keyword: &str,
    ) -> Result<GeneratedQuestion, SkipReason> {
        ensure_substantial(sentence, self.settings.min_sentence_chars)?;
        let chunks = filter_noun_chunks(sentence);
        let candidates = eligible_candidates(sentence, &chunks, keyword);
        // Candidate index comes before the question type draw, so a sentence
        // without candidates consumes no draws at all.
        let candidate = choose_candidate(&candidates, &mut self.random)?;
        let decision = decide(&candidate, self.ontology.as_ref(), &mut self.random);
        let text = assemble(
            sentence,
            candidate.start,
            candidate.end,
            decision.span_replacement(&candidate, &self.settings.blank_placeholder),
        );
        Ok(GeneratedQuestion {
            text,
            answer: decision.answer_value(&candidate),
            kind: decision.kind(),
            resolution: decision.resolution(),
            candidate,
        })
    }

    /// Generates a question, returning the empty draft when none was produced.
    pub fn generate_question(&mut self, sentence: &Sentence, keyword: &str) -> QuestionDraft {
        self.generate(sentence, keyword)
            .map_or_else(|_| QuestionDraft::empty(), QuestionDraft::from)
    }

    /// Active settings.
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The random source, e.g. to inspect a scripted source in tests.
    #[must_use]
    pub fn random(&self) -> &R {
        &self.random
    }
}

fn default_blank() -> String {
    DEFAULT_BLANK.to_string()
}

const fn default_min_chars() -> usize {
    DEFAULT_MIN_SENTENCE_CHARS
}
