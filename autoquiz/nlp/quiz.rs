use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_logging::LogLevel;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::AutoQuizConfig,
    generation::{EngineSettings, QuestionEngine, QuestionKind},
    lexicon::LexicalOntology,
    parser::SentenceParser,
    random::{self, RandomSource},
    store::{NewQuestion, QuestionId, QuizId, QuizStore, StoreError},
    telemetry::QuizTelemetry,
};

/// Errors that abort a whole quiz run or prevent building the generator.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The keyword was empty or blank.
    #[error("keyword cannot be empty")]
    EmptyKeyword,
    /// A required collaborator was missing or unusable at build time.
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),
    /// The store could not provide the quiz source.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of one `generate_quiz` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizReport {
    /// Identifier correlating logs and events of this run.
    pub run_id: Uuid,
    /// Quiz the questions were stored under.
    pub quiz_id: QuizId,
    /// Sentences visited.
    pub sentences: usize,
    /// Questions produced by the engine.
    pub generated: usize,
    /// Sentences that produced no question.
    pub skipped: usize,
    /// Paragraphs the parser could not segment.
    pub unparsed_paragraphs: usize,
    /// Questions the store refused.
    pub storage_failures: usize,
    /// Ids of stored questions, in sentence order.
    pub question_ids: Vec<QuestionId>,
    /// Stored questions per kind label.
    pub by_type: IndexMap<String, usize>,
}

impl QuizReport {
    fn new(quiz_id: QuizId) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            quiz_id,
            sentences: 0,
            generated: 0,
            skipped: 0,
            unparsed_paragraphs: 0,
            storage_failures: 0,
            question_ids: Vec::new(),
            by_type: IndexMap::new(),
        }
    }

    fn record_stored(&mut self, id: QuestionId, kind: QuestionKind) {
        self.question_ids.push(id);
        *self.by_type.entry(kind.label().to_string()).or_insert(0) += 1;
    }
}

/// Builder wiring the generator's collaborators.
#[derive(Default)]
pub struct QuizGeneratorBuilder {
    parser: Option<Arc<dyn SentenceParser>>,
    ontology: Option<Arc<dyn LexicalOntology>>,
    store: Option<Arc<dyn QuizStore>>,
    random: Option<Box<dyn RandomSource + Send>>,
    telemetry: Option<QuizTelemetry>,
    settings: EngineSettings,
    seed: Option<u64>,
}

impl QuizGeneratorBuilder {
    /// Sentence parser.
    #[must_use]
    pub fn parser(mut self, parser: Arc<dyn SentenceParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Lexical ontology.
    #[must_use]
    pub fn ontology(mut self, ontology: Arc<dyn LexicalOntology>) -> Self {
        self.ontology = Some(ontology);
        self
    }

    /// Quiz store.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn QuizStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Random source; overrides any configured seed.
    #[must_use]
    pub fn random(mut self, random: Box<dyn RandomSource + Send>) -> Self {
        self.random = Some(random);
        self
    }

    /// Telemetry handle.
    #[must_use]
    pub fn telemetry(mut self, telemetry: QuizTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Engine settings.
    #[must_use]
    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Applies the engine section of a loaded configuration.
    #[must_use]
    pub fn config(mut self, config: &AutoQuizConfig) -> Self {
        self.settings = config.engine.settings.clone();
        self.seed = config.engine.seed;
        self
    }

    /// Builds the generator; every collaborator must be present.
    pub fn build(self) -> Result<QuizGenerator, QuizError> {
        let parser = self
            .parser
            .ok_or_else(|| QuizError::CollaboratorUnavailable("sentence parser".into()))?;
        let ontology = self
            .ontology
            .ok_or_else(|| QuizError::CollaboratorUnavailable("lexical ontology".into()))?;
        let store = self
            .store
            .ok_or_else(|| QuizError::CollaboratorUnavailable("quiz store".into()))?;
        if ontology.sense_count() == 0 {
            return Err(QuizError::CollaboratorUnavailable(
                "lexical ontology has no senses".into(),
            ));
        }
        let random = self.random.unwrap_or_else(|| random::from_seed(self.seed));
        Ok(QuizGenerator {
            parser,
            store,
            engine: QuestionEngine::with_settings(ontology, random, self.settings),
            telemetry: self.telemetry,
        })
    }
}

/// Runs the question engine over every paragraph of a stored quiz.
pub struct QuizGenerator {
    parser: Arc<dyn SentenceParser>,
    store: Arc<dyn QuizStore>,
    engine: QuestionEngine<Box<dyn RandomSource + Send>>,
    telemetry: Option<QuizTelemetry>,
}

impl QuizGenerator {
    /// Returns an empty builder.
    #[must_use]
    pub fn builder() -> QuizGeneratorBuilder {
        QuizGeneratorBuilder::default()
    }

    /// Generates and stores questions for the quiz registered under `keyword`.
    ///
    /// Only an empty keyword or a failed paragraph fetch abort the run.
    /// Unparseable paragraphs, skipped sentences and refused writes are
    /// logged and counted in the report.
    pub fn generate_quiz(&mut self, keyword: &str) -> Result<QuizReport, QuizError> {
        if keyword.trim().is_empty() {
            return Err(QuizError::EmptyKeyword);
        }
        let source = self.store.fetch_paragraphs(keyword)?;
        let mut report = QuizReport::new(source.quiz_id);
        self.log(
            LogLevel::Info,
            "quiz.generation.started",
            json!({
                "run_id": report.run_id,
                "keyword": keyword,
                "quiz_id": source.quiz_id,
                "paragraphs": source.paragraphs.len(),
            }),
        );
        self.event(
            "quiz.generation.started",
            json!({ "run_id": report.run_id, "keyword": keyword, "quiz_id": source.quiz_id }),
        );

        for (paragraph_id, text) in &source.paragraphs {
            let sentences = match self.parser.segment(text) {
                Ok(sentences) => sentences,
                Err(err) => {
                    report.unparsed_paragraphs += 1;
                    self.log(
                        LogLevel::Warn,
                        "quiz.paragraph.unparsed",
                        json!({ "paragraph_id": paragraph_id, "error": err.to_string() }),
                    );
                    continue;
                }
            };
            for (index, sentence) in sentences.iter().enumerate() {
                report.sentences += 1;
                let generated = match self.engine.generate(sentence, keyword) {
                    Ok(generated) => generated,
                    Err(reason) => {
                        report.skipped += 1;
                        self.log(
                            LogLevel::Debug,
                            "quiz.sentence.skipped",
                            json!({
                                "paragraph_id": paragraph_id,
                                "sentence": index,
                                "reason": reason.to_string(),
                            }),
                        );
                        continue;
                    }
                };
                let kind = generated.kind;
                report.generated += 1;
                let question = NewQuestion {
                    text: generated.text,
                    answer: generated.answer,
                    quiz_id: source.quiz_id,
                    kind,
                    paragraph_id: *paragraph_id,
                };
                match self.store.store_question(question) {
                    Ok(id) => {
                        report.record_stored(id, kind);
                        self.event(
                            "quiz.question.stored",
                            json!({
                                "run_id": report.run_id,
                                "question_id": id,
                                "paragraph_id": paragraph_id,
                                "q_type": kind.code(),
                            }),
                        );
                    }
                    Err(err) => {
                        report.storage_failures += 1;
                        self.log(
                            LogLevel::Warn,
                            "quiz.question.store_failed",
                            json!({ "paragraph_id": paragraph_id, "error": err.to_string() }),
                        );
                    }
                }
            }
        }

        let summary = json!({
            "run_id": report.run_id,
            "keyword": keyword,
            "quiz_id": report.quiz_id,
            "sentences": report.sentences,
            "generated": report.generated,
            "skipped": report.skipped,
            "storage_failures": report.storage_failures,
        });
        self.log(LogLevel::Info, "quiz.generation.completed", summary.clone());
        self.event("quiz.generation.completed", summary);
        Ok(report)
    }

    /// Active engine settings.
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        self.engine.settings()
    }

    fn log(&self, level: LogLevel, message: &str, metadata: serde_json::Value) {
        if let Some(telemetry) = &self.telemetry {
            let _ = telemetry.log(level, message, metadata);
        }
    }

    fn event(&self, event_type: &str, payload: serde_json::Value) {
        if let Some(telemetry) = &self.telemetry {
            let _ = telemetry.event(event_type, payload);
        }
    }
}
