use std::{fs, path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generation::QuestionKind;

/// Quiz identifier.
pub type QuizId = u64;
/// Paragraph identifier.
pub type ParagraphId = u64;
/// Stored question identifier.
pub type QuestionId = u64;

/// Source text of one quiz, paragraphs in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSource {
    /// Quiz the paragraphs belong to.
    pub quiz_id: QuizId,
    /// Paragraph id to text.
    pub paragraphs: IndexMap<ParagraphId, String>,
}

/// Question ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    /// Question text.
    pub text: String,
    /// Answer value (span text, `t` or `f`).
    pub answer: String,
    /// Owning quiz.
    pub quiz_id: QuizId,
    /// Question format.
    pub kind: QuestionKind,
    /// Paragraph the sentence came from.
    pub paragraph_id: ParagraphId,
}

/// Persisted question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredQuestion {
    /// Generated id.
    pub id: QuestionId,
    /// Question text.
    pub text: String,
    /// Answer value.
    pub answer: String,
    /// Owning quiz.
    pub quiz_id: QuizId,
    /// Numeric type code (1 fill-blank, 2 true/false).
    pub q_type: u8,
    /// Source paragraph.
    pub paragraph_id: ParagraphId,
    /// Insert time.
    pub created_at: DateTime<Utc>,
}

/// Storage failures. Callers treat them as per-question, non-fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No quiz exists for the keyword.
    #[error("no quiz for keyword {0:?}")]
    UnknownKeyword(String),
    /// The quiz id is not known.
    #[error("unknown quiz {0}")]
    UnknownQuiz(QuizId),
    /// The paragraph does not belong to the quiz.
    #[error("paragraph {paragraph_id} is not part of quiz {quiz_id}")]
    UnknownParagraph {
        /// Quiz named by the question.
        quiz_id: QuizId,
        /// Paragraph named by the question.
        paragraph_id: ParagraphId,
    },
    /// The backend refused the write.
    #[error("write rejected: {0}")]
    Rejected(String),
    /// Snapshot file could not be read or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Snapshot file is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence collaborator for quizzes and their questions.
pub trait QuizStore: Send + Sync {
    /// Paragraphs of the quiz registered under `keyword`.
    fn fetch_paragraphs(&self, keyword: &str) -> Result<QuizSource, StoreError>;

    /// Persists a question, returning its generated id.
    fn store_question(&self, question: NewQuestion) -> Result<QuestionId, StoreError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuizEntry {
    id: QuizId,
    keyword: String,
    source: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ParagraphEntry {
    id: ParagraphId,
    quiz_id: QuizId,
    text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    quizzes: Vec<QuizEntry>,
    #[serde(default)]
    paragraphs: Vec<ParagraphEntry>,
    #[serde(default)]
    questions: Vec<StoredQuestion>,
}

impl StoreState {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn quiz_by_keyword(&self, keyword: &str) -> Option<&QuizEntry> {
        self.quizzes.iter().find(|quiz| quiz.keyword == keyword)
    }
}

/// Thread-safe in-memory store with JSON snapshot persistence.
#[derive(Debug, Default, Clone)]
pub struct MemoryQuizStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryQuizStore {
    /// Loads a snapshot, or starts empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads a snapshot written by [`MemoryQuizStore::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path)?;
        let state: StoreState = serde_json::from_str(&raw)?;
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Writes a pretty-printed snapshot, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&*self.state.read())?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Registers paragraphs under `keyword`, creating the quiz on first use.
    pub fn create_quiz<I, S>(&self, keyword: &str, source: &str, paragraphs: I) -> QuizId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.write();
        let existing = state.quiz_by_keyword(keyword).map(|quiz| quiz.id);
        let quiz_id = match existing {
            Some(id) => id,
            None => {
                let id = state.allocate();
                state.quizzes.push(QuizEntry {
                    id,
                    keyword: keyword.to_string(),
                    source: source.to_string(),
                    created_at: Utc::now(),
                });
                id
            }
        };
        for text in paragraphs {
            let text = text.into();
            if text.trim().is_empty() {
                continue;
            }
            let id = state.allocate();
            state.paragraphs.push(ParagraphEntry { id, quiz_id, text });
        }
        quiz_id
    }

    /// Known keywords, in creation order.
    #[must_use]
    pub fn keywords(&self) -> Vec<String> {
        self.state
            .read()
            .quizzes
            .iter()
            .map(|quiz| quiz.keyword.clone())
            .collect()
    }

    /// Questions stored for `keyword`'s quiz.
    pub fn questions_for(&self, keyword: &str) -> Result<Vec<StoredQuestion>, StoreError> {
        let state = self.state.read();
        let quiz = state
            .quiz_by_keyword(keyword)
            .ok_or_else(|| StoreError::UnknownKeyword(keyword.to_string()))?;
        Ok(state
            .questions
            .iter()
            .filter(|question| question.quiz_id == quiz.id)
            .cloned()
            .collect())
    }

    /// Total stored questions.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.state.read().questions.len()
    }
}

impl QuizStore for MemoryQuizStore {
    fn fetch_paragraphs(&self, keyword: &str) -> Result<QuizSource, StoreError> {
        let state = self.state.read();
        let quiz = state
            .quiz_by_keyword(keyword)
            .ok_or_else(|| StoreError::UnknownKeyword(keyword.to_string()))?;
        let paragraphs = state
            .paragraphs
            .iter()
            .filter(|paragraph| paragraph.quiz_id == quiz.id)
            .map(|paragraph| (paragraph.id, paragraph.text.clone()))
            .collect();
        Ok(QuizSource {
            quiz_id: quiz.id,
            paragraphs,
        })
    }

    fn store_question(&self, question: NewQuestion) -> Result<QuestionId, StoreError> {
        let mut state = self.state.write();
        if !state.quizzes.iter().any(|quiz| quiz.id == question.quiz_id) {
            return Err(StoreError::UnknownQuiz(question.quiz_id));
        }
        let belongs = state
            .paragraphs
            .iter()
            .any(|p| p.id == question.paragraph_id && p.quiz_id == question.quiz_id);
        if !belongs {
            return Err(StoreError::UnknownParagraph {
                quiz_id: question.quiz_id,
                paragraph_id: question.paragraph_id,
            });
        }
        let id = state.allocate();
        state.questions.push(StoredQuestion {
            id,
            text: question.text,
            answer: question.answer,
            quiz_id: question.quiz_id,
            q_type: question.kind.code(),
            paragraph_id: question.paragraph_id,
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn question(quiz_id: QuizId, paragraph_id: ParagraphId) -> NewQuestion {
        NewQuestion {
            text: "The __________ sat on the mat .".into(),
            answer: "cat".into(),
            quiz_id,
            kind: QuestionKind::FillBlank,
            paragraph_id,
        }
    }

    #[test]
    fn paragraphs_come_back_in_order() {
        let store = MemoryQuizStore::default();
        let quiz_id = store.create_quiz("Cats", "wiki", ["First.", "  ", "Second."]);
        let again = store.create_quiz("Cats", "wiki", ["Third."]);
        assert_eq!(quiz_id, again);
        let source = store.fetch_paragraphs("Cats").unwrap();
        let texts: Vec<&str> = source.paragraphs.values().map(String::as_str).collect();
        assert_eq!(texts, vec!["First.", "Second.", "Third."]);
        assert!(matches!(
            store.fetch_paragraphs("cats"),
            Err(StoreError::UnknownKeyword(_))
        ));
    }

    #[test]
    fn questions_must_reference_their_quiz_paragraphs() {
        let store = MemoryQuizStore::default();
        let cats = store.create_quiz("Cats", "wiki", ["Cats purr."]);
        let dogs = store.create_quiz("Dogs", "wiki", ["Dogs bark."]);
        let cat_paragraph = *store
            .fetch_paragraphs("Cats")
            .unwrap()
            .paragraphs
            .keys()
            .next()
            .unwrap();

        let id = store.store_question(question(cats, cat_paragraph)).unwrap();
        assert!(id > cat_paragraph);
        assert!(matches!(
            store.store_question(question(dogs, cat_paragraph)),
            Err(StoreError::UnknownParagraph { .. })
        ));
        assert!(matches!(
            store.store_question(question(999, cat_paragraph)),
            Err(StoreError::UnknownQuiz(999))
        ));
        assert_eq!(store.questions_for("Cats").unwrap()[0].q_type, 1);
        assert!(store.questions_for("Dogs").unwrap().is_empty());
    }

    #[test]
    fn snapshot_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store/quiz.json");
        let store = MemoryQuizStore::open(&path).unwrap();
        let quiz = store.create_quiz("Rust", "manual", ["Rust has a borrow checker."]);
        let paragraph = *store.fetch_paragraphs("Rust").unwrap().paragraphs.keys().next().unwrap();
        store.store_question(question(quiz, paragraph)).unwrap();
        store.save(&path).unwrap();

        let reopened = MemoryQuizStore::open(&path).unwrap();
        assert_eq!(reopened.keywords(), vec!["Rust".to_string()]);
        assert_eq!(reopened.question_count(), 1);
        let next = reopened.create_quiz("Go", "manual", Vec::<String>::new());
        assert!(next > paragraph);
    }
}
