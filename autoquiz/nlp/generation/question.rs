use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generation::selector::AnswerCandidate;

/// Question format, stored as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Answer span elided from the sentence.
    FillBlank,
    /// Statement to be judged true or false.
    TrueFalse,
}

impl QuestionKind {
    /// Numeric code persisted with the question (1 or 2).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::FillBlank => 1,
            Self::TrueFalse => 2,
        }
    }

    /// Inverse of [`QuestionKind::code`].
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::FillBlank),
            2 => Some(Self::TrueFalse),
            _ => None,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FillBlank => "fill-blank",
            Self::TrueFalse => "true-false",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Terminal state reached by the type decider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Fill-in-the-blank question.
    FillBlank,
    /// True statement, sentence untouched.
    TrueStatement,
    /// False statement built from an ontology sibling.
    FalseStatement,
    /// A false statement was requested but no replacement existed.
    DowngradedTrue,
}

/// Why a sentence produced no question.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SkipReason {
    /// Sentence text shorter than the configured minimum.
    #[error("sentence too short ({chars} chars)")]
    DegenerateSentence {
        /// Characters in the sentence text.
        chars: usize,
    },
    /// Every chunk was filtered out or matched the keyword.
    #[error("no suitable answer candidate")]
    NoSuitableCandidate,
}

/// Output of the engine for one sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    /// Question text; empty when no question was produced.
    pub text: String,
    /// Elided span text, or `t` / `f`.
    pub answer: String,
    /// Question format; `None` for the empty draft.
    pub kind: Option<QuestionKind>,
    /// Decider terminal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    /// The span the question was built around.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<AnswerCandidate>,
}

/// A question the engine produced, every field populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    /// Question text.
    pub text: String,
    /// Elided span text, or `t` / `f`.
    pub answer: String,
    /// Question format.
    pub kind: QuestionKind,
    /// Decider terminal state.
    pub resolution: Resolution,
    /// The span the question was built around.
    pub candidate: AnswerCandidate,
}

impl From<GeneratedQuestion> for QuestionDraft {
    fn from(question: GeneratedQuestion) -> Self {
        Self {
            text: question.text,
            answer: question.answer,
            kind: Some(question.kind),
            resolution: Some(question.resolution),
            candidate: Some(question.candidate),
        }
    }
}

impl QuestionDraft {
    /// The `("", "", 0)` result callers must not persist.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Numeric type code, 0 for the empty draft.
    #[must_use]
    pub fn type_code(&self) -> u8 {
        self.kind.map_or(0, QuestionKind::code)
    }

    /// True when there is nothing worth storing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() || self.answer.is_empty()
    }
}
