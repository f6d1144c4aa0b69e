use std::{collections::HashMap, fs, path::Path, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sentence::{Sentence, SentenceError};

/// Linguistic parser collaborator.
///
/// Tagging and sentence segmentation happen upstream; implementations hand
/// the engine fully parsed sentences.
pub trait SentenceParser: Send + Sync {
    /// Parses a single sentence.
    fn parse(&self, text: &str) -> Result<Sentence, ParserError>;

    /// Splits a passage into parsed sentences, in order.
    fn segment(&self, text: &str) -> Result<Vec<Sentence>, ParserError>;
}

/// Parser failures.
#[derive(Debug, Error)]
pub enum ParserError {
    /// No annotation exists for the requested text.
    #[error("no parse available for {0:?}")]
    UnknownText(String),
    /// The annotation is structurally invalid.
    #[error("invalid annotation: {0}")]
    Invalid(#[from] SentenceError),
    /// Reading the annotation file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The annotation file is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A passage as emitted by the external tagger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedPassage {
    /// Raw passage text.
    pub text: String,
    /// Parsed sentences in passage order.
    pub sentences: Vec<Sentence>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnnotationDocument {
    passages: Vec<AnnotatedPassage>,
}

/// Parser answering from pre-computed annotations.
///
/// Lookups are keyed on whitespace-collapsed text so passages that went
/// through storage (re-wrapped lines, trailing blanks) still resolve.
#[derive(Debug, Clone, Default)]
pub struct AnnotatedParser {
    passages: Vec<AnnotatedPassage>,
    by_passage: HashMap<String, usize>,
    by_sentence: HashMap<String, (usize, usize)>,
}

impl AnnotatedParser {
    /// Indexes the given passages after validating every sentence.
    pub fn new(passages: Vec<AnnotatedPassage>) -> Result<Self, ParserError> {
        let mut by_passage = HashMap::new();
        let mut by_sentence = HashMap::new();
        for (p_idx, passage) in passages.iter().enumerate() {
            for (s_idx, sentence) in passage.sentences.iter().enumerate() {
                sentence.validate()?;
                by_sentence
                    .entry(collapse_whitespace(&sentence.text))
                    .or_insert((p_idx, s_idx));
            }
            by_passage
                .entry(collapse_whitespace(&passage.text))
                .or_insert(p_idx);
        }
        Ok(Self {
            passages,
            by_passage,
            by_sentence,
        })
    }

    /// Loads `{"passages": [...]}` from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParserError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses `{"passages": [...]}`.
    pub fn from_json(raw: &str) -> Result<Self, ParserError> {
        let document: AnnotationDocument = serde_json::from_str(raw)?;
        Self::new(document.passages)
    }

    /// Indexed passages, in file order.
    #[must_use]
    pub fn passages(&self) -> &[AnnotatedPassage] {
        &self.passages
    }
}

impl SentenceParser for AnnotatedParser {
    fn parse(&self, text: &str) -> Result<Sentence, ParserError> {
        let key = collapse_whitespace(text);
        self.by_sentence
            .get(&key)
            .and_then(|(p_idx, s_idx)| self.passages.get(*p_idx)?.sentences.get(*s_idx))
            .cloned()
            .ok_or(ParserError::UnknownText(key))
    }

    fn segment(&self, text: &str) -> Result<Vec<Sentence>, ParserError> {
        let key = collapse_whitespace(text);
        if let Some(passage) = self
            .by_passage
            .get(&key)
            .and_then(|idx| self.passages.get(*idx))
        {
            return Ok(passage.sentences.clone());
        }
        // a single-sentence passage may only be annotated as a sentence
        self.parse(text).map(|sentence| vec![sentence])
    }
}

/// Trims and collapses runs of whitespace into single spaces.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"));
    re.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::fixtures::cat_on_mat;

    fn parser() -> AnnotatedParser {
        let sentence = cat_on_mat();
        let mut second = cat_on_mat();
        second.text = "The cat  sat on the mat again.".into();
        AnnotatedParser::new(vec![AnnotatedPassage {
            text: format!("{} {}", sentence.text, second.text),
            sentences: vec![sentence, second],
        }])
        .unwrap()
    }

    #[test]
    fn segments_known_passages_in_order() {
        let parser = parser();
        let sentences = parser
            .segment("The cat sat on the mat.\n The cat sat on the mat again.")
            .unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "The cat sat on the mat.");
    }

    #[test]
    fn parse_finds_single_sentences() {
        let parser = parser();
        let sentence = parser.parse("The cat sat on the mat again.").unwrap();
        assert_eq!(sentence.tokens.len(), 7);
        assert!(parser.segment("The cat sat on the mat.").is_ok());
        assert!(matches!(
            parser.parse("Dogs bark."),
            Err(ParserError::UnknownText(_))
        ));
    }

    #[test]
    fn rejects_invalid_chunks() {
        let mut sentence = cat_on_mat();
        sentence.chunks.push(crate::sentence::NounChunk::new(3, 3));
        let result = AnnotatedParser::new(vec![AnnotatedPassage {
            text: sentence.text.clone(),
            sentences: vec![sentence],
        }]);
        assert!(matches!(result, Err(ParserError::Invalid(_))));
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }
}
