use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse grammatical category attached to a token by the upstream tagger.
///
/// Tags follow the universal part-of-speech tag set; anything the engine does
/// not care about lands in [`PartOfSpeech::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartOfSpeech {
    /// Common noun.
    Noun,
    /// Proper noun.
    Propn,
    /// Pronoun.
    Pron,
    /// Determiner.
    Det,
    /// Adjective.
    Adj,
    /// Verb.
    Verb,
    /// Auxiliary verb.
    Aux,
    /// Adposition.
    Adp,
    /// Adverb.
    Adv,
    /// Numeral.
    Num,
    /// Punctuation.
    Punct,
    /// Any other tag.
    #[serde(other)]
    Other,
}

impl PartOfSpeech {
    /// True for the categories an ontology indexes as nouns.
    #[must_use]
    pub const fn is_nominal(self) -> bool {
        matches!(self, Self::Noun | Self::Propn)
    }
}

/// Word or punctuation unit produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text.
    pub text: String,
    /// Grammatical category.
    pub pos: PartOfSpeech,
    /// Whether the original text had whitespace after this token.
    #[serde(default = "default_true")]
    pub trailing_space: bool,
}

impl Token {
    /// Creates a token followed by a space.
    #[must_use]
    pub fn new(text: impl Into<String>, pos: PartOfSpeech) -> Self {
        Self {
            text: text.into(),
            pos,
            trailing_space: true,
        }
    }

    /// Marks the token as glued to the next one (e.g. before punctuation).
    #[must_use]
    pub fn glued(mut self) -> Self {
        self.trailing_space = false;
        self
    }
}

/// Contiguous `[start, end)` span of tokens forming a base noun phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NounChunk {
    /// First token index.
    pub start: usize,
    /// One past the last token index.
    pub end: usize,
}

impl NounChunk {
    /// Creates a chunk covering `[start, end)`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of tokens covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when the chunk covers no tokens.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One parsed sentence: its raw text, tokens and noun chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Raw sentence text as it appeared in the passage.
    pub text: String,
    /// Ordered tokens.
    pub tokens: Vec<Token>,
    /// Ordered noun chunks over `tokens`.
    #[serde(default)]
    pub chunks: Vec<NounChunk>,
}

impl Sentence {
    /// Builds a sentence, deriving `text` from the tokens.
    #[must_use]
    pub fn from_tokens(tokens: Vec<Token>, chunks: Vec<NounChunk>) -> Self {
        let text = render_span(&tokens);
        Self {
            text,
            tokens,
            chunks,
        }
    }

    /// Tokens in `[start, end)`, empty when the span is out of bounds.
    #[must_use]
    pub fn span(&self, start: usize, end: usize) -> &[Token] {
        self.tokens.get(start..end).unwrap_or(&[])
    }

    /// Span text using the original whitespace between tokens.
    #[must_use]
    pub fn span_text(&self, start: usize, end: usize) -> String {
        render_span(self.span(start, end))
    }

    /// Surface strings of every token, in order.
    #[must_use]
    pub fn words(&self) -> Vec<String> {
        self.tokens.iter().map(|token| token.text.clone()).collect()
    }

    /// Checks that every chunk is non-empty and inside the token sequence.
    pub fn validate(&self) -> Result<(), SentenceError> {
        for chunk in &self.chunks {
            if chunk.is_empty() {
                return Err(SentenceError::EmptyChunk {
                    start: chunk.start,
                    sentence: self.text.clone(),
                });
            }
            if chunk.end > self.tokens.len() {
                return Err(SentenceError::ChunkOutOfBounds {
                    start: chunk.start,
                    end: chunk.end,
                    tokens: self.tokens.len(),
                    sentence: self.text.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Malformed annotations found by [`Sentence::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SentenceError {
    /// A chunk covers no tokens.
    #[error("empty chunk at token {start} in {sentence:?}")]
    EmptyChunk {
        /// Chunk start.
        start: usize,
        /// Sentence text.
        sentence: String,
    },
    /// A chunk ends past the last token.
    #[error("chunk [{start}, {end}) exceeds {tokens} tokens in {sentence:?}")]
    ChunkOutOfBounds {
        /// Chunk start.
        start: usize,
        /// Chunk end.
        end: usize,
        /// Token count of the sentence.
        tokens: usize,
        /// Sentence text.
        sentence: String,
    },
}

fn render_span(tokens: &[Token]) -> String {
    let mut text = String::new();
    for (idx, token) in tokens.iter().enumerate() {
        text.push_str(&token.text);
        if token.trailing_space && idx + 1 < tokens.len() {
            text.push(' ');
        }
    }
    text
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// "The cat sat on the mat." with chunks `The cat` and `the mat`.
    pub fn cat_on_mat() -> Sentence {
        let tokens = vec![
            Token::new("The", PartOfSpeech::Det),
            Token::new("cat", PartOfSpeech::Noun),
            Token::new("sat", PartOfSpeech::Verb),
            Token::new("on", PartOfSpeech::Adp),
            Token::new("the", PartOfSpeech::Det),
            Token::new("mat", PartOfSpeech::Noun).glued(),
            Token::new(".", PartOfSpeech::Punct),
        ];
        Sentence::from_tokens(tokens, vec![NounChunk::new(0, 2), NounChunk::new(4, 6)])
    }

    /// "Obama's dog chased the ball." where the possessive is glued to its
    /// noun, chunks `Obama's dog` and `the ball`.
    pub fn obama_dog() -> Sentence {
        let tokens = vec![
            Token::new("Obama", PartOfSpeech::Propn).glued(),
            Token::new("'s", PartOfSpeech::Other),
            Token::new("dog", PartOfSpeech::Noun),
            Token::new("chased", PartOfSpeech::Verb),
            Token::new("the", PartOfSpeech::Det),
            Token::new("ball", PartOfSpeech::Noun).glued(),
            Token::new(".", PartOfSpeech::Punct),
        ];
        Sentence::from_tokens(tokens, vec![NounChunk::new(0, 3), NounChunk::new(4, 6)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_rebuilt_with_original_spacing() {
        let sentence = fixtures::cat_on_mat();
        assert_eq!(sentence.text, "The cat sat on the mat.");
        assert_eq!(sentence.span_text(4, 6), "the mat");
    }

    #[test]
    fn out_of_bounds_span_is_empty() {
        let sentence = fixtures::cat_on_mat();
        assert!(sentence.span(5, 12).is_empty());
        assert_eq!(sentence.span_text(3, 2), "");
    }

    #[test]
    fn validate_rejects_bad_chunks() {
        let mut sentence = fixtures::cat_on_mat();
        assert!(sentence.validate().is_ok());
        sentence.chunks.push(NounChunk::new(6, 9));
        assert!(matches!(
            sentence.validate(),
            Err(SentenceError::ChunkOutOfBounds { end: 9, tokens: 7, .. })
        ));
        sentence.chunks = vec![NounChunk::new(2, 2)];
        assert!(matches!(
            sentence.validate(),
            Err(SentenceError::EmptyChunk { start: 2, .. })
        ));
    }

    #[test]
    fn unknown_tags_deserialize_as_other() {
        let token: Token = serde_json::from_str(r#"{"text":"oh","pos":"INTJ"}"#).unwrap();
        assert_eq!(token.pos, PartOfSpeech::Other);
        assert!(token.trailing_space);
    }
}
