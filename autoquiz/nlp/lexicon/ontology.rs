use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sentence::PartOfSpeech;

/// Stable identifier of one sense (synset), e.g. `cat.n.01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenseId(pub String);

impl SenseId {
    /// Wraps an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrowed identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only view over a lexical ontology.
///
/// Every lookup answers with a possibly empty sequence; "not found" is never
/// an error. Orders are significant: the substitution engine scans senses and
/// hypernyms in the order returned here.
pub trait LexicalOntology: Send + Sync {
    /// Senses of `term` restricted to `category`.
    fn senses_for(&self, term: &str, category: PartOfSpeech) -> Vec<SenseId>;

    /// Direct broader senses.
    fn hypernyms(&self, sense: &SenseId) -> Vec<SenseId>;

    /// Direct narrower senses.
    fn hyponyms(&self, sense: &SenseId) -> Vec<SenseId>;

    /// Surface forms of a sense; multi-word lemmas use `_` between words.
    fn lemmas(&self, sense: &SenseId) -> Vec<String>;

    /// Total number of senses, used to refuse an uninitialized ontology.
    fn sense_count(&self) -> usize;
}
