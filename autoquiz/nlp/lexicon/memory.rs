use std::{collections::HashMap, fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    lexicon::ontology::{LexicalOntology, SenseId},
    parser::collapse_whitespace,
    sentence::PartOfSpeech,
};

/// One synset as declared in an ontology document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseEntry {
    /// Sense identifier.
    pub id: SenseId,
    /// Part of speech of the sense.
    #[serde(default = "default_pos")]
    pub pos: PartOfSpeech,
    /// Surface forms, `_` joining multi-word lemmas.
    #[serde(default)]
    pub lemmas: Vec<String>,
    /// Direct broader senses, in preference order.
    #[serde(default)]
    pub hypernyms: Vec<SenseId>,
}

#[derive(Debug, Deserialize)]
struct OntologyDocument {
    #[serde(default)]
    senses: Vec<SenseEntry>,
}

/// Errors raised while building or loading an ontology.
#[derive(Debug, Error)]
pub enum OntologyLoadError {
    /// No senses at all; the ontology would silently downgrade every question.
    #[error("ontology contains no senses")]
    Empty,
    /// The same id was declared twice.
    #[error("duplicate sense id {0}")]
    DuplicateSense(SenseId),
    /// A hypernym points at an undeclared sense.
    #[error("sense {sense} references unknown hypernym {hypernym}")]
    UnknownHypernym {
        /// Declaring sense.
        sense: SenseId,
        /// Missing target.
        hypernym: SenseId,
    },
    /// Reading the document failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Synset graph held in memory.
///
/// Hyponyms are derived from declared hypernyms and keep declaration order.
/// Term lookups are case-insensitive and treat spaces like underscores.
#[derive(Debug, Clone, Default)]
pub struct MemoryOntology {
    senses: IndexMap<SenseId, SenseEntry>,
    hyponyms: HashMap<SenseId, Vec<SenseId>>,
    by_lemma: HashMap<String, Vec<SenseId>>,
}

impl MemoryOntology {
    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> MemoryOntologyBuilder {
        MemoryOntologyBuilder::default()
    }

    /// Loads a JSON document of the form `{"senses": [...]}`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OntologyLoadError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses a JSON document of the form `{"senses": [...]}`.
    pub fn from_json(raw: &str) -> Result<Self, OntologyLoadError> {
        let document: OntologyDocument = serde_json::from_str(raw)?;
        Self::from_entries(document.senses)
    }

    /// Indexes a list of entries, validating ids and hypernym links.
    pub fn from_entries(entries: Vec<SenseEntry>) -> Result<Self, OntologyLoadError> {
        if entries.is_empty() {
            return Err(OntologyLoadError::Empty);
        }
        let mut senses = IndexMap::with_capacity(entries.len());
        for entry in entries {
            if senses.contains_key(&entry.id) {
                return Err(OntologyLoadError::DuplicateSense(entry.id));
            }
            senses.insert(entry.id.clone(), entry);
        }

        let mut hyponyms: HashMap<SenseId, Vec<SenseId>> = HashMap::new();
        let mut by_lemma: HashMap<String, Vec<SenseId>> = HashMap::new();
        for entry in senses.values() {
            for hypernym in &entry.hypernyms {
                if !senses.contains_key(hypernym) {
                    return Err(OntologyLoadError::UnknownHypernym {
                        sense: entry.id.clone(),
                        hypernym: hypernym.clone(),
                    });
                }
                hyponyms
                    .entry(hypernym.clone())
                    .or_default()
                    .push(entry.id.clone());
            }
            for lemma in &entry.lemmas {
                let ids = by_lemma.entry(lemma_key(lemma)).or_default();
                if !ids.contains(&entry.id) {
                    ids.push(entry.id.clone());
                }
            }
        }

        Ok(Self {
            senses,
            hyponyms,
            by_lemma,
        })
    }

    /// Looks up a declared sense.
    #[must_use]
    pub fn sense(&self, id: &SenseId) -> Option<&SenseEntry> {
        self.senses.get(id)
    }
}

impl LexicalOntology for MemoryOntology {
    fn senses_for(&self, term: &str, category: PartOfSpeech) -> Vec<SenseId> {
        let nominal = category.is_nominal();
        self.by_lemma
            .get(&lemma_key(term))
            .map(|ids| {
                ids.iter()
                    .filter(|id| {
                        self.senses.get(*id).is_some_and(|entry| {
                            entry.pos == category || (nominal && entry.pos.is_nominal())
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn hypernyms(&self, sense: &SenseId) -> Vec<SenseId> {
        self.senses
            .get(sense)
            .map(|entry| entry.hypernyms.clone())
            .unwrap_or_default()
    }

    fn hyponyms(&self, sense: &SenseId) -> Vec<SenseId> {
        self.hyponyms.get(sense).cloned().unwrap_or_default()
    }

    fn lemmas(&self, sense: &SenseId) -> Vec<String> {
        self.senses
            .get(sense)
            .map(|entry| entry.lemmas.clone())
            .unwrap_or_default()
    }

    fn sense_count(&self) -> usize {
        self.senses.len()
    }
}

/// Fluent construction of small ontologies (fixtures, embedded vocabularies).
#[derive(Debug, Default)]
pub struct MemoryOntologyBuilder {
    entries: Vec<SenseEntry>,
}

impl MemoryOntologyBuilder {
    /// Declares a noun sense with its lemmas and hypernyms.
    #[must_use]
    pub fn noun(mut self, id: &str, lemmas: &[&str], hypernyms: &[&str]) -> Self {
        self.entries.push(SenseEntry {
            id: SenseId::new(id),
            pos: PartOfSpeech::Noun,
            lemmas: lemmas.iter().map(|lemma| (*lemma).to_string()).collect(),
            hypernyms: hypernyms.iter().map(|id| SenseId::new(*id)).collect(),
        });
        self
    }

    /// Declares an arbitrary entry.
    #[must_use]
    pub fn entry(mut self, entry: SenseEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Validates and indexes the declared senses.
    pub fn build(self) -> Result<MemoryOntology, OntologyLoadError> {
        MemoryOntology::from_entries(self.entries)
    }
}

fn lemma_key(term: &str) -> String {
    collapse_whitespace(term).to_lowercase().replace(' ', "_")
}

const fn default_pos() -> PartOfSpeech {
    PartOfSpeech::Noun
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// cat/dog under carnivore, plus a lemma-less sibling under feline.
    pub fn animals() -> MemoryOntology {
        MemoryOntology::builder()
            .noun("carnivore.n.01", &["carnivore"], &[])
            .noun("feline.n.01", &["feline", "felid"], &["carnivore.n.01"])
            .noun("cat.n.01", &["cat", "true_cat"], &["carnivore.n.01"])
            .noun("dog.n.01", &["dog", "domestic_dog"], &["carnivore.n.01"])
            .noun("big_cat.n.01", &["big_cat"], &["feline.n.01"])
            .build()
            .unwrap()
    }
}
