//! Ontology traversal producing "related but different" terms.
//!
//! For every noun sense of the answer term the engine walks to each direct
//! hypernym and collects that hypernym's direct hyponyms: the term's
//! siblings. The originating sense is removed from the pool; a non-empty pool
//! yields one random sibling and one random lemma of it.
//!
//! The scan never stops early. Each successful pick overwrites the previous
//! one, so the replacement comes from the *last* sense/hypernym pair that had
//! siblings with lemmas. Every non-empty pool costs two random draws (sibling,
//! then lemma), whether or not its result survives.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    lexicon::{LexicalOntology, SenseId},
    random::RandomSource,
    sentence::PartOfSpeech,
};

/// A sibling term usable in a false statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Surface form with underscores turned into spaces.
    pub surface: String,
    /// Sense of the answer term the sibling was found from.
    pub source: SenseId,
    /// Shared hypernym.
    pub hypernym: SenseId,
    /// Chosen sibling sense.
    pub sibling: SenseId,
}

/// Why no replacement could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SubstitutionError {
    /// The ontology has no noun sense for the term.
    #[error("no noun sense found for {0:?}")]
    NoSenseFound(String),
    /// Senses exist but no hypernym offered a usable sibling.
    #[error("no sibling replacement found for {0:?}")]
    NoReplacementFound(String),
}

/// Finds a sibling term for `term` by hypernym/hyponym traversal.
pub fn find_replacement<R: RandomSource>(
    ontology: &dyn LexicalOntology,
    term: &str,
    random: &mut R,
) -> Result<Replacement, SubstitutionError> {
    let senses = ontology.senses_for(term, PartOfSpeech::Noun);
    if senses.is_empty() {
        return Err(SubstitutionError::NoSenseFound(term.to_string()));
    }

    let mut found = None;
    for sense in &senses {
        for hypernym in ontology.hypernyms(sense) {
            let mut pool = ontology.hyponyms(&hypernym);
            pool.retain(|candidate| candidate != sense);
            let Some(sibling) = random.pick(&pool) else {
                continue;
            };
            let lemmas = ontology.lemmas(sibling);
            if let Some(lemma) = random.pick(&lemmas) {
                found = Some(Replacement {
                    surface: lemma.replace('_', " "),
                    source: sense.clone(),
                    hypernym: hypernym.clone(),
                    sibling: sibling.clone(),
                });
            }
        }
    }

    found.ok_or_else(|| SubstitutionError::NoReplacementFound(term.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lexicon::{memory::fixtures::animals, MemoryOntology},
        random::ScriptedRandom,
    };

    #[test]
    fn picks_a_sibling_lemma() {
        let ontology = animals();
        // carnivore's pool without cat: [feline, dog]; sibling 1 = dog, lemma 1
        let mut random = ScriptedRandom::new([1, 1]);
        let replacement = find_replacement(&ontology, "cat", &mut random).unwrap();
        assert_eq!(replacement.surface, "domestic dog");
        assert_eq!(replacement.sibling, SenseId::new("dog.n.01"));
        assert_eq!(replacement.hypernym, SenseId::new("carnivore.n.01"));
        assert_eq!(random.consumed(), 2);
    }

    #[test]
    fn never_returns_the_originating_sense() {
        let ontology = animals();
        for seed in 0..20 {
            let mut random = crate::random::SeededRandom::new(seed);
            let replacement = find_replacement(&ontology, "cat", &mut random).unwrap();
            assert_ne!(replacement.sibling, SenseId::new("cat.n.01"));
        }
    }

    #[test]
    fn last_successful_pair_wins() {
        // "bass" has two senses; both hypernyms offer siblings
        let ontology = MemoryOntology::builder()
            .noun("fish.n.01", &["fish"], &[])
            .noun("voice.n.01", &["voice"], &[])
            .noun("bass.n.01", &["bass"], &["fish.n.01"])
            .noun("perch.n.01", &["perch"], &["fish.n.01"])
            .noun("bass.n.02", &["bass"], &["voice.n.01"])
            .noun("tenor.n.01", &["tenor"], &["voice.n.01"])
            .build()
            .unwrap();
        let mut random = ScriptedRandom::new([0, 0, 0, 0]);
        let replacement = find_replacement(&ontology, "bass", &mut random).unwrap();
        assert_eq!(replacement.surface, "tenor");
        assert_eq!(replacement.source, SenseId::new("bass.n.02"));
        assert_eq!(random.consumed(), 4);
    }

    #[test]
    fn lemma_less_siblings_do_not_count() {
        let ontology = MemoryOntology::builder()
            .noun("thing.n.01", &["thing"], &[])
            .noun("widget.n.01", &["widget"], &["thing.n.01"])
            .entry(crate::lexicon::SenseEntry {
                id: SenseId::new("anon.n.01"),
                pos: PartOfSpeech::Noun,
                lemmas: vec![],
                hypernyms: vec![SenseId::new("thing.n.01")],
            })
            .build()
            .unwrap();
        let mut random = ScriptedRandom::new([0]);
        assert_eq!(
            find_replacement(&ontology, "widget", &mut random),
            Err(SubstitutionError::NoReplacementFound("widget".into()))
        );
    }

    #[test]
    fn reports_missing_senses_and_lonely_senses() {
        let ontology = animals();
        let mut random = ScriptedRandom::default();
        assert_eq!(
            find_replacement(&ontology, "mat", &mut random),
            Err(SubstitutionError::NoSenseFound("mat".into()))
        );
        // carnivore has no hypernym, so it has no siblings
        assert_eq!(
            find_replacement(&ontology, "carnivore", &mut random),
            Err(SubstitutionError::NoReplacementFound("carnivore".into()))
        );
        assert_eq!(random.consumed(), 0);
    }
}
