//! Lexical ontology contract and the in-memory synset graph.

/// JSON-loadable synset graph.
pub mod memory;
/// Collaborator contract consumed by the substitution engine.
pub mod ontology;

pub use memory::{MemoryOntology, MemoryOntologyBuilder, OntologyLoadError, SenseEntry};
pub use ontology::{LexicalOntology, SenseId};
