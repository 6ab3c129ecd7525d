//! Pluggable lexical taxonomy.
//!
//! Any is-a hierarchy backend (embedded graph, WordNet export, remote
//! ontology service) implements `Taxonomy`. The linker, guard and
//! recommendation engine only ever see this trait.
//!
//! Current implementation: [`InMemoryTaxonomy`], loaded from JSON.

pub mod memory;

pub use memory::{ConceptEntry, InMemoryTaxonomy, TaxonomyBuilder, TaxonomyDocument};

use crate::error::{ClueError, Result};
use crate::types::Sense;

/// Lexical taxonomy provider.
///
/// Object safe and `&self` only. Implementations must be deterministic: the
/// same query always yields the same sequence, since ancestor ties are broken
/// by the order returned here.
pub trait Taxonomy: Send + Sync {
    /// Human-readable backend name (for logs and reports)
    fn name(&self) -> &str;

    /// Senses of a word, most common first. Fails with `WordNotFound` if there are none.
    fn senses(&self, word: &str) -> Result<Vec<Sense>>;

    /// Concepts that generalise both senses (each sense counts as its own ancestor)
    fn common_ancestors(&self, a: &Sense, b: &Sense) -> Vec<Sense>;

    /// Wu-Palmer similarity in `[0, 1]`, `None` when the senses cannot be related
    fn similarity(&self, a: &Sense, b: &Sense) -> Option<f64>;

    /// Taxonomy depth of a sense (root = 0)
    fn depth(&self, sense: &Sense) -> usize {
        sense.depth
    }

    /// Literal forms of a sense in the taxonomy's native order
    fn lemmas(&self, sense: &Sense) -> Vec<String>;

    /// First (most common) sense of a word
    fn first_sense(&self, word: &str) -> Result<Sense> {
        self.senses(word)?
            .into_iter()
            .next()
            .ok_or_else(|| ClueError::WordNotFound(word.to_string()))
    }
}
