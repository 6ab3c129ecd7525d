//! InMemoryTaxonomy: a WordNet-shaped is-a graph held in memory.
//!
//! JSON format:
//! ```text
//! {
//!   "name": "mini-wordnet",
//!   "concepts": [
//!     { "id": "entity.n.01", "lemmas": ["entity"], "hypernyms": [] },
//!     { "id": "root.n.01", "lemmas": ["root"], "hypernyms": ["plant_organ.n.01"] }
//!   ]
//! }
//! ```
//!
//! A word's senses are the concepts listing it as a lemma, in declaration
//! order. Multiple inheritance is allowed; cycles and dangling hypernyms are
//! rejected at build time.
//!
//! Similarity is Wu-Palmer: with `lcs` the deepest common ancestor,
//! `d = depth(lcs) + 1` and `len_i = dist(s_i, lcs) + d`,
//! `sim = 2d / (len_1 + len_2)`.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Taxonomy;
use crate::error::{ClueError, Result};
use crate::sanitize::{lookup_key, sanitize_similarity};
use crate::types::Sense;

const DEFAULT_NAME: &str = "InMemoryTaxonomy";

// ==================== Serialized Form ====================

/// One concept as declared in the JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptEntry {
    pub id: String,
    #[serde(default)]
    pub lemmas: Vec<String>,
    #[serde(default)]
    pub hypernyms: Vec<String>,
}

/// Top-level JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyDocument {
    #[serde(default = "default_name")]
    pub name: String,
    pub concepts: Vec<ConceptEntry>,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

// ==================== Builder ====================

/// Collects concepts before indexing them
#[derive(Debug, Clone, Default)]
pub struct TaxonomyBuilder {
    name: Option<String>,
    concepts: Vec<ConceptEntry>,
}

impl TaxonomyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    /// Declare a concept. Declaration order is sense order for its lemmas.
    pub fn concept(&mut self, id: &str, lemmas: &[&str], hypernyms: &[&str]) -> &mut Self {
        self.concepts.push(ConceptEntry {
            id: id.to_string(),
            lemmas: lemmas.iter().map(|l| l.to_string()).collect(),
            hypernyms: hypernyms.iter().map(|h| h.to_string()).collect(),
        });
        self
    }

    pub fn build(&self) -> Result<InMemoryTaxonomy> {
        InMemoryTaxonomy::from_document(TaxonomyDocument {
            name: self.name.clone().unwrap_or_else(default_name),
            concepts: self.concepts.clone(),
        })
    }
}

// ==================== Indexed Graph ====================

#[derive(Debug, Clone)]
struct Concept {
    id: String,
    lemmas: Vec<String>,
    parents: Vec<usize>,
    depth: usize,
    /// Reflexive ancestor closure: concept index -> shortest upward distance
    closure: HashMap<usize, usize>,
}

#[derive(Debug)]
pub struct InMemoryTaxonomy {
    name: String,
    concepts: Vec<Concept>,
    by_id: HashMap<String, usize>,
    /// Lookup key -> concept indices in declaration order
    word_index: HashMap<String, Vec<usize>>,
}

impl InMemoryTaxonomy {
    pub fn builder() -> TaxonomyBuilder {
        TaxonomyBuilder::new()
    }

    /// Parse a JSON taxonomy document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: TaxonomyDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Load a JSON taxonomy document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_document(document: TaxonomyDocument) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(document.concepts.len());
        for (idx, entry) in document.concepts.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(ClueError::Taxonomy(format!("concept #{idx} has an empty id")));
            }
            if by_id.insert(entry.id.clone(), idx).is_some() {
                return Err(ClueError::Taxonomy(format!("duplicate concept id '{}'", entry.id)));
            }
        }

        let mut concepts = Vec::with_capacity(document.concepts.len());
        for entry in document.concepts {
            let mut parents = Vec::with_capacity(entry.hypernyms.len());
            for hypernym in &entry.hypernyms {
                let parent = by_id.get(hypernym).copied().ok_or_else(|| {
                    ClueError::Taxonomy(format!(
                        "concept '{}' names unknown hypernym '{hypernym}'",
                        entry.id
                    ))
                })?;
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
            concepts.push(Concept {
                id: entry.id,
                lemmas: entry.lemmas,
                parents,
                depth: 0,
                closure: HashMap::new(),
            });
        }

        let depths = compute_depths(&concepts)?;
        for (idx, depth) in depths.into_iter().enumerate() {
            concepts[idx].depth = depth;
        }
        for idx in 0..concepts.len() {
            concepts[idx].closure = ancestor_closure(&concepts, idx);
        }

        let mut word_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, concept) in concepts.iter().enumerate() {
            for lemma in &concept.lemmas {
                let entry = word_index.entry(lookup_key(lemma)).or_default();
                if !entry.contains(&idx) {
                    entry.push(idx);
                }
            }
        }

        Ok(Self {
            name: document.name,
            concepts,
            by_id,
            word_index,
        })
    }

    /// Number of concepts
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Whether the word has at least one sense
    pub fn contains(&self, word: &str) -> bool {
        self.word_index.contains_key(&lookup_key(word))
    }

    fn index_of(&self, sense: &Sense) -> Option<usize> {
        self.by_id.get(&sense.id).copied()
    }

    fn concept_sense(&self, idx: usize) -> Sense {
        let concept = &self.concepts[idx];
        Sense {
            id: concept.id.clone(),
            word: concept
                .lemmas
                .first()
                .cloned()
                .unwrap_or_else(|| concept.id.clone()),
            index: 0,
            depth: concept.depth,
        }
    }

    /// Common ancestor indices in declaration order
    fn shared(&self, a: usize, b: usize) -> Vec<usize> {
        let closure_b = &self.concepts[b].closure;
        let mut shared: Vec<usize> = self.concepts[a]
            .closure
            .keys()
            .copied()
            .filter(|idx| closure_b.contains_key(idx))
            .collect();
        shared.sort_unstable();
        shared
    }
}

impl Taxonomy for InMemoryTaxonomy {
    fn name(&self) -> &str {
        &self.name
    }

    fn senses(&self, word: &str) -> Result<Vec<Sense>> {
        let indices = self
            .word_index
            .get(&lookup_key(word))
            .filter(|indices| !indices.is_empty())
            .ok_or_else(|| ClueError::WordNotFound(word.to_string()))?;

        Ok(indices
            .iter()
            .enumerate()
            .map(|(position, &idx)| Sense {
                id: self.concepts[idx].id.clone(),
                word: word.to_string(),
                index: position,
                depth: self.concepts[idx].depth,
            })
            .collect())
    }

    fn common_ancestors(&self, a: &Sense, b: &Sense) -> Vec<Sense> {
        match (self.index_of(a), self.index_of(b)) {
            (Some(a), Some(b)) => self
                .shared(a, b)
                .into_iter()
                .map(|idx| self.concept_sense(idx))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn similarity(&self, a: &Sense, b: &Sense) -> Option<f64> {
        let (a, b) = (self.index_of(a)?, self.index_of(b)?);
        let closure_a = &self.concepts[a].closure;
        let closure_b = &self.concepts[b].closure;

        // deepest subsumer; among equally deep ones the closest to both senses
        let lcs = self
            .shared(a, b)
            .into_iter()
            .max_by(|&x, &y| {
                let path_x = closure_a[&x] + closure_b[&x];
                let path_y = closure_a[&y] + closure_b[&y];
                self.concepts[x]
                    .depth
                    .cmp(&self.concepts[y].depth)
                    .then(path_y.cmp(&path_x))
                    .then(y.cmp(&x))
            })?;

        let depth = (self.concepts[lcs].depth + 1) as f64;
        let len_a = closure_a[&lcs] as f64 + depth;
        let len_b = closure_b[&lcs] as f64 + depth;
        sanitize_similarity(2.0 * depth / (len_a + len_b))
    }

    fn depth(&self, sense: &Sense) -> usize {
        self.index_of(sense)
            .map(|idx| self.concepts[idx].depth)
            .unwrap_or(sense.depth)
    }

    fn lemmas(&self, sense: &Sense) -> Vec<String> {
        self.index_of(sense)
            .map(|idx| self.concepts[idx].lemmas.clone())
            .unwrap_or_default()
    }
}

// ==================== Graph Helpers ====================

/// Longest path to a root for every concept; fails on cycles
fn compute_depths(concepts: &[Concept]) -> Result<Vec<usize>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; concepts.len()];
    let mut depths = vec![0usize; concepts.len()];

    for start in 0..concepts.len() {
        if marks[start] == Mark::Done {
            continue;
        }
        // (concept, next parent position)
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        marks[start] = Mark::InProgress;

        while let Some((node, next)) = stack.pop() {
            if let Some(&parent) = concepts[node].parents.get(next) {
                stack.push((node, next + 1));
                match marks[parent] {
                    Mark::Done => {}
                    Mark::InProgress => {
                        return Err(ClueError::Taxonomy(format!(
                            "hypernym cycle through '{}'",
                            concepts[parent].id
                        )));
                    }
                    Mark::Unvisited => {
                        marks[parent] = Mark::InProgress;
                        stack.push((parent, 0));
                    }
                }
            } else {
                depths[node] = concepts[node]
                    .parents
                    .iter()
                    .map(|&p| depths[p] + 1)
                    .max()
                    .unwrap_or(0);
                marks[node] = Mark::Done;
            }
        }
    }

    Ok(depths)
}

/// Breadth-first walk up the hypernym graph, keeping the shortest distance
fn ancestor_closure(concepts: &[Concept], start: usize) -> HashMap<usize, usize> {
    let mut closure = HashMap::new();
    let mut queue = VecDeque::new();
    closure.insert(start, 0);
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        let dist = closure[&node];
        for &parent in &concepts[node].parents {
            if !closure.contains_key(&parent) {
                closure.insert(parent, dist + 1);
                queue.push_back(parent);
            }
        }
    }

    closure
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InMemoryTaxonomy {
        InMemoryTaxonomy::builder()
            .name("sample")
            .concept("entity.n.01", &["entity"], &[])
            .concept("animal.n.01", &["animal", "beast"], &["entity.n.01"])
            .concept("dog.n.01", &["dog", "domestic_dog"], &["animal.n.01"])
            .concept("cat.n.01", &["cat", "true_cat"], &["animal.n.01"])
            .concept("puppy.n.01", &["puppy"], &["dog.n.01"])
            .concept("dog.n.02", &["dog", "frump"], &["entity.n.01"])
            .concept("island.n.01", &["island"], &[])
            .build()
            .unwrap()
    }

    fn first(tax: &InMemoryTaxonomy, word: &str) -> Sense {
        tax.first_sense(word).unwrap()
    }

    #[test]
    fn test_senses_in_declaration_order() {
        let tax = sample();
        let senses = tax.senses("Dog").unwrap();
        assert_eq!(senses.len(), 2);
        assert_eq!(senses[0].id, "dog.n.01");
        assert_eq!(senses[1].id, "dog.n.02");
        assert_eq!(senses[1].index, 1);
        assert_eq!(senses[0].word, "Dog");
    }

    #[test]
    fn test_unknown_word_fails() {
        let tax = sample();
        assert!(matches!(tax.senses("zebra"), Err(ClueError::WordNotFound(w)) if w == "zebra"));
        assert!(!tax.contains("zebra"));
    }

    #[test]
    fn test_multi_word_lookup() {
        let tax = sample();
        assert_eq!(tax.senses("domestic dog").unwrap()[0].id, "dog.n.01");
    }

    #[test]
    fn test_depths() {
        let tax = sample();
        assert_eq!(first(&tax, "entity").depth, 0);
        assert_eq!(first(&tax, "animal").depth, 1);
        assert_eq!(first(&tax, "puppy").depth, 3);
        assert_eq!(tax.depth(&first(&tax, "cat")), 2);
    }

    #[test]
    fn test_depth_is_longest_path() {
        let tax = InMemoryTaxonomy::builder()
            .concept("top.n.01", &["top"], &[])
            .concept("mid.n.01", &["mid"], &["top.n.01"])
            .concept("low.n.01", &["low"], &["mid.n.01", "top.n.01"])
            .build()
            .unwrap();
        assert_eq!(first(&tax, "low").depth, 2);
    }

    #[test]
    fn test_common_ancestors_reflexive_and_ordered() {
        let tax = sample();
        let ancestors = tax.common_ancestors(&first(&tax, "puppy"), &first(&tax, "dog"));
        let ids: Vec<_> = ancestors.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["entity.n.01", "animal.n.01", "dog.n.01"]);
        assert_eq!(ancestors[1].word, "animal");
    }

    #[test]
    fn test_no_common_ancestor_across_roots() {
        let tax = sample();
        assert!(tax
            .common_ancestors(&first(&tax, "island"), &first(&tax, "dog"))
            .is_empty());
        assert_eq!(tax.similarity(&first(&tax, "island"), &first(&tax, "dog")), None);
    }

    #[test]
    fn test_wup_similarity() {
        let tax = sample();
        let dog = first(&tax, "dog");
        let cat = first(&tax, "cat");
        // lcs animal: d = 2, len = 1 + 2 each -> 4 / 6
        let sim = tax.similarity(&dog, &cat).unwrap();
        assert!((sim - 4.0 / 6.0).abs() < 1e-12);
        assert_eq!(tax.similarity(&dog, &dog), Some(1.0));
        assert_eq!(tax.similarity(&dog, &cat), tax.similarity(&cat, &dog));
    }

    #[test]
    fn test_wup_similarity_with_ancestor() {
        let tax = sample();
        let puppy = first(&tax, "puppy");
        let animal = first(&tax, "animal");
        // lcs animal: d = 2, len_puppy = 2 + 2, len_animal = 0 + 2 -> 4 / 6
        let sim = tax.similarity(&puppy, &animal).unwrap();
        assert!((sim - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_foreign_sense_is_unrelated() {
        let tax = sample();
        let foreign = Sense {
            id: "nope.n.01".to_string(),
            word: "nope".to_string(),
            index: 0,
            depth: 7,
        };
        assert_eq!(tax.similarity(&foreign, &first(&tax, "dog")), None);
        assert!(tax.lemmas(&foreign).is_empty());
        assert_eq!(tax.depth(&foreign), 7);
    }

    #[test]
    fn test_lemmas_native_order() {
        let tax = sample();
        assert_eq!(tax.lemmas(&first(&tax, "cat")), vec!["cat", "true_cat"]);
    }

    #[test]
    fn test_rejects_unknown_hypernym() {
        let result = InMemoryTaxonomy::builder()
            .concept("a.n.01", &["a"], &["missing.n.01"])
            .build();
        assert!(matches!(result, Err(ClueError::Taxonomy(_))));
    }

    #[test]
    fn test_rejects_cycle() {
        let json = r#"{"concepts": [
            {"id": "a.n.01", "lemmas": ["a"], "hypernyms": ["b.n.01"]},
            {"id": "b.n.01", "lemmas": ["b"], "hypernyms": ["a.n.01"]}
        ]}"#;
        assert!(matches!(
            InMemoryTaxonomy::from_json_str(json),
            Err(ClueError::Taxonomy(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let result = InMemoryTaxonomy::builder()
            .concept("a.n.01", &["a"], &[])
            .concept("a.n.01", &["b"], &[])
            .build();
        assert!(matches!(result, Err(ClueError::Taxonomy(_))));
    }

    #[test]
    fn test_from_json_defaults() {
        let json = r#"{"concepts": [{"id": "thing.n.01", "lemmas": ["thing"]}]}"#;
        let tax = InMemoryTaxonomy::from_json_str(json).unwrap();
        assert_eq!(tax.name(), DEFAULT_NAME);
        assert_eq!(tax.len(), 1);
        assert!(!tax.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            InMemoryTaxonomy::from_json_str("{not json"),
            Err(ClueError::Json(_))
        ));
    }
}
