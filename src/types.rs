//! Common Types and Constants
//!
//! Shared data structures used across the linking and recommendation modules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClueError;

// ==================== Constants ====================

/// Default number of senses examined per word
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Default margin subtracted for assassin words (tightest ceiling)
pub const DEFAULT_ASSASSIN_LIMIT: f64 = 0.1;

/// Default margin subtracted for avoid (opposition) words
pub const DEFAULT_OPPOSITION_LIMIT: f64 = 0.05;

/// Default margin subtracted for neutral words (loosest ceiling)
pub const DEFAULT_NEUTRAL_LIMIT: f64 = 0.025;

/// Default minimum average similarity for a grouped recommendation
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.75;

/// Number of leading lemma characters checked against the word in the fallback stage
pub const FALLBACK_PREFIX_CHARS: usize = 2;

// ==================== Category Types ====================

/// Classification of a game word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordCategory {
    /// Target words the clue must link
    Link,
    /// Opposing words
    Avoid,
    /// Neutral bystanders
    Neutral,
    /// The word that ends the game if guessed
    Assassin,
}

impl WordCategory {
    pub const ALL: [WordCategory; 4] = [
        WordCategory::Link,
        WordCategory::Avoid,
        WordCategory::Neutral,
        WordCategory::Assassin,
    ];

    /// Forbidden categories in the order the guard checks them
    pub const FORBIDDEN: [WordCategory; 3] = [
        WordCategory::Assassin,
        WordCategory::Avoid,
        WordCategory::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WordCategory::Link => "link",
            WordCategory::Avoid => "avoid",
            WordCategory::Neutral => "neutral",
            WordCategory::Assassin => "assassin",
        }
    }
}

impl FromStr for WordCategory {
    type Err = ClueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "link" => Ok(WordCategory::Link),
            "avoid" => Ok(WordCategory::Avoid),
            "neutral" => Ok(WordCategory::Neutral),
            "assassin" => Ok(WordCategory::Assassin),
            other => Err(ClueError::InvalidArgument(format!(
                "category should be one of [link, avoid, neutral, assassin], got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for WordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutation applied to a category list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryAction {
    Add,
    Remove,
}

impl FromStr for CategoryAction {
    type Err = ClueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(CategoryAction::Add),
            "remove" => Ok(CategoryAction::Remove),
            other => Err(ClueError::InvalidArgument(format!(
                "action should be either 'add' or 'remove', got '{other}'"
            ))),
        }
    }
}

/// What to do when a word has no senses in the taxonomy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingWordPolicy {
    /// Fail the whole run with `WordNotFound`
    #[default]
    Abort,
    /// Skip the word and keep going
    Skip,
}

impl FromStr for MissingWordPolicy {
    type Err = ClueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(MissingWordPolicy::Abort),
            "skip" => Ok(MissingWordPolicy::Skip),
            other => Err(ClueError::InvalidArgument(format!(
                "missing word policy should be 'abort' or 'skip', got '{other}'"
            ))),
        }
    }
}

// ==================== Taxonomy Types ====================

/// One meaning of a word in the taxonomy
///
/// Identity is the concept `id`; `word` and `index` record how the sense was
/// reached (the looked-up word and its position in that word's sense list).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sense {
    /// Concept identifier, e.g. `root.n.01`
    pub id: String,
    /// Word this sense was fetched for (head lemma for ancestor concepts)
    pub word: String,
    /// Position within the word's sense list
    pub index: usize,
    /// Longest hypernym path to a root (root = 0)
    pub depth: usize,
}

impl PartialEq for Sense {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Sense {}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

// ==================== Guard Types ====================

/// Margins subtracted from a candidate's base score for each forbidden category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityLimits {
    pub assassin: f64,
    pub opposition: f64,
    pub neutral: f64,
}

impl SimilarityLimits {
    pub fn new(assassin: f64, opposition: f64, neutral: f64) -> Self {
        Self {
            assassin,
            opposition,
            neutral,
        }
    }

    /// Requires `1 >= assassin > opposition > neutral > 0`
    pub fn validate(&self) -> Result<(), ClueError> {
        let ordered = 1.0 >= self.assassin
            && self.assassin > self.opposition
            && self.opposition > self.neutral
            && self.neutral > 0.0;
        if ordered {
            Ok(())
        } else {
            Err(ClueError::InvalidArgument(format!(
                "check your limits, should follow: 1 >= assassin_limit > opposition_limit > \
                 neutral_limit > 0 (got {}, {}, {})",
                self.assassin, self.opposition, self.neutral
            )))
        }
    }

    /// Limit for a forbidden category (`Link` has none)
    pub fn for_category(&self, category: WordCategory) -> Option<f64> {
        match category {
            WordCategory::Assassin => Some(self.assassin),
            WordCategory::Avoid => Some(self.opposition),
            WordCategory::Neutral => Some(self.neutral),
            WordCategory::Link => None,
        }
    }
}

impl Default for SimilarityLimits {
    fn default() -> Self {
        Self {
            assassin: DEFAULT_ASSASSIN_LIMIT,
            opposition: DEFAULT_OPPOSITION_LIMIT,
            neutral: DEFAULT_NEUTRAL_LIMIT,
        }
    }
}

// ==================== Linker Types ====================

/// Parameters of one linking run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinkParams {
    /// Senses examined per word
    pub max_depth: usize,
    pub limits: SimilarityLimits,
    pub missing_word_policy: MissingWordPolicy,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            limits: SimilarityLimits::default(),
            missing_word_policy: MissingWordPolicy::Abort,
        }
    }
}

/// Outcome of comparing one subject sense with one comparison sense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub subject_word: String,
    pub comparison_word: String,
    pub subject_sense: Sense,
    pub comparison_sense: Sense,
    /// Most specific shared ancestor that passed the guard; `None` when the senses share none
    pub ancestor: Option<Sense>,
    /// Wu-Palmer similarity between the subject sense and the ancestor
    pub similarity_to_subject: f64,
    /// Wu-Palmer similarity between the comparison sense and the ancestor
    pub similarity_to_comparison: f64,
    /// Mean of the two similarities
    pub average_similarity: f64,
}

impl ComparisonRecord {
    /// Record for a sense pair with a guarded shared ancestor
    pub fn linked(
        subject_word: &str,
        comparison_word: &str,
        subject_sense: Sense,
        comparison_sense: Sense,
        ancestor: Sense,
        similarity_to_subject: f64,
        similarity_to_comparison: f64,
    ) -> Self {
        Self {
            subject_word: subject_word.to_string(),
            comparison_word: comparison_word.to_string(),
            subject_sense,
            comparison_sense,
            ancestor: Some(ancestor),
            similarity_to_subject,
            similarity_to_comparison,
            average_similarity: mean(similarity_to_subject, similarity_to_comparison),
        }
    }

    /// Record for a sense pair without any shared ancestor
    pub fn unlinked(
        subject_word: &str,
        comparison_word: &str,
        subject_sense: Sense,
        comparison_sense: Sense,
    ) -> Self {
        Self {
            subject_word: subject_word.to_string(),
            comparison_word: comparison_word.to_string(),
            subject_sense,
            comparison_sense,
            ancestor: None,
            similarity_to_subject: 0.0,
            similarity_to_comparison: 0.0,
            average_similarity: 0.0,
        }
    }

    pub fn ancestor_id(&self) -> Option<&str> {
        self.ancestor.as_ref().map(|a| a.id.as_str())
    }
}

/// Mean of two similarity scores
pub fn mean(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}

// ==================== Recommendation Types ====================

/// How a recommendation was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    /// Shared ancestor of several link words
    Shared,
    /// Synonym lemma for a single unlinked word
    Fallback,
}

/// A suggested clue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based, strictly increasing in emission order
    pub rank: u32,
    /// Shared ancestor id or fallback lemma
    pub clue: String,
    /// Words the clue is meant to link
    pub linked_words: Vec<String>,
    pub kind: RecommendationKind,
}
