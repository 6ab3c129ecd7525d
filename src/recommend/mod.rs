//! Recommendation Engine
//!
//! Turns comparison records into ranked clue recommendations.
//!
//! Stage 1 (shared): records with `average_similarity >= min_similarity` are
//! grouped by ancestor; larger groups rank first, equal sizes keep first
//! occurrence order. Each group links its distinct comparison words and marks
//! its subject words as covered.
//!
//! Stage 2 (fallback): every subject word still uncovered gets the first lemma
//! of its first sense whose leading two characters do not occur in the word.
//! Words without such a lemma get nothing.
//!
//! The rank counter belongs to the engine instance and keeps counting across
//! calls.

use std::collections::{HashMap, HashSet};

use crate::error::{ClueError, Result};
use crate::observer::LinkObserver;
use crate::sanitize::{is_unit_interval, leading_chars};
use crate::taxonomy::Taxonomy;
use crate::types::{ComparisonRecord, Recommendation, RecommendationKind, FALLBACK_PREFIX_CHARS};

/// 共享同一祖先的记录
struct AncestorGroup<'r> {
    ancestor: &'r str,
    records: Vec<&'r ComparisonRecord>,
}

pub struct RecommendationEngine<'a> {
    taxonomy: &'a dyn Taxonomy,
    observer: &'a dyn LinkObserver,
    next_rank: u32,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(taxonomy: &'a dyn Taxonomy, observer: &'a dyn LinkObserver) -> Self {
        Self {
            taxonomy,
            observer,
            next_rank: 1,
        }
    }

    /// Rank the next recommendation will receive
    pub fn next_rank(&self) -> u32 {
        self.next_rank
    }

    /// 生成推荐: 先共享祖先分组，再为未覆盖的词补充同义词
    pub fn recommend(
        &mut self,
        records: &[ComparisonRecord],
        min_similarity: f64,
    ) -> Result<Vec<Recommendation>> {
        if !is_unit_interval(min_similarity) {
            return Err(ClueError::InvalidArgument(format!(
                "min_similarity should be within [0, 1], got {min_similarity}"
            )));
        }

        let mut recommendations = Vec::new();
        let mut covered: HashSet<&str> = HashSet::new();

        for group in group_by_ancestor(records, min_similarity) {
            let mut linked_words: Vec<String> = Vec::new();
            for record in &group.records {
                if !linked_words.contains(&record.comparison_word) {
                    linked_words.push(record.comparison_word.clone());
                }
                covered.insert(record.subject_word.as_str());
            }
            let recommendation =
                self.emit(group.ancestor.to_string(), linked_words, RecommendationKind::Shared);
            recommendations.push(recommendation);
        }

        // 第二阶段: 按主词首次出现顺序回退
        let mut seen: HashSet<&str> = HashSet::new();
        for record in records {
            let word = record.subject_word.as_str();
            if !seen.insert(word) || covered.contains(word) {
                continue;
            }
            if let Some(lemma) = self.fallback_lemma(word)? {
                let recommendation =
                    self.emit(lemma, vec![word.to_string()], RecommendationKind::Fallback);
                recommendations.push(recommendation);
                covered.insert(word);
            }
        }

        Ok(recommendations)
    }

    /// 为未覆盖的词挑选同义词
    ///
    /// First lemma of the word's first sense that is not a form of the word.
    fn fallback_lemma(&self, word: &str) -> Result<Option<String>> {
        let sense = self.taxonomy.first_sense(word)?;
        for lemma in self.taxonomy.lemmas(&sense) {
            if word.contains(leading_chars(&lemma, FALLBACK_PREFIX_CHARS)) {
                self.observer.lemma_rejected(word, &lemma);
            } else {
                return Ok(Some(lemma));
            }
        }
        Ok(None)
    }

    fn emit(
        &mut self,
        clue: String,
        linked_words: Vec<String>,
        kind: RecommendationKind,
    ) -> Recommendation {
        let recommendation = Recommendation {
            rank: self.next_rank,
            clue,
            linked_words,
            kind,
        };
        self.next_rank += 1;
        self.observer.recommended(&recommendation);
        recommendation
    }
}

/// Qualifying records grouped by ancestor, largest group first
fn group_by_ancestor(records: &[ComparisonRecord], min_similarity: f64) -> Vec<AncestorGroup<'_>> {
    let mut groups: Vec<AncestorGroup<'_>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in records {
        if record.average_similarity < min_similarity {
            continue;
        }
        let Some(ancestor) = record.ancestor_id() else {
            continue;
        };
        let position = *positions.entry(ancestor).or_insert_with(|| {
            groups.push(AncestorGroup {
                ancestor,
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[position].records.push(record);
    }

    // 稳定排序: 同等大小保持首次出现顺序
    groups.sort_by(|a, b| b.records.len().cmp(&a.records.len()));
    groups
}
