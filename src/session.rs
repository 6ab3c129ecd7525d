//! Clue Session
//!
//! One game round: the word lists, every comparison record linked so far and
//! the recommendations drawn from them. Records and recommendations only grow.

use std::fmt::Write as _;

use crate::config::LinkerConfig;
use crate::error::Result;
use crate::linker::TaxonomyLinker;
use crate::observer::LinkObserver;
use crate::recommend::RecommendationEngine;
use crate::store::WordCategoryStore;
use crate::taxonomy::Taxonomy;
use crate::types::{ComparisonRecord, Recommendation, RecommendationKind};

pub struct ClueSession<'t> {
    taxonomy: &'t dyn Taxonomy,
    observer: &'t dyn LinkObserver,
    store: WordCategoryStore,
    records: Vec<ComparisonRecord>,
    recommendations: Vec<Recommendation>,
    engine: RecommendationEngine<'t>,
}

impl<'t> ClueSession<'t> {
    pub fn new(taxonomy: &'t dyn Taxonomy, observer: &'t dyn LinkObserver) -> Self {
        Self {
            taxonomy,
            observer,
            store: WordCategoryStore::new(),
            records: Vec::new(),
            recommendations: Vec::new(),
            engine: RecommendationEngine::new(taxonomy, observer),
        }
    }

    pub fn update_words(&mut self, words: &str, category: &str, action: &str) -> Result<()> {
        self.store.update(words, category, action, self.observer)
    }

    pub fn store(&self) -> &WordCategoryStore {
        &self.store
    }

    /// Link the current word lists and append the new records
    ///
    /// Returns how many records were added.
    pub fn link(&mut self, config: &LinkerConfig) -> Result<usize> {
        let params = config.link_params();
        let linker = TaxonomyLinker::new(self.taxonomy, &self.store, self.observer);
        let records = if config.parallel {
            linker.link_parallel(&params)?
        } else {
            linker.link(&params)?
        };

        let added = records.len();
        self.records.extend(records);
        Ok(added)
    }

    /// Recommend from every record so far; ranks continue across calls
    pub fn recommend(&mut self, min_similarity: f64) -> Result<Vec<Recommendation>> {
        let recommendations = self.engine.recommend(&self.records, min_similarity)?;
        self.recommendations.extend(recommendations.iter().cloned());
        Ok(recommendations)
    }

    pub fn records(&self) -> &[ComparisonRecord] {
        &self.records
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn render_records(&self) -> String {
        render_records(&self.records)
    }

    pub fn render_recommendations(&self) -> String {
        render_recommendations(&self.recommendations)
    }
}

/// Plain-text table, one row per record
pub fn render_records(records: &[ComparisonRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:<14} {:<18} {:<18} {:<22} {:>8} {:>8} {:>8}",
        "subject", "comparison", "subject_sense", "comparison_sense", "ancestor", "sim_s", "sim_c",
        "avg"
    );
    for record in records {
        let _ = writeln!(
            out,
            "{:<14} {:<14} {:<18} {:<18} {:<22} {:>8.4} {:>8.4} {:>8.4}",
            record.subject_word,
            record.comparison_word,
            record.subject_sense.id,
            record.comparison_sense.id,
            record.ancestor_id().unwrap_or("-"),
            record.similarity_to_subject,
            record.similarity_to_comparison,
            record.average_similarity,
        );
    }
    out
}

/// Plain-text table, one row per recommendation
pub fn render_recommendations(recommendations: &[Recommendation]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<24} {:<8}  linked words", "rank", "clue", "kind");
    for recommendation in recommendations {
        let kind = match recommendation.kind {
            RecommendationKind::Shared => "shared",
            RecommendationKind::Fallback => "fallback",
        };
        let _ = writeln!(
            out,
            "{:>4}  {:<24} {:<8}  {}",
            recommendation.rank,
            recommendation.clue,
            kind,
            recommendation.linked_words.join(", ")
        );
    }
    out
}
