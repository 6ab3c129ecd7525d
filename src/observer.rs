//! Injected observer for linking and recommendation events.
//!
//! Components never log through ambient state; they report to the
//! `LinkObserver` they were constructed with. `TracingObserver` forwards to
//! `tracing`, `SilentObserver` drops everything.

use tracing::{debug, info, warn};

use crate::types::{ComparisonRecord, Recommendation, Sense, WordCategory};

/// Receiver of engine events. Every method defaults to a no-op.
pub trait LinkObserver: Send + Sync {
    /// A category list changed
    fn words_updated(&self, _category: WordCategory, _words: &[String]) {}

    /// A word was skipped because the taxonomy has no senses for it
    fn word_skipped(&self, _word: &str, _category: WordCategory) {}

    /// Linking of a subject word against the rest of the link list began
    fn linking_started(&self, _word: &str) {}

    /// A candidate ancestor was too similar to a forbidden word
    fn candidate_rejected(
        &self,
        _candidate: &Sense,
        _forbidden_word: &str,
        _category: WordCategory,
        _similarity: f64,
        _ceiling: f64,
    ) {
    }

    /// A sense pair was linked through a guarded ancestor
    fn link_found(&self, _record: &ComparisonRecord) {}

    /// No shared ancestor of a sense pair passed the guard
    fn link_missed(&self, _subject: &Sense, _comparison: &Sense) {}

    /// A recommendation was emitted
    fn recommended(&self, _recommendation: &Recommendation) {}

    /// A fallback lemma was rejected for being a form of the word itself
    fn lemma_rejected(&self, _word: &str, _lemma: &str) {}
}

/// Forwards events to `tracing` as structured events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LinkObserver for TracingObserver {
    fn words_updated(&self, category: WordCategory, words: &[String]) {
        info!(category = %category, words = ?words, "word list updated");
    }

    fn word_skipped(&self, word: &str, category: WordCategory) {
        warn!(word, category = %category, "word not in taxonomy, skipping");
    }

    fn linking_started(&self, word: &str) {
        info!(word, "attempting to link");
    }

    fn candidate_rejected(
        &self,
        candidate: &Sense,
        forbidden_word: &str,
        category: WordCategory,
        similarity: f64,
        ceiling: f64,
    ) {
        debug!(
            candidate = %candidate,
            forbidden_word,
            category = %category,
            similarity,
            ceiling,
            "candidate too similar to forbidden word, not using"
        );
    }

    fn link_found(&self, record: &ComparisonRecord) {
        info!(
            subject = %record.subject_sense,
            comparison = %record.comparison_sense,
            ancestor = record.ancestor_id().unwrap_or(""),
            similarity_to_subject = record.similarity_to_subject,
            similarity_to_comparison = record.similarity_to_comparison,
            average_similarity = record.average_similarity,
            "lowest sufficient shared ancestor"
        );
    }

    fn link_missed(&self, subject: &Sense, comparison: &Sense) {
        debug!(subject = %subject, comparison = %comparison, "no suitable shared ancestor");
    }

    fn recommended(&self, recommendation: &Recommendation) {
        info!(
            rank = recommendation.rank,
            clue = %recommendation.clue,
            linked_words = ?recommendation.linked_words,
            "recommendation"
        );
    }

    fn lemma_rejected(&self, word: &str, lemma: &str) {
        debug!(word, lemma, "lemma too close to word, not linking");
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl LinkObserver for SilentObserver {}
