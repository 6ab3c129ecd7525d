//! Taxonomy Linker
//!
//! Pairs every link word with every other link word and searches their senses
//! for the most specific shared ancestor that the similarity guard accepts.
//!
//! Search order per subject word:
//! - subject sense (outer, first `max_depth` senses)
//! - comparison word (middle, every other distinct link word)
//! - comparison sense (inner, first `max_depth` senses)
//!
//! Per sense pair:
//! - no shared ancestor -> a null record with zero scores
//! - otherwise ancestors are scanned deepest first; the first one the guard
//!   accepts is recorded and the inner loop stops for this comparison word
//! - no accepted ancestor -> nothing is recorded
//!
//! 贪心选择: 取最具体的安全祖先，而非得分最高者
//! Selection is greedy (most specific safe ancestor), not the best-scoring one.
//! Worst case is `O(L² · max_depth²)` sense pairs for `L` link words.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::{ClueError, Result};
use crate::guard::SimilarityGuard;
use crate::observer::LinkObserver;
use crate::store::WordCategoryStore;
use crate::taxonomy::Taxonomy;
use crate::types::{mean, ComparisonRecord, LinkParams, MissingWordPolicy, Sense, WordCategory};

pub struct TaxonomyLinker<'a> {
    taxonomy: &'a dyn Taxonomy,
    store: &'a WordCategoryStore,
    observer: &'a dyn LinkObserver,
}

impl<'a> TaxonomyLinker<'a> {
    pub fn new(
        taxonomy: &'a dyn Taxonomy,
        store: &'a WordCategoryStore,
        observer: &'a dyn LinkObserver,
    ) -> Self {
        Self {
            taxonomy,
            store,
            observer,
        }
    }

    /// 比较所有有序的关联词对
    pub fn link(&self, params: &LinkParams) -> Result<Vec<ComparisonRecord>> {
        let (senses, guard) = self.prepare(params)?;

        let mut records = Vec::new();
        for word in self.store.link_words() {
            records.extend(self.link_word(word, &senses, &guard, params)?);
        }
        Ok(records)
    }

    /// 并行版本: 每个主词在 rayon 线程池上处理
    ///
    /// Same as [`link`](Self::link), with each subject word's turn on the rayon pool.
    ///
    /// Batches are concatenated in link-list order, so the output matches `link`.
    pub fn link_parallel(&self, params: &LinkParams) -> Result<Vec<ComparisonRecord>> {
        let (senses, guard) = self.prepare(params)?;

        let batches: Vec<Vec<ComparisonRecord>> = self
            .store
            .link_words()
            .par_iter()
            .map(|word| self.link_word(word, &senses, &guard, params))
            .collect::<Result<_>>()?;

        Ok(batches.into_iter().flatten().collect())
    }

    /// 校验参数，解析词义，并预热守卫
    fn prepare(
        &self,
        params: &LinkParams,
    ) -> Result<(HashMap<String, Vec<Sense>>, SimilarityGuard<'a>)> {
        if params.max_depth == 0 {
            return Err(ClueError::InvalidArgument(
                "max_depth must be at least 1".to_string(),
            ));
        }
        params.limits.validate()?;

        let senses = self.resolve_senses(params)?;
        let guard = SimilarityGuard::new(
            self.taxonomy,
            self.store,
            params.missing_word_policy,
            self.observer,
        );
        // 在进入线程池前解析禁用词，跳过事件只触发一次
        guard.resolve_forbidden()?;
        Ok((senses, guard))
    }

    /// 每个关联词截断到 `max_depth` 的词义列表
    fn resolve_senses(&self, params: &LinkParams) -> Result<HashMap<String, Vec<Sense>>> {
        let mut resolved = HashMap::new();
        for word in self.store.link_words() {
            if resolved.contains_key(word) {
                continue;
            }
            match self.taxonomy.senses(word) {
                Ok(mut senses) => {
                    senses.truncate(params.max_depth);
                    resolved.insert(word.clone(), senses);
                }
                Err(ClueError::WordNotFound(_))
                    if params.missing_word_policy == MissingWordPolicy::Skip =>
                {
                    self.observer.word_skipped(word, WordCategory::Link);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(resolved)
    }

    /// 单个主词与其余不同关联词的比较
    fn link_word(
        &self,
        word: &str,
        senses: &HashMap<String, Vec<Sense>>,
        guard: &SimilarityGuard<'_>,
        params: &LinkParams,
    ) -> Result<Vec<ComparisonRecord>> {
        let mut records = Vec::new();
        let Some(subject_senses) = senses.get(word) else {
            return Ok(records);
        };
        self.observer.linking_started(word);

        let mut others: Vec<&str> = Vec::new();
        for other in self.store.link_words() {
            if other != word && !others.contains(&other.as_str()) {
                others.push(other);
            }
        }

        for subject_sense in subject_senses {
            for &comp in &others {
                let Some(comparison_senses) = senses.get(comp) else {
                    continue;
                };
                for comparison_sense in comparison_senses {
                    let mut ancestors = self
                        .taxonomy
                        .common_ancestors(subject_sense, comparison_sense);

                    if ancestors.is_empty() {
                        records.push(ComparisonRecord::unlinked(
                            word,
                            comp,
                            subject_sense.clone(),
                            comparison_sense.clone(),
                        ));
                        continue;
                    }

                    // 按深度降序排列，稳定排序保留提供者顺序
                    ancestors.sort_by_key(|a| std::cmp::Reverse(self.taxonomy.depth(a)));

                    match self.first_safe_ancestor(
                        word,
                        comp,
                        subject_sense,
                        comparison_sense,
                        ancestors,
                        guard,
                        params,
                    )? {
                        Some(record) => {
                            self.observer.link_found(&record);
                            records.push(record);
                            break;
                        }
                        None => self.observer.link_missed(subject_sense, comparison_sense),
                    }
                }
            }
        }

        Ok(records)
    }

    #[allow(clippy::too_many_arguments)]
    fn first_safe_ancestor(
        &self,
        word: &str,
        comp: &str,
        subject_sense: &Sense,
        comparison_sense: &Sense,
        ancestors: Vec<Sense>,
        guard: &SimilarityGuard<'_>,
        params: &LinkParams,
    ) -> Result<Option<ComparisonRecord>> {
        for ancestor in ancestors {
            let wup1 = self
                .taxonomy
                .similarity(subject_sense, &ancestor)
                .unwrap_or(0.0);
            let wup2 = self
                .taxonomy
                .similarity(comparison_sense, &ancestor)
                .unwrap_or(0.0);

            if guard.is_safe(&ancestor, mean(wup1, wup2), &params.limits)? {
                return Ok(Some(ComparisonRecord::linked(
                    word,
                    comp,
                    subject_sense.clone(),
                    comparison_sense.clone(),
                    ancestor,
                    wup1,
                    wup2,
                )));
            }
        }
        Ok(None)
    }
}
