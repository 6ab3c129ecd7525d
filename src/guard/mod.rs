//! Similarity Guard
//!
//! Decides whether a candidate shared ancestor is safe to use as a clue, given
//! the words the clue must not evoke.
//!
//! Rules:
//! - Categories are checked in the fixed order assassin, avoid, neutral
//! - Each category gets a ceiling of `base_score - limit`; the assassin limit is
//!   the largest, so assassin words face the lowest ceiling
//! - A forbidden word is compared through its first sense; undefined
//!   similarity means no signal and the word is skipped
//! - The first forbidden word above its ceiling rejects the candidate

use std::sync::OnceLock;

use crate::error::{ClueError, Result};
use crate::observer::LinkObserver;
use crate::store::WordCategoryStore;
use crate::taxonomy::Taxonomy;
use crate::types::{MissingWordPolicy, Sense, SimilarityLimits, WordCategory};

/// 禁用词的首个词义
#[derive(Debug, Clone)]
struct ForbiddenSense {
    category: WordCategory,
    word: String,
    sense: Sense,
}

pub struct SimilarityGuard<'a> {
    taxonomy: &'a dyn Taxonomy,
    store: &'a WordCategoryStore,
    policy: MissingWordPolicy,
    observer: &'a dyn LinkObserver,
    /// 禁用词首义缓存，首次使用时解析
    resolved: OnceLock<Vec<ForbiddenSense>>,
}

impl<'a> SimilarityGuard<'a> {
    pub fn new(
        taxonomy: &'a dyn Taxonomy,
        store: &'a WordCategoryStore,
        policy: MissingWordPolicy,
        observer: &'a dyn LinkObserver,
    ) -> Self {
        Self {
            taxonomy,
            store,
            policy,
            observer,
            resolved: OnceLock::new(),
        }
    }

    /// 检查候选祖先是否远离所有禁用词
    ///
    /// Fails with `InvalidArgument` before any taxonomy lookup unless
    /// `1 >= assassin > opposition > neutral > 0`.
    pub fn is_safe(
        &self,
        candidate: &Sense,
        base_score: f64,
        limits: &SimilarityLimits,
    ) -> Result<bool> {
        limits.validate()?;

        let forbidden = self.forbidden_senses()?;
        for category in WordCategory::FORBIDDEN {
            let Some(limit) = limits.for_category(category) else {
                continue;
            };
            // 上限 = 基础分 - 类别余量
            let ceiling = base_score - limit;

            for entry in forbidden.iter().filter(|f| f.category == category) {
                let Some(similarity) = self.taxonomy.similarity(candidate, &entry.sense) else {
                    continue;
                };
                if similarity > ceiling {
                    self.observer.candidate_rejected(
                        candidate,
                        &entry.word,
                        category,
                        similarity,
                        ceiling,
                    );
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }

    /// 预先解析禁用词首义
    ///
    /// Call before sharing the guard across threads; later `is_safe` calls
    /// reuse the cached senses without reporting skipped words again.
    pub fn resolve_forbidden(&self) -> Result<()> {
        self.forbidden_senses().map(|_| ())
    }

    fn forbidden_senses(&self) -> Result<&[ForbiddenSense]> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(resolved);
        }
        let resolved = self.resolve()?;
        Ok(self.resolved.get_or_init(|| resolved))
    }

    fn resolve(&self) -> Result<Vec<ForbiddenSense>> {
        let mut resolved = Vec::new();
        for (category, words) in self.store.forbidden() {
            for word in words {
                match self.taxonomy.first_sense(word) {
                    Ok(sense) => resolved.push(ForbiddenSense {
                        category,
                        word: word.clone(),
                        sense,
                    }),
                    // 跳过策略: 缺失的禁用词不提供信号
                    Err(ClueError::WordNotFound(_)) if self.policy == MissingWordPolicy::Skip => {
                        self.observer.word_skipped(word, category);
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(resolved)
    }
}
