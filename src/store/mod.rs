//! Word Category Store
//!
//! Holds the four game word lists. Category and action strings are parsed
//! once at the `update` boundary; everything behind it works on
//! `WordCategory` / `CategoryAction`.
//!
//! `add` appends without deduplication, so repeating an entry stores it twice.

use serde::{Deserialize, Serialize};

use crate::error::{ClueError, Result};
use crate::observer::LinkObserver;
use crate::sanitize::split_entries;
use crate::types::{CategoryAction, WordCategory};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordCategoryStore {
    link: Vec<String>,
    avoid: Vec<String>,
    neutral: Vec<String>,
    assassin: Vec<String>,
}

impl WordCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a string-typed update, e.g. `update("a, b", "link", "add", &obs)`
    ///
    /// Unknown category or action fails with `InvalidArgument` before any list is touched.
    pub fn update(
        &mut self,
        words: &str,
        category: &str,
        action: &str,
        observer: &dyn LinkObserver,
    ) -> Result<()> {
        let category: WordCategory = category.parse()?;
        let action: CategoryAction = action.parse()?;
        self.apply(words, category, action, observer)
    }

    /// Add or remove a single word or comma-separated list
    ///
    /// Removal is all-or-nothing: if any entry is missing the list is unchanged
    /// and `NotFound` names the first missing entry.
    pub fn apply(
        &mut self,
        words: &str,
        category: WordCategory,
        action: CategoryAction,
        observer: &dyn LinkObserver,
    ) -> Result<()> {
        let entries = split_entries(words);
        let list = self.list_mut(category);

        match action {
            CategoryAction::Add => list.extend(entries),
            CategoryAction::Remove => {
                let mut remaining = list.clone();
                for entry in entries {
                    let position = remaining
                        .iter()
                        .position(|w| *w == entry)
                        .ok_or_else(|| ClueError::NotFound {
                            category,
                            entry: entry.clone(),
                        })?;
                    remaining.remove(position);
                }
                *list = remaining;
            }
        }

        observer.words_updated(category, self.words(category));
        Ok(())
    }

    pub fn words(&self, category: WordCategory) -> &[String] {
        match category {
            WordCategory::Link => &self.link,
            WordCategory::Avoid => &self.avoid,
            WordCategory::Neutral => &self.neutral,
            WordCategory::Assassin => &self.assassin,
        }
    }

    fn list_mut(&mut self, category: WordCategory) -> &mut Vec<String> {
        match category {
            WordCategory::Link => &mut self.link,
            WordCategory::Avoid => &mut self.avoid,
            WordCategory::Neutral => &mut self.neutral,
            WordCategory::Assassin => &mut self.assassin,
        }
    }

    pub fn link_words(&self) -> &[String] {
        &self.link
    }

    pub fn avoid_words(&self) -> &[String] {
        &self.avoid
    }

    pub fn neutral_words(&self) -> &[String] {
        &self.neutral
    }

    pub fn assassin_words(&self) -> &[String] {
        &self.assassin
    }

    /// Forbidden lists in guard order: assassin, avoid, neutral
    pub fn forbidden(&self) -> [(WordCategory, &[String]); 3] {
        WordCategory::FORBIDDEN.map(|category| (category, self.words(category)))
    }

    pub fn is_empty(&self) -> bool {
        WordCategory::ALL
            .iter()
            .all(|&category| self.words(category).is_empty())
    }
}
