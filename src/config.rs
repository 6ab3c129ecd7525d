use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ClueError, Result};
use crate::sanitize::is_unit_interval;
use crate::types::{
    LinkParams, MissingWordPolicy, SimilarityLimits, DEFAULT_ASSASSIN_LIMIT, DEFAULT_MAX_DEPTH,
    DEFAULT_MIN_SIMILARITY, DEFAULT_NEUTRAL_LIMIT, DEFAULT_OPPOSITION_LIMIT,
};

const DEFAULT_TAXONOMY_PATH: &str = "./data/codenames_taxonomy.json";
const DEFAULT_LINK_WORDS: &str = "root, sound, field";
const DEFAULT_AVOID_WORDS: &str = "note";
const DEFAULT_ASSASSIN_WORDS: &str = "pound";

/// Linking and recommendation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerConfig {
    pub max_depth: usize,
    pub assassin_limit: f64,
    pub opposition_limit: f64,
    pub neutral_limit: f64,
    pub min_similarity: f64,
    pub missing_word_policy: MissingWordPolicy,
    /// Link subject words on the rayon pool
    pub parallel: bool,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            assassin_limit: DEFAULT_ASSASSIN_LIMIT,
            opposition_limit: DEFAULT_OPPOSITION_LIMIT,
            neutral_limit: DEFAULT_NEUTRAL_LIMIT,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            missing_word_policy: MissingWordPolicy::Abort,
            parallel: false,
        }
    }
}

impl LinkerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; absent or unparsable values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_depth: parse_var(&lookup, "CLUE_MAX_DEPTH").unwrap_or(defaults.max_depth),
            assassin_limit: parse_var(&lookup, "CLUE_ASSASSIN_LIMIT")
                .unwrap_or(defaults.assassin_limit),
            opposition_limit: parse_var(&lookup, "CLUE_OPPOSITION_LIMIT")
                .unwrap_or(defaults.opposition_limit),
            neutral_limit: parse_var(&lookup, "CLUE_NEUTRAL_LIMIT")
                .unwrap_or(defaults.neutral_limit),
            min_similarity: parse_var(&lookup, "CLUE_MIN_SIMILARITY")
                .unwrap_or(defaults.min_similarity),
            missing_word_policy: parse_var(&lookup, "CLUE_MISSING_WORDS")
                .unwrap_or(defaults.missing_word_policy),
            parallel: bool_var(&lookup, "CLUE_PARALLEL", defaults.parallel),
        }
    }

    pub fn limits(&self) -> SimilarityLimits {
        SimilarityLimits::new(self.assassin_limit, self.opposition_limit, self.neutral_limit)
    }

    pub fn link_params(&self) -> LinkParams {
        LinkParams {
            max_depth: self.max_depth,
            limits: self.limits(),
            missing_word_policy: self.missing_word_policy,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ClueError::InvalidArgument(
                "max_depth should be at least 1".to_string(),
            ));
        }
        self.limits().validate()?;
        if !is_unit_interval(self.min_similarity) {
            return Err(ClueError::InvalidArgument(format!(
                "min_similarity should be within [0, 1], got {}",
                self.min_similarity
            )));
        }
        Ok(())
    }
}

/// Settings read by the command-line driver
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub taxonomy_path: PathBuf,
    pub link_words: String,
    pub avoid_words: String,
    pub neutral_words: String,
    pub assassin_words: String,
    pub log_level: String,
    pub linker: LinkerConfig,
}

impl DriverConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let taxonomy_path = string_var(&lookup, "CLUE_TAXONOMY_PATH")
            .unwrap_or_else(|| DEFAULT_TAXONOMY_PATH.to_string());

        Self {
            taxonomy_path: PathBuf::from(taxonomy_path),
            link_words: string_var(&lookup, "CLUE_LINK_WORDS")
                .unwrap_or_else(|| DEFAULT_LINK_WORDS.to_string()),
            avoid_words: string_var(&lookup, "CLUE_AVOID_WORDS")
                .unwrap_or_else(|| DEFAULT_AVOID_WORDS.to_string()),
            neutral_words: string_var(&lookup, "CLUE_NEUTRAL_WORDS").unwrap_or_default(),
            assassin_words: string_var(&lookup, "CLUE_ASSASSIN_WORDS")
                .unwrap_or_else(|| DEFAULT_ASSASSIN_WORDS.to_string()),
            log_level: string_var(&lookup, "RUST_LOG").unwrap_or_else(|| "info".to_string()),
            linker: LinkerConfig::from_lookup(lookup),
        }
    }
}

fn string_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    string_var(lookup, key)?.trim().parse().ok()
}

fn bool_var<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match string_var(lookup, key).as_deref().map(str::trim) {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}
