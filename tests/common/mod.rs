#![allow(dead_code)]

use clue_linker::{ClueSession, InMemoryTaxonomy, LinkerConfig, SilentObserver};

pub const SAMPLE_TAXONOMY: &str = include_str!("../../data/codenames_taxonomy.json");

pub fn sample_taxonomy() -> InMemoryTaxonomy {
    InMemoryTaxonomy::from_json_str(SAMPLE_TAXONOMY).expect("sample taxonomy parses")
}

/// Limits used by the root/sound/field round
pub fn round_config() -> LinkerConfig {
    LinkerConfig {
        max_depth: 2,
        assassin_limit: 0.2,
        opposition_limit: 0.1,
        neutral_limit: 0.05,
        ..LinkerConfig::default()
    }
}

/// Session seeded with link, avoid and assassin words
pub fn seeded_session<'t>(
    taxonomy: &'t InMemoryTaxonomy,
    link: &str,
    avoid: &str,
    assassin: &str,
) -> ClueSession<'t> {
    let mut session = ClueSession::new(taxonomy, &SilentObserver);
    session.update_words(link, "link", "add").unwrap();
    if !avoid.is_empty() {
        session.update_words(avoid, "avoid", "add").unwrap();
    }
    if !assassin.is_empty() {
        session.update_words(assassin, "assassin", "add").unwrap();
    }
    session
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
