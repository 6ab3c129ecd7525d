//! End-to-end rounds against the sample taxonomy in `data/`.

mod common;

use std::io::Write;

use clue_linker::{
    ClueError, ClueSession, InMemoryTaxonomy, LinkerConfig, MissingWordPolicy, RecommendationKind,
    SilentObserver, Taxonomy,
};
use common::{approx_eq, round_config, sample_taxonomy, seeded_session};

// ==================== Sample taxonomy ====================

#[test]
fn test_sample_taxonomy_shape() {
    let tax = sample_taxonomy();
    assert_eq!(tax.name(), "codenames-sample");
    assert_eq!(tax.len(), 76);

    let root = tax.senses("root").unwrap();
    let ids: Vec<_> = root.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["root.n.01", "root.n.02"]);

    // multi-word entries resolve through their underscore form
    assert_eq!(tax.first_sense("Loch Ness").unwrap().id, "loch.n.01");
    assert_eq!(tax.first_sense("alps").unwrap().id, "alps.n.01");
}

// ==================== root / sound / field round ====================

#[test]
fn test_root_sound_field_round() {
    let tax = sample_taxonomy();
    let mut session = seeded_session(&tax, "root, sound, field", "note", "pound");

    let added = session.link(&round_config()).unwrap();
    assert_eq!(added, 4);

    let records = session.records();
    let root_field = records
        .iter()
        .find(|r| r.subject_word == "root" && r.comparison_word == "field")
        .unwrap();
    assert_eq!(root_field.ancestor_id(), Some("physical_entity.n.01"));
    assert!(approx_eq(root_field.average_similarity, 19.0 / 45.0));

    let root_sound = records
        .iter()
        .find(|r| r.subject_word == "root" && r.comparison_word == "sound")
        .unwrap();
    assert_eq!(root_sound.subject_sense.id, "root.n.02");
    assert_eq!(root_sound.comparison_sense.id, "sound.n.02");
    assert_eq!(root_sound.ancestor_id(), Some("language_unit.n.01"));
    assert!(approx_eq(root_sound.similarity_to_subject, 10.0 / 12.0));
    assert!(approx_eq(root_sound.similarity_to_comparison, 10.0 / 11.0));

    let recs = session.recommend(0.75).unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].rank, 1);
    assert_eq!(recs[0].clue, "language_unit.n.01");
    assert_eq!(recs[0].linked_words, vec!["sound", "root"]);
    assert_eq!(recs[0].kind, RecommendationKind::Shared);
    assert_eq!(recs[1].rank, 2);
    assert_eq!(recs[1].clue, "paddock");
    assert_eq!(recs[1].linked_words, vec!["field"]);
    assert_eq!(recs[1].kind, RecommendationKind::Fallback);
}

#[test]
fn test_default_limits_give_same_round() {
    let tax = sample_taxonomy();
    let mut tuned = seeded_session(&tax, "root, sound, field", "note", "pound");
    let mut defaults = seeded_session(&tax, "root, sound, field", "note", "pound");

    tuned.link(&round_config()).unwrap();
    defaults.link(&LinkerConfig::default()).unwrap();
    assert_eq!(tuned.records(), defaults.records());
}

#[test]
fn test_assassin_blocks_general_ancestors() {
    let tax = sample_taxonomy();
    let mut session = seeded_session(&tax, "root, sound, field", "note", "pound");
    session.link(&round_config()).unwrap();

    // pound sits under abstraction; entity and abstraction never survive
    for record in session.records() {
        let ancestor = record.ancestor_id();
        assert_ne!(ancestor, Some("entity.n.01"));
        assert_ne!(ancestor, Some("abstraction.n.06"));
    }
}

#[test]
fn test_neutral_word_removes_language_link() {
    let tax = sample_taxonomy();
    let mut session = seeded_session(&tax, "root, sound, field", "note", "pound");
    session.update_words("portion", "neutral", "add").unwrap();
    session.link(&round_config()).unwrap();

    assert_eq!(session.records().len(), 2);
    assert!(session.records().iter().all(|r| r.subject_word != "sound"));

    let recs = session.recommend(0.75).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].clue, "paddock");
}

#[test]
fn test_single_sense_depth() {
    let tax = sample_taxonomy();
    let mut session = seeded_session(&tax, "root, sound, field", "note", "pound");
    let config = LinkerConfig {
        max_depth: 1,
        ..round_config()
    };
    session.link(&config).unwrap();
    assert_eq!(session.records().len(), 2);

    let recs = session.recommend(0.4).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].clue, "physical_entity.n.01");
    assert_eq!(recs[0].linked_words, vec!["field", "root"]);
}

// ==================== full board ====================

#[test]
fn test_full_board_round() {
    let tax = sample_taxonomy();
    let mut session = seeded_session(
        &tax,
        "root, sound, field, bear, loch ness, spike, part, robot, angel",
        "note, princess, tap, alps, row, crown, genius, code",
        "pound",
    );
    let config = LinkerConfig {
        max_depth: 3,
        assassin_limit: 0.2,
        opposition_limit: 0.05,
        neutral_limit: 0.025,
        ..LinkerConfig::default()
    };
    assert_eq!(session.link(&config).unwrap(), 23);

    let recs = session.recommend(0.75).unwrap();
    let clues: Vec<_> = recs.iter().map(|r| r.clue.as_str()).collect();
    assert_eq!(
        clues,
        vec![
            "part.n.01",
            "plant_organ.n.01",
            "language_unit.n.01",
            "region.n.03",
            "location.n.01",
            "automaton",
        ]
    );
    assert_eq!(recs[0].linked_words, vec!["part", "root", "sound"]);
    assert_eq!(recs[4].linked_words, vec!["part", "loch ness"]);
    assert_eq!(recs[5].linked_words, vec!["robot"]);
    let ranks: Vec<_> = recs.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_parallel_full_board_matches_sequential() {
    let tax = sample_taxonomy();
    let link = "root, sound, field, bear, loch ness, spike, part, robot, angel";
    let avoid = "note, princess, tap, alps, row, crown, genius, code";
    let mut sequential = seeded_session(&tax, link, avoid, "pound");
    let mut parallel = seeded_session(&tax, link, avoid, "pound");

    sequential.link(&LinkerConfig::default()).unwrap();
    parallel
        .link(&LinkerConfig {
            parallel: true,
            ..LinkerConfig::default()
        })
        .unwrap();
    assert_eq!(sequential.records(), parallel.records());
}

// ==================== word list edge cases ====================

#[test]
fn test_empty_board() {
    let tax = sample_taxonomy();
    let mut session = ClueSession::new(&tax, &SilentObserver);
    assert_eq!(session.link(&round_config()).unwrap(), 0);
    assert!(session.recommend(0.75).unwrap().is_empty());
}

#[test]
fn test_single_link_word() {
    let tax = sample_taxonomy();
    let mut session = seeded_session(&tax, "root", "note", "pound");
    assert_eq!(session.link(&round_config()).unwrap(), 0);
    assert!(session.recommend(0.75).unwrap().is_empty());
}

#[test]
fn test_comma_list_and_bogus_category() {
    let tax = sample_taxonomy();
    let mut session = ClueSession::new(&tax, &SilentObserver);
    session.update_words("a, b, c", "link", "add").unwrap();
    assert_eq!(session.store().link_words(), &["a", "b", "c"]);

    let before = session.store().clone();
    let err = session.update_words("x", "bogus", "add").unwrap_err();
    assert!(matches!(err, ClueError::InvalidArgument(_)));
    assert_eq!(session.store(), &before);
}

#[test]
fn test_unknown_link_word_aborts_by_default() {
    let tax = sample_taxonomy();
    let mut session = seeded_session(&tax, "root, unicorn, sound", "note", "pound");
    let err = session.link(&round_config()).unwrap_err();
    assert!(matches!(err, ClueError::WordNotFound(ref w) if w == "unicorn"));
    assert!(session.records().is_empty());
}

#[test]
fn test_unknown_words_skipped_on_request() {
    let tax = sample_taxonomy();
    let mut session = seeded_session(&tax, "root, unicorn, sound", "note, gryphon", "pound");
    let config = LinkerConfig {
        missing_word_policy: MissingWordPolicy::Skip,
        ..round_config()
    };
    assert_eq!(session.link(&config).unwrap(), 2);

    let recs = session.recommend(0.75).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].clue, "language_unit.n.01");
}

#[test]
fn test_invalid_limits_rejected() {
    let tax = sample_taxonomy();
    let mut session = seeded_session(&tax, "root, sound", "note", "pound");
    let config = LinkerConfig {
        assassin_limit: 0.05,
        opposition_limit: 0.1,
        ..round_config()
    };
    assert!(matches!(
        session.link(&config),
        Err(ClueError::InvalidArgument(_))
    ));
}

// ==================== loading ====================

#[test]
fn test_load_taxonomy_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(common::SAMPLE_TAXONOMY.as_bytes()).unwrap();

    let tax = InMemoryTaxonomy::load(file.path()).unwrap();
    assert_eq!(tax.len(), sample_taxonomy().len());
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = InMemoryTaxonomy::load(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, ClueError::Io(_)));
}

#[test]
fn test_load_malformed_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{\"concepts\": [").unwrap();
    let err = InMemoryTaxonomy::load(file.path()).unwrap_err();
    assert!(matches!(err, ClueError::Json(_)));
}
