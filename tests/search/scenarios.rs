// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! End-to-end scenarios over the cat/cats progressive fixture.

use std::collections::HashSet;

use sieve::{LayerName, ProgressiveIndex, SearchOptions, Searcher, SieveError, Tier};

use super::common::{cat_index, cat_manifest, cat_titles_layer, doc_ids};

#[test]
fn test_title_exact_and_content_prefix() {
    let index = cat_index(true);
    let results = index.search("cat", &SearchOptions::default());

    assert_eq!(doc_ids(&results), vec![1, 2]);

    assert_eq!(results[0].tier, Tier::Exact);
    assert_eq!(results[0].source_layer, Some(LayerName::Titles));
    assert_eq!(results[0].score, 10025.0);
    assert_eq!(results[0].matched_term.as_deref(), Some("cat"));

    assert_eq!(results[1].tier, Tier::Prefix);
    assert_eq!(results[1].source_layer, Some(LayerName::Content));
    assert_eq!(results[1].matched_term.as_deref(), Some("cats"));
}

#[test]
fn test_titles_only_finds_title_match() {
    let index = cat_index(false);
    let results = index.search("cat", &SearchOptions::default());
    assert_eq!(doc_ids(&results), vec![1]);
}

#[test]
fn test_fuzzy_scores_below_exact() {
    let index = cat_index(false);
    let options = SearchOptions::default();

    let fuzzy = index.search_fuzzy("kat", &HashSet::new(), &options);
    assert_eq!(doc_ids(&fuzzy), vec![1]);
    assert_eq!(fuzzy[0].tier, Tier::Fuzzy);

    let exact = index.search_exact("cat", &options);
    assert_eq!(doc_ids(&exact), vec![1]);
    assert!(fuzzy[0].score < exact[0].score);
}

#[test]
fn test_wrong_magic_rejected() {
    let mut bytes = cat_titles_layer();
    bytes[..4].copy_from_slice(b"NOPE");

    assert!(matches!(
        Searcher::from_bytes(&bytes),
        Err(SieveError::InvalidMagic { .. })
    ));

    let mut index = ProgressiveIndex::new(cat_manifest());
    assert!(matches!(
        index.load_layer("titles", &bytes),
        Err(SieveError::InvalidMagic { .. })
    ));
    assert!(!index.has_layer("titles"));
}

#[test]
fn test_garbage_input_never_panics() {
    for len in 0..64 {
        let bytes: Vec<u8> = (0..len).map(|i| (i * 37 % 251) as u8).collect();
        assert!(Searcher::from_bytes(&bytes).is_err());
    }
}

#[test]
fn test_loading_same_layer_twice() {
    let once = cat_index(false);
    let mut twice = cat_index(false);
    twice.load_layer("titles", &cat_titles_layer()).unwrap();

    assert_eq!(twice.loaded_layers(), vec![LayerName::Titles]);
    let options = SearchOptions::default();
    assert_eq!(once.search("cat", &options), twice.search("cat", &options));
}

#[test]
fn test_no_layers_loaded() {
    let index = ProgressiveIndex::new(cat_manifest());
    assert!(index.search("cat", &SearchOptions::default()).is_empty());
    assert!(index.suggest("ca", 5).is_empty());
    assert!(!index.is_fully_loaded());
    assert_eq!(index.vocab_size(), 0);
}
