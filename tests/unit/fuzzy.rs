// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy matching configuration carried in the container.

use sieve::binary::Container;
use sieve::testing::IndexBuilder;
use sieve::{FuzzyConfig, FuzzyMatcher, LevenshteinDfa, Searcher, SieveError, Tier};

use super::common::doc_ids;

fn catalog_builder() -> IndexBuilder {
    IndexBuilder::new()
        .posting("cat", 0, 1)
        .posting("configuration", 1, 1)
        .index_text(2, None, "Café Müller")
}

fn catalog(config: Option<FuzzyConfig>) -> Searcher {
    let mut builder = catalog_builder();
    if let Some(config) = config {
        builder = builder.fuzzy_config(config);
    }
    Searcher::from_bytes(&builder.build()).unwrap()
}

#[test]
fn test_default_config_when_section_empty() {
    let s = Searcher::from_bytes(&catalog_builder().without_lev_dfa().build()).unwrap();
    assert_eq!(s.fuzzy_config(), &FuzzyConfig::default());
    assert_eq!(doc_ids(&s.search("ct", 10)), vec![0]);
    assert_eq!(doc_ids(&s.search("konfigurasion", 10)), vec![1]);
}

#[test]
fn test_automata_are_stored_in_the_container() {
    let bytes = catalog_builder().build();
    let container = Container::decode(&bytes).unwrap();
    let stored = FuzzyMatcher::decode(&container.lev_dfa).unwrap();
    assert_eq!(stored, FuzzyMatcher::default());
    let distances: Vec<u8> = stored.automata().iter().map(|d| d.max_distance()).collect();
    assert_eq!(distances, vec![1, 2]);

    // Stored and default automata answer identically.
    let s = Searcher::from_bytes(&bytes).unwrap();
    assert_eq!(doc_ids(&s.search("konfigurasion", 10)), vec![1]);
}

#[test]
fn test_damaged_automaton_rejected() {
    let mut container = Container::decode(&catalog_builder().build()).unwrap();
    // version byte of the section
    container.lev_dfa[0] = 7;
    let err = Searcher::from_bytes(&container.encode()).unwrap_err();
    assert!(matches!(err, SieveError::CorruptIndex(_)));

    let mut container = Container::decode(&catalog_builder().build()).unwrap();
    container.lev_dfa.truncate(container.lev_dfa.len() - 1);
    assert!(Searcher::from_bytes(&container.encode()).is_err());
}

#[test]
fn test_stored_config_is_honored() {
    let strict = FuzzyConfig {
        min_query_len: 3,
        max_query_len: 8,
        thresholds: vec![(3, 1)],
    };
    let s = catalog(Some(strict.clone()));
    assert_eq!(s.fuzzy_config(), &strict);
    // below the minimum length
    assert!(s.search("ct", 10).is_empty());
    // above the maximum length
    assert!(s.search("konfigurasion", 10).is_empty());
    assert_eq!(doc_ids(&s.search("kat", 10)), vec![0]);
}

#[test]
fn test_diacritics_fold_before_matching() {
    let s = catalog(None);
    let exact = s.search("CAFÉ", 10);
    assert_eq!(doc_ids(&exact), vec![2]);
    assert_eq!(exact[0].tier, Tier::Exact);

    let fuzzy = s.search("mueller", 10);
    assert_eq!(doc_ids(&fuzzy), vec![2]);
    assert_eq!(fuzzy[0].tier, Tier::Fuzzy);
    assert_eq!(fuzzy[0].matched_term.as_deref(), Some("muller"));
}

#[test]
fn test_automaton_agrees_with_distance() {
    let dfa = LevenshteinDfa::build(2);
    let kitten = dfa.for_query("kitten");
    assert_eq!(kitten.distance("kitten"), Some(0));
    assert_eq!(kitten.distance("sitten"), Some(1));
    assert_eq!(kitten.distance("sitting"), None);
    assert_eq!(kitten.distance("kit"), None);
    assert_eq!(kitten.distance("kittens"), Some(1));
}

#[test]
fn test_one_automaton_serves_every_query_length() {
    let dfa = LevenshteinDfa::build(2);
    let long = "a".repeat(64);
    let mut typo = long.clone();
    typo.replace_range(30..31, "b");
    typo.push('c');
    assert_eq!(dfa.for_query(&long).distance(&typo), Some(2));
    assert_eq!(dfa.for_query(&long).distance(&long[..61]), None);
    assert_eq!(dfa.for_query("authentication").distance("authentcation"), Some(1));
}
