// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The automaton accepts exactly the terms within the edit-distance bound.

use std::collections::BTreeSet;

use proptest::prelude::*;
use sieve::fuzzy::bounded_distance;
use sieve::{FuzzyMatcher, LevenshteinDfa, Vocabulary};

fn word() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-dé]{0,8}").unwrap()
}

fn vocabulary(words: BTreeSet<String>) -> Vocabulary {
    let freqs = vec![1; words.len()];
    Vocabulary::new(words.into_iter().collect(), freqs).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: DFA distance equals the bounded DP distance.
    #[test]
    fn prop_dfa_matches_dynamic_programming(
        query in word(),
        input in word(),
        k in 0u8..=2,
    ) {
        let dfa = LevenshteinDfa::build(k);
        prop_assert_eq!(dfa.for_query(&query).distance(&input), bounded_distance(&query, &input, k));
    }

    /// Property: vocabulary matching is sound and complete.
    #[test]
    fn prop_vocabulary_matches_sound_and_complete(
        query in word(),
        words in prop::collection::btree_set(word(), 1..40),
        k in 1u8..=2,
    ) {
        let expected: BTreeSet<(String, u8)> = words
            .iter()
            .filter_map(|w| bounded_distance(&query, w, k).map(|d| (w.clone(), d)))
            .collect();

        let vocab = vocabulary(words);
        let dfa = LevenshteinDfa::build(k);
        let found: BTreeSet<(String, u8)> = dfa
            .for_query(&query)
            .matches(&vocab)
            .into_iter()
            .map(|(id, d)| (vocab.term(id).unwrap().to_string(), d))
            .collect();
        prop_assert_eq!(found, expected);
    }

    /// Property: the matcher never reports a term at distance 0 unless asked,
    /// and lists closer terms first.
    #[test]
    fn prop_matcher_orders_by_distance(
        query in "[a-d]{2,6}",
        words in prop::collection::btree_set(word(), 1..40),
    ) {
        let vocab = vocabulary(words);
        let matcher = FuzzyMatcher::default();

        let without = matcher.matching_terms(&vocab, &query, false);
        prop_assert!(without.iter().all(|m| m.distance > 0));
        prop_assert!(without.windows(2).all(|w| w[0].distance <= w[1].distance));

        let with = matcher.matching_terms(&vocab, &query, true);
        let exact_present = vocab.lookup(&query).is_some();
        prop_assert_eq!(with.len(), without.len() + usize::from(exact_present));
    }
}
