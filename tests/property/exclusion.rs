// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tier exclusion and result-shape invariants over random corpora.

use std::collections::HashSet;

use proptest::prelude::*;
use sieve::testing::IndexBuilder;
use sieve::{DocId, SearchOptions, Searcher, Tier};

use super::common::assert_unique_docs;

/// Small alphabet so prefixes and near-misses are common.
fn word() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-e]{2,6}").unwrap()
}

fn corpus() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(word(), 1..8), 1..12)
}

fn searcher(docs: &[Vec<String>]) -> Searcher {
    let mut builder = IndexBuilder::new();
    for (id, words) in docs.iter().enumerate() {
        builder = builder.index_text(id as u32, None, &words.join(" "));
    }
    Searcher::from_bytes(&builder.build()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: tiers 2 and 3 never return an excluded document.
    #[test]
    fn prop_lower_tiers_honor_exclusion(
        docs in corpus(),
        query in "[a-e]{1,5}",
        excluded in prop::collection::vec(0u32..12, 0..6),
    ) {
        let s = searcher(&docs);
        let exclude: HashSet<DocId> = excluded.into_iter().map(DocId).collect();

        for r in s.search_tier2_prefix(&query, &exclude, 50) {
            prop_assert!(!exclude.contains(&r.doc_id));
            prop_assert_eq!(r.tier, Tier::Prefix);
        }
        for r in s.search_tier3_fuzzy(&query, &exclude, 50) {
            prop_assert!(!exclude.contains(&r.doc_id));
            prop_assert_eq!(r.tier, Tier::Fuzzy);
        }
    }

    /// Property: every exact hit really contains every query term.
    #[test]
    fn prop_exact_hits_contain_all_terms(
        docs in corpus(),
        query in prop::collection::vec(word(), 1..3),
    ) {
        let s = searcher(&docs);
        for r in s.search_tier1_exact(&query.join(" "), 50) {
            let words: HashSet<&str> = docs[r.doc_id.as_usize()].iter().map(String::as_str).collect();
            prop_assert!(query.iter().all(|q| words.contains(q.as_str())));
        }
    }

    /// Property: results are unique, within the limit, sorted by score, and
    /// no document appears at a lower tier than one that found it earlier.
    #[test]
    fn prop_search_result_shape(
        docs in corpus(),
        query in "[a-e]{1,6}( [a-e]{2,4})?",
        limit in 0usize..15,
    ) {
        let s = searcher(&docs);
        let results = s.search_with(&query, &SearchOptions::default().with_limit(limit));

        assert_unique_docs(&results);
        let max_results = if limit == 0 { 10 } else { limit };
        prop_assert!(results.len() <= max_results);
        prop_assert!(results.windows(2).all(|w| w[0].score >= w[1].score));

        let exact: HashSet<DocId> = s
            .search_tier1_exact(&query, 100)
            .iter()
            .map(|r| r.doc_id)
            .collect();
        for r in &results {
            if exact.contains(&r.doc_id) {
                prop_assert_eq!(r.tier, Tier::Exact);
            }
        }
    }
}
