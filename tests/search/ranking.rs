// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ranking and tie-breaking.

use sieve::testing::IndexBuilder;
use sieve::{Searcher, Tier};

use super::common::{corpus_searcher, doc_ids};

fn searcher(builder: IndexBuilder) -> Searcher {
    Searcher::from_bytes(&builder.build()).unwrap()
}

#[test]
fn test_heavier_posting_ranks_first() {
    let s = searcher(IndexBuilder::new().posting("rust", 0, 1).posting("rust", 1, 5));
    let results = s.search("rust", 10);
    assert_eq!(doc_ids(&results), vec![1, 0]);
    assert!(results[0].score > results[1].score);
}

#[test]
fn test_equal_scores_order_by_doc_id() {
    let s = searcher(
        IndexBuilder::new()
            .posting("rust", 7, 2)
            .posting("rust", 3, 2)
            .posting("rust", 5, 2),
    );
    assert_eq!(doc_ids(&s.search("rust", 10)), vec![3, 5, 7]);
}

#[test]
fn test_weight_never_crosses_tiers() {
    let s = searcher(
        IndexBuilder::new()
            .posting("rust", 0, 1)
            .posting("rustacean", 1, 1_000_000),
    );
    let results = s.search("rust", 10);
    assert_eq!(doc_ids(&results), vec![0, 1]);
    assert_eq!(results[0].tier, Tier::Exact);
    assert_eq!(results[1].tier, Tier::Prefix);
    assert!(results[1].score < 51.0);
}

#[test]
fn test_closer_fuzzy_match_ranks_first() {
    let s = searcher(
        IndexBuilder::new()
            .posting("sitten", 0, 1)
            .posting("sittin", 1, 1),
    );
    let results = s.search("kitten", 10);
    assert_eq!(doc_ids(&results), vec![0, 1]);
    assert!(results.iter().all(|r| r.tier == Tier::Fuzzy));
    assert!(results[0].score > 30.0 && results[0].score < 31.0);
    assert!(results[1].score > 15.0 && results[1].score < 16.0);
}

#[test]
fn test_multi_term_scores_add_up() {
    let s = corpus_searcher();
    let single = s.search_tier1_exact("safety", 10);
    let both = s.search_tier1_exact("memory safety", 10);
    assert_eq!(both[0].score, single[0].score * 2.0);
}

#[test]
fn test_repeated_searches_agree() {
    let a = corpus_searcher();
    let b = corpus_searcher();
    for query in ["rust", "mem", "generis", "and use", "borrow"] {
        assert_eq!(a.search(query, 10), b.search(query, 10), "{}", query);
        assert_eq!(a.search(query, 10), a.search(query, 10), "{}", query);
    }
}
