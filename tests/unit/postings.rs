// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Long posting lists: block boundaries, skip lists and intersection.

use std::collections::HashSet;

use sieve::binary::BLOCK_SIZE;
use sieve::testing::IndexBuilder;
use sieve::{DocId, Searcher, TermId};

use super::common::doc_ids;

const DOCS: u32 = 2000;

fn long_lists() -> Searcher {
    let mut builder = IndexBuilder::new();
    for d in 0..DOCS {
        builder = builder.posting("common", d, 1 + d % 7);
        if d % 3 == 0 {
            builder = builder.posting("third", d, 1);
        }
    }
    for d in [5, 1500, 1999] {
        builder = builder.posting("rare", d, 1);
    }
    Searcher::from_bytes(&builder.build()).unwrap()
}

fn term(searcher: &Searcher, t: &str) -> TermId {
    searcher.vocabulary().lookup(t).unwrap()
}

#[test]
fn test_full_list_decodes_in_order() {
    let s = long_lists();
    let common = term(&s, "common");
    assert!(s.postings().has_skip_list(common));
    assert_eq!(s.postings().doc_freq(common), DOCS);

    let docs: Vec<u32> = s.postings().postings_for(common).map(|p| p.doc_id.get()).collect();
    assert_eq!(docs, (0..DOCS).collect::<Vec<_>>());
    let weights: Vec<u32> = s.postings().postings_for(common).map(|p| p.weight).collect();
    assert!(weights.iter().enumerate().all(|(d, &w)| w == 1 + d as u32 % 7));
}

#[test]
fn test_short_list_has_no_skip_list() {
    let s = long_lists();
    assert!(!s.postings().has_skip_list(term(&s, "rare")));
}

#[test]
fn test_seek_across_blocks() {
    let s = long_lists();
    let mut cursor = s.postings().cursor(term(&s, "third"));
    let target = (BLOCK_SIZE as u32) * 9 + 1;
    let found = cursor.seek(DocId(target)).unwrap();
    assert_eq!(found.doc_id.get(), target.div_ceil(3) * 3);
    // never moves backwards
    assert_eq!(cursor.seek(DocId(0)).unwrap().doc_id, found.doc_id);
    assert!(cursor.seek(DocId(DOCS)).is_none());
}

#[test]
fn test_intersect_rare_and_common() {
    let s = long_lists();
    // heavier "common" postings rank first
    assert_eq!(doc_ids(&s.search_tier1_exact("common rare", 10)), vec![5, 1999, 1500]);
    assert_eq!(doc_ids(&s.search_tier1_exact("third rare", 10)), vec![1500]);

    let ids = [term(&s, "common"), term(&s, "third")];
    let both = s.postings().intersect(&ids);
    assert_eq!(both.len(), (DOCS as usize).div_ceil(3));
    assert!(both.iter().all(|(d, row)| d.get() % 3 == 0 && row.len() == 2));
}

#[test]
fn test_exclusion_across_blocks() {
    let s = long_lists();
    let exclude: HashSet<DocId> = (0..DOCS).filter(|d| d % 2 == 0).map(DocId).collect();
    let kept: Vec<u32> = s
        .postings()
        .postings_excluding(term(&s, "common"), &exclude)
        .map(|p| p.doc_id.get())
        .collect();
    assert_eq!(kept, (0..DOCS).filter(|d| d % 2 == 1).collect::<Vec<_>>());
}

#[test]
fn test_limit_keeps_best_weights() {
    let s = long_lists();
    let results = s.search("common", 5);
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|r| r.weight == 7));
    assert_eq!(doc_ids(&results), vec![6, 13, 20, 27, 34]);
}
