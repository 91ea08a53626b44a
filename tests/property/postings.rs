// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Posting lists decode to exactly what was written, in strictly ascending
//! doc order, whatever the block layout.

use std::collections::BTreeMap;

use proptest::prelude::*;
use sieve::testing::IndexBuilder;
use sieve::{DocId, Searcher};

/// Doc → weight maps, sized to cross several 128-entry blocks.
fn posting_map() -> impl Strategy<Value = BTreeMap<u32, u32>> {
    prop::collection::btree_map(0u32..20_000, 1u32..1_000, 1..1_500)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: decode(encode(list)) is the list, strictly ascending.
    #[test]
    fn prop_postings_roundtrip_ascending(list in posting_map()) {
        let mut builder = IndexBuilder::new();
        for (&doc, &weight) in &list {
            builder = builder.posting("term", doc, weight);
        }
        let searcher = Searcher::from_bytes(&builder.build()).unwrap();
        let id = searcher.vocabulary().lookup("term").unwrap();

        let decoded: Vec<(u32, u32)> = searcher
            .postings()
            .postings_for(id)
            .map(|p| (p.doc_id.get(), p.weight))
            .collect();
        prop_assert!(decoded.windows(2).all(|w| w[0].0 < w[1].0));
        prop_assert_eq!(decoded, list.into_iter().collect::<Vec<_>>());
    }

    /// Property: seek lands on the first posting at or after the target.
    #[test]
    fn prop_seek_matches_linear_scan(
        list in posting_map(),
        targets in prop::collection::vec(0u32..21_000, 1..20),
    ) {
        let mut builder = IndexBuilder::new();
        for (&doc, &weight) in &list {
            builder = builder.posting("term", doc, weight);
        }
        let searcher = Searcher::from_bytes(&builder.build()).unwrap();
        let id = searcher.vocabulary().lookup("term").unwrap();

        let mut targets = targets;
        targets.sort_unstable();
        let mut cursor = searcher.postings().cursor(id);
        for target in targets {
            let expected = list.range(target..).next().map(|(&d, _)| DocId(d));
            prop_assert_eq!(cursor.seek(DocId(target)).map(|p| p.doc_id), expected);
        }
    }
}
