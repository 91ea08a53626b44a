// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for query execution.
//!
//! Throws arbitrary byte sequences at the search API. Emoji, RTL text, null
//! bytes and combining marks must all produce a bounded, well-ordered result
//! list.

#![no_main]

use std::collections::HashSet;
use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use sieve::testing::{make_doc, IndexBuilder};
use sieve::{DocId, Searcher};

const CORPUS: &[&str] = &[
    "rust ownership and borrowing keep memory safe",
    "async rust uses futures and an executor runtime",
    "café crème brûlée naïve résumé",
    "東京 タワー 日本語 テキスト",
    "search engines rank documents by relevance",
];

fn searcher() -> &'static Searcher {
    static SEARCHER: OnceLock<Searcher> = OnceLock::new();
    SEARCHER.get_or_init(|| {
        let mut builder = IndexBuilder::new();
        for (id, text) in CORPUS.iter().enumerate() {
            builder = builder
                .doc(make_doc(id, text))
                .index_text(id as u32, None, text);
        }
        Searcher::from_bytes(&builder.build()).expect("fuzz corpus decodes")
    })
}

fuzz_target!(|query: &[u8]| {
    let searcher = searcher();
    let query = String::from_utf8_lossy(query);
    // Cap query length to avoid timeouts
    let query: String = query.chars().take(200).collect();

    let results = searcher.search(&query, 10);
    assert!(results.len() <= 10);

    let mut seen = HashSet::new();
    for result in &results {
        assert!(result.doc_id.as_usize() < CORPUS.len());
        assert!(seen.insert(result.doc_id), "duplicate doc in results");
        assert!(result.score.is_finite() && result.score > 0.0);
    }
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));

    // Lower tiers honor exclusion.
    let exclude: HashSet<DocId> = [DocId(0), DocId(2)].into_iter().collect();
    for r in searcher
        .search_tier2_prefix(&query, &exclude, 10)
        .into_iter()
        .chain(searcher.search_tier3_fuzzy(&query, &exclude, 10))
    {
        assert!(!exclude.contains(&r.doc_id));
    }

    let _ = searcher.suggest(&query, 5);
});
