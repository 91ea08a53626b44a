// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: how search results get sorted.
//!
//! Within one layer, score decides (tier dominance is baked into the score),
//! then summed term weight, then doc ID. Across layers only the boosted score
//! and the doc ID take part.

use std::cmp::Ordering;

use crate::types::SearchResult;

/// Order for single-layer results.
///
/// 1. **Score** - descending
/// 2. **Weight** - descending (term frequency)
/// 3. **Doc ID** - ascending, for determinism
pub fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.weight.cmp(&a.weight))
        .then_with(|| a.doc_id.cmp(&b.doc_id))
}

/// Order for merged cross-layer results: boosted score, then doc ID.
pub fn compare_merged(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.doc_id.cmp(&b.doc_id))
}
