// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind search ranking.
//!
//! Tier dominates weight. An exact match with no weight at all still beats a
//! prefix match with the heaviest possible weight, and a prefix match beats any
//! fuzzy match. Weight (the posting's term frequency) only orders results
//! inside a tier.
//!
//! # Key Invariant: Tier Dominance
//!
//! ```text
//! EXACT                > PREFIX + MAX_WEIGHT_BONUS     (100 > 50.5)
//! PREFIX               > FUZZY_D1 + MAX_WEIGHT_BONUS   (50  > 30.5)
//! FUZZY_D1             > FUZZY_D2 + MAX_WEIGHT_BONUS   (30  > 15.5)
//! ```
//!
//! Multi-term queries sum one term score per query term, so the inequalities
//! hold term by term.

use std::collections::HashMap;

use crate::types::{DocId, Posting, TermId, Tier};

/// Base score for a term found verbatim in the vocabulary.
pub const EXACT_SCORE: f64 = 100.0;

/// Base score for a term that extends the query term.
pub const PREFIX_SCORE: f64 = 50.0;

pub const FUZZY_D1_SCORE: f64 = 30.0;

pub const FUZZY_D2_SCORE: f64 = 15.0;

/// Upper bound (exclusive) of the weight bonus; smaller than every tier gap.
pub const MAX_WEIGHT_BONUS: f64 = 0.5;

/// Saturating bonus in `[0, MAX_WEIGHT_BONUS)` for a summed posting weight.
pub fn weight_bonus(weight: u32) -> f64 {
    let w = f64::from(weight);
    MAX_WEIGHT_BONUS * w / (w + 1.0)
}

/// Base score for a tier. Distance only matters for fuzzy matches; a fuzzy
/// term at distance 0 (possible in multi-term queries) scores as distance 1.
pub fn tier_base(tier: Tier, distance: u8) -> f64 {
    match (tier, distance) {
        (Tier::Exact, _) => EXACT_SCORE,
        (Tier::Prefix, _) => PREFIX_SCORE,
        (Tier::Fuzzy, 0 | 1) => FUZZY_D1_SCORE,
        (Tier::Fuzzy, _) => FUZZY_D2_SCORE,
    }
}

/// Score contributed by one query term.
pub fn term_score(tier: Tier, distance: u8, weight: u32) -> f64 {
    tier_base(tier, distance) + weight_bonus(weight)
}

/// One document's match for one query term within a tier.
///
/// `weight` sums over every vocabulary term that matched; `term`,
/// `section_idx` and `distance` come from the best of them (closest, then
/// heaviest posting).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocHit {
    pub doc_id: DocId,
    pub weight: u32,
    pub distance: u8,
    pub term: TermId,
    pub section_idx: u32,
    best_weight: u32,
}

impl DocHit {
    pub fn new(posting: Posting, term: TermId, distance: u8) -> Self {
        Self {
            doc_id: posting.doc_id,
            weight: posting.weight,
            distance,
            term,
            section_idx: posting.section_idx,
            best_weight: posting.weight,
        }
    }
}

/// Unions postings of several vocabulary terms into per-document hits.
#[derive(Debug, Default)]
pub struct HitAccumulator {
    hits: HashMap<DocId, DocHit>,
}

impl HitAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, posting: Posting, term: TermId, distance: u8) {
        self.hits
            .entry(posting.doc_id)
            .and_modify(|hit| {
                hit.weight = hit.weight.saturating_add(posting.weight);
                let better = (distance, std::cmp::Reverse(posting.weight))
                    < (hit.distance, std::cmp::Reverse(hit.best_weight));
                if better {
                    hit.distance = distance;
                    hit.term = term;
                    hit.section_idx = posting.section_idx;
                    hit.best_weight = posting.weight;
                }
            })
            .or_insert_with(|| DocHit::new(posting, term, distance));
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn into_map(self) -> HashMap<DocId, DocHit> {
        self.hits
    }

    /// Closest distance first, then summed weight, then doc ID.
    ///
    /// Selects the top `limit` in linear time and sorts only those.
    pub fn into_ranked(self, limit: usize) -> Vec<DocHit> {
        let rank = |a: &DocHit, b: &DocHit| {
            a.distance
                .cmp(&b.distance)
                .then(b.weight.cmp(&a.weight))
                .then(a.doc_id.cmp(&b.doc_id))
        };
        let mut hits: Vec<DocHit> = self.hits.into_values().collect();
        if limit == 0 {
            return Vec::new();
        }
        if hits.len() > limit {
            hits.select_nth_unstable_by(limit - 1, rank);
            hits.truncate(limit);
        }
        hits.sort_by(rank);
        hits
    }
}
