// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The three-tier search core: exact → prefix → fuzzy.
//!
//! Tier 1 (exact) is a hash lookup plus one posting list. Tier 2 (prefix)
//! finds every term extending the query with two binary searches over the
//! suffix array. Tier 3 (fuzzy) runs a Levenshtein automaton over the
//! vocabulary. "ryst" finds "rust".
//!
//! Queries with several terms use AND semantics inside each tier: a document
//! must match every query term, and its score is the sum of the per-term
//! scores. Later tiers never return documents an earlier tier already found.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::normalize::tokenize;
use crate::options::{effective_limit, SearchOptions};
use crate::scoring::ranking::compare_results;
use crate::scoring::{term_score, DocHit};
use crate::types::{DocId, SearchResult, TermId, Tier};

use super::Searcher;

/// One document's combined match before it is resolved for display.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    doc_id: DocId,
    score: f64,
    weight: u32,
    term: TermId,
    section_idx: u32,
}

impl Candidate {
    fn from_hit(tier: Tier, hit: &DocHit) -> Self {
        Self {
            doc_id: hit.doc_id,
            score: term_score(tier, hit.distance, hit.weight),
            weight: hit.weight,
            term: hit.term,
            section_idx: hit.section_idx,
        }
    }
}

/// AND-combine per-query-term hit maps: keep documents every term hit, sum
/// their scores and weights, and report the heaviest term's section.
fn combine(tier: Tier, per_term: &[HashMap<DocId, DocHit>]) -> Vec<Candidate> {
    let Some(smallest) = per_term.iter().min_by_key(|m| m.len()) else {
        return Vec::new();
    };
    smallest
        .keys()
        .filter_map(|doc| {
            let hits: Vec<&DocHit> = per_term.iter().map(|m| m.get(doc)).collect::<Option<_>>()?;
            let best = hits
                .iter()
                .max_by(|a, b| a.weight.cmp(&b.weight).then(b.term.cmp(&a.term)))?;
            Some(Candidate {
                doc_id: *doc,
                score: hits.iter().map(|h| term_score(tier, h.distance, h.weight)).sum(),
                weight: hits.iter().fold(0u32, |acc, h| acc.saturating_add(h.weight)),
                term: best.term,
                section_idx: best.section_idx,
            })
        })
        .collect()
}

impl Searcher {
    /// All tiers in order, default options.
    ///
    /// A `limit` of 0 means the default of 10.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        self.search_with(query, &SearchOptions::default().with_limit(limit))
    }

    /// Exact, then prefix and fuzzy as enabled by `options`. Results are the
    /// union of the tiers, best first, at most `options.limit` long.
    pub fn search_with(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let limit = options.effective_limit();
        let mut results = self.search_tier1_exact(query, limit);
        let mut seen: HashSet<DocId> = results.iter().map(|r| r.doc_id).collect();

        // A lower tier can only fill slots the higher tiers left open.
        if options.prefix && results.len() < limit {
            let prefix = self.search_tier2_prefix(query, &seen, limit - results.len());
            seen.extend(prefix.iter().map(|r| r.doc_id));
            results.extend(prefix);
        }
        if options.fuzzy && results.len() < limit {
            let fuzzy = self.search_tier3_fuzzy(query, &seen, limit - results.len());
            results.extend(fuzzy);
        }

        results.sort_by(compare_results);
        results.truncate(limit);
        results
    }

    /// Tier 1: documents containing every query term verbatim.
    pub fn search_tier1_exact(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let terms = tokenize(query);
        let Some(ids) = terms
            .iter()
            .map(|t| self.vocabulary.lookup(t))
            .collect::<Option<Vec<TermId>>>()
        else {
            trace!(tier = 1, hits = 0, "exact tier: term not in vocabulary");
            return Vec::new();
        };

        let candidates: Vec<Candidate> = match ids.as_slice() {
            [] => Vec::new(),
            [term] => self
                .postings
                .postings_for(*term)
                .map(|p| Candidate::from_hit(Tier::Exact, &DocHit::new(p, *term, 0)))
                .collect(),
            _ => self
                .postings
                .intersect(&ids)
                .into_iter()
                .filter_map(|(doc_id, row)| {
                    let (best_term, best) = ids
                        .iter()
                        .zip(&row)
                        .max_by(|(ta, a), (tb, b)| a.weight.cmp(&b.weight).then(tb.cmp(ta)))?;
                    Some(Candidate {
                        doc_id,
                        score: row.iter().map(|p| term_score(Tier::Exact, 0, p.weight)).sum(),
                        weight: row.iter().fold(0u32, |acc, p| acc.saturating_add(p.weight)),
                        term: *best_term,
                        section_idx: best.section_idx,
                    })
                })
                .collect(),
        };

        let results = self.finish(Tier::Exact, candidates, limit);
        trace!(tier = 1, hits = results.len(), "exact tier");
        results
    }

    /// Tier 2: documents where every query term is a prefix of some indexed
    /// term, skipping `exclude`.
    pub fn search_tier2_prefix(
        &self,
        query: &str,
        exclude: &HashSet<DocId>,
        limit: usize,
    ) -> Vec<SearchResult> {
        let terms = tokenize(query);
        let per_term: Vec<HashMap<DocId, DocHit>> = terms
            .iter()
            .map(|t| {
                self.suffix
                    .collect_prefix(&self.vocabulary, &self.postings, t, exclude)
                    .into_map()
            })
            .collect();
        let results = self.finish(Tier::Prefix, combine(Tier::Prefix, &per_term), limit);
        trace!(tier = 2, hits = results.len(), "prefix tier");
        results
    }

    /// Tier 3: documents where every query term is within a small edit
    /// distance of some indexed term, skipping `exclude`.
    ///
    /// For a single-term query the term itself is not a fuzzy match (tier 1
    /// owns it). In multi-term queries one term may match exactly while
    /// another is misspelled, and a term outside the fuzzy length window
    /// must match exactly.
    pub fn search_tier3_fuzzy(
        &self,
        query: &str,
        exclude: &HashSet<DocId>,
        limit: usize,
    ) -> Vec<SearchResult> {
        let terms = tokenize(query);
        let include_exact = terms.len() > 1;
        let per_term: Vec<HashMap<DocId, DocHit>> = terms
            .iter()
            .map(|t| {
                self.fuzzy
                    .collect(&self.vocabulary, &self.postings, t, exclude, include_exact)
                    .into_map()
            })
            .collect();
        let results = self.finish(Tier::Fuzzy, combine(Tier::Fuzzy, &per_term), limit);
        trace!(tier = 3, hits = results.len(), "fuzzy tier");
        results
    }

    /// Rank, truncate, then resolve only the survivors.
    fn finish(&self, tier: Tier, candidates: Vec<Candidate>, limit: usize) -> Vec<SearchResult> {
        let mut results: Vec<(SearchResult, Candidate)> = candidates
            .into_iter()
            .map(|c| {
                let result = SearchResult {
                    doc_id: c.doc_id,
                    score: c.score,
                    tier,
                    weight: c.weight,
                    source_layer: None,
                    matched_layers: Vec::new(),
                    matched_term: None,
                    section_id: None,
                    snippet: None,
                };
                (result, c)
            })
            .collect();
        let limit = effective_limit(limit);
        if results.len() > limit {
            results.select_nth_unstable_by(limit - 1, |a, b| compare_results(&a.0, &b.0));
            results.truncate(limit);
        }
        results.sort_by(|a, b| compare_results(&a.0, &b.0));

        results
            .into_iter()
            .map(|(mut result, c)| {
                result.matched_term = self.vocabulary.term(c.term).map(str::to_string);
                result.section_id = c
                    .section_idx
                    .checked_sub(1)
                    .and_then(|i| self.section_table.get(i as usize))
                    .cloned();
                result.snippet = self
                    .documents
                    .snippet(c.doc_id, result.section_id.as_deref());
                result
            })
            .collect()
    }
}
