// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy search: typo tolerance via edit distance.
//!
//! Two implementations here: a simple bounded Levenshtein for one-off comparisons,
//! and a Levenshtein automaton for bulk matching against the whole vocabulary.
//! The automata are query-independent and ship precomputed in the index.
//!
//! # Section layout
//!
//! ```text
//! version:         u8 (= 2)
//! config:          FuzzyConfig
//! automaton_count: u8
//! automata:        LevenshteinDfa × automaton_count
//! ```
//!
//! An empty section means the default config, with automata built at load.

pub mod automaton;
pub mod config;
mod levenshtein;

use std::collections::HashSet;

use tracing::debug;

pub use automaton::{LevenshteinDfa, QueryMatcher};
pub use config::FuzzyConfig;
pub use levenshtein::*;

use crate::binary::ByteReader;
use crate::error::{Result, SieveError};
use crate::postings::PostingsStore;
use crate::scoring::{DocHit, HitAccumulator};
use crate::types::{DocId, TermId};
use crate::vocabulary::Vocabulary;

/// A vocabulary term accepted by the automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyTerm {
    pub term: TermId,
    pub distance: u8,
}

pub const LEV_DFA_VERSION: u8 = 2;

/// Fuzzy config plus one automaton per distance the config can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatcher {
    config: FuzzyConfig,
    /// Ascending by distance.
    automata: Vec<LevenshteinDfa>,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(FuzzyConfig::default())
    }
}

impl FuzzyMatcher {
    /// Build the automata `config` needs.
    pub fn new(config: FuzzyConfig) -> Self {
        let automata = config.distances().into_iter().map(LevenshteinDfa::build).collect();
        Self { config, automata }
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(LEV_DFA_VERSION);
        self.config.encode(buf);
        buf.push(self.automata.len() as u8);
        for dfa in &self.automata {
            dfa.encode(buf);
        }
    }

    /// Load from the Levenshtein-DFA section.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            debug!("empty lev_dfa section, building default automata");
            return Ok(Self::default());
        }
        let mut reader = ByteReader::new(bytes, "lev_dfa");
        let version = reader.u8()?;
        if version != LEV_DFA_VERSION {
            return Err(reader.corrupt(format!("unknown lev_dfa version {}", version)));
        }
        let config = FuzzyConfig::decode(&mut reader)?;
        let count = reader.u8()?;
        let mut automata: Vec<LevenshteinDfa> = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let dfa = LevenshteinDfa::decode(&mut reader)?;
            if automata
                .last()
                .is_some_and(|prev| prev.max_distance() >= dfa.max_distance())
            {
                return Err(reader.corrupt("automata not ascending by distance"));
            }
            automata.push(dfa);
        }
        if !reader.is_empty() {
            return Err(reader.corrupt("trailing bytes"));
        }

        let matcher = Self { config, automata };
        if let Some(k) = matcher
            .config
            .distances()
            .into_iter()
            .find(|&k| matcher.automaton(k).is_none())
        {
            return Err(SieveError::corrupt(format!(
                "lev_dfa section has no automaton for distance {}",
                k
            )));
        }
        debug!(
            automata = matcher.automata.len(),
            states = matcher.automata.iter().map(LevenshteinDfa::state_count).sum::<usize>(),
            "loaded fuzzy automata"
        );
        Ok(matcher)
    }

    pub fn config(&self) -> &FuzzyConfig {
        &self.config
    }

    pub fn automata(&self) -> &[LevenshteinDfa] {
        &self.automata
    }

    pub fn automaton(&self, max_distance: u8) -> Option<&LevenshteinDfa> {
        self.automata.iter().find(|d| d.max_distance() == max_distance)
    }

    /// Terms within the allowed distance of `query`: closest first, then
    /// most frequent, then alphabetical.
    ///
    /// With `include_exact` false the query term itself (distance 0) is left
    /// out, because the exact tier already covers it. A query outside the
    /// configured length window gets no typo tolerance: it matches only
    /// itself, and only when `include_exact` is set.
    pub fn matching_terms(
        &self,
        vocab: &Vocabulary,
        query: &str,
        include_exact: bool,
    ) -> Vec<FuzzyTerm> {
        let Some(dfa) = self
            .config
            .max_distance(query)
            .and_then(|k| self.automaton(k))
        else {
            return vocab
                .lookup(query)
                .filter(|_| include_exact)
                .map(|term| FuzzyTerm { term, distance: 0 })
                .into_iter()
                .collect();
        };
        let mut terms: Vec<FuzzyTerm> = dfa
            .for_query(query)
            .matches(vocab)
            .into_iter()
            .filter(|&(_, distance)| include_exact || distance > 0)
            .map(|(term, distance)| FuzzyTerm { term, distance })
            .collect();
        terms.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then(vocab.doc_freq(b.term).cmp(&vocab.doc_freq(a.term)))
                .then(a.term.cmp(&b.term))
        });
        terms
    }

    /// Union the postings of every fuzzy match into per-document hits.
    pub fn collect(
        &self,
        vocab: &Vocabulary,
        postings: &PostingsStore,
        query: &str,
        exclude: &HashSet<DocId>,
        include_exact: bool,
    ) -> HitAccumulator {
        let mut acc = HitAccumulator::new();
        for m in self.matching_terms(vocab, query, include_exact) {
            for posting in postings.postings_excluding(m.term, exclude) {
                acc.add(posting, m.term, m.distance);
            }
        }
        acc
    }

    /// Documents holding a term within edit distance of `query`, never
    /// including `exclude`. Closer matches rank first.
    pub fn fuzzy_search(
        &self,
        vocab: &Vocabulary,
        postings: &PostingsStore,
        query: &str,
        exclude: &HashSet<DocId>,
        limit: usize,
    ) -> Vec<DocHit> {
        self.collect(vocab, postings, query, exclude, false)
            .into_ranked(limit)
    }
}
