// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Sorted vocabulary: term → (TermId, document frequency).
//!
//! Terms are stored in byte order, so a term's ID is its rank and every
//! prefix maps to one contiguous ID range found by two binary searches.
//! Exact lookup goes through a hash map (one hash of the term).
//!
//! Prefix enumeration yields terms by descending document frequency, then
//! lexicographically. The ordering is produced lazily from a heap over the
//! prefix range, so taking the top five of a thousand-term range costs
//! O(n + 5 log n) rather than a full sort.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::ops::Range;

use crate::binary::decode_vocabulary;
use crate::error::{Result, SieveError};
use crate::types::TermId;

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    doc_freqs: Vec<u32>,
    lookup: HashMap<String, TermId>,
}

/// One vocabulary entry as seen by enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabEntry<'a> {
    pub term: &'a str,
    pub id: TermId,
    pub doc_freq: u32,
}

impl Vocabulary {
    /// Build from sorted, unique terms and their document frequencies.
    pub fn new(terms: Vec<String>, doc_freqs: Vec<u32>) -> Result<Self> {
        if terms.len() != doc_freqs.len() {
            return Err(SieveError::corrupt(format!(
                "{} terms but {} document frequencies",
                terms.len(),
                doc_freqs.len()
            )));
        }
        if let Some(i) = terms.windows(2).position(|w| w[0] >= w[1]) {
            return Err(SieveError::corrupt(format!(
                "vocabulary not strictly sorted at term {}",
                i + 1
            )));
        }
        let lookup = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), TermId(i as u32)))
            .collect();
        Ok(Self {
            terms,
            doc_freqs,
            lookup,
        })
    }

    /// Decode the vocabulary section. Frequencies come from the postings.
    pub fn decode(bytes: &[u8], term_count: usize, doc_freqs: Vec<u32>) -> Result<Self> {
        Self::new(decode_vocabulary(bytes, term_count)?, doc_freqs)
    }

    /// Exact match.
    pub fn lookup(&self, term: &str) -> Option<TermId> {
        self.lookup.get(term).copied()
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get(id.as_usize()).map(String::as_str)
    }

    pub fn doc_freq(&self, id: TermId) -> u32 {
        self.doc_freqs.get(id.as_usize()).copied().unwrap_or(0)
    }

    pub fn entry(&self, id: TermId) -> Option<VocabEntry<'_>> {
        Some(VocabEntry {
            term: self.term(id)?,
            id,
            doc_freq: self.doc_freq(id),
        })
    }

    pub fn size(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// All terms in ID order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Contiguous ID range of terms starting with `prefix`.
    pub fn prefix_range(&self, prefix: &str) -> Range<usize> {
        let start = self.terms.partition_point(|t| t.as_str() < prefix);
        let len = self.terms[start..].partition_point(|t| t.starts_with(prefix));
        start..start + len
    }

    /// Terms starting with `prefix`, most frequent first, ties alphabetical.
    pub fn enumerate_prefix(&self, prefix: &str) -> PrefixTerms<'_> {
        let heap = self
            .prefix_range(prefix)
            .map(|i| {
                (
                    self.doc_freqs[i],
                    Reverse(self.terms[i].as_str()),
                    TermId(i as u32),
                )
            })
            .collect();
        PrefixTerms { heap }
    }
}

/// Lazy frequency-ordered enumeration returned by [`Vocabulary::enumerate_prefix`].
#[derive(Debug, Clone)]
pub struct PrefixTerms<'a> {
    heap: BinaryHeap<(u32, Reverse<&'a str>, TermId)>,
}

impl<'a> Iterator for PrefixTerms<'a> {
    type Item = VocabEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.heap
            .pop()
            .map(|(doc_freq, Reverse(term), id)| VocabEntry { term, id, doc_freq })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}
