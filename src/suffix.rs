// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Suffix array over the vocabulary, for prefix expansion.
//!
//! Each entry `(term, offset)` names the suffix `vocabulary[term][offset..]`,
//! and entries are sorted by that suffix. All suffixes starting with a pattern
//! form one contiguous run, found with two binary searches: O(log k) for a
//! k-entry array. Prefix queries keep only the entries at offset 0.
//!
//! ```text
//! Vocabulary: ["cat", "cats"]
//! Suffixes:   at  ats  cat  cats  s  t  ts
//! Prefix "ca" → run [cat, cats] → terms {0, 1}
//! ```

use std::collections::HashSet;
use std::ops::Range;

use tracing::warn;

use crate::binary::decode_suffix_array;
use crate::error::{Result, SieveError};
use crate::postings::PostingsStore;
use crate::scoring::{DocHit, HitAccumulator};
use crate::types::{DocId, TermId};
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixEntry {
    pub term: TermId,
    /// Byte offset into the term, always on a char boundary.
    pub offset: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SuffixIndex {
    entries: Vec<SuffixEntry>,
}

impl SuffixIndex {
    /// Build the array for `vocab`: one entry per char boundary of each term.
    pub fn build(vocab: &Vocabulary) -> Self {
        Self::from_terms(vocab.terms())
    }

    /// Build over sorted terms; term IDs are positions in `terms`.
    pub fn from_terms(terms: &[String]) -> Self {
        let mut entries: Vec<SuffixEntry> = terms
            .iter()
            .enumerate()
            .flat_map(|(i, term)| {
                term.char_indices().map(move |(offset, _)| SuffixEntry {
                    term: TermId(i as u32),
                    offset: offset as u32,
                })
            })
            .collect();
        entries.sort_by(|a, b| {
            let sa = &terms[a.term.as_usize()][a.offset as usize..];
            let sb = &terms[b.term.as_usize()][b.offset as usize..];
            sa.cmp(sb).then(a.term.cmp(&b.term))
        });
        Self { entries }
    }

    /// Decode and validate the suffix-array section against `vocab`.
    ///
    /// An empty section for a non-empty vocabulary is rebuilt in memory.
    pub fn decode(bytes: &[u8], vocab: &Vocabulary) -> Result<Self> {
        if bytes.is_empty() && !vocab.is_empty() {
            warn!(
                terms = vocab.size(),
                "suffix array section missing, rebuilding from vocabulary"
            );
            return Ok(Self::build(vocab));
        }

        let mut entries = Vec::new();
        for (term_ord, offset) in decode_suffix_array(bytes)? {
            let term = vocab.term(TermId(term_ord)).ok_or_else(|| {
                SieveError::out_of_range("suffix term", term_ord, vocab.size() as u64)
            })?;
            if offset as usize >= term.len() || !term.is_char_boundary(offset as usize) {
                return Err(SieveError::corrupt(format!(
                    "suffix offset {} invalid for term {:?}",
                    offset, term
                )));
            }
            entries.push(SuffixEntry {
                term: TermId(term_ord),
                offset,
            });
        }

        let index = Self { entries };
        if let Some(i) = (1..index.entries.len())
            .find(|&i| index.suffix(vocab, i - 1) > index.suffix(vocab, i))
        {
            return Err(SieveError::corrupt(format!(
                "suffix array not sorted at entry {}",
                i
            )));
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SuffixEntry] {
        &self.entries
    }

    /// `(term, offset)` pairs in section order, for encoding.
    pub fn to_pairs(&self) -> Vec<(u32, u32)> {
        self.entries.iter().map(|e| (e.term.0, e.offset)).collect()
    }

    fn suffix<'v>(&self, vocab: &'v Vocabulary, i: usize) -> &'v str {
        suffix_of(vocab, &self.entries[i])
    }

    /// Entries whose suffix starts with `pattern`.
    pub fn range(&self, vocab: &Vocabulary, pattern: &str) -> Range<usize> {
        let start = self
            .entries
            .partition_point(|e| suffix_of(vocab, e) < pattern);
        let len = self.entries[start..]
            .partition_point(|e| suffix_of(vocab, e).starts_with(pattern));
        start..start + len
    }

    /// Vocabulary terms starting with `prefix`, in term order.
    pub fn matching_terms(&self, vocab: &Vocabulary, prefix: &str) -> Vec<TermId> {
        let mut terms: Vec<TermId> = self.entries[self.range(vocab, prefix)]
            .iter()
            .filter(|e| e.offset == 0)
            .map(|e| e.term)
            .collect();
        terms.sort_unstable();
        terms
    }

    /// Union the postings of every term starting with `prefix`, skipping
    /// `exclude`, into per-document hits (unranked).
    ///
    /// Ranking by summed weight needs every posting of every matching term,
    /// so this visits all of them: a short prefix over a large vocabulary
    /// costs the total length of those lists, not `limit`. Only ranking and
    /// result resolution are bounded by `limit`.
    pub fn collect_prefix(
        &self,
        vocab: &Vocabulary,
        postings: &PostingsStore,
        prefix: &str,
        exclude: &HashSet<DocId>,
    ) -> HitAccumulator {
        let mut acc = HitAccumulator::new();
        if prefix.is_empty() {
            return acc;
        }
        for term in self.matching_terms(vocab, prefix) {
            for posting in postings.postings_excluding(term, exclude) {
                acc.add(posting, term, 0);
            }
        }
        acc
    }

    /// Documents containing a term that starts with `prefix`, ranked by summed
    /// term weight (then doc ID), never including `exclude`.
    pub fn prefix_search(
        &self,
        vocab: &Vocabulary,
        postings: &PostingsStore,
        prefix: &str,
        exclude: &HashSet<DocId>,
        limit: usize,
    ) -> Vec<DocHit> {
        self.collect_prefix(vocab, postings, prefix, exclude)
            .into_ranked(limit)
    }
}

fn suffix_of<'v>(vocab: &'v Vocabulary, e: &SuffixEntry) -> &'v str {
    vocab
        .term(e.term)
        .and_then(|t| t.get(e.offset as usize..))
        .unwrap_or("")
}
