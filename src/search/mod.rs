// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search over one decoded index: where the rubber meets the road.
//!
//! A [`Searcher`] owns every structure decoded from one `.sieve` container.
//! The three tiers (exact → prefix → fuzzy) live in `tiered`; each is
//! callable on its own so a host can show exact hits while the slower tiers
//! are still running.

mod tiered;

use tracing::debug;

use crate::binary::{decode_section_table, Container};
use crate::docs::{Document, DocumentStore};
use crate::error::{Result, SieveError};
use crate::fuzzy::{FuzzyConfig, FuzzyMatcher};
use crate::normalize::normalize;
use crate::options::effective_limit;
use crate::postings::PostingsStore;
use crate::suffix::SuffixIndex;
use crate::types::{DocId, Suggestion};
use crate::vocabulary::Vocabulary;

/// Single-layer searcher. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Searcher {
    doc_count: u32,
    vocabulary: Vocabulary,
    postings: PostingsStore,
    suffix: SuffixIndex,
    fuzzy: FuzzyMatcher,
    section_table: Vec<String>,
    documents: DocumentStore,
}

impl Searcher {
    /// Decode and validate a complete `.sieve` buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_container(Container::decode(bytes)?)
    }

    /// Build the in-memory structures from decoded sections.
    ///
    /// Sections are decoded in dependency order: the section table bounds the
    /// postings, the postings supply document frequencies to the vocabulary,
    /// and the vocabulary validates the suffix array.
    pub fn from_container(container: Container) -> Result<Self> {
        let term_count = container.term_count as usize;
        if term_count > 0 && container.vocabulary.is_empty() {
            return Err(SieveError::corrupt(format!(
                "header declares {} terms but the vocabulary section is empty",
                term_count
            )));
        }

        let section_table = decode_section_table(&container.section_table)?;
        let postings = PostingsStore::decode(
            &container.postings,
            &container.skip_lists,
            term_count,
            container.doc_count,
            section_table.len(),
        )?;
        let vocabulary =
            Vocabulary::decode(&container.vocabulary, term_count, postings.doc_freqs())?;
        let suffix = SuffixIndex::decode(&container.suffix_array, &vocabulary)?;
        let fuzzy = FuzzyMatcher::decode(&container.lev_dfa)?;
        let documents = DocumentStore::new(container.decode_documents()?);

        debug!(
            docs = container.doc_count,
            terms = term_count,
            suffixes = suffix.len(),
            sections = section_table.len(),
            "searcher ready"
        );

        Ok(Self {
            doc_count: container.doc_count,
            vocabulary,
            postings,
            suffix,
            fuzzy,
            section_table,
            documents,
        })
    }

    pub fn doc_count(&self) -> usize {
        self.doc_count as usize
    }

    pub fn vocab_size(&self) -> usize {
        self.vocabulary.size()
    }

    pub fn has_vocabulary(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn postings(&self) -> &PostingsStore {
        &self.postings
    }

    pub fn suffix_index(&self) -> &SuffixIndex {
        &self.suffix
    }

    pub fn fuzzy_config(&self) -> &FuzzyConfig {
        self.fuzzy.config()
    }

    pub fn fuzzy_matcher(&self) -> &FuzzyMatcher {
        &self.fuzzy
    }

    pub fn section_table(&self) -> &[String] {
        &self.section_table
    }

    /// Document metadata carried by this container, if any.
    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Autocomplete: vocabulary terms starting with `prefix`, most frequent
    /// first. Returns terms, not documents.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<Suggestion> {
        let prefix = normalize(prefix);
        if prefix.is_empty() {
            return Vec::new();
        }
        self.vocabulary
            .enumerate_prefix(&prefix)
            .take(effective_limit(limit))
            .map(|entry| Suggestion {
                term: entry.term.to_string(),
                doc_freq: entry.doc_freq,
            })
            .collect()
    }
}
