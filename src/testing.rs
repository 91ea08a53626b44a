// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit tests, integration tests, benches and
//! fuzz targets.
//!
//! This module is always compiled but hidden from documentation. It writes
//! real `.sieve` containers from in-memory postings, so tests exercise the
//! same decode path as production files.

#![doc(hidden)]

use std::collections::BTreeMap;

use crate::binary::{
    encode_docs, encode_posting_list, encode_section_table, encode_skip_lists,
    encode_suffix_array, encode_vocabulary, Container, DictTables, FormatFlags,
};
use crate::docs::Document;
use crate::fuzzy::{FuzzyConfig, FuzzyMatcher};
use crate::normalize::normalize;
use crate::suffix::SuffixIndex;
use crate::types::Posting;

/// Create a test document titled `title` at `/doc/{id}`.
pub fn make_doc(id: usize, title: &str) -> Document {
    Document::new(title, format!("/doc/{}", id))
}

/// Create a test document with a category.
pub fn make_doc_with_category(id: usize, title: &str, category: &str) -> Document {
    make_doc(id, title).with_category(category)
}

#[derive(Debug, Clone, Copy, Default)]
struct Entry {
    section: Option<usize>,
    weight: u32,
}

/// In-memory index writer.
///
/// Terms are taken as given (call sites pass normalized terms) unless added
/// through [`index_text`](Self::index_text), which tokenizes. Adding the same
/// term to the same document twice sums the weights; the first section sticks.
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    docs: Vec<Document>,
    sections: Vec<String>,
    postings: BTreeMap<String, BTreeMap<u32, Entry>>,
    doc_count: Option<u32>,
    fuzzy: Option<FuzzyConfig>,
    omit_suffix_array: bool,
    omit_lev_dfa: bool,
    omit_docs: bool,
    module: Vec<u8>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc(mut self, doc: Document) -> Self {
        self.docs.push(doc);
        self
    }

    pub fn docs(mut self, docs: impl IntoIterator<Item = Document>) -> Self {
        self.docs.extend(docs);
        self
    }

    pub fn posting(self, term: &str, doc: u32, weight: u32) -> Self {
        self.add(term, doc, None, weight)
    }

    pub fn posting_in_section(self, term: &str, doc: u32, section_id: &str, weight: u32) -> Self {
        self.add(term, doc, Some(section_id), weight)
    }

    /// Tokenize `text` and add one unit of weight per occurrence.
    pub fn index_text(mut self, doc: u32, section_id: Option<&str>, text: &str) -> Self {
        for word in normalize(text).split(|c: char| !c.is_alphanumeric()) {
            if !word.is_empty() {
                self = self.add(word, doc, section_id, 1);
            }
        }
        self
    }

    /// Header document count; defaults to the larger of the document list
    /// and the highest posted doc ID + 1.
    pub fn doc_count(mut self, count: u32) -> Self {
        self.doc_count = Some(count);
        self
    }

    pub fn fuzzy_config(mut self, config: FuzzyConfig) -> Self {
        self.fuzzy = Some(config);
        self
    }

    /// Leave the suffix-array section empty.
    pub fn without_suffix_array(mut self) -> Self {
        self.omit_suffix_array = true;
        self
    }

    /// Leave the Levenshtein-DFA section empty.
    pub fn without_lev_dfa(mut self) -> Self {
        self.omit_lev_dfa = true;
        self
    }

    /// Leave the document section empty.
    pub fn without_docs(mut self) -> Self {
        self.omit_docs = true;
        self
    }

    pub fn module(mut self, bytes: &[u8]) -> Self {
        self.module = bytes.to_vec();
        self
    }

    fn add(mut self, term: &str, doc: u32, section_id: Option<&str>, weight: u32) -> Self {
        let section = section_id.map(|id| match self.sections.iter().position(|s| s == id) {
            Some(i) => i,
            None => {
                self.sections.push(id.to_string());
                self.sections.len() - 1
            }
        });
        let entry = self
            .postings
            .entry(term.to_string())
            .or_default()
            .entry(doc)
            .or_default();
        entry.weight = entry.weight.saturating_add(weight);
        if entry.section.is_none() {
            entry.section = section;
        }
        self
    }

    pub fn build_container(&self) -> Container {
        let terms: Vec<String> = self.postings.keys().cloned().collect();
        let max_doc = self
            .postings
            .values()
            .filter_map(|list| list.keys().next_back())
            .max()
            .map_or(0, |&d| d + 1);
        let doc_count = self
            .doc_count
            .unwrap_or_else(|| max_doc.max(self.docs.len() as u32));

        let mut container = Container::new(doc_count, terms.len() as u32);

        encode_vocabulary(&terms, &mut container.vocabulary);
        if !self.omit_suffix_array {
            let suffix = SuffixIndex::from_terms(&terms);
            encode_suffix_array(&suffix.to_pairs(), &mut container.suffix_array);
        }

        let mut skips = Vec::new();
        for (ord, list) in self.postings.values().enumerate() {
            let postings: Vec<Posting> = list
                .iter()
                .map(|(&doc, e)| {
                    let section_idx = e.section.map_or(0, |s| s as u32 + 1);
                    Posting::new(doc, section_idx, e.weight)
                })
                .collect();
            if let Some(entries) = encode_posting_list(&postings, &mut container.postings) {
                skips.push((ord as u32, entries));
            }
        }
        if !skips.is_empty() {
            container.flags = FormatFlags::new().with_skip_lists();
            encode_skip_lists(&skips, &mut container.skip_lists);
        }

        if !self.sections.is_empty() {
            encode_section_table(&self.sections, &mut container.section_table);
        }
        if !self.omit_lev_dfa {
            FuzzyMatcher::new(self.fuzzy.clone().unwrap_or_default())
                .encode(&mut container.lev_dfa);
        }
        if !self.omit_docs && !self.docs.is_empty() {
            let mut dicts = DictTables::new();
            encode_docs(&self.docs, &mut dicts, &mut container.documents);
            if !dicts.is_empty() {
                dicts.encode(&mut container.dict_tables);
            }
        }
        container.module = self.module.clone();
        container
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_container().encode()
    }
}

/// Titles layer: every title word, weight 1 per occurrence.
pub fn titles_layer(docs: &[Document]) -> Vec<u8> {
    let mut builder = IndexBuilder::new()
        .docs(docs.iter().cloned())
        .doc_count(docs.len() as u32);
    for (id, doc) in docs.iter().enumerate() {
        builder = builder.index_text(id as u32, None, &doc.title);
    }
    builder.build()
}

/// Headings layer: heading words, each posted under its section anchor.
pub fn headings_layer(docs: &[Document]) -> Vec<u8> {
    let mut builder = IndexBuilder::new()
        .docs(docs.iter().cloned())
        .doc_count(docs.len() as u32);
    for (id, doc) in docs.iter().enumerate() {
        for heading in &doc.headings {
            builder = builder.index_text(id as u32, Some(&heading.section_id), &heading.text);
        }
    }
    builder.build()
}

/// Content layer from `(doc, text)` bodies.
pub fn content_layer(docs: &[Document], bodies: &[(u32, &str)]) -> Vec<u8> {
    let mut builder = IndexBuilder::new()
        .docs(docs.iter().cloned())
        .doc_count(docs.len() as u32);
    for &(id, text) in bodies {
        builder = builder.index_text(id, None, text);
    }
    builder.build()
}
