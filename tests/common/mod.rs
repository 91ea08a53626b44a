// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities and fixtures.

#![allow(dead_code)]

use sieve::testing::IndexBuilder;
use sieve::{Document, Manifest, ProgressiveIndex, SearchResult, Searcher};

// Re-export canonical test utilities from sieve::testing
pub use sieve::testing::{make_doc, make_doc_with_category};

// ============================================================================
// CAT / CATS FIXTURE
// ============================================================================

/// Three documents; doc 1 is titled "Cat", doc 2 talks about cats.
pub fn cat_manifest() -> Manifest {
    Manifest::from_docs(vec![
        make_doc(0, "Introduction"),
        make_doc(1, "Cat"),
        make_doc(2, "Pets"),
    ])
}

/// Titles layer: "cat" → doc 1.
pub fn cat_titles_layer() -> Vec<u8> {
    IndexBuilder::new().doc_count(3).posting("cat", 1, 1).build()
}

/// Content layer: "cats" → doc 2.
pub fn cats_content_layer() -> Vec<u8> {
    IndexBuilder::new().doc_count(3).posting("cats", 2, 1).build()
}

pub fn cat_index(with_content: bool) -> ProgressiveIndex {
    let mut index = ProgressiveIndex::new(cat_manifest());
    index
        .load_layer("titles", &cat_titles_layer())
        .expect("titles layer loads");
    if with_content {
        index
            .load_layer("content", &cats_content_layer())
            .expect("content layer loads");
    }
    index
}

// ============================================================================
// SMALL CORPUS
// ============================================================================

pub fn corpus_docs() -> Vec<Document> {
    vec![
        make_doc(0, "Rust ownership").with_heading("borrowing", "Borrowing rules"),
        make_doc(1, "Rust async runtime"),
        make_doc(2, "Typescript generics"),
        make_doc(3, "Memory safety"),
        make_doc_with_category(4, "Search engines", "guides"),
    ]
}

pub fn corpus_bodies() -> Vec<(u32, &'static str)> {
    vec![
        (0, "rust ownership and borrowing keep memory safe without a collector"),
        (1, "async rust uses futures and an executor runtime"),
        (2, "typescript generics describe reusable types"),
        (3, "memory safety bugs include use after free and buffer overflow"),
        (4, "search engines rank documents by relevance using postings"),
    ]
}

/// Content searcher over [`corpus_docs`]. The borrowing heading is indexed
/// first so its words keep the `borrowing` section.
pub fn corpus_searcher() -> Searcher {
    let mut builder = IndexBuilder::new()
        .docs(corpus_docs())
        .index_text(0, Some("borrowing"), "borrowing rules");
    for (doc, text) in corpus_bodies() {
        builder = builder.index_text(doc, None, text);
    }
    Searcher::from_bytes(&builder.build()).expect("corpus decodes")
}

// ============================================================================
// RESULT HELPERS
// ============================================================================

pub fn doc_ids(results: &[SearchResult]) -> Vec<u32> {
    results.iter().map(|r| r.doc_id.get()).collect()
}

/// Panics with a readable message if two results share a document.
pub fn assert_unique_docs(results: &[SearchResult]) {
    let mut seen = std::collections::HashSet::new();
    for r in results {
        assert!(seen.insert(r.doc_id), "doc {} returned twice", r.doc_id.get());
    }
}
