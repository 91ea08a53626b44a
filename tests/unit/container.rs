// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Container decoding and the sections layered on top of it.

use sieve::binary::{Container, SieveHeader, MIN_VERSION, VERSION};
use sieve::testing::IndexBuilder;
use sieve::{DocId, Manifest, Searcher, SieveError};

use super::common::{corpus_docs, make_doc, make_doc_with_category};

fn sample() -> IndexBuilder {
    IndexBuilder::new()
        .doc(make_doc_with_category(0, "Cats", "pets").with_heading("care", "Cat care"))
        .doc(make_doc_with_category(1, "Dogs", "pets"))
        .posting_in_section("cat", 0, "care", 2)
        .posting("dog", 1, 1)
}

#[test]
fn test_documents_survive_encoding() {
    let searcher = Searcher::from_bytes(&sample().build()).unwrap();
    let doc = searcher.document(DocId(0)).unwrap();
    assert_eq!(doc.title, "Cats");
    assert_eq!(doc.href, "/doc/0");
    assert_eq!(doc.category.as_deref(), Some("pets"));
    assert_eq!(doc.heading("care").unwrap().text, "Cat care");
    assert_eq!(searcher.section_table(), ["care".to_string()]);
}

#[test]
fn test_manifest_from_container() {
    let docs = corpus_docs();
    let bytes = IndexBuilder::new().docs(docs.clone()).build();
    let manifest = Manifest::from_container(&bytes).unwrap();
    assert_eq!(manifest.docs, docs);
}

#[test]
fn test_checksum_mismatch_is_corrupt() {
    let mut bytes = sample().build();
    bytes[SieveHeader::SIZE] ^= 0xff;
    assert!(matches!(
        Searcher::from_bytes(&bytes),
        Err(SieveError::CorruptIndex(_))
    ));
}

#[test]
fn test_older_version_rejected() {
    let mut container = sample().build_container();
    container.version = MIN_VERSION - 1;
    assert!(matches!(
        Searcher::from_bytes(&container.encode()),
        Err(SieveError::UnsupportedVersion { found, .. }) if found == MIN_VERSION - 1
    ));
}

#[test]
fn test_newer_version_accepted() {
    let mut container = sample().build_container();
    container.version = VERSION + 1;
    let searcher = Searcher::from_bytes(&container.encode()).unwrap();
    assert_eq!(searcher.doc_count(), 2);
}

#[test]
fn test_truncated_file() {
    let bytes = sample().build();
    for cut in [0, 3, 20, SieveHeader::SIZE + 1, bytes.len() - 1] {
        assert!(Searcher::from_bytes(&bytes[..cut]).is_err(), "cut at {}", cut);
    }
}

#[test]
fn test_missing_vocabulary_is_corrupt() {
    let mut container = sample().build_container();
    container.vocabulary.clear();
    assert!(matches!(
        Searcher::from_container(container),
        Err(SieveError::CorruptIndex(_))
    ));
}

#[test]
fn test_doc_section_must_match_header() {
    let bytes = sample().doc_count(5).build();
    assert!(matches!(
        Searcher::from_bytes(&bytes),
        Err(SieveError::CorruptIndex(_))
    ));
}

#[test]
fn test_missing_suffix_array_is_rebuilt() {
    let with = Searcher::from_bytes(&sample().build()).unwrap();
    let without = Searcher::from_bytes(&sample().without_suffix_array().build()).unwrap();
    assert_eq!(without.suffix_index().len(), with.suffix_index().len());
    assert_eq!(with.search("ca", 10), without.search("ca", 10));
}

#[test]
fn test_empty_index() {
    let bytes = IndexBuilder::new().build();
    let searcher = Searcher::from_bytes(&bytes).unwrap();
    assert_eq!(searcher.doc_count(), 0);
    assert!(!searcher.has_vocabulary());
    assert!(searcher.search("anything", 10).is_empty());
}

#[test]
fn test_split_module_keeps_index_searchable() {
    let bytes = sample().module(b"\0asm\x01\0\0\0").build();
    let split = Container::split_module(&bytes).unwrap();
    assert_eq!(split.module, b"\0asm\x01\0\0\0");
    assert!(split.index.len() < bytes.len());

    let original = Searcher::from_bytes(&bytes).unwrap();
    let stripped = Searcher::from_bytes(&split.index).unwrap();
    assert_eq!(original.search("cat", 10), stripped.search("cat", 10));
    assert!(Container::decode(&split.index).unwrap().module.is_empty());
}
