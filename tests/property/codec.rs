// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Container codec properties: sections survive encoding, and damaged input
//! is rejected without panicking.

use proptest::prelude::*;
use sieve::binary::{decode_varint, encode_varint, Container};
use sieve::testing::IndexBuilder;
use sieve::Searcher;

use super::common::{corpus_bodies, corpus_docs};

fn section() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

fn corpus_bytes() -> Vec<u8> {
    let mut builder = IndexBuilder::new().docs(corpus_docs());
    for (doc, text) in corpus_bodies() {
        builder = builder.index_text(doc, None, text);
    }
    builder.module(b"\0asm").build()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: arbitrary section payloads are carried through verbatim.
    #[test]
    fn prop_container_sections_preserved(
        vocabulary in section(),
        postings in section(),
        documents in section(),
        module in section(),
        doc_count in 0u32..1000,
    ) {
        let mut container = Container::new(doc_count, 0);
        container.vocabulary = vocabulary;
        container.postings = postings;
        container.documents = documents;
        container.module = module;

        let bytes = container.encode();
        prop_assert_eq!(Container::decode(&bytes).unwrap(), container);
    }

    /// Property: any single-byte change is rejected, never a panic.
    #[test]
    fn prop_corruption_detected(index in 0usize..10_000, mask in 1u8..=255) {
        let mut bytes = corpus_bytes();
        let index = index % bytes.len();
        bytes[index] ^= mask;
        prop_assert!(Searcher::from_bytes(&bytes).is_err());
    }

    /// Property: truncation at any point is rejected, never a panic.
    #[test]
    fn prop_truncation_detected(cut in 0usize..10_000) {
        let bytes = corpus_bytes();
        let cut = cut % bytes.len();
        prop_assert!(Searcher::from_bytes(&bytes[..cut]).is_err());
    }

    /// Property: varints decode to the value written and report their length.
    #[test]
    fn prop_varint(value in any::<u64>()) {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        prop_assert_eq!(decode_varint(&buf).unwrap(), (value, buf.len()));
    }

    /// Property: random bytes after a valid magic are rejected, never a panic.
    #[test]
    fn prop_random_body_never_panics(body in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut bytes = b"SIFT".to_vec();
        bytes.extend(body);
        prop_assert!(Searcher::from_bytes(&bytes).is_err());
    }
}
