// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Container decoding under adversarial input.
//!
//! If someone serves a crafted `.sieve` file, the worst case should be an
//! error, not a crash or a runaway allocation. This target feeds the decoder
//! garbage: varints that decode to usize::MAX, truncated headers, and CRCs
//! that lie about the data they protect.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve::binary::Container;
use sieve::{DocId, Searcher};

fuzz_target!(|data: &[u8]| {
    let Ok(container) = Container::decode(data) else {
        return;
    };
    // Re-encoding must yield a container that decodes to the same sections.
    assert_eq!(Container::decode(&container.encode()).as_ref(), Ok(&container));

    let Ok(searcher) = Searcher::from_container(container) else {
        return;
    };

    // Every posting must reference a real document.
    let doc_count = searcher.doc_count();
    let postings = searcher.postings();
    for term in 0..searcher.vocab_size() {
        let mut prev: Option<DocId> = None;
        for posting in postings.postings_for(sieve::TermId(term as u32)) {
            assert!(posting.doc_id.as_usize() < doc_count);
            assert!(prev.map_or(true, |p| p < posting.doc_id), "postings not ascending");
            prev = Some(posting.doc_id);
        }
    }

    // Every suffix must be a char-boundary slice of its term.
    let vocab = searcher.vocabulary();
    for entry in searcher.suffix_index().entries() {
        let term = vocab.term(entry.term).expect("suffix term in range");
        assert!(term.is_char_boundary(entry.offset as usize));
    }

    let _ = searcher.search("a", 10);
});
