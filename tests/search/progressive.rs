// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Layer lifecycle and cross-layer merging.

use std::collections::HashSet;

use sieve::testing::{content_layer, headings_layer, titles_layer, IndexBuilder};
use sieve::{
    BoostOptions, DocId, LayerName, Manifest, ProgressiveIndex, SearchOptions, SieveError, Tier,
};

use super::common::{cat_index, cat_manifest, cat_titles_layer, doc_ids, make_doc};

fn equal_boosts() -> SearchOptions {
    SearchOptions {
        boost: BoostOptions {
            title: 1.0,
            heading: 1.0,
            content: 1.0,
        },
        ..SearchOptions::default()
    }
}

#[test]
fn test_limit_zero_means_ten() {
    let docs: Vec<_> = (0..15).map(|i| make_doc(i, "Page")).collect();
    let mut index = ProgressiveIndex::new(Manifest::from_docs(docs.clone()));
    index.load_layer("titles", &titles_layer(&docs)).unwrap();

    for json in [r#"{"limit": 0}"#, r#"{"limit": -3}"#, r#"{"limit": null}"#] {
        let options = SearchOptions::from_json(json).unwrap();
        assert_eq!(index.search("page", &options).len(), 10, "{}", json);
    }
    let options = SearchOptions::from_json(r#"{"limit": 12}"#).unwrap();
    assert_eq!(index.search("page", &options).len(), 12);
}

#[test]
fn test_snippet_filled_from_manifest() {
    let index = cat_index(false);
    let results = index.search("cat", &SearchOptions::default());
    assert_eq!(results[0].snippet.as_deref(), Some("Cat"));
    assert_eq!(index.document(results[0].doc_id).unwrap().href, "/doc/1");
}

#[test]
fn test_best_layer_wins_and_all_layers_recorded() {
    let mut index = ProgressiveIndex::new(cat_manifest());
    index.load_layer("titles", &cat_titles_layer()).unwrap();
    let content = IndexBuilder::new()
        .doc_count(3)
        .posting("cat", 1, 1)
        .posting("cat", 2, 1)
        .build();
    index.load_layer("content", &content).unwrap();

    let results = index.search("cat", &SearchOptions::default());
    assert_eq!(doc_ids(&results), vec![1, 2]);
    assert_eq!(results[0].source_layer, Some(LayerName::Titles));
    assert_eq!(
        results[0].matched_layers,
        vec![LayerName::Titles, LayerName::Content]
    );
    assert_eq!(results[0].score, 10025.0);
    assert_eq!(results[1].matched_layers, vec![LayerName::Content]);
    assert_eq!(results[1].score, 100.25);

    let mut options = SearchOptions::default();
    options.boost.content = 1000.0;
    let results = index.search("cat", &options);
    assert_eq!(results[0].source_layer, Some(LayerName::Content));
    assert_eq!(
        results[0].matched_layers,
        vec![LayerName::Titles, LayerName::Content]
    );
}

#[test]
fn test_equal_boosted_scores_order_by_doc() {
    let mut index = ProgressiveIndex::new(cat_manifest());
    let titles = IndexBuilder::new().doc_count(3).posting("cat", 2, 1).build();
    let content = IndexBuilder::new().doc_count(3).posting("cat", 1, 1).build();
    index.load_layer("titles", &titles).unwrap();
    index.load_layer("content", &content).unwrap();

    let results = index.search("cat", &equal_boosts());
    assert_eq!(doc_ids(&results), vec![1, 2]);
    assert_eq!(results[0].score, results[1].score);
}

#[test]
fn test_headings_layer_deep_links() {
    let docs = vec![
        make_doc(0, "Guide").with_heading("install", "Installing sieve"),
        make_doc(1, "Reference").with_heading("api", "Searcher API"),
    ];
    let mut index = ProgressiveIndex::new(Manifest::from_docs(docs.clone()));
    index.load_layer("headings", &headings_layer(&docs)).unwrap();

    let results = index.search("installing", &SearchOptions::default());
    assert_eq!(doc_ids(&results), vec![0]);
    assert_eq!(results[0].source_layer, Some(LayerName::Headings));
    assert_eq!(results[0].section_id.as_deref(), Some("install"));
    assert_eq!(results[0].snippet.as_deref(), Some("Installing sieve"));
}

#[test]
fn test_layers_report_in_fixed_order() {
    let docs = vec![make_doc(0, "Alpha"), make_doc(1, "Beta")];
    let mut index = ProgressiveIndex::new(Manifest::from_docs(docs.clone()));
    index
        .load_layer("content", &content_layer(&docs, &[(0, "first"), (1, "second")]))
        .unwrap();
    index.load_layer("titles", &titles_layer(&docs)).unwrap();
    assert!(!index.is_fully_loaded());
    index.load_layer("headings", &headings_layer(&docs)).unwrap();

    assert!(index.is_fully_loaded());
    assert_eq!(index.loaded_layers(), LayerName::ALL.to_vec());
    assert!(index.has_layer("headings"));
    assert!(index.has_vocabulary());
}

#[test]
fn test_unknown_layer_name() {
    let mut index = ProgressiveIndex::new(cat_manifest());
    let err = index.load_layer("body", &cat_titles_layer()).unwrap_err();
    assert_eq!(err, SieveError::UnknownLayer("body".to_string()));
    assert!(index.loaded_layers().is_empty());
}

#[test]
fn test_layer_beyond_manifest_rejected() {
    let mut index = ProgressiveIndex::new(cat_manifest());
    let bytes = IndexBuilder::new().doc_count(4).posting("cat", 3, 1).build();
    assert!(matches!(
        index.load_layer("titles", &bytes),
        Err(SieveError::OutOfRangeReference { .. })
    ));
}

#[test]
fn test_doc_count_without_manifest() {
    let mut index = ProgressiveIndex::new(Manifest::default());
    assert_eq!(index.doc_count(), 0);
    index.load_layer("titles", &cat_titles_layer()).unwrap();
    assert_eq!(index.doc_count(), 3);
}

#[test]
fn test_tier_entry_points() {
    let index = cat_index(true);
    let options = SearchOptions::default();
    let none = HashSet::new();

    let exact = index.search_exact("cat", &options);
    assert_eq!(doc_ids(&exact), vec![1]);

    let seen: HashSet<DocId> = exact.iter().map(|r| r.doc_id).collect();
    let expanded = index.search_expanded("cat", &seen, &options);
    assert_eq!(doc_ids(&expanded), vec![2]);
    assert!(expanded.iter().all(|r| r.tier == Tier::Prefix));

    let no_prefix = SearchOptions {
        prefix: false,
        ..SearchOptions::default()
    };
    assert!(index.search_expanded("cat", &none, &no_prefix).is_empty());

    let no_fuzzy = SearchOptions {
        fuzzy: false,
        ..SearchOptions::default()
    };
    assert!(index.search_fuzzy("kat", &none, &no_fuzzy).is_empty());
}

#[test]
fn test_suggest_across_layers() {
    let index = cat_index(true);
    let terms: Vec<String> = index.suggest("ca", 10).into_iter().map(|s| s.term).collect();
    assert_eq!(terms, vec!["cat", "cats"]);
}
