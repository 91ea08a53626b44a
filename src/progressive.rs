// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Progressive multi-layer index.
//!
//! A client fetches the small titles layer first and can answer queries
//! before the headings and content layers arrive. Every layer is a complete
//! `.sieve` container with its own [`Searcher`]; all layers share the
//! manifest's DocID space.
//!
//! Cross-layer merge: each layer's scores are multiplied by that layer's
//! boost, and a document found in several layers keeps only its best boosted
//! result (scores are never summed). Every layer that found it is still
//! recorded in `matched_layers`.

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::docs::{Document, DocumentStore, Manifest};
use crate::error::{Result, SieveError};
use crate::options::{effective_limit, SearchOptions};
use crate::scoring::ranking::compare_merged;
use crate::search::Searcher;
use crate::types::{DocId, LayerName, SearchResult, Suggestion};

#[derive(Debug, Clone, Default)]
pub struct ProgressiveIndex {
    documents: DocumentStore,
    layers: [Option<Searcher>; 3],
}

impl ProgressiveIndex {
    /// An index with document metadata and no search data yet.
    pub fn new(manifest: Manifest) -> Self {
        Self {
            documents: manifest.into_store(),
            layers: Default::default(),
        }
    }

    /// Decode `bytes` and install it as layer `name`, replacing any layer
    /// already loaded under that name. On error nothing changes.
    pub fn load_layer(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let layer: LayerName = name.parse()?;
        let searcher = Searcher::from_bytes(bytes)?;
        if !self.documents.is_empty() && searcher.doc_count() > self.documents.len() {
            return Err(SieveError::out_of_range(
                "layer document count",
                searcher.doc_count() as u64,
                self.documents.len() as u64,
            ));
        }

        info!(
            layer = layer.as_str(),
            docs = searcher.doc_count(),
            terms = searcher.vocab_size(),
            replaced = self.layers[layer.slot()].is_some(),
            "layer loaded"
        );
        self.layers[layer.slot()] = Some(searcher);
        Ok(())
    }

    pub fn has_layer(&self, name: &str) -> bool {
        name.parse::<LayerName>()
            .is_ok_and(|layer| self.layers[layer.slot()].is_some())
    }

    /// Loaded layers in titles, headings, content order.
    pub fn loaded_layers(&self) -> Vec<LayerName> {
        self.loaded().map(|(layer, _)| layer).collect()
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.layers.iter().all(Option::is_some)
    }

    pub fn layer(&self, layer: LayerName) -> Option<&Searcher> {
        self.layers[layer.slot()].as_ref()
    }

    /// Documents in the manifest, or in the largest loaded layer when the
    /// manifest was empty.
    pub fn doc_count(&self) -> usize {
        if !self.documents.is_empty() {
            return self.documents.len();
        }
        self.loaded()
            .map(|(_, s)| s.doc_count())
            .max()
            .unwrap_or(0)
    }

    /// Total terms over the loaded layers. Terms indexed in several layers
    /// count once per layer.
    pub fn vocab_size(&self) -> usize {
        self.loaded().map(|(_, s)| s.vocab_size()).sum()
    }

    pub fn has_vocabulary(&self) -> bool {
        self.loaded().any(|(_, s)| s.has_vocabulary())
    }

    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.documents
            .get(id)
            .or_else(|| self.loaded().find_map(|(_, s)| s.document(id)))
    }

    fn loaded(&self) -> impl Iterator<Item = (LayerName, &Searcher)> + '_ {
        LayerName::ALL
            .into_iter()
            .filter_map(|layer| self.layers[layer.slot()].as_ref().map(|s| (layer, s)))
    }

    /// All tiers on every loaded layer, merged.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        self.fan_out(options, |s| s.search_with(query, options))
    }

    /// Cross-layer tier 1.
    pub fn search_exact(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let limit = options.effective_limit();
        self.fan_out(options, |s| s.search_tier1_exact(query, limit))
    }

    /// Cross-layer tier 2, skipping `exclude` in every layer.
    pub fn search_expanded(
        &self,
        query: &str,
        exclude: &HashSet<DocId>,
        options: &SearchOptions,
    ) -> Vec<SearchResult> {
        if !options.prefix {
            return Vec::new();
        }
        let limit = options.effective_limit();
        self.fan_out(options, |s| s.search_tier2_prefix(query, exclude, limit))
    }

    /// Cross-layer tier 3, skipping `exclude` in every layer.
    pub fn search_fuzzy(
        &self,
        query: &str,
        exclude: &HashSet<DocId>,
        options: &SearchOptions,
    ) -> Vec<SearchResult> {
        if !options.fuzzy {
            return Vec::new();
        }
        let limit = options.effective_limit();
        self.fan_out(options, |s| s.search_tier3_fuzzy(query, exclude, limit))
    }

    /// Autocomplete over every loaded layer. A term's frequency is summed
    /// across the layers that index it.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<Suggestion> {
        let mut freqs: HashMap<String, u32> = HashMap::new();
        for (_, searcher) in self.loaded() {
            for s in searcher.suggest(prefix, usize::MAX) {
                let freq = freqs.entry(s.term).or_insert(0);
                *freq = freq.saturating_add(s.doc_freq);
            }
        }
        let mut suggestions: Vec<Suggestion> = freqs
            .into_iter()
            .map(|(term, doc_freq)| Suggestion { term, doc_freq })
            .collect();
        suggestions.sort_by(|a, b| b.doc_freq.cmp(&a.doc_freq).then_with(|| a.term.cmp(&b.term)));
        suggestions.truncate(effective_limit(limit));
        suggestions
    }

    fn fan_out<F>(&self, options: &SearchOptions, run: F) -> Vec<SearchResult>
    where
        F: Fn(&Searcher) -> Vec<SearchResult>,
    {
        let per_layer = self.loaded().map(|(layer, s)| (layer, run(s)));
        let mut merged = merge_layers(per_layer, options);
        for result in &mut merged {
            if result.snippet.is_none() {
                result.snippet = self
                    .documents
                    .snippet(result.doc_id, result.section_id.as_deref());
            }
        }
        merged
    }
}

/// Boost, keep each document's best layer, rank, truncate.
fn merge_layers(
    per_layer: impl IntoIterator<Item = (LayerName, Vec<SearchResult>)>,
    options: &SearchOptions,
) -> Vec<SearchResult> {
    let mut best: HashMap<DocId, SearchResult> = HashMap::new();
    for (layer, results) in per_layer {
        let boost = options.boost.for_layer(layer);
        for mut result in results {
            result.score *= boost;
            result.source_layer = Some(layer);
            result.matched_layers = vec![layer];
            match best.get_mut(&result.doc_id) {
                Some(existing) => {
                    existing.matched_layers.push(layer);
                    if result.score > existing.score {
                        result.matched_layers = std::mem::take(&mut existing.matched_layers);
                        *existing = result;
                    }
                }
                None => {
                    best.insert(result.doc_id, result);
                }
            }
        }
    }

    let mut merged: Vec<SearchResult> = best.into_values().collect();
    merged.sort_by(compare_merged);
    merged.truncate(options.effective_limit());
    merged
}
