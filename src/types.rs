// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Core value types shared across the index structures.
//!
//! IDs are newtypes so a term ordinal can never be passed where a document ID
//! is expected. Both are dense and 0-based; term IDs are only meaningful inside
//! the index instance that assigned them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SieveError;

/// Document identifier, shared by every layer of one index generation.
///
/// Use `DocId::new()` for bounds-checked construction from untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(transparent)]
pub struct DocId(pub u32);

impl DocId {
    /// Create a new DocId, validating it's within bounds.
    #[inline]
    pub fn new(id: u32, num_docs: usize) -> Option<Self> {
        ((id as usize) < num_docs).then_some(DocId(id))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Convert to usize for array indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId(id)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense term ordinal: position of the term in the sorted vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(transparent)]
pub struct TermId(pub u32);

impl TermId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// One entry of a term's posting list.
///
/// `section_idx` is 0 when the match is not inside a named section, otherwise
/// a 1-based index into the layer's section table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub section_idx: u32,
    pub weight: u32,
}

impl Posting {
    pub fn new(doc_id: u32, section_idx: u32, weight: u32) -> Self {
        Self {
            doc_id: DocId(doc_id),
            section_idx,
            weight,
        }
    }
}

/// Query pipeline phase that produced a result.
///
/// Ordering follows pipeline order, so `Tier::Exact < Tier::Fuzzy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Exact,
    Prefix,
    Fuzzy,
}

impl Tier {
    pub fn number(self) -> u8 {
        match self {
            Tier::Exact => 1,
            Tier::Prefix => 2,
            Tier::Fuzzy => 3,
        }
    }
}

/// Fixed names of the progressive index layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerName {
    Titles,
    Headings,
    Content,
}

impl LayerName {
    pub const ALL: [LayerName; 3] = [LayerName::Titles, LayerName::Headings, LayerName::Content];

    pub fn as_str(self) -> &'static str {
        match self {
            LayerName::Titles => "titles",
            LayerName::Headings => "headings",
            LayerName::Content => "content",
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl FromStr for LayerName {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "titles" => Ok(LayerName::Titles),
            "headings" => Ok(LayerName::Headings),
            "content" => Ok(LayerName::Content),
            other => Err(SieveError::UnknownLayer(other.to_string())),
        }
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked hit, resolved against the document store.
///
/// `source_layer` is the layer whose score won the cross-layer max and
/// `matched_layers` lists every layer that found the document. Both are
/// empty/None for results of a standalone Searcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub doc_id: DocId,
    pub score: f64,
    pub tier: Tier,
    /// Summed posting weight of the matched terms; first tie-breaker after score.
    pub weight: u32,
    pub source_layer: Option<LayerName>,
    pub matched_layers: Vec<LayerName>,
    /// Vocabulary term that produced the best match.
    pub matched_term: Option<String>,
    /// Heading anchor for deep links.
    pub section_id: Option<String>,
    /// Heading text of the matched section, or the document title.
    pub snippet: Option<String>,
}

/// Autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub term: String,
    pub doc_freq: u32,
}
