// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Document metadata store and the manifest that seeds a progressive index.
//!
//! Documents are addressed by position: `DocId(n)` is the n-th entry. The
//! store is built once at decode time and never mutated.

use serde::{Deserialize, Serialize};

use crate::binary::Container;
use crate::error::{Result, SieveError};
use crate::types::DocId;

/// A heading inside a document, used for deep links and snippets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    pub section_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    pub href: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub headings: Vec<Heading>,
}

impl Document {
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            category: None,
            headings: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_heading(mut self, section_id: impl Into<String>, text: impl Into<String>) -> Self {
        self.headings.push(Heading {
            section_id: section_id.into(),
            text: text.into(),
        });
        self
    }

    pub fn heading(&self, section_id: &str) -> Option<&Heading> {
        self.headings.iter().find(|h| h.section_id == section_id)
    }
}

/// Immutable, position-addressed document metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentStore {
    docs: Vec<Document>,
}

impl DocumentStore {
    pub fn new(docs: Vec<Document>) -> Self {
        Self { docs }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.docs.get(id.as_usize())
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    /// Display context for a hit: the matched heading's text when the section
    /// is known, else the document title.
    pub fn snippet(&self, id: DocId, section_id: Option<&str>) -> Option<String> {
        let doc = self.get(id)?;
        let heading = section_id.and_then(|s| doc.heading(s));
        Some(heading.map_or_else(|| doc.title.clone(), |h| h.text.clone()))
    }
}

/// Document metadata without search structures: the payload a progressive
/// index is built from before any layer arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub docs: Vec<Document>,
}

impl Manifest {
    pub fn from_docs(docs: Vec<Document>) -> Self {
        Self { docs }
    }

    /// Parse a JSON manifest: `{"docs": [{"title": .., "href": .., ..}]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SieveError::corrupt(format!("manifest: {}", e)))
    }

    /// Take the document section of a `.sieve` container. Any layer file (or a
    /// container holding only documents) works.
    pub fn from_container(bytes: &[u8]) -> Result<Self> {
        let container = Container::decode(bytes)?;
        Ok(Self {
            docs: container.decode_documents()?,
        })
    }

    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn into_store(self) -> DocumentStore {
        DocumentStore::new(self.docs)
    }
}
