// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Client-side full-text search over static document collections.
//!
//! An index ships as one or more `.sieve` containers. Each decodes into a
//! [`Searcher`] that answers queries in three tiers: exact term, prefix
//! expansion, then bounded edit distance. A [`ProgressiveIndex`] composes the
//! titles, headings and content layers so queries get answers from whichever
//! layers have arrived.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────────────────────────────────┐
//! │  .sieve      │────▶│ binary: header, sections, footer CRC         │
//! │  bytes       │     └──────────────────────────────────────────────┘
//! └──────────────┘            │            │            │          │
//!                             ▼            ▼            ▼          ▼
//!                      ┌───────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐
//!                      │vocabulary │ │ postings │ │ suffix  │ │ fuzzy  │
//!                      └───────────┘ └──────────┘ └─────────┘ └────────┘
//!                             └───────────┴────────────┴──────────┘
//!                                              │
//!                                              ▼
//!                      ┌──────────────────────────────────────────────┐
//!                      │ search::Searcher   exact → prefix → fuzzy    │
//!                      └──────────────────────────────────────────────┘
//!                                              │  × 3 layers
//!                                              ▼
//!                      ┌──────────────────────────────────────────────┐
//!                      │ progressive::ProgressiveIndex  boost + max   │
//!                      └──────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use sieve::{Searcher, SearchOptions};
//!
//! let searcher = Searcher::from_bytes(&std::fs::read("index.sieve")?)?;
//! for hit in searcher.search("rust", 10) {
//!     println!("{} {:.2} {:?}", hit.doc_id, hit.score, hit.matched_term);
//! }
//! ```

pub mod binary;
pub mod docs;
pub mod error;
pub mod fuzzy;
pub mod normalize;
pub mod options;
pub mod postings;
pub mod progressive;
pub mod scoring;
pub mod search;
pub mod suffix;
pub mod testing;
pub mod types;
pub mod vocabulary;

pub use docs::{Document, DocumentStore, Heading, Manifest};
pub use error::{Result, SieveError};
pub use fuzzy::{FuzzyConfig, FuzzyMatcher, LevenshteinDfa};
pub use normalize::{normalize, tokenize};
pub use options::{BoostOptions, SearchOptions, DEFAULT_LIMIT};
pub use postings::PostingsStore;
pub use progressive::ProgressiveIndex;
pub use search::Searcher;
pub use suffix::SuffixIndex;
pub use types::{DocId, LayerName, Posting, SearchResult, Suggestion, TermId, Tier};
pub use vocabulary::Vocabulary;
