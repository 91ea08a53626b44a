// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search options handed in by a host as JSON.
//!
//! Every field is optional and unknown fields are ignored, so hosts can pass
//! whatever options object they already have.
//!
//! ```json
//! { "limit": 20, "fuzzy": false, "boost": { "title": 50 } }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SieveError};
use crate::types::LayerName;

/// Result count used when no positive limit is given.
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Maximum results; zero or negative means [`DEFAULT_LIMIT`].
    #[serde(deserialize_with = "deserialize_limit")]
    pub limit: usize,
    /// Run the fuzzy tier.
    pub fuzzy: bool,
    /// Run the prefix tier.
    pub prefix: bool,
    pub boost: BoostOptions,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            fuzzy: true,
            prefix: true,
            boost: BoostOptions::default(),
        }
    }
}

impl SearchOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SieveError::InvalidQuery(e.to_string()))
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = effective_limit(limit);
        self
    }

    /// The limit actually applied.
    pub fn effective_limit(&self) -> usize {
        effective_limit(self.limit)
    }
}

/// Per-layer score multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostOptions {
    pub title: f64,
    pub heading: f64,
    pub content: f64,
}

impl Default for BoostOptions {
    fn default() -> Self {
        Self {
            title: 100.0,
            heading: 10.0,
            content: 1.0,
        }
    }
}

impl BoostOptions {
    pub fn for_layer(&self, layer: LayerName) -> f64 {
        match layer {
            LayerName::Titles => self.title,
            LayerName::Headings => self.heading,
            LayerName::Content => self.content,
        }
    }
}

pub(crate) fn effective_limit(limit: usize) -> usize {
    if limit == 0 {
        DEFAULT_LIMIT
    } else {
        limit
    }
}

fn deserialize_limit<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(match raw {
        Some(v) if v >= 1.0 => v.min(usize::MAX as f64) as usize,
        _ => DEFAULT_LIMIT,
    })
}
