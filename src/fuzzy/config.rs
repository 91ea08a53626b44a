// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy-matching parameters carried at the front of the Levenshtein-DFA
//! section.
//!
//! ```text
//! min_query_len: u8
//! max_query_len: u8
//! threshold_count: u8
//! thresholds: [min_chars: u8, max_distance: u8] × threshold_count
//! ```
//!
//! Thresholds are sorted by `min_chars`; a query of `n` characters uses the
//! last threshold with `min_chars <= n`.

use crate::binary::ByteReader;
use crate::error::{Result, SieveError};

/// Largest edit distance an index may ask for.
pub const MAX_DISTANCE: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyConfig {
    /// Queries shorter than this (in chars) skip fuzzy matching.
    pub min_query_len: usize,
    /// Queries longer than this (in chars) skip fuzzy matching.
    pub max_query_len: usize,
    /// `(min_chars, max_distance)`, ascending by `min_chars`.
    pub thresholds: Vec<(usize, u8)>,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            max_query_len: 64,
            thresholds: vec![(2, 1), (5, 2)],
        }
    }
}

impl FuzzyConfig {
    /// Edit distance allowed for a query term, or `None` when the term is
    /// outside the fuzzy length window.
    pub fn max_distance(&self, query: &str) -> Option<u8> {
        let len = query.chars().count();
        if len < self.min_query_len || len > self.max_query_len {
            return None;
        }
        self.thresholds
            .iter()
            .rev()
            .find(|&&(min_chars, _)| min_chars <= len)
            .map(|&(_, k)| k)
            .filter(|&k| k > 0)
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(self.min_query_len.min(u8::MAX as usize) as u8);
        buf.push(self.max_query_len.min(u8::MAX as usize) as u8);
        buf.push(self.thresholds.len().min(u8::MAX as usize) as u8);
        for &(min_chars, k) in self.thresholds.iter().take(u8::MAX as usize) {
            buf.push(min_chars.min(u8::MAX as usize) as u8);
            buf.push(k);
        }
    }

    /// Distances some threshold can ask for, ascending.
    pub fn distances(&self) -> Vec<u8> {
        let mut ks: Vec<u8> = self.thresholds.iter().map(|&(_, k)| k).filter(|&k| k > 0).collect();
        ks.sort_unstable();
        ks.dedup();
        ks
    }

    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self> {
        let min_query_len = reader.u8()? as usize;
        let max_query_len = reader.u8()? as usize;
        let count = reader.u8()? as usize;

        let mut thresholds = Vec::with_capacity(count);
        for _ in 0..count {
            let min_chars = reader.u8()? as usize;
            let k = reader.u8()?;
            if k > MAX_DISTANCE {
                return Err(SieveError::out_of_range("fuzzy distance", k, MAX_DISTANCE));
            }
            if thresholds.last().is_some_and(|&(prev, _)| prev >= min_chars) {
                return Err(reader.corrupt("fuzzy thresholds not ascending"));
            }
            thresholds.push((min_chars, k));
        }
        Ok(Self {
            min_query_len,
            max_query_len,
            thresholds,
        })
    }
}
