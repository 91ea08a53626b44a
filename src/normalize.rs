// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query normalization and tokenization.
//!
//! Index terms are stored normalized, so queries go through the same folding
//! before lookup:
//! - "Café" → "cafe"
//! - "Tummalachērla" → "tummalacherla"
//! - "  naïve   cats " → "naive cats"

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Fold case, strip diacritics and collapse whitespace.
///
/// Without the `unicode-normalization` feature only case folding and
/// whitespace collapsing happen; input is assumed pre-normalized.
pub fn normalize(value: &str) -> String {
    fold(value).split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(feature = "unicode-normalization")]
fn fold(value: &str) -> String {
    value
        .nfd()
        .filter(|&c| !is_combining_mark(c))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(not(feature = "unicode-normalization"))]
fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// Split a query into normalized terms.
///
/// Anything that is not alphanumeric separates terms. Duplicate terms are
/// kept once, first occurrence wins.
pub fn tokenize(query: &str) -> Vec<String> {
    let folded = normalize(query);
    let mut terms: Vec<String> = Vec::new();
    for word in folded.split(|c: char| !c.is_alphanumeric()) {
        if !word.is_empty() && !terms.iter().any(|t| t == word) {
            terms.push(word.to_string());
        }
    }
    terms
}
