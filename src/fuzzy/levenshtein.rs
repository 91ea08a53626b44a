// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bounded edit distance for one-off comparisons.
//!
//! `|len(a) - len(b)|` is a lower bound on edit distance, so strings whose
//! char counts differ by more than the bound never reach the O(nm) DP. The
//! DP also stops as soon as a whole row exceeds the bound.

/// Levenshtein distance between `a` and `b` if it is at most `max`.
///
/// Counts chars, not bytes.
pub fn bounded_distance(a: &str, b: &str, max: u8) -> Option<u8> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let max = max as usize;

    if a.len().abs_diff(b.len()) > max {
        return None;
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ac) in a.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];
        for (j, &bc) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1)
                .min(row[j] + 1)
                .min(diag + usize::from(ac != bc));
            diag = above;
            row_min = row_min.min(row[j + 1]);
        }
        if row_min > max {
            return None;
        }
    }

    let d = row[b.len()];
    (d <= max).then_some(d as u8)
}
