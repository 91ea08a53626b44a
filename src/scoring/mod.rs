// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how search results get their numbers.
//!
//! Tier (exact, prefix, fuzzy) dominates everything else. Term weight breaks
//! ties inside a tier and layer boosts scale whole layers against each other.

mod core;
pub mod ranking;

pub use core::*;
