// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for container decoding and index construction.
//!
//! Every failure here is fatal to building the Searcher or layer it came from.
//! Queries against a constructed index never fail: an empty result list is a
//! successful answer, an error means the layer is unavailable.

use thiserror::Error;

/// Everything that can go wrong while turning bytes into a searchable index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SieveError {
    /// First four bytes are not the `.sieve` magic.
    #[error("invalid magic: expected {expected:02x?}, got {found:02x?}")]
    InvalidMagic { expected: [u8; 4], found: Vec<u8> },

    #[error("unsupported format version {found} (minimum {minimum}, current {current})")]
    UnsupportedVersion { found: u8, minimum: u8, current: u8 },

    /// A section (or the header itself) runs past the end of the buffer.
    #[error("truncated container: {section} extends past end of buffer")]
    Truncated { section: &'static str },

    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    /// A stored ID points outside the ID space it belongs to.
    #[error("{kind} reference {value} out of range (limit {limit})")]
    OutOfRangeReference {
        kind: &'static str,
        value: u64,
        limit: u64,
    },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("unknown layer '{0}' (expected titles, headings or content)")]
    UnknownLayer(String),
}

impl SieveError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptIndex(msg.into())
    }

    pub(crate) fn out_of_range(kind: &'static str, value: impl Into<u64>, limit: impl Into<u64>) -> Self {
        Self::OutOfRangeReference {
            kind,
            value: value.into(),
            limit: limit.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SieveError>;
