// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Dictionary tables for string deduplication (Parquet-style compression).
//!
//! Category "guides" on 400 documents? Store it once, reference it by index.
//! Same for href prefixes: "/docs/reference/" shows up on most pages of a
//! documentation site, so the docs section stores only what follows it.
//!
//! # References
//!
//! - **Dictionary Encoding**: Melnik et al. (2010): "Dremel: Interactive Analysis
//!   of Web-Scale Datasets", VLDB. Apache Parquet encodings:
//!   <https://parquet.apache.org/docs/file-format/data-pages/encodings/>
//!
//! # Wire Format
//!
//! ```text
//! num_tables: u8 (2)
//! category:    count: varint, then count x [len: varint][utf8]
//! href_prefix: count: varint, then count x [len: varint][utf8]
//! ```

use std::collections::HashMap;

use super::encoding::{encode_string, encode_varint, ByteReader};
use crate::error::{Result, SieveError};

const NUM_TABLES: u8 = 2;

/// Insertion-ordered string dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictTable {
    strings: Vec<String>,
    lookup: HashMap<String, u32>,
}

impl DictTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a string and return its index, reusing an existing entry.
    pub fn insert(&mut self, s: &str) -> u32 {
        if let Some(&idx) = self.lookup.get(s) {
            return idx;
        }
        let idx = self.strings.len() as u32;
        self.strings.push(s.to_string());
        self.lookup.insert(s.to_string(), idx);
        idx
    }

    pub fn get(&self, idx: u32) -> Option<&str> {
        self.strings.get(idx as usize).map(String::as_str)
    }

    /// Resolve a 1-based reference where 0 means "absent".
    pub fn resolve(&self, reference: u32, kind: &'static str) -> Result<Option<&str>> {
        match reference {
            0 => Ok(None),
            r => self
                .get(r - 1)
                .map(Some)
                .ok_or_else(|| SieveError::out_of_range(kind, r, self.strings.len() as u64)),
        }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        encode_varint(self.strings.len() as u64, buf);
        for s in &self.strings {
            encode_string(s, buf);
        }
    }

    fn decode(reader: &mut ByteReader<'_>) -> Result<Self> {
        let count = reader.count(1)?;
        let mut table = Self::new();
        for _ in 0..count {
            let s = reader.string()?;
            table.lookup.insert(s.clone(), table.strings.len() as u32);
            table.strings.push(s);
        }
        Ok(table)
    }
}

/// The dictionaries referenced by the docs section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictTables {
    pub category: DictTable,
    pub href_prefix: DictTable,
}

impl DictTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_empty() && self.href_prefix.is_empty()
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(NUM_TABLES);
        self.category.encode(buf);
        self.href_prefix.encode(buf);
    }

    /// Decode the section. An empty section means no dictionaries.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::new());
        }
        let mut reader = ByteReader::new(data, "dict-tables");
        let num_tables = reader.u8()?;
        if num_tables != NUM_TABLES {
            return Err(reader.corrupt(format!(
                "expected {} dict tables, got {}",
                NUM_TABLES, num_tables
            )));
        }
        let category = DictTable::decode(&mut reader)?;
        let href_prefix = DictTable::decode(&mut reader)?;
        if !reader.is_empty() {
            return Err(reader.corrupt("trailing bytes after dict tables"));
        }
        Ok(Self {
            category,
            href_prefix,
        })
    }
}
