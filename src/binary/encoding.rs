// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives: varint, front compression, and separated streams.
//!
//! Varint for integers that are usually small. Front compression for sorted
//! strings that share prefixes. Separated streams for the suffix array so the
//! term ordinals and offsets each compress as homogeneous runs.
//!
//! # References
//!
//! - **Varint (LEB128)**: DWARF4 §7.6, and the Protocol Buffers encoding guide
//!   <https://protobuf.dev/programming-guides/encoding/>
//! - **Front Coding**: Witten, Moffat, Bell (1999), "Managing Gigabytes", §3.3

use super::header::MAX_VARINT_BYTES;
use crate::error::{Result, SieveError};

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

/// Decode a varint from bytes, returning (value, bytes_consumed).
///
/// Fails on an empty buffer, a buffer ending mid-varint, or a varint longer
/// than `MAX_VARINT_BYTES`.
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0;

    for (i, &byte) in bytes.iter().take(MAX_VARINT_BYTES).enumerate() {
        result |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
        shift += 7;
    }

    if bytes.len() >= MAX_VARINT_BYTES {
        Err(SieveError::corrupt("varint exceeds maximum length"))
    } else {
        Err(SieveError::corrupt("incomplete varint"))
    }
}

// ============================================================================
// BYTE READER
// ============================================================================

/// Bounds-checked cursor over one section's bytes.
///
/// Every read failure is reported as `CorruptIndex` naming the section, since
/// the container layer has already proven the section itself is in bounds.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    section: &'static str,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8], section: &'static str) -> Self {
        Self {
            bytes,
            pos: 0,
            section,
        }
    }

    pub fn at(bytes: &'a [u8], pos: usize, section: &'static str) -> Self {
        Self {
            bytes,
            pos,
            section,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn corrupt(&self, what: impl std::fmt::Display) -> SieveError {
        SieveError::corrupt(format!("{} at byte {}: {}", self.section, self.pos, what))
    }

    pub fn varint(&mut self) -> Result<u64> {
        let rest = self.bytes.get(self.pos..).unwrap_or_default();
        let (value, consumed) = decode_varint(rest).map_err(|e| self.corrupt(e))?;
        self.pos += consumed;
        Ok(value)
    }

    /// Varint that must fit in a u32.
    pub fn varint_u32(&mut self) -> Result<u32> {
        let value = self.varint()?;
        u32::try_from(value).map_err(|_| self.corrupt(format!("value {} overflows u32", value)))
    }

    /// Varint used as a length or count; must not exceed the bytes left,
    /// given that each counted item occupies at least `min_item_bytes`.
    pub fn count(&mut self, min_item_bytes: usize) -> Result<usize> {
        let value = self.varint()?;
        let max = self.remaining() / min_item_bytes.max(1);
        if value > max as u64 {
            return Err(self.corrupt(format!("count {} exceeds available bytes", value)));
        }
        Ok(value as usize)
    }

    pub fn u8(&mut self) -> Result<u8> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| self.corrupt("unexpected end of section"))?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| self.corrupt(format!("{} bytes requested past end of section", len)))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Length-prefixed UTF-8 string.
    pub fn string(&mut self) -> Result<String> {
        let len = self.count(1)?;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|e| self.corrupt(e))
    }
}

/// Write a length-prefixed UTF-8 string.
pub fn encode_string(s: &str, buf: &mut Vec<u8>) {
    encode_varint(s.len() as u64, buf);
    buf.extend_from_slice(s.as_bytes());
}

// ============================================================================
// SECTION TABLE ENCODING
// ============================================================================

/// Encode section ID string table (deduplicated, length-prefixed)
pub fn encode_section_table(section_ids: &[String], buf: &mut Vec<u8>) {
    encode_varint(section_ids.len() as u64, buf);
    for id in section_ids {
        encode_string(id, buf);
    }
}

/// Decode section ID string table. An empty section is an empty table.
pub fn decode_section_table(bytes: &[u8]) -> Result<Vec<String>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = ByteReader::new(bytes, "section-table");
    let count = reader.count(1)?;
    (0..count).map(|_| reader.string()).collect()
}

// ============================================================================
// SUFFIX ARRAY ENCODING (separated streams)
// ============================================================================

/// Encode suffix array entries `(term_ord, byte_offset)`.
///
/// Format:
/// - count: varint
/// - term_ords: [varint; count]
/// - offsets: [varint; count]
pub fn encode_suffix_array(entries: &[(u32, u32)], buf: &mut Vec<u8>) {
    encode_varint(entries.len() as u64, buf);
    for &(term_ord, _) in entries {
        encode_varint(u64::from(term_ord), buf);
    }
    for &(_, offset) in entries {
        encode_varint(u64::from(offset), buf);
    }
}

pub fn decode_suffix_array(bytes: &[u8]) -> Result<Vec<(u32, u32)>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = ByteReader::new(bytes, "suffix-array");
    // two varints of at least one byte each per entry
    let count = reader.count(2)?;
    let term_ords = (0..count)
        .map(|_| reader.varint_u32())
        .collect::<Result<Vec<_>>>()?;
    let mut entries = Vec::with_capacity(count);
    for term_ord in term_ords {
        entries.push((term_ord, reader.varint_u32()?));
    }
    Ok(entries)
}

// ============================================================================
// VOCABULARY ENCODING (front compression)
// ============================================================================

/// Calculate the common prefix length between two byte slices.
pub(crate) fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Encode a sorted vocabulary with front compression.
///
/// Format: `[shared_prefix_len: varint][suffix_len: varint][suffix: bytes]`
///
/// - "application"  -> [0][11]["application"]
/// - "applications" -> [11][1]["s"]
/// - "apply"        -> [3][2]["ly"]
pub fn encode_vocabulary(vocabulary: &[String], out: &mut Vec<u8>) {
    let mut prev: &[u8] = &[];
    for term in vocabulary {
        let bytes = term.as_bytes();
        let shared = common_prefix_len(prev, bytes);
        encode_varint(shared as u64, out);
        encode_varint((bytes.len() - shared) as u64, out);
        out.extend_from_slice(&bytes[shared..]);
        prev = bytes;
    }
}

/// Decode `term_count` front-compressed terms. Trailing bytes are corruption.
pub fn decode_vocabulary(bytes: &[u8], term_count: usize) -> Result<Vec<String>> {
    let mut reader = ByteReader::new(bytes, "vocabulary");
    // each term costs at least two bytes (shared + suffix_len)
    if term_count > bytes.len() / 2 {
        return Err(SieveError::corrupt(format!(
            "vocabulary of {} bytes cannot hold {} terms",
            bytes.len(),
            term_count
        )));
    }

    let mut terms: Vec<String> = Vec::with_capacity(term_count);
    let mut prev: Vec<u8> = Vec::new();

    for i in 0..term_count {
        let shared = reader.varint()? as usize;
        if shared > prev.len() {
            return Err(reader.corrupt(format!(
                "term {} shares {} bytes with a {}-byte predecessor",
                i,
                shared,
                prev.len()
            )));
        }
        let suffix_len = reader.count(1)?;
        let suffix = reader.take(suffix_len)?;

        prev.truncate(shared);
        prev.extend_from_slice(suffix);

        let term = std::str::from_utf8(&prev)
            .map_err(|e| reader.corrupt(format!("term {}: {}", i, e)))?
            .to_string();
        if let Some(last) = terms.last() {
            if last.as_str() >= term.as_str() {
                return Err(reader.corrupt(format!("term {} breaks sort order", i)));
            }
        }
        terms.push(term);
    }

    if !reader.is_empty() {
        return Err(reader.corrupt("trailing bytes after last term"));
    }
    Ok(terms)
}
