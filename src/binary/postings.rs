// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Postings list encoding/decoding and skip lists.
//!
//! Postings are the heart of an inverted index: for each term, which documents
//! contain it? Doc IDs are delta-encoded in blocks of 128 and each block is
//! bit-packed at a width chosen for that block (patched frame of reference).
//! Deltas that don't fit the width are stored as exceptions after the packed
//! data, so one outlier gap doesn't inflate the whole block.
//!
//! Skip lists are for when you have a huge posting list and need to jump to
//! doc_id 50000 without scanning 49999 entries. Lists spanning at least
//! `SKIP_BLOCK_THRESHOLD` blocks get one entry per block.
//!
//! # Block layout (n = min(128, postings left))
//!
//! ```text
//! bit_width:       u8        (0..=32)
//! exception_count: u8        (<= n)
//! packed:          [u8; ceil(n * bit_width / 8)]   low bits, LSB first
//! exceptions:      exception_count x [position: u8][high_bits: varint]
//! section_idx:     [varint; n]
//! weight:          [varint; n]
//! ```
//!
//! # References
//!
//! - **PFOR**: Zukowski, Heman, Nes, Boncz (2006): "Super-Scalar RAM-CPU Cache
//!   Compression", ICDE.
//! - **Delta Encoding for Postings**: Zobel & Moffat (2006): "Inverted Files for
//!   Text Search Engines", ACM Computing Surveys.

use super::encoding::{encode_varint, ByteReader};
use super::header::{BLOCK_SIZE, SKIP_BLOCK_THRESHOLD};
use crate::error::{Result, SieveError};
use crate::types::Posting;

// ============================================================================
// BIT PACKING
// ============================================================================

/// Bits needed to represent `value`.
pub(crate) fn bits_needed(value: u32) -> u8 {
    (32 - value.leading_zeros()) as u8
}

fn varint_len(value: u64) -> usize {
    ((64 - value.leading_zeros() as usize).max(1)).div_ceil(7)
}

fn packed_len(n: usize, bit_width: u8) -> usize {
    (n * bit_width as usize).div_ceil(8)
}

/// Pick the width minimizing packed bytes plus exception bytes.
pub fn choose_bit_width(deltas: &[u32]) -> u8 {
    let max_width = deltas.iter().copied().map(bits_needed).max().unwrap_or(0);
    let mut best = (packed_len(deltas.len(), max_width), max_width);

    for width in 0..max_width {
        let mut cost = packed_len(deltas.len(), width);
        for &d in deltas {
            if bits_needed(d) > width {
                cost += 1 + varint_len(u64::from(d) >> width);
            }
        }
        if cost < best.0 {
            best = (cost, width);
        }
    }
    best.1
}

fn pack_bits(values: &[u32], bit_width: u8, buf: &mut Vec<u8>) {
    if bit_width == 0 {
        return;
    }
    let mask = if bit_width == 32 {
        u64::from(u32::MAX)
    } else {
        (1u64 << bit_width) - 1
    };
    let mut acc: u64 = 0;
    let mut acc_bits = 0u32;
    for &v in values {
        acc |= (u64::from(v) & mask) << acc_bits;
        acc_bits += u32::from(bit_width);
        while acc_bits >= 8 {
            buf.push(acc as u8);
            acc >>= 8;
            acc_bits -= 8;
        }
    }
    if acc_bits > 0 {
        buf.push(acc as u8);
    }
}

fn unpack_bits(data: &[u8], n: usize, bit_width: u8) -> Vec<u32> {
    if bit_width == 0 {
        return vec![0; n];
    }
    let mut out = Vec::with_capacity(n);
    let mut acc: u64 = 0;
    let mut acc_bits = 0u32;
    let mut bytes = data.iter();
    let width = u32::from(bit_width);
    let mask = if bit_width == 32 {
        u64::from(u32::MAX)
    } else {
        (1u64 << bit_width) - 1
    };
    for _ in 0..n {
        while acc_bits < width {
            // caller guarantees data holds packed_len(n, bit_width) bytes
            let byte = bytes.next().copied().unwrap_or(0);
            acc |= u64::from(byte) << acc_bits;
            acc_bits += 8;
        }
        out.push((acc & mask) as u32);
        acc >>= width;
        acc_bits -= width;
    }
    out
}

// ============================================================================
// BLOCK PFOR
// ============================================================================

/// One decoded block: gaps between consecutive doc IDs plus per-posting payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBlock {
    pub deltas: Vec<u32>,
    pub sections: Vec<u32>,
    pub weights: Vec<u32>,
}

impl DecodedBlock {
    /// Rebuild postings by prefix-summing deltas onto `base`.
    ///
    /// `base` is the previous block's last doc ID (0 before the first block).
    /// Gaps after the first posting of a list must be positive.
    pub fn into_postings(self, base: u32, first_in_list: bool) -> Result<Vec<Posting>> {
        let mut out = Vec::with_capacity(self.deltas.len());
        let mut doc = base;
        for (i, ((delta, section_idx), weight)) in self
            .deltas
            .into_iter()
            .zip(self.sections)
            .zip(self.weights)
            .enumerate()
        {
            if delta == 0 && !(first_in_list && i == 0) {
                return Err(SieveError::corrupt(format!(
                    "postings: zero gap after doc {} breaks ascending order",
                    doc
                )));
            }
            doc = doc
                .checked_add(delta)
                .ok_or_else(|| SieveError::corrupt("postings: doc id overflows u32"))?;
            out.push(Posting::new(doc, section_idx, weight));
        }
        Ok(out)
    }
}

/// Encode one block of up to 128 postings.
pub fn encode_block(deltas: &[u32], sections: &[u32], weights: &[u32], buf: &mut Vec<u8>) {
    debug_assert!(deltas.len() <= BLOCK_SIZE);
    debug_assert!(deltas.len() == sections.len() && deltas.len() == weights.len());

    let width = choose_bit_width(deltas);
    let exceptions: Vec<(usize, u32)> = deltas
        .iter()
        .enumerate()
        .filter(|&(_, &d)| bits_needed(d) > width)
        .map(|(i, &d)| (i, d >> width))
        .collect();

    buf.push(width);
    buf.push(exceptions.len() as u8);
    pack_bits(deltas, width, buf);
    for (pos, high) in exceptions {
        buf.push(pos as u8);
        encode_varint(u64::from(high), buf);
    }
    for &s in sections {
        encode_varint(u64::from(s), buf);
    }
    for &w in weights {
        encode_varint(u64::from(w), buf);
    }
}

/// Decode one block of `n` postings from `reader`.
///
/// A width above 32, more exceptions than postings, or an exception outside
/// the block is `CorruptIndex`: nothing else in the list can be trusted.
pub fn decode_block(reader: &mut ByteReader<'_>, n: usize) -> Result<DecodedBlock> {
    let width = reader.u8()?;
    if width > 32 {
        return Err(reader.corrupt(format!("bit width {} exceeds 32", width)));
    }
    let exception_count = reader.u8()? as usize;
    if exception_count > n {
        return Err(reader.corrupt(format!(
            "{} exceptions in a block of {}",
            exception_count, n
        )));
    }

    let packed = reader.take(packed_len(n, width))?;
    let mut deltas = unpack_bits(packed, n, width);

    for _ in 0..exception_count {
        let pos = reader.u8()? as usize;
        if pos >= n {
            return Err(reader.corrupt(format!("exception position {} outside block", pos)));
        }
        let high = reader.varint()?;
        let patched = u64::from(deltas[pos]) | (high << width.min(63));
        deltas[pos] = u32::try_from(patched)
            .map_err(|_| reader.corrupt("patched delta overflows u32"))?;
    }

    let sections = (0..n)
        .map(|_| reader.varint_u32())
        .collect::<Result<Vec<_>>>()?;
    let weights = (0..n)
        .map(|_| reader.varint_u32())
        .collect::<Result<Vec<_>>>()?;

    Ok(DecodedBlock {
        deltas,
        sections,
        weights,
    })
}

// ============================================================================
// POSTING LISTS
// ============================================================================

/// Skip pointer for one block of a long posting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipEntry {
    pub first_doc: u32,
    /// Offset of the block, relative to the first block of the list.
    pub byte_offset: u32,
}

/// Encode a term's posting list: `doc_freq: varint` followed by its blocks.
///
/// Postings must be sorted by doc ID without duplicates. Returns skip
/// entries when the list is long enough to carry a skip list.
pub fn encode_posting_list(postings: &[Posting], buf: &mut Vec<u8>) -> Option<Vec<SkipEntry>> {
    encode_varint(postings.len() as u64, buf);
    let blocks_start = buf.len();
    let mut skips = Vec::new();
    let mut prev = 0u32;

    for block in postings.chunks(BLOCK_SIZE) {
        skips.push(SkipEntry {
            first_doc: block[0].doc_id.0,
            byte_offset: (buf.len() - blocks_start) as u32,
        });
        let deltas: Vec<u32> = block
            .iter()
            .map(|p| {
                let d = p.doc_id.0 - prev;
                prev = p.doc_id.0;
                d
            })
            .collect();
        let sections: Vec<u32> = block.iter().map(|p| p.section_idx).collect();
        let weights: Vec<u32> = block.iter().map(|p| p.weight).collect();
        encode_block(&deltas, &sections, &weights, buf);
    }

    (skips.len() >= SKIP_BLOCK_THRESHOLD).then_some(skips)
}

/// Number of blocks holding `doc_freq` postings.
pub fn block_count(doc_freq: usize) -> usize {
    doc_freq.div_ceil(BLOCK_SIZE)
}

/// Postings held by block `index` of a list with `doc_freq` entries.
pub fn block_len(doc_freq: usize, index: usize) -> usize {
    (doc_freq - index * BLOCK_SIZE).min(BLOCK_SIZE)
}

// ============================================================================
// SKIP LIST SECTION
// ============================================================================

/// Encode the skip-list section.
///
/// Format, per term with a skip list (ascending term ordinal):
/// - term_ord: varint
/// - entry_count: varint
/// - entries: [first_doc: varint][byte_offset: varint] (both delta-coded)
pub fn encode_skip_lists(lists: &[(u32, Vec<SkipEntry>)], buf: &mut Vec<u8>) {
    for (term_ord, entries) in lists {
        encode_varint(u64::from(*term_ord), buf);
        encode_varint(entries.len() as u64, buf);
        let mut prev = SkipEntry {
            first_doc: 0,
            byte_offset: 0,
        };
        for entry in entries {
            encode_varint(u64::from(entry.first_doc - prev.first_doc), buf);
            encode_varint(u64::from(entry.byte_offset - prev.byte_offset), buf);
            prev = *entry;
        }
    }
}

pub fn decode_skip_lists(bytes: &[u8]) -> Result<Vec<(u32, Vec<SkipEntry>)>> {
    let mut reader = ByteReader::new(bytes, "skip-lists");
    let mut lists = Vec::new();
    let mut last_term: Option<u32> = None;

    while !reader.is_empty() {
        let term_ord = reader.varint_u32()?;
        if last_term.is_some_and(|t| t >= term_ord) {
            return Err(reader.corrupt("skip lists out of term order"));
        }
        last_term = Some(term_ord);

        let count = reader.count(2)?;
        let mut entries = Vec::with_capacity(count);
        let mut first_doc = 0u32;
        let mut byte_offset = 0u32;
        for _ in 0..count {
            first_doc = first_doc
                .checked_add(reader.varint_u32()?)
                .ok_or_else(|| reader.corrupt("skip doc id overflows u32"))?;
            byte_offset = byte_offset
                .checked_add(reader.varint_u32()?)
                .ok_or_else(|| reader.corrupt("skip offset overflows u32"))?;
            entries.push(SkipEntry {
                first_doc,
                byte_offset,
            });
        }
        lists.push((term_ord, entries));
    }
    Ok(lists)
}
