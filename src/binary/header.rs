// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format header and footer structures.
//!
//! The header is 52 bytes of fixed-size fields, parsed in one read before
//! anything else. Its length fields tell you exactly where every section lives.
//!
//! The footer is 8 bytes: a CRC32 checksum over everything before it, plus the
//! header magic reversed ("TFIS"). A bad footer means truncation or bit rot.
//!
//! `SectionOffsets` is the single source of truth for file layout. Every
//! piece of code that reads or writes sections goes through it.

use crc32fast::Hasher as Crc32Hasher;

use crate::error::{Result, SieveError};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "SIFT" in ASCII (header)
pub const MAGIC: [u8; 4] = [0x53, 0x49, 0x46, 0x54];

/// Footer magic: "TFIS" (reversed, marks valid file end)
pub const FOOTER_MAGIC: [u8; 4] = [0x54, 0x46, 0x49, 0x53];

/// Current format version written by the encoder.
pub const VERSION: u8 = 7;

/// Oldest version whose section layout this decoder understands.
pub const MIN_VERSION: u8 = 7;

/// Postings per PFOR block (Lucene uses 128)
pub const BLOCK_SIZE: usize = 128;

/// Lists with at least this many blocks get a skip list.
pub const SKIP_BLOCK_THRESHOLD: usize = 8;

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious input)
// ============================================================================

/// Maximum file size: 100 MB (prevents huge allocations)
pub const MAX_FILE_SIZE: usize = 100 * 1024 * 1024;

pub const MAX_DOC_COUNT: u32 = 10_000_000;

pub const MAX_TERM_COUNT: u32 = 10_000_000;

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

// ============================================================================
// FLAGS
// ============================================================================

/// Format flags, stored in the byte after the version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags(pub(crate) u8);

impl FormatFlags {
    pub const HAS_SKIP_LISTS: u8 = 0b0000_0001;

    pub fn new() -> Self {
        Self(0)
    }

    pub fn with_skip_lists(mut self) -> Self {
        self.0 |= Self::HAS_SKIP_LISTS;
        self
    }

    pub fn has_skip_lists(self) -> bool {
        self.0 & Self::HAS_SKIP_LISTS != 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

// ============================================================================
// HEADER
// ============================================================================

/// Container header (52 bytes fixed size).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SieveHeader {
    pub version: u8,
    pub flags: FormatFlags,
    pub doc_count: u32,
    pub term_count: u32,
    pub vocab_len: u32,
    pub sa_len: u32,
    pub postings_len: u32,
    pub skip_len: u32,
    /// Section ID string table, used for deep links
    pub section_table_len: u32,
    /// Fuzzy matcher configuration
    pub lev_dfa_len: u32,
    pub docs_len: u32,
    /// Embedded executable module, opaque to the engine
    pub module_len: u32,
    /// Category and href-prefix dictionaries referenced by the docs section
    pub dict_table_len: u32,
}

impl SieveHeader {
    // 4 (magic) + 1 (version) + 1 (flags) + 11*4 (u32s) + 2 (reserved) = 52
    pub const SIZE: usize = 52;

    /// Compute section byte offsets for this header.
    pub fn section_offsets(&self) -> SectionOffsets {
        SectionOffsets::from_header(self)
    }

    /// Section lengths in file order.
    fn lengths(&self) -> [u32; 9] {
        [
            self.vocab_len,
            self.sa_len,
            self.postings_len,
            self.skip_len,
            self.section_table_len,
            self.lev_dfa_len,
            self.docs_len,
            self.module_len,
            self.dict_table_len,
        ]
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.push(self.version);
        out.push(self.flags.0);
        for field in [self.doc_count, self.term_count]
            .into_iter()
            .chain(self.lengths())
        {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.extend_from_slice(&[0u8; 2]); // reserved
    }

    /// Parse the fixed header. Magic is checked before anything else so a
    /// foreign file is always reported as `InvalidMagic`.
    pub fn read(bytes: &[u8]) -> Result<Self> {
        let magic = bytes.get(..4).unwrap_or(bytes);
        if magic.len() < 4 && MAGIC.starts_with(magic) {
            return Err(SieveError::Truncated { section: "header" });
        }
        if magic != MAGIC {
            return Err(SieveError::InvalidMagic {
                expected: MAGIC,
                found: magic.to_vec(),
            });
        }
        let buf = bytes
            .get(4..Self::SIZE)
            .ok_or(SieveError::Truncated { section: "header" })?;

        let u32_at = |i: usize| u32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);

        Ok(Self {
            version: buf[0],
            flags: FormatFlags(buf[1]),
            doc_count: u32_at(2),
            term_count: u32_at(6),
            vocab_len: u32_at(10),
            sa_len: u32_at(14),
            postings_len: u32_at(18),
            skip_len: u32_at(22),
            section_table_len: u32_at(26),
            lev_dfa_len: u32_at(30),
            docs_len: u32_at(34),
            module_len: u32_at(38),
            dict_table_len: u32_at(42),
            // buf[46..48] is reserved
        })
    }

    /// Reject containers older than [`MIN_VERSION`]. Newer versions keep the
    /// section layout and are read as-is; the section decoders and the CRC
    /// still validate every byte.
    pub fn check_version(&self) -> Result<()> {
        if self.version < MIN_VERSION {
            return Err(SieveError::UnsupportedVersion {
                found: self.version,
                minimum: MIN_VERSION,
                current: VERSION,
            });
        }
        Ok(())
    }
}

// ============================================================================
// FOOTER (8 bytes)
// ============================================================================

/// Footer with CRC32 checksum and magic number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SieveFooter {
    /// CRC32 of header + all sections (everything before the footer)
    pub crc32: u32,
}

impl SieveFooter {
    pub const SIZE: usize = 8; // 4 bytes CRC32 + 4 bytes magic

    pub fn for_content(content: &[u8]) -> Self {
        Self {
            crc32: Self::compute_crc32(content),
        }
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.crc32.to_le_bytes());
        out.extend_from_slice(&FOOTER_MAGIC);
    }

    /// Read the footer occupying the last 8 bytes of `bytes`.
    pub fn read(bytes: &[u8]) -> Result<Self> {
        let start = bytes
            .len()
            .checked_sub(Self::SIZE)
            .ok_or(SieveError::Truncated { section: "footer" })?;
        let footer = &bytes[start..];
        if footer[4..] != FOOTER_MAGIC {
            return Err(SieveError::corrupt(format!(
                "invalid footer magic: expected TFIS, got {:02x?}",
                &footer[4..]
            )));
        }
        Ok(Self {
            crc32: u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]),
        })
    }

    pub fn compute_crc32(data: &[u8]) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}

// ============================================================================
// SECTION OFFSETS
// ============================================================================

/// Byte ranges of every section, computed by running sums of the header
/// length fields in file order:
///
/// ```text
/// HEADER [52] VOCAB SA POSTINGS SKIP SECTION_TABLE LEV_DFA DOCS MODULE DICT FOOTER [8]
/// ```
///
/// Reordering these is a format change and needs a version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionOffsets {
    pub vocabulary: (usize, usize),
    pub suffix_array: (usize, usize),
    pub postings: (usize, usize),
    pub skip_lists: (usize, usize),
    pub section_table: (usize, usize),
    pub lev_dfa: (usize, usize),
    pub docs: (usize, usize),
    pub module: (usize, usize),
    pub dict_tables: (usize, usize),
    pub footer: (usize, usize),
}

/// Section names in file order, for error messages and the inspect report.
pub const SECTION_NAMES: [&str; 9] = [
    "vocabulary",
    "suffix-array",
    "postings",
    "skip-lists",
    "section-table",
    "lev-dfa",
    "docs",
    "module",
    "dict-tables",
];

impl SectionOffsets {
    pub fn from_header(h: &SieveHeader) -> Self {
        let mut ranges = [(0usize, 0usize); 9];
        let mut pos = SieveHeader::SIZE;
        for (range, len) in ranges.iter_mut().zip(h.lengths()) {
            let start = pos;
            // saturating: 32-bit targets report truncation instead of wrapping
            pos = pos.saturating_add(len as usize);
            *range = (start, pos);
        }
        let [vocabulary, suffix_array, postings, skip_lists, section_table, lev_dfa, docs, module, dict_tables] =
            ranges;
        Self {
            vocabulary,
            suffix_array,
            postings,
            skip_lists,
            section_table,
            lev_dfa,
            docs,
            module,
            dict_tables,
            footer: (pos, pos.saturating_add(SieveFooter::SIZE)),
        }
    }

    /// All section ranges paired with their names, in file order.
    pub fn named(&self) -> [(&'static str, (usize, usize)); 9] {
        [
            (SECTION_NAMES[0], self.vocabulary),
            (SECTION_NAMES[1], self.suffix_array),
            (SECTION_NAMES[2], self.postings),
            (SECTION_NAMES[3], self.skip_lists),
            (SECTION_NAMES[4], self.section_table),
            (SECTION_NAMES[5], self.lev_dfa),
            (SECTION_NAMES[6], self.docs),
            (SECTION_NAMES[7], self.module),
            (SECTION_NAMES[8], self.dict_tables),
        ]
    }

    /// Header plus all sections, without the footer.
    pub fn content_size(&self) -> usize {
        self.footer.0
    }

    pub fn total_size(&self) -> usize {
        self.footer.1
    }

    /// Slice one section out of the full container buffer.
    pub fn slice<'a>(
        bytes: &'a [u8],
        range: (usize, usize),
        section: &'static str,
    ) -> Result<&'a [u8]> {
        bytes
            .get(range.0..range.1)
            .ok_or(SieveError::Truncated { section })
    }
}
