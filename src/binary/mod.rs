// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary container format for `.sieve` search indexes.
//!
//! A container is a fixed header, nine length-prefixed sections and a CRC
//! footer. Decoding here is a pure transform from bytes to section buffers;
//! turning those buffers into searchable structures happens in the modules
//! that own them (vocabulary, postings, suffix, fuzzy, docs).
//!
//! # Security Considerations
//!
//! Containers are parsed from untrusted sources:
//! - All size fields are validated against MAX_* constants
//! - Every section range is bounds-checked before slicing
//! - CRC32 footer detects corruption/truncation
//! - Varint decoder has maximum iteration limits
//!
//! # Format Overview (v7)
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (52 bytes, little-endian)                           │
//! │   magic: [u8; 4] = "SIFT"                                  │
//! │   version: u8 = 7                                          │
//! │   flags: u8                                                │
//! │   doc_count: u32, term_count: u32                          │
//! │   vocab_len: u32, sa_len: u32, postings_len: u32           │
//! │   skip_len: u32, section_table_len: u32, lev_dfa_len: u32  │
//! │   docs_len: u32, module_len: u32, dict_table_len: u32      │
//! │   reserved: [u8; 2]                                        │
//! ├────────────────────────────────────────────────────────────┤
//! │ VOCABULARY     front-compressed sorted terms               │
//! │ SUFFIX_ARRAY   (term_ord, offset) streams                  │
//! │ POSTINGS       per term: doc_freq + PFOR blocks            │
//! │ SKIP_LISTS     block pointers for long lists               │
//! │ SECTION_TABLE  section_id strings for deep links           │
//! │ LEV_DFA        fuzzy matcher configuration                 │
//! │ DOCS           document metadata                           │
//! │ MODULE         embedded executable, opaque (optional)      │
//! │ DICT_TABLES    category / href-prefix dictionaries         │
//! ├────────────────────────────────────────────────────────────┤
//! │ FOOTER (8 bytes): crc32 + magic "TFIS"                     │
//! └────────────────────────────────────────────────────────────┘
//! ```

mod dict_table;
mod docs;
mod encoding;
mod header;
mod postings;

pub use dict_table::{DictTable, DictTables};
pub use docs::{decode_docs, encode_docs};
pub use encoding::{
    decode_section_table, decode_suffix_array, decode_varint, decode_vocabulary,
    encode_section_table, encode_string, encode_suffix_array, encode_varint, encode_vocabulary,
    ByteReader,
};
pub(crate) use encoding::common_prefix_len;
pub use header::{
    FormatFlags, SectionOffsets, SieveFooter, SieveHeader, BLOCK_SIZE, FOOTER_MAGIC, MAGIC,
    MAX_DOC_COUNT, MAX_FILE_SIZE, MAX_TERM_COUNT, MAX_VARINT_BYTES, MIN_VERSION,
    SECTION_NAMES, SKIP_BLOCK_THRESHOLD, VERSION,
};
pub use postings::{
    block_count, block_len, choose_bit_width, decode_block, decode_skip_lists, encode_block,
    encode_posting_list, encode_skip_lists, DecodedBlock, SkipEntry,
};

use tracing::debug;

use crate::docs::Document;
use crate::error::{Result, SieveError};

/// Section buffers of one `.sieve` file.
///
/// `doc_count` and `term_count` are carried through untouched; section
/// lengths are derived from the buffers when encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    pub version: u8,
    pub flags: FormatFlags,
    pub doc_count: u32,
    pub term_count: u32,
    pub vocabulary: Vec<u8>,
    pub suffix_array: Vec<u8>,
    pub postings: Vec<u8>,
    pub skip_lists: Vec<u8>,
    pub section_table: Vec<u8>,
    pub lev_dfa: Vec<u8>,
    pub documents: Vec<u8>,
    pub module: Vec<u8>,
    pub dict_tables: Vec<u8>,
}

/// Index-only bytes plus the embedded module, for hosts that load them
/// separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitContainer {
    pub index: Vec<u8>,
    pub module: Vec<u8>,
}

impl Container {
    pub fn new(doc_count: u32, term_count: u32) -> Self {
        Self {
            version: VERSION,
            doc_count,
            term_count,
            ..Self::default()
        }
    }

    /// Header describing the current section buffers.
    pub fn header(&self) -> SieveHeader {
        let len = |section: &Vec<u8>| section.len() as u32;
        SieveHeader {
            version: self.version,
            flags: self.flags,
            doc_count: self.doc_count,
            term_count: self.term_count,
            vocab_len: len(&self.vocabulary),
            sa_len: len(&self.suffix_array),
            postings_len: len(&self.postings),
            skip_len: len(&self.skip_lists),
            section_table_len: len(&self.section_table),
            lev_dfa_len: len(&self.lev_dfa),
            docs_len: len(&self.documents),
            module_len: len(&self.module),
            dict_table_len: len(&self.dict_tables),
        }
    }

    fn sections(&self) -> [&[u8]; 9] {
        [
            &self.vocabulary,
            &self.suffix_array,
            &self.postings,
            &self.skip_lists,
            &self.section_table,
            &self.lev_dfa,
            &self.documents,
            &self.module,
            &self.dict_tables,
        ]
    }

    /// Serialize header, sections and a fresh CRC footer.
    pub fn encode(&self) -> Vec<u8> {
        let header = self.header();
        let mut out = Vec::with_capacity(header.section_offsets().total_size());
        header.write(&mut out);
        for section in self.sections() {
            out.extend_from_slice(section);
        }
        SieveFooter::for_content(&out).write(&mut out);
        out
    }

    /// Parse and validate a container.
    ///
    /// Checks run in this order so each failure gets its most specific kind:
    /// magic, version, header counts, section bounds, footer, checksum.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MAX_FILE_SIZE {
            return Err(SieveError::corrupt(format!(
                "file too large: {} bytes (max {})",
                bytes.len(),
                MAX_FILE_SIZE
            )));
        }

        let header = SieveHeader::read(bytes)?;
        header.check_version()?;

        if header.doc_count > MAX_DOC_COUNT {
            return Err(SieveError::corrupt(format!(
                "too many documents: {} (max {})",
                header.doc_count, MAX_DOC_COUNT
            )));
        }
        if header.term_count > MAX_TERM_COUNT {
            return Err(SieveError::corrupt(format!(
                "too many terms: {} (max {})",
                header.term_count, MAX_TERM_COUNT
            )));
        }

        let offsets = header.section_offsets();
        for (name, (_, end)) in offsets.named() {
            if end > bytes.len() {
                return Err(SieveError::Truncated { section: name });
            }
        }
        if offsets.total_size() > bytes.len() {
            return Err(SieveError::Truncated { section: "footer" });
        }
        if offsets.total_size() < bytes.len() {
            return Err(SieveError::corrupt(format!(
                "section lengths cover {} bytes, buffer has {}",
                offsets.total_size(),
                bytes.len()
            )));
        }

        let footer = SieveFooter::read(bytes)?;
        let content = &bytes[..offsets.content_size()];
        let computed = SieveFooter::compute_crc32(content);
        if footer.crc32 != computed {
            return Err(SieveError::corrupt(format!(
                "CRC32 mismatch: expected {:#010x}, got {:#010x}",
                footer.crc32, computed
            )));
        }

        let section = |range, name| SectionOffsets::slice(bytes, range, name).map(<[u8]>::to_vec);
        let container = Self {
            version: header.version,
            flags: header.flags,
            doc_count: header.doc_count,
            term_count: header.term_count,
            vocabulary: section(offsets.vocabulary, SECTION_NAMES[0])?,
            suffix_array: section(offsets.suffix_array, SECTION_NAMES[1])?,
            postings: section(offsets.postings, SECTION_NAMES[2])?,
            skip_lists: section(offsets.skip_lists, SECTION_NAMES[3])?,
            section_table: section(offsets.section_table, SECTION_NAMES[4])?,
            lev_dfa: section(offsets.lev_dfa, SECTION_NAMES[5])?,
            documents: section(offsets.docs, SECTION_NAMES[6])?,
            module: section(offsets.module, SECTION_NAMES[7])?,
            dict_tables: section(offsets.dict_tables, SECTION_NAMES[8])?,
        };

        debug!(
            version = header.version,
            docs = header.doc_count,
            terms = header.term_count,
            vocab = header.vocab_len,
            postings = header.postings_len,
            module = header.module_len,
            "decoded sieve container"
        );
        Ok(container)
    }

    /// Decode the document section against the dictionary tables.
    ///
    /// A non-empty document section must hold exactly `doc_count` entries.
    pub fn decode_documents(&self) -> Result<Vec<Document>> {
        let dicts = DictTables::decode(&self.dict_tables)?;
        let docs = decode_docs(&self.documents, &dicts)?;
        if !self.documents.is_empty() && docs.len() != self.doc_count as usize {
            return Err(SieveError::corrupt(format!(
                "docs section holds {} documents, header says {}",
                docs.len(),
                self.doc_count
            )));
        }
        Ok(docs)
    }

    /// Separate the embedded module from the searchable data.
    ///
    /// The index half is a valid container with the module section removed
    /// and its length zeroed; only the footer checksum is rewritten.
    pub fn split_module(bytes: &[u8]) -> Result<SplitContainer> {
        let mut container = Self::decode(bytes)?;
        if container.module.is_empty() {
            return Ok(SplitContainer {
                index: bytes.to_vec(),
                module: Vec::new(),
            });
        }
        let module = std::mem::take(&mut container.module);
        Ok(SplitContainer {
            index: container.encode(),
            module,
        })
    }
}
