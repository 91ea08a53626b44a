// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Compressed postings store with lazy, block-at-a-time decoding.
//!
//! The postings section stays compressed in memory. Construction walks every
//! list once to validate it (block structure, ascending doc IDs, ID ranges,
//! skip pointers) and records where each list starts. After that, decoding a
//! block cannot fail, so query-time iterators yield plain `Posting`s.
//!
//! Long lists carry skip entries `(first_doc, byte_offset)`, one per block.
//! [`PostingsCursor::seek`] binary-searches them to jump straight to the
//! block that may hold a target doc ID.

use std::collections::{HashMap, HashSet};

use crate::binary::{
    block_count, block_len, decode_block, decode_skip_lists, ByteReader, SkipEntry, BLOCK_SIZE,
};
use crate::error::{Result, SieveError};
use crate::types::{DocId, Posting, TermId};

#[derive(Debug, Clone, Copy)]
struct ListMeta {
    /// Byte offset of the first block.
    blocks_start: usize,
    doc_freq: u32,
}

#[derive(Debug, Clone, Default)]
pub struct PostingsStore {
    data: Vec<u8>,
    lists: Vec<ListMeta>,
    skips: HashMap<TermId, Vec<SkipEntry>>,
}

impl PostingsStore {
    /// Validate and index the postings and skip-list sections.
    ///
    /// - every doc ID must be below `doc_count`
    /// - every section reference must be at most `section_count`
    /// - skip entries must point at real block starts
    pub fn decode(
        postings: &[u8],
        skip_lists: &[u8],
        term_count: usize,
        doc_count: u32,
        section_count: usize,
    ) -> Result<Self> {
        let mut reader = ByteReader::new(postings, "postings");
        let mut lists = Vec::with_capacity(term_count);
        let mut block_starts: Vec<Vec<(u32, usize)>> = Vec::with_capacity(term_count);

        for term in 0..term_count {
            let doc_freq = reader.varint_u32()?;
            if doc_freq > doc_count {
                return Err(reader.corrupt(format!(
                    "term {} claims {} postings in a {}-document index",
                    term, doc_freq, doc_count
                )));
            }
            let blocks_start = reader.position();
            let mut starts = Vec::with_capacity(block_count(doc_freq as usize));
            let mut base = 0u32;

            for b in 0..block_count(doc_freq as usize) {
                let offset = reader.position() - blocks_start;
                let block = decode_block(&mut reader, block_len(doc_freq as usize, b))?;
                let postings = block.into_postings(base, b == 0)?;
                for p in &postings {
                    if p.doc_id.0 >= doc_count {
                        return Err(SieveError::out_of_range("doc id", p.doc_id.0, doc_count));
                    }
                    if p.section_idx as usize > section_count {
                        return Err(SieveError::out_of_range(
                            "section",
                            p.section_idx,
                            section_count as u64,
                        ));
                    }
                }
                starts.push((postings[0].doc_id.0, offset));
                base = postings[postings.len() - 1].doc_id.0;
            }

            lists.push(ListMeta {
                blocks_start,
                doc_freq,
            });
            block_starts.push(starts);
        }

        if !reader.is_empty() {
            return Err(reader.corrupt("trailing bytes after last posting list"));
        }

        let mut skips = HashMap::new();
        for (term_ord, entries) in decode_skip_lists(skip_lists)? {
            let starts = block_starts.get(term_ord as usize).ok_or_else(|| {
                SieveError::out_of_range("skip list term", term_ord, term_count as u64)
            })?;
            let consistent = entries.len() == starts.len()
                && entries
                    .iter()
                    .zip(starts)
                    .all(|(e, &(doc, off))| e.first_doc == doc && e.byte_offset as usize == off);
            if !consistent {
                return Err(SieveError::corrupt(format!(
                    "skip list for term {} does not match its blocks",
                    term_ord
                )));
            }
            skips.insert(TermId(term_ord), entries);
        }

        Ok(Self {
            data: postings.to_vec(),
            lists,
            skips,
        })
    }

    pub fn term_count(&self) -> usize {
        self.lists.len()
    }

    pub fn doc_freq(&self, term: TermId) -> u32 {
        self.lists.get(term.as_usize()).map_or(0, |l| l.doc_freq)
    }

    /// Document frequency of every term, in term order.
    pub fn doc_freqs(&self) -> Vec<u32> {
        self.lists.iter().map(|l| l.doc_freq).collect()
    }

    pub fn has_skip_list(&self, term: TermId) -> bool {
        self.skips.contains_key(&term)
    }

    /// Postings of `term` in ascending doc order, decoded lazily.
    pub fn postings_for(&self, term: TermId) -> PostingsIter<'_> {
        PostingsIter::new(self, term, None)
    }

    /// Like [`postings_for`](Self::postings_for) but never yields a doc in
    /// `exclude`. Excluded entries are dropped while a block is rebuilt.
    pub fn postings_excluding<'a>(
        &'a self,
        term: TermId,
        exclude: &'a HashSet<DocId>,
    ) -> PostingsIter<'a> {
        PostingsIter::new(self, term, Some(exclude))
    }

    pub fn cursor(&self, term: TermId) -> PostingsCursor<'_> {
        PostingsCursor {
            iter: self.postings_for(term),
            skips: self.skips.get(&term).map(Vec::as_slice),
            current: None,
        }
    }

    /// Documents containing every term, with one posting per term (in the
    /// order of `terms`). Leapfrogs from the rarest list using skip pointers.
    pub fn intersect(&self, terms: &[TermId]) -> Vec<(DocId, Vec<Posting>)> {
        let Some(&rarest) = terms.iter().min_by_key(|&&t| self.doc_freq(t)) else {
            return Vec::new();
        };
        let mut cursors: Vec<PostingsCursor<'_>> = terms.iter().map(|&t| self.cursor(t)).collect();
        let mut out = Vec::new();

        'candidates: for candidate in self.postings_for(rarest) {
            let mut row = Vec::with_capacity(terms.len());
            for cursor in &mut cursors {
                match cursor.seek(candidate.doc_id) {
                    Some(p) if p.doc_id == candidate.doc_id => row.push(p),
                    Some(_) => continue 'candidates,
                    None => break 'candidates,
                }
            }
            out.push((candidate.doc_id, row));
        }
        out
    }
}

/// Lazy block-by-block decoder over one posting list.
#[derive(Debug, Clone)]
pub struct PostingsIter<'a> {
    store: &'a PostingsStore,
    meta: ListMeta,
    exclude: Option<&'a HashSet<DocId>>,
    next_block: usize,
    pos: usize,
    base: u32,
    /// First doc of the next block when entered through a skip pointer.
    known_first: Option<u32>,
    buffer: std::vec::IntoIter<Posting>,
}

impl<'a> PostingsIter<'a> {
    fn new(store: &'a PostingsStore, term: TermId, exclude: Option<&'a HashSet<DocId>>) -> Self {
        let meta = store.lists.get(term.as_usize()).copied().unwrap_or(ListMeta {
            blocks_start: 0,
            doc_freq: 0,
        });
        Self {
            store,
            meta,
            exclude,
            next_block: 0,
            pos: meta.blocks_start,
            base: 0,
            known_first: None,
            buffer: Vec::new().into_iter(),
        }
    }

    fn blocks(&self) -> usize {
        block_count(self.meta.doc_freq as usize)
    }

    /// Position the iterator at the start of block `index`.
    fn jump_to_block(&mut self, index: usize, entry: SkipEntry) {
        self.next_block = index;
        self.pos = self.meta.blocks_start + entry.byte_offset as usize;
        self.known_first = Some(entry.first_doc);
        self.buffer = Vec::new().into_iter();
    }

    fn decode_next_block(&mut self) -> bool {
        if self.next_block >= self.blocks() {
            return false;
        }
        let n = block_len(self.meta.doc_freq as usize, self.next_block);
        let mut reader = ByteReader::at(&self.store.data, self.pos, "postings");
        // every block was decoded once at construction; a failure here means
        // the list is exhausted rather than a new error
        let Ok(block) = decode_block(&mut reader, n) else {
            self.next_block = self.blocks();
            return false;
        };
        self.pos = reader.position();
        self.next_block += 1;

        let mut doc = match self.known_first.take() {
            Some(first) => first.wrapping_sub(block.deltas[0]),
            None => self.base,
        };
        let mut out = Vec::with_capacity(BLOCK_SIZE.min(n));
        let entries = block.deltas.into_iter().zip(block.sections).zip(block.weights);
        for ((delta, section_idx), weight) in entries {
            doc = doc.wrapping_add(delta);
            if self.exclude.is_some_and(|ex| ex.contains(&DocId(doc))) {
                continue;
            }
            out.push(Posting::new(doc, section_idx, weight));
        }
        self.base = doc;
        self.buffer = out.into_iter();
        true
    }
}

impl Iterator for PostingsIter<'_> {
    type Item = Posting;

    fn next(&mut self) -> Option<Posting> {
        loop {
            if let Some(p) = self.buffer.next() {
                return Some(p);
            }
            if !self.decode_next_block() {
                return None;
            }
        }
    }
}

/// Forward-only cursor supporting `seek` for list intersection.
#[derive(Debug, Clone)]
pub struct PostingsCursor<'a> {
    iter: PostingsIter<'a>,
    skips: Option<&'a [SkipEntry]>,
    current: Option<Posting>,
}

impl PostingsCursor<'_> {
    /// First posting with doc ID `>= target`, or None when exhausted.
    /// Never moves backwards.
    pub fn seek(&mut self, target: DocId) -> Option<Posting> {
        if let Some(p) = self.current {
            if p.doc_id >= target {
                return Some(p);
            }
        }

        if let Some(skips) = self.skips {
            // last block whose first doc is <= target
            let idx = skips.partition_point(|e| e.first_doc <= target.0);
            if idx > 0 && idx - 1 >= self.iter.next_block {
                self.iter.jump_to_block(idx - 1, skips[idx - 1]);
            }
        }

        self.current = None;
        for p in self.iter.by_ref() {
            if p.doc_id >= target {
                self.current = Some(p);
                break;
            }
        }
        self.current
    }
}
