// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Universal Levenshtein automaton (Schulz & Mihov, 2002).
//!
//! The automaton for distance `k` does not depend on the query. A state is a
//! set of NFA positions `(offset, edits)` relative to a base index into the
//! query, with subsumed positions removed and the smallest offset shifted to
//! zero. Its input is a characteristic vector: bit `i` is set when the input
//! char equals `query[base + i]`, for the `2k + 1` query chars starting at
//! the base. Each transition yields the next state and how far the base
//! moves.
//!
//! The automaton is built once and stored in the container. Running it for a
//! query only needs the query's chars: [`QueryMatcher`] computes each
//! characteristic vector from at most `2k + 1` comparisons.
//!
//! # Serialization
//!
//! ```text
//! max_distance: u8
//! num_states:   u16
//! accept:       [u8; num_states × (2k + 1)]
//!               distance when `r` query chars remain past the base,
//!               0xFF if not accepting
//! transitions:  [(target: u16, shift: u8); num_states × 2^(2k + 1)]
//!               target 0xFFFF is the dead state
//! ```

use std::collections::HashMap;

use crate::binary::ByteReader;
use crate::error::{Result, SieveError};
use crate::types::TermId;
use crate::vocabulary::Vocabulary;

use super::config::MAX_DISTANCE;

/// Dead state marker.
pub const DEAD_STATE: u16 = 0xFFFF;

/// Accept-table marker for non-accepting entries.
pub const NOT_ACCEPTING: u8 = 0xFF;

/// Query chars visible to one transition.
fn window(k: u8) -> usize {
    2 * k as usize + 1
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

/// An NFA position relative to the state's base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Position {
    offset: u8,
    edits: u8,
}

impl Position {
    /// Every continuation costs no more from `self` than from `other`.
    fn subsumes(self, other: Position) -> bool {
        self.edits + self.offset.abs_diff(other.offset) <= other.edits
    }
}

/// Subsumption-free set of positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
struct Shape(Vec<Position>);

impl Shape {
    fn insert(&mut self, pos: Position) {
        if self.0.iter().any(|p| p.subsumes(pos)) {
            return;
        }
        self.0.retain(|p| !pos.subsumes(*p));
        self.0.push(pos);
    }

    /// Shift the smallest offset to zero and sort; returns the shift.
    fn normalize(&mut self) -> u8 {
        let shift = self.0.iter().map(|p| p.offset).min().unwrap_or(0);
        for p in &mut self.0 {
            p.offset -= shift;
        }
        self.0.sort_unstable();
        shift
    }

    /// Consume one input char with characteristic vector `chi`.
    ///
    /// Deleting query chars is folded into the next match (skip `d` chars,
    /// then match) or into acceptance (the unread tail counts as deletions).
    fn step(&self, chi: u32, k: u8) -> Shape {
        let hit = |i: u8| u32::from(i) < u32::BITS && chi & (1u32 << i) != 0;
        let mut next = Shape::default();
        for &Position { offset, edits } in &self.0 {
            if hit(offset) {
                next.insert(Position { offset: offset + 1, edits });
            }
            if edits < k {
                // insertion
                next.insert(Position { offset, edits: edits + 1 });
                // substitution
                next.insert(Position { offset: offset + 1, edits: edits + 1 });
                for d in 1..=k - edits {
                    if hit(offset + d) {
                        next.insert(Position {
                            offset: offset + d + 1,
                            edits: edits + d,
                        });
                    }
                }
            }
        }
        next
    }

    /// Distance when `remaining` query chars follow the base. Positions past
    /// the end of the query count their edits alone.
    fn distance(&self, remaining: u8, k: u8) -> u8 {
        self.0
            .iter()
            .map(|p| p.edits + remaining.saturating_sub(p.offset))
            .filter(|&d| d <= k)
            .min()
            .unwrap_or(NOT_ACCEPTING)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    target: u16,
    shift: u8,
}

impl Transition {
    const DEAD: Self = Self {
        target: DEAD_STATE,
        shift: 0,
    };
}

/// Query-independent Levenshtein DFA for one maximum distance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevenshteinDfa {
    max_distance: u8,
    /// `state * window + remaining` → distance or `NOT_ACCEPTING`.
    accept: Vec<u8>,
    /// `state * 2^window + chi` → transition.
    transitions: Vec<Transition>,
}

impl LevenshteinDfa {
    /// Build the automaton for distance `max_distance` (clamped to 2).
    pub fn build(max_distance: u8) -> Self {
        let k = max_distance.min(MAX_DISTANCE);
        let classes = 1u32 << window(k);

        let start = Shape(vec![Position { offset: 0, edits: 0 }]);
        let mut ids: HashMap<Shape, u16> = HashMap::new();
        ids.insert(start.clone(), 0);
        let mut shapes = vec![start];
        let mut transitions = Vec::new();

        // Breadth-first; states are numbered in discovery order.
        let mut state = 0;
        while state < shapes.len() {
            for chi in 0..classes {
                let mut next = shapes[state].step(chi, k);
                if next.0.is_empty() {
                    transitions.push(Transition::DEAD);
                    continue;
                }
                let shift = next.normalize();
                let target = match ids.get(&next) {
                    Some(&id) => id,
                    None => {
                        let id = shapes.len() as u16;
                        ids.insert(next.clone(), id);
                        shapes.push(next);
                        id
                    }
                };
                transitions.push(Transition { target, shift });
            }
            state += 1;
        }

        let accept = shapes
            .iter()
            .flat_map(|shape| (0..window(k) as u8).map(move |r| shape.distance(r, k)))
            .collect();

        Self {
            max_distance: k,
            accept,
            transitions,
        }
    }

    pub fn max_distance(&self) -> u8 {
        self.max_distance
    }

    pub fn state_count(&self) -> usize {
        self.accept.len() / window(self.max_distance)
    }

    fn transition(&self, state: u16, chi: u32) -> Transition {
        let classes = 1usize << window(self.max_distance);
        self.transitions
            .get(state as usize * classes + chi as usize)
            .copied()
            .unwrap_or(Transition::DEAD)
    }

    fn accept_distance(&self, state: u16, remaining: usize) -> Option<u8> {
        let width = window(self.max_distance);
        if remaining >= width {
            return None;
        }
        self.accept
            .get(state as usize * width + remaining)
            .copied()
            .filter(|&d| d != NOT_ACCEPTING)
    }

    /// Run the automaton against one query.
    pub fn for_query(&self, query: &str) -> QueryMatcher<'_> {
        QueryMatcher {
            dfa: self,
            query: query.chars().collect(),
        }
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(self.max_distance);
        buf.extend_from_slice(&(self.state_count() as u16).to_le_bytes());
        buf.extend_from_slice(&self.accept);
        for t in &self.transitions {
            buf.extend_from_slice(&t.target.to_le_bytes());
            buf.push(t.shift);
        }
    }

    /// Read one automaton, checking every entry against the state count.
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self> {
        let k = reader.u8()?;
        if k > MAX_DISTANCE {
            return Err(SieveError::out_of_range("fuzzy distance", k, MAX_DISTANCE));
        }
        let states = usize::from(u16::from_le_bytes([reader.u8()?, reader.u8()?]));
        if states == 0 || states >= usize::from(DEAD_STATE) {
            return Err(reader.corrupt(format!("bad automaton state count {}", states)));
        }
        let width = window(k);
        let classes = 1usize << width;
        if reader.remaining() < states * (width + classes * 3) {
            return Err(reader.corrupt("automaton tables truncated"));
        }

        let accept = reader.take(states * width)?.to_vec();
        if let Some(&d) = accept.iter().find(|&&d| d != NOT_ACCEPTING && d > k) {
            return Err(reader.corrupt(format!("accept distance {} above {}", d, k)));
        }

        let table = reader.take(states * classes * 3)?;
        let mut transitions = Vec::with_capacity(states * classes);
        for entry in table.chunks_exact(3) {
            let target = u16::from_le_bytes([entry[0], entry[1]]);
            let shift = entry[2];
            if target != DEAD_STATE && usize::from(target) >= states {
                return Err(SieveError::out_of_range("automaton state", target, states as u64));
            }
            if usize::from(shift) > width {
                return Err(reader.corrupt(format!("automaton shift {} above {}", shift, width)));
            }
            transitions.push(Transition { target, shift });
        }

        Ok(Self {
            max_distance: k,
            accept,
            transitions,
        })
    }
}

// ============================================================================
// MATCHING
// ============================================================================

/// Automaton state plus the query index it is anchored at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    state: u16,
    base: usize,
}

/// A [`LevenshteinDfa`] bound to one query.
#[derive(Debug, Clone)]
pub struct QueryMatcher<'a> {
    dfa: &'a LevenshteinDfa,
    query: Vec<char>,
}

impl QueryMatcher<'_> {
    pub fn start(&self) -> Cursor {
        Cursor { state: 0, base: 0 }
    }

    /// Bit `i` set when `c == query[base + i]`.
    fn char_class(&self, c: char, base: usize) -> u32 {
        self.query
            .iter()
            .skip(base)
            .take(window(self.dfa.max_distance))
            .enumerate()
            .filter(|&(_, &q)| q == c)
            .fold(0u32, |chi, (i, _)| chi | 1u32 << i)
    }

    /// Next cursor, or `None` once no extension can come within `k` edits.
    pub fn step(&self, cursor: Cursor, c: char) -> Option<Cursor> {
        let t = self
            .dfa
            .transition(cursor.state, self.char_class(c, cursor.base));
        (t.target != DEAD_STATE).then(|| Cursor {
            state: t.target,
            base: cursor.base + usize::from(t.shift),
        })
    }

    /// Edit distance if the input read so far is within `k` of the query.
    pub fn accepts(&self, cursor: Cursor) -> Option<u8> {
        let remaining = self.query.len().saturating_sub(cursor.base);
        self.dfa.accept_distance(cursor.state, remaining)
    }

    /// Edit distance between the query and `input`, if within `k`.
    pub fn distance(&self, input: &str) -> Option<u8> {
        let mut cursor = self.start();
        for c in input.chars() {
            cursor = self.step(cursor, c)?;
        }
        self.accepts(cursor)
    }

    /// Every vocabulary term within `k` edits, with its distance, in term order.
    ///
    /// Consecutive terms share a prefix, and the cursors along that prefix
    /// are reused. A dead cursor rules out every term sharing the prefix that
    /// produced it, and those terms are skipped with one binary search.
    pub fn matches(&self, vocab: &Vocabulary) -> Vec<(TermId, u8)> {
        let terms = vocab.terms();
        let mut out = Vec::new();
        // path[d] = cursor after the first d chars of `prev`
        let mut path: Vec<Cursor> = vec![self.start()];
        let mut prev: &str = "";
        let mut i = 0;

        'terms: while i < terms.len() {
            let term = terms[i].as_str();
            let common = common_char_prefix(prev, term).min(path.len() - 1);
            path.truncate(common + 1);
            prev = term;

            let mut cursor = path[common];
            for (byte_pos, c) in term.char_indices().skip(common) {
                match self.step(cursor, c) {
                    Some(next) => cursor = next,
                    None => {
                        let dead_prefix = &term[..byte_pos + c.len_utf8()];
                        i += terms[i..].partition_point(|t| t.starts_with(dead_prefix));
                        continue 'terms;
                    }
                }
                path.push(cursor);
            }
            if let Some(distance) = self.accepts(cursor) {
                out.push((TermId(i as u32), distance));
            }
            i += 1;
        }
        out
    }
}

fn common_char_prefix(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}
