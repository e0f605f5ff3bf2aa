#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Ratcliff/Obershelp sequence matching.
//!
//! The matcher finds the longest contiguous matching block between the two
//! sequences, then recurses into the unmatched pieces on either side of it.
//! The similarity ratio is `2 * M / T`, where `M` is the total length of all
//! matching blocks and `T` the combined length of both sequences.
//!
//! The result depends on which sequence is the reference (`a`) and which is
//! the candidate (`b`): ties are broken towards the start of `a`, and only the
//! candidate is scanned for popular elements. `ratio(a, b)` and
//! `ratio(b, a)` can therefore differ.

use std::{collections::HashMap, hash::Hash};

use crate::constants::AUTOJUNK_MIN_LEN;

/// A run of `size` equal elements at `a[a_start..]` and `b[b_start..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Block {
    /// Start in the reference sequence.
    pub a_start: usize,
    /// Start in the candidate sequence.
    pub b_start: usize,
    /// Number of equal elements.
    pub size:    usize,
}

/// Compares a reference sequence `a` against a candidate sequence `b`.
#[derive(Debug)]
pub struct SequenceMatcher<'a, T> {
    /// Reference sequence.
    a:   &'a [T],
    /// Candidate sequence.
    b:   &'a [T],
    /// Positions of every element of `b` that may seed a match, ascending.
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    /// Builds a matcher that ignores popular candidate elements when seeding
    /// matches. Popular means occurring more than `1% + 1` times in a
    /// candidate of at least 200 elements.
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        Self::with_autojunk(a, b, true)
    }

    /// Builds a matcher, choosing whether popular elements are ignored.
    pub fn with_autojunk(a: &'a [T], b: &'a [T], autojunk: bool) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let threshold = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= threshold);
        }

        Self { a, b, b2j }
    }

    /// Longest matching block within `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among blocks of maximal size the one starting earliest in `a` wins,
    /// then the one starting earliest in `b`. The block is then grown over
    /// neighbouring equal elements that were excluded from seeding.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (a, b) = (self.a, self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        // j2len[j] = length of the match ending at a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, elt) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(elt) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        Block {
            a_start: besti,
            b_start: bestj,
            size:    bestsize,
        }
    }

    /// All matching blocks in ascending order, adjacent blocks merged, and
    /// terminated by a zero-sized block at `(len_a, len_b)`.
    pub fn matching_blocks(&self) -> Vec<Block> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.size);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
            blocks.push(block);
        }
        blocks.sort();

        let mut merged: Vec<Block> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged.push(Block {
            a_start: la,
            b_start: lb,
            size:    0,
        });

        merged
    }

    /// Similarity in `[0, 1]`; two empty sequences are identical.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = self.matching_blocks().iter().map(|b| b.size).sum();
        2.0 * matched as f64 / total as f64
    }
}

/// Similarity of `candidate` measured against `reference`.
pub fn ratio<T: Eq + Hash>(reference: &[T], candidate: &[T]) -> f64 {
    SequenceMatcher::new(reference, candidate).ratio()
}
