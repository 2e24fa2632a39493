//! # Pair Index
//!
//! Tracks, across a collection of byte blocks, the occurrence count and
//! positions of every adjacent symbol pair, and supports merging a chosen
//! pair into a new symbol with work proportional to its occurrences.
//!
//! Blocks are stored as doubly linked lists inside a single node arena;
//! `prev`/`next` are arena indices with a [`NIL`] sentinel, so position
//! references never dangle and never move. The index maps each pair to the
//! arena indices of its left nodes. Entries go stale when a prior step of
//! the same training run rewrites or unlinks their nodes; they are
//! re-validated against the arena and silently skipped.

use core::cmp::Ordering;
use dary_heap::OctonaryHeap;

use crate::types::{CommonHashMap, CommonHashSet, CountType, Pair, TokenType};

/// Arena index sentinel for "no node".
const NIL: usize = usize::MAX;

/// A map from [`Pair`] to its occurrence count.
pub type PairCountMap<T, C> = CommonHashMap<Pair<T>, C>;

/// A map from [`Pair`] to the arena indices of its occurrences.
pub type PairOccurrenceMap<T> = CommonHashMap<Pair<T>, Vec<usize>>;

/// A doubly linked node holding one symbol of one block.
#[derive(Debug, Clone, Copy)]
struct Node<T> {
    val: T,
    prev: usize,
    next: usize,
}

/// A heap candidate for the next merge.
///
/// Max-heap by count; ties broken toward the smallest `(a, b)` in unsigned
/// lexicographic order, which keeps training deterministic.
#[derive(Debug, PartialEq, Eq)]
struct PairCandidate<T: TokenType, C: CountType> {
    count: C,
    pair: Pair<T>,
}

impl<T: TokenType, C: CountType> PartialOrd for PairCandidate<T, C> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TokenType, C: CountType> Ord for PairCandidate<T, C> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.pair.cmp(&self.pair))
    }
}

/// An index of adjacent-pair counts and positions over a set of blocks.
#[derive(Debug)]
pub struct PairIndex<T: TokenType, C: CountType> {
    /// All block nodes, in block order.
    nodes: Vec<Node<T>>,

    /// Head node of each non-empty block. Heads are never unlinked.
    heads: Vec<usize>,

    /// Live occurrence count per pair. Exact at all times.
    counts: PairCountMap<T, C>,

    /// Left-node arena indices per pair. May contain stale entries.
    occurrences: PairOccurrenceMap<T>,

    /// Lazy candidate heap; entries are refreshed against `counts` on pop.
    heap: OctonaryHeap<PairCandidate<T, C>>,
}

impl<T: TokenType, C: CountType> PairIndex<T, C> {
    /// Build an index over a sequence of byte blocks in one pass.
    ///
    /// Blocks of length < 2 are accepted but contribute no pairs.
    pub fn build<I>(blocks: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut index = Self::build_core(blocks);
        index.rebuild_heap();
        index
    }

    /// Build an index in parallel over partitions of the blocks.
    ///
    /// Each worker builds a partial index over a contiguous partition; the
    /// partials are combined serially by summing counts and concatenating
    /// position lists, so the result is identical to [`Self::build`].
    #[cfg(feature = "rayon")]
    pub fn build_parallel<B>(blocks: &[B]) -> Self
    where
        B: AsRef<[u8]> + Sync,
    {
        use rayon::prelude::*;

        let partition = blocks.len().div_ceil(rayon::current_num_threads()).max(1);

        let mut partials: Vec<Self> = blocks
            .par_chunks(partition)
            .map(Self::build_core)
            .collect();

        let mut index = match partials.len() {
            0 => Self::build_core(core::iter::empty::<&[u8]>()),
            _ => {
                let mut index = partials.remove(0);
                for partial in partials {
                    index.absorb(partial);
                }
                index
            }
        };

        index.rebuild_heap();
        index
    }

    fn build_core<I>(blocks: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut nodes: Vec<Node<T>> = Vec::new();
        let mut heads: Vec<usize> = Vec::new();
        let mut counts: PairCountMap<T, C> = Default::default();
        let mut occurrences: PairOccurrenceMap<T> = Default::default();

        let one = C::one();

        for block in blocks {
            let block = block.as_ref();
            if block.is_empty() {
                continue;
            }

            let base = nodes.len();
            heads.push(base);

            for (i, &byte) in block.iter().enumerate() {
                nodes.push(Node {
                    val: T::from_u8(byte).unwrap(),
                    prev: if i == 0 { NIL } else { base + i - 1 },
                    next: if i == block.len() - 1 {
                        NIL
                    } else {
                        base + i + 1
                    },
                });
            }

            for (i, pair) in block.windows(2).enumerate() {
                let pair = (
                    T::from_u8(pair[0]).unwrap(),
                    T::from_u8(pair[1]).unwrap(),
                );
                *counts.entry(pair).or_default() += one;
                occurrences.entry(pair).or_default().push(base + i);
            }
        }

        Self {
            nodes,
            heads,
            counts,
            occurrences,
            heap: OctonaryHeap::new(),
        }
    }

    /// Fold another partial index into this one, offsetting its arena.
    fn absorb(
        &mut self,
        other: Self,
    ) {
        let offset = self.nodes.len();
        let shift = |idx: usize| if idx == NIL { NIL } else { idx + offset };

        self.nodes.extend(other.nodes.into_iter().map(|n| Node {
            val: n.val,
            prev: shift(n.prev),
            next: shift(n.next),
        }));
        self.heads.extend(other.heads.into_iter().map(|h| h + offset));

        for (pair, count) in other.counts {
            *self.counts.entry(pair).or_default() += count;
        }
        for (pair, positions) in other.occurrences {
            self.occurrences
                .entry(pair)
                .or_default()
                .extend(positions.into_iter().map(|p| p + offset));
        }
    }

    fn rebuild_heap(&mut self) {
        let zero = C::zero();
        let mut heap = OctonaryHeap::with_capacity(self.counts.len());
        for (&pair, &count) in self.counts.iter() {
            if count > zero {
                heap.push(PairCandidate { count, pair });
            }
        }
        self.heap = heap;
    }

    /// Does any pair remain?
    pub fn has_pairs(&self) -> bool {
        self.counts.values().any(|&c| c > C::zero())
    }

    /// The live count of a pair.
    pub fn count(
        &self,
        pair: &Pair<T>,
    ) -> C {
        self.counts.get(pair).copied().unwrap_or_default()
    }

    /// The sum of all live pair counts.
    pub fn total_count(&self) -> C {
        let mut total = C::zero();
        for &count in self.counts.values() {
            total += count;
        }
        total
    }

    /// Pop stale candidates and return a pair of maximum count.
    ///
    /// Ties break to the smallest `(a, b)`. Returns `None` when no pair
    /// remains. The winning candidate stays queued; a following
    /// [`Self::merge`] of that pair retires it.
    pub fn top_pair(&mut self) -> Option<(Pair<T>, C)> {
        let zero = C::zero();

        while let Some(mut candidate) = self.heap.pop() {
            let live = self.count(&candidate.pair);
            if live == zero {
                continue;
            }
            if live != candidate.count {
                // Lazy refresh: re-queue with the live count.
                candidate.count = live;
                self.heap.push(candidate);
                continue;
            }

            let top = (candidate.pair, live);
            self.heap.push(candidate);
            return Some(top);
        }

        None
    }

    /// Merge every live occurrence of `pair` into `new_id`.
    ///
    /// Occurrences are consumed greedily left-to-right, so `a a a a`
    /// becomes `c a` for the pair `(a, a)`. Counts and positions of all
    /// affected neighbor pairs are updated incrementally. Merging a pair
    /// with no live occurrences is a no-op that leaves counts consistent.
    pub fn merge(
        &mut self,
        pair: Pair<T>,
        new_id: T,
    ) {
        let (a, b) = pair;
        let one = C::one();

        let Some(mut bucket) = self.occurrences.remove(&pair) else {
            self.counts.remove(&pair);
            return;
        };

        // Appends during earlier merges can interleave; node indices are
        // position-stable, so sorting restores left-to-right order.
        bucket.sort_unstable();

        // Pairs gaining occurrences in this pass; queued once at the end
        // with their settled counts.
        let mut created: CommonHashSet<Pair<T>> = Default::default();

        for n in bucket {
            if self.nodes[n].val != a {
                continue;
            }
            let m = self.nodes[n].next;
            if m == NIL || self.nodes[m].val != b {
                continue;
            }

            let p = self.nodes[n].prev;
            let q = self.nodes[m].next;

            if p != NIL {
                let left = (self.nodes[p].val, a);
                *self.counts.entry(left).or_default() -= one;
            }
            if q != NIL {
                let right = (b, self.nodes[q].val);
                *self.counts.entry(right).or_default() -= one;
            }

            // Rewrite n and unlink m.
            self.nodes[n].val = new_id;
            self.nodes[n].next = q;
            if q != NIL {
                self.nodes[q].prev = n;
            }
            self.nodes[m].prev = NIL;
            self.nodes[m].next = NIL;

            if p != NIL {
                let left = (self.nodes[p].val, new_id);
                *self.counts.entry(left).or_default() += one;
                self.occurrences.entry(left).or_default().push(p);
                created.insert(left);
            }
            if q != NIL {
                let right = (new_id, self.nodes[q].val);
                *self.counts.entry(right).or_default() += one;
                self.occurrences.entry(right).or_default().push(n);
                created.insert(right);
            }
        }

        self.counts.remove(&pair);

        let zero = C::zero();
        for pair in created {
            let count = self.count(&pair);
            if count > zero {
                self.heap.push(PairCandidate { count, pair });
            }
        }
    }

    /// The current symbols of block `i`, in order.
    ///
    /// Mostly useful for inspecting merge results.
    pub fn block_symbols(
        &self,
        i: usize,
    ) -> Vec<T> {
        let mut symbols = Vec::new();
        let mut n = self.heads[i];
        while n != NIL {
            symbols.push(self.nodes[n].val);
            n = self.nodes[n].next;
        }
        symbols
    }

    /// The number of non-empty blocks.
    pub fn num_blocks(&self) -> usize {
        self.heads.len()
    }
}
