//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! Slots are addressed by the low bits of the fingerprint (the slot count is a
//! power of two) and verified against the upper 32 bits. There is no chaining:
//! a different fingerprint always overwrites, the same fingerprint overwrites
//! unless the stored entry is strictly deeper. A verified hit is still only
//! probabilistic identity, so callers revalidate any cached move.

use tracing::debug;

use crate::moves::move_descriptions::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub verification: u32,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    best_move_bits: Option<u32>,
}

impl TTEntry {
    /// Cached best move, decoded. Still needs a legality check against the
    /// current position before it is played.
    #[inline]
    pub fn best_move(&self) -> Option<Move> {
        self.best_move_bits.and_then(Move::from_bits)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    mask: usize,
    stats: TTStats,
}

impl TranspositionTable {
    /// Largest power-of-two slot count that fits in `size_mb` megabytes.
    pub fn new_with_mb(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let entry_size = std::mem::size_of::<Option<TTEntry>>().max(1);
        let fitting = (bytes / entry_size).max(1);
        // Round down to a power of two.
        let count = 1usize << (usize::BITS - 1 - fitting.leading_zeros());
        debug!(size_mb, slots = count, "transposition table allocated");
        Self::with_slots(count)
    }

    /// Table with exactly `count` slots; `count` must be a power of two.
    pub fn with_slots(count: usize) -> Self {
        debug_assert!(count.is_power_of_two(), "slot count must be a power of two");
        Self {
            entries: vec![None; count],
            mask: count - 1,
            stats: TTStats::default(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[inline]
    fn slot(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    #[inline]
    fn verification(key: u64) -> u32 {
        (key >> 32) as u32
    }

    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let verification = Self::verification(key);
        let hit = self.entries[self.slot(key)].filter(|e| e.verification == verification);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    pub fn store(&mut self, key: u64, depth: u8, score: i32, bound: Bound, best_move: Option<Move>) {
        let slot = self.slot(key);
        let verification = Self::verification(key);
        if let Some(existing) = self.entries[slot] {
            if existing.verification == verification && existing.depth > depth {
                return;
            }
        }
        self.stats.stores += 1;
        self.entries[slot] = Some(TTEntry {
            verification,
            depth,
            score,
            bound,
            best_move_bits: best_move.map(Move::to_bits),
        });
    }
}
