//! Fixed-capacity move buffer.
//!
//! Generation never allocates: every frame of the search owns one of these on
//! its stack. Capacity is the known upper bound for pseudo-legal moves.

use std::ops::Index;

use crate::game_state::chess_types::MAX_MOVES;
use crate::moves::move_descriptions::Move;

#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    count: usize,
}

impl Default for MoveList {
    fn default() -> Self {
        Self {
            moves: [Move::FILLER; MAX_MOVES],
            count: 0,
        }
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl MoveList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.count < MAX_MOVES, "move list overflow");
        if let Some(slot) = self.moves.get_mut(self.count) {
            *slot = mv;
            self.count += 1;
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Keep only the moves for which `keep` returns true, preserving order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.count {
            let mv = self.moves[read];
            if keep(mv) {
                self.moves[write] = mv;
                write += 1;
            }
        }
        self.count = write;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.count]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.count]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::iter::Take<std::array::IntoIter<Move, MAX_MOVES>>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter().take(self.count)
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}
