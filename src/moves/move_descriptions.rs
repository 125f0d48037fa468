//! Packed move encoding.
//!
//! A `Move` is an immutable 32-bit value:
//!
//! | bits    | field                                  |
//! |---------|----------------------------------------|
//! | 0..6    | origin square                          |
//! | 6..12   | destination square                     |
//! | 12..16  | moving piece index (`0..12`)           |
//! | 16..20  | captured piece index, `15` when none   |
//! | 20..24  | promotion piece index, `15` when none  |
//! | 24..29  | flags                                  |

use std::fmt;

use crate::game_state::chess_types::{Piece, Square};
use crate::utils::long_algebraic::move_to_long_algebraic;

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 6;
const MOVED_PIECE_SHIFT: u32 = 12;
const CAPTURED_PIECE_SHIFT: u32 = 16;
const PROMOTION_PIECE_SHIFT: u32 = 20;

const SQUARE_MASK: u32 = 0x3F;
const PIECE_MASK: u32 = 0xF;
const FLAGS_MASK: u32 = 0x1F << 24;
pub const NO_PIECE_CODE: u32 = 0xF;

pub const FLAG_CAPTURE: u32 = 1 << 24;
pub const FLAG_EN_PASSANT: u32 = 1 << 25;
pub const FLAG_CASTLING: u32 = 1 << 26;
pub const FLAG_PROMOTION: u32 = 1 << 27;
pub const FLAG_DOUBLE_PAWN_PUSH: u32 = 1 << 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// Filler for unused fixed-capacity slots; never handed out as a real move.
    pub(crate) const FILLER: Move = Move(0);

    #[inline]
    pub fn new(
        from: Square,
        to: Square,
        moved_piece: Piece,
        captured_piece: Option<Piece>,
        promotion_piece: Option<Piece>,
        flags: u32,
    ) -> Self {
        let mut out = 0u32;
        out |= (u32::from(from) & SQUARE_MASK) << FROM_SHIFT;
        out |= (u32::from(to) & SQUARE_MASK) << TO_SHIFT;
        out |= piece_code(Some(moved_piece)) << MOVED_PIECE_SHIFT;
        out |= piece_code(captured_piece) << CAPTURED_PIECE_SHIFT;
        out |= piece_code(promotion_piece) << PROMOTION_PIECE_SHIFT;
        out |= flags & FLAGS_MASK;
        Self(out)
    }

    /// Raw encoding, used when a move is cached outside its search frame.
    #[inline]
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Rebuild a move from its raw encoding. Returns `None` for values no
    /// constructor could have produced.
    #[inline]
    pub fn from_bits(bits: u32) -> Option<Self> {
        let moved = (bits >> MOVED_PIECE_SHIFT) & PIECE_MASK;
        let captured = (bits >> CAPTURED_PIECE_SHIFT) & PIECE_MASK;
        let promotion = (bits >> PROMOTION_PIECE_SHIFT) & PIECE_MASK;
        let valid_code = |code: u32| code < 12 || code == NO_PIECE_CODE;
        if moved >= 12 || !valid_code(captured) || !valid_code(promotion) {
            return None;
        }
        if bits & !(FLAGS_MASK | 0x00FF_FFFF) != 0 {
            return None;
        }
        Some(Self(bits))
    }

    #[inline]
    pub const fn from(self) -> Square {
        ((self.0 >> FROM_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn to(self) -> Square {
        ((self.0 >> TO_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub fn moved_piece(self) -> Piece {
        decode_piece((self.0 >> MOVED_PIECE_SHIFT) & PIECE_MASK)
            .unwrap_or_else(|| unreachable!("moved piece is always encoded"))
    }

    #[inline]
    pub fn captured_piece(self) -> Option<Piece> {
        decode_piece((self.0 >> CAPTURED_PIECE_SHIFT) & PIECE_MASK)
    }

    #[inline]
    pub fn promotion_piece(self) -> Option<Piece> {
        decode_piece((self.0 >> PROMOTION_PIECE_SHIFT) & PIECE_MASK)
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.0 & FLAG_CAPTURE != 0
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.0 & FLAG_EN_PASSANT != 0
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        self.0 & FLAG_CASTLING != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.0 & FLAG_PROMOTION != 0
    }

    #[inline]
    pub const fn is_double_pawn_push(self) -> bool {
        self.0 & FLAG_DOUBLE_PAWN_PUSH != 0
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&move_to_long_algebraic(*self))
    }
}

#[inline]
fn piece_code(piece: Option<Piece>) -> u32 {
    piece.map_or(NO_PIECE_CODE, |p| p.index() as u32)
}

#[inline]
fn decode_piece(code: u32) -> Option<Piece> {
    Piece::from_index(code as usize)
}
