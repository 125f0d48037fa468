//! Core value types shared by the board, move generator, and search.
//!
//! Pieces are a closed variant over `{kind x colour}`; every per-piece table in
//! the engine is addressed through `Piece::index()` or `PieceKind::index()`
//! instead of branching on the tag.

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::undo_state::UndoState;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Light, Color::Dark];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }
}

/// Piece kind (colour is carried separately so masks stay `[colour][kind]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion targets in the order the generator emits them.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PieceKind::Pawn),
            1 => Some(PieceKind::Knight),
            2 => Some(PieceKind::Bishop),
            3 => Some(PieceKind::Rook),
            4 => Some(PieceKind::Queen),
            5 => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// One of the twelve piece identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Dense index in `0..12`: light pieces first, then dark.
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * 6 + self.kind.index()
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        let color = match index / 6 {
            0 => Color::Light,
            1 => Color::Dark,
            _ => return None,
        };
        match PieceKind::from_index(index % 6) {
            Some(kind) => Some(Self { color, kind }),
            None => None,
        }
    }
}

/// Board square index (`0..=63`, `0 == a1`, `63 == h8`).
pub type Square = u8;

/// Compact castling rights bitmask.
pub type CastlingRights = u8;

pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights = 0x0F;

/// Upper bound on pseudo-legal moves in any reachable position (218 legal).
pub const MAX_MOVES: usize = 256;

/// Upper bound on plies held by the undo stack of one game line.
pub const MAX_GAME_PLY: usize = 1024;

#[inline]
pub const fn square_file(square: Square) -> u8 {
    square % 8
}

#[inline]
pub const fn square_rank(square: Square) -> u8 {
    square / 8
}

#[inline]
pub const fn square_bit(square: Square) -> u64 {
    1u64 << square
}
