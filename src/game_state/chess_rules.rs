//! Canonical chess-rule constants.
//!
//! Holds the standard starting FEN and the castling geometry shared by the
//! move generator (path checks) and make/undo (rook relocation, rights loss).

use crate::game_state::chess_types::*;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Geometry of one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingMove {
    pub color: Color,
    pub right: CastlingRights,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares strictly between king and rook; all must be empty.
    pub between_mask: u64,
    /// King start, transit, and destination; none may be attacked.
    pub king_path: [Square; 3],
}

pub const CASTLING_MOVES: [CastlingMove; 4] = [
    CastlingMove {
        color: Color::Light,
        right: CASTLE_LIGHT_KINGSIDE,
        king_from: 4,
        king_to: 6,
        rook_from: 7,
        rook_to: 5,
        between_mask: (1 << 5) | (1 << 6),
        king_path: [4, 5, 6],
    },
    CastlingMove {
        color: Color::Light,
        right: CASTLE_LIGHT_QUEENSIDE,
        king_from: 4,
        king_to: 2,
        rook_from: 0,
        rook_to: 3,
        between_mask: (1 << 1) | (1 << 2) | (1 << 3),
        king_path: [4, 3, 2],
    },
    CastlingMove {
        color: Color::Dark,
        right: CASTLE_DARK_KINGSIDE,
        king_from: 60,
        king_to: 62,
        rook_from: 63,
        rook_to: 61,
        between_mask: (1 << 61) | (1 << 62),
        king_path: [60, 61, 62],
    },
    CastlingMove {
        color: Color::Dark,
        right: CASTLE_DARK_QUEENSIDE,
        king_from: 60,
        king_to: 58,
        rook_from: 56,
        rook_to: 59,
        between_mask: (1 << 57) | (1 << 58) | (1 << 59),
        king_path: [60, 59, 58],
    },
];

/// Castling geometry for a king landing on `king_to` with the castle flag.
#[inline]
pub fn castling_move_for(color: Color, king_to: Square) -> Option<&'static CastlingMove> {
    CASTLING_MOVES
        .iter()
        .find(|c| c.color == color && c.king_to == king_to)
}

/// Both castling rights belonging to `color`.
#[inline]
pub const fn castling_rights_of(color: Color) -> CastlingRights {
    match color {
        Color::Light => CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE,
        Color::Dark => CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE,
    }
}

/// Right revoked when anything leaves or lands on a rook home square.
#[inline]
pub const fn rook_home_right(square: Square) -> CastlingRights {
    match square {
        0 => CASTLE_LIGHT_QUEENSIDE,
        7 => CASTLE_LIGHT_KINGSIDE,
        56 => CASTLE_DARK_QUEENSIDE,
        63 => CASTLE_DARK_KINGSIDE,
        _ => 0,
    }
}
