//! Core incremental board state representation.
//!
//! `GameState` is the single mutable Position for one game line. It keeps a
//! square-centric mailbox and piece bitboards side by side, the derived
//! occupancy caches, rights and clocks, the incrementally maintained
//! fingerprint, and the ply snapshot stack used by make/undo.

use crate::errors::{FenError, InvariantViolation};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::search::zobrist::{compute_zobrist_key, piece_square_key};
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Incremental game state optimized for fast move making/unmaking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // Square -> occupant.
    pub board: [Option<Piece>; 64],

    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    // Occupancy caches; always the union of `pieces`.
    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    pub zobrist_key: u64,

    // Always the single set bit of the matching king mask.
    pub king_squares: [Square; 2],

    pub undo_stack: Vec<UndoState>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: [None; 64],
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            zobrist_key: 0,
            king_squares: [0; 2],

            undo_stack: Vec::with_capacity(MAX_GAME_PLY),
        }
    }
}

impl GameState {
    /// Standard starting position.
    pub fn new_game() -> Self {
        let mut game = Self::default();
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            let file = file as Square;
            game.put_piece(file, Piece::new(Color::Light, kind));
            game.put_piece(8 + file, Piece::new(Color::Light, PieceKind::Pawn));
            game.put_piece(48 + file, Piece::new(Color::Dark, PieceKind::Pawn));
            game.put_piece(56 + file, Piece::new(Color::Dark, kind));
        }
        game.castling_rights = CASTLE_ALL;
        game.zobrist_key = compute_zobrist_key(&game);
        game
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.board[square as usize]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        is_king_in_check(self, color)
    }

    #[inline]
    pub fn pieces_of(&self, piece: Piece) -> u64 {
        self.pieces[piece.color.index()][piece.kind.index()]
    }

    /// Place `piece` on an empty square, keeping masks, king cache and
    /// fingerprint in step.
    #[inline]
    pub(crate) fn put_piece(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.board[square as usize].is_none(), "square {square} occupied");
        let bit = square_bit(square);
        let c = piece.color.index();
        self.board[square as usize] = Some(piece);
        self.pieces[c][piece.kind.index()] |= bit;
        self.occupancy_by_color[c] |= bit;
        self.occupancy_all |= bit;
        self.zobrist_key ^= piece_square_key(piece, square);
        if piece.kind == PieceKind::King {
            self.king_squares[c] = square;
        }
    }

    /// Lift whatever stands on `square`.
    #[inline]
    pub(crate) fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let piece = self.board[square as usize].take()?;
        let bit = square_bit(square);
        let c = piece.color.index();
        self.pieces[c][piece.kind.index()] &= !bit;
        self.occupancy_by_color[c] &= !bit;
        self.occupancy_all &= !bit;
        self.zobrist_key ^= piece_square_key(piece, square);
        Some(piece)
    }

    /// Check every standing invariant of the representation.
    pub fn validate_invariants(&self) -> Result<(), InvariantViolation> {
        let fail = |message: String| Err(InvariantViolation { message });

        let mut union = [0u64; 2];
        let mut seen = 0u64;
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                let bb = self.pieces[color.index()][kind.index()];
                if bb & seen != 0 {
                    return fail(format!("{color:?} {kind:?} mask overlaps another piece"));
                }
                seen |= bb;
                union[color.index()] |= bb;
            }
        }
        if union != self.occupancy_by_color {
            return fail("per-side occupancy differs from piece masks".to_owned());
        }
        if seen != self.occupancy_all {
            return fail("combined occupancy differs from piece masks".to_owned());
        }

        for square in 0..64u8 {
            let from_masks = Color::ALL.into_iter().find_map(|color| {
                PieceKind::ALL.into_iter().find_map(|kind| {
                    (self.pieces[color.index()][kind.index()] & square_bit(square) != 0)
                        .then_some(Piece::new(color, kind))
                })
            });
            if from_masks != self.board[square as usize] {
                return fail(format!("mailbox and masks disagree on square {square}"));
            }
        }

        for color in Color::ALL {
            let kings = self.pieces[color.index()][PieceKind::King.index()];
            if kings.count_ones() != 1 {
                return fail(format!("{color:?} has {} kings", kings.count_ones()));
            }
            if kings.trailing_zeros() as Square != self.king_squares[color.index()] {
                return fail(format!("{color:?} king square cache is stale"));
            }
        }

        if let Some(ep) = self.en_passant_square {
            let expected_rank = match self.side_to_move {
                Color::Light => 5,
                Color::Dark => 2,
            };
            if square_rank(ep) != expected_rank {
                return fail(format!("en-passant square {ep} on the wrong rank"));
            }
        }

        if self.castling_rights & !CASTLE_ALL != 0 {
            return fail("castling rights outside the four flags".to_owned());
        }

        let recomputed = compute_zobrist_key(self);
        if recomputed != self.zobrist_key {
            return fail(format!(
                "fingerprint {:#018x} differs from recomputed {recomputed:#018x}",
                self.zobrist_key
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    #[test]
    fn new_game_matches_starting_fen() {
        let built = GameState::new_game();
        let parsed = GameState::from_fen(STARTING_POSITION_FEN).expect("start FEN parses");
        assert_eq!(built, parsed);
        assert_eq!(built.get_fen(), STARTING_POSITION_FEN);
        assert!(built.validate_invariants().is_ok());
        assert_eq!(built.king_square(Color::Light), 4);
        assert_eq!(built.king_square(Color::Dark), 60);
    }

    #[test]
    fn put_and_remove_keep_fingerprint_and_masks_in_step() {
        let mut game = GameState::new_game();
        let before = game.clone();
        let knight = game.remove_piece(6).expect("g1 knight");
        game.put_piece(21, knight);
        assert_eq!(game.piece_on(21), Some(knight));
        assert_eq!(game.zobrist_key, compute_zobrist_key(&game));
        assert!(game.validate_invariants().is_ok());

        game.remove_piece(21);
        game.put_piece(6, knight);
        assert_eq!(game, before);
    }

    #[test]
    fn corrupted_state_is_reported() {
        let mut game = GameState::new_game();
        game.occupancy_all ^= 1u64 << 30;
        assert!(game.validate_invariants().is_err());

        let mut game = GameState::new_game();
        game.zobrist_key ^= 1;
        let err = game.validate_invariants().expect_err("stale key");
        assert!(err.message.contains("fingerprint"));
    }
}
