//! In-place make/undo.
//!
//! `make_move` is an atomic transition: it either leaves the position with
//! the move applied, or rejects the move and restores every field. Each
//! successful make pushes one `UndoState`; `unmake_move` pops it and must be
//! called in strict LIFO order with the same move.

use crate::errors::IllegalMoveError;
use crate::game_state::chess_rules::{castling_move_for, castling_rights_of, rook_home_right};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_pawn::en_passant_victim_square;
use crate::moves::move_descriptions::Move;
use crate::search::zobrist::{castling_key, en_passant_key, side_to_move_key};

pub fn make_move(game_state: &mut GameState, mv: Move) -> Result<(), IllegalMoveError> {
    let side = game_state.side_to_move;
    apply_move_unchecked(game_state, mv);

    if is_king_in_check(game_state, side) {
        unmake_move(game_state, mv);
        return Err(IllegalMoveError::KingLeftInCheck {
            from: mv.from(),
            to: mv.to(),
        });
    }

    Ok(())
}

/// Every board edit of `make_move` without the king-safety gate.
pub(crate) fn apply_move_unchecked(game_state: &mut GameState, mv: Move) {
    debug_assert!(game_state.undo_stack.len() < MAX_GAME_PLY, "undo stack overflow");

    let side = game_state.side_to_move;
    let from = mv.from();
    let to = mv.to();
    let moved = mv.moved_piece();

    let snapshot = UndoState {
        mv,
        captured_piece: None,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_fullmove_number: game_state.fullmove_number,
        prev_zobrist_key: game_state.zobrist_key,
    };

    // Outgoing en-passant target.
    game_state.zobrist_key ^= en_passant_key(game_state.en_passant_square);
    game_state.en_passant_square = None;

    update_castling_rights(game_state, side, moved.kind, from, to);

    let captured = if mv.is_en_passant() {
        game_state.remove_piece(en_passant_victim_square(side, to))
    } else {
        game_state.remove_piece(to)
    };

    game_state.remove_piece(from);
    game_state.put_piece(to, mv.promotion_piece().unwrap_or(moved));

    if mv.is_castling() {
        if let Some(castle) = castling_move_for(side, to) {
            if let Some(rook) = game_state.remove_piece(castle.rook_from) {
                game_state.put_piece(castle.rook_to, rook);
            }
        }
    }

    if mv.is_double_pawn_push() {
        game_state.en_passant_square = Some((from + to) / 2);
    }
    game_state.zobrist_key ^= en_passant_key(game_state.en_passant_square);

    if moved.kind == PieceKind::Pawn || captured.is_some() {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }
    if side == Color::Dark {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }

    game_state.side_to_move = side.opposite();
    game_state.zobrist_key ^= side_to_move_key();

    game_state.undo_stack.push(UndoState {
        captured_piece: captured,
        ..snapshot
    });
}

/// Reverse the most recent successful `make_move`.
pub fn unmake_move(game_state: &mut GameState, mv: Move) {
    let Some(undo) = game_state.undo_stack.pop() else {
        debug_assert!(false, "unmake_move with an empty undo stack");
        return;
    };
    debug_assert_eq!(undo.mv, mv, "unmake_move called out of LIFO order");

    let mv = undo.mv;
    let side = game_state.side_to_move.opposite();
    let from = mv.from();
    let to = mv.to();

    game_state.side_to_move = side;

    if mv.is_castling() {
        if let Some(castle) = castling_move_for(side, to) {
            if let Some(rook) = game_state.remove_piece(castle.rook_to) {
                game_state.put_piece(castle.rook_from, rook);
            }
        }
    }

    game_state.remove_piece(to);
    game_state.put_piece(from, mv.moved_piece());

    if let Some(captured) = undo.captured_piece {
        let square = if mv.is_en_passant() {
            en_passant_victim_square(side, to)
        } else {
            to
        };
        game_state.put_piece(square, captured);
    }

    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.halfmove_clock = undo.prev_halfmove_clock;
    game_state.fullmove_number = undo.prev_fullmove_number;
    game_state.zobrist_key = undo.prev_zobrist_key;
}

/// Rights only ever shrink: a king move drops both of its side's rights, and
/// any move touching a rook home square (leaving or landing) drops that one.
fn update_castling_rights(
    game_state: &mut GameState,
    side: Color,
    moved: PieceKind,
    from: Square,
    to: Square,
) {
    let before = game_state.castling_rights;
    let mut after = before & !(rook_home_right(from) | rook_home_right(to));
    if moved == PieceKind::King {
        after &= !castling_rights_of(side);
    }
    if after != before {
        game_state.zobrist_key ^= castling_key(before) ^ castling_key(after);
        game_state.castling_rights = after;
    }
}
