//! Move generation pipeline.
//!
//! Piece-wise generators produce a pseudo-legal superset; the legal set is
//! whatever survives `make_move`'s king-safety gate.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_moves_leapers::{generate_king_moves, generate_knight_moves};
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliders::generate_slider_moves;
use crate::move_generation::move_list::MoveList;
use crate::moves::move_descriptions::Move;

pub fn generate_pseudo_legal(game_state: &GameState) -> MoveList {
    let mut out = MoveList::new();
    generate_pseudo_legal_into(game_state, &mut out);
    out
}

pub fn generate_pseudo_legal_into(game_state: &GameState, out: &mut MoveList) {
    generate_pawn_moves(game_state, out);
    generate_knight_moves(game_state, out);
    generate_slider_moves(game_state, out);
    generate_king_moves(game_state, out);
}

/// Pseudo-legal captures only (en-passant and capture-promotions included).
pub fn generate_captures(game_state: &GameState) -> MoveList {
    let mut out = generate_pseudo_legal(game_state);
    out.retain(Move::is_capture);
    out
}

/// Moves that pass the legality gate. The position is restored before
/// returning.
pub fn generate_legal_moves(game_state: &mut GameState) -> MoveList {
    let mut out = generate_pseudo_legal(game_state);
    out.retain(|mv| passes_gate(game_state, mv));
    out
}

/// True when `mv` is generated here and its make succeeds. Accepts moves
/// from any source (a cached hash move, parsed text) and never mutates the
/// position on return.
pub fn is_legal_move(game_state: &mut GameState, mv: Move) -> bool {
    generate_pseudo_legal(game_state).contains(mv) && passes_gate(game_state, mv)
}

/// At least one legal move exists.
pub fn has_legal_move(game_state: &mut GameState) -> bool {
    generate_pseudo_legal(game_state)
        .into_iter()
        .any(|mv| passes_gate(game_state, mv))
}

#[inline]
fn passes_gate(game_state: &mut GameState, mv: Move) -> bool {
    if make_move(game_state, mv).is_ok() {
        unmake_move(game_state, mv);
        true
    } else {
        false
    }
}
