//! Perft: exhaustive leaf counting used as a move-generation oracle.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{generate_pseudo_legal, has_legal_move};
use crate::utils::long_algebraic::move_to_long_algebraic;

/// Leaf breakdown, classified by the move that reached each leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

/// Number of leaves reachable by legal play in exactly `depth` plies.
pub fn perft(game_state: &mut GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for mv in generate_pseudo_legal(game_state) {
        if make_move(game_state, mv).is_err() {
            continue;
        }
        nodes += if depth == 1 { 1 } else { perft(game_state, depth - 1) };
        unmake_move(game_state, mv);
    }
    nodes
}

pub fn perft_counts(game_state: &mut GameState, depth: u8) -> PerftCounts {
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
        return counts;
    }
    perft_counts_recurse(game_state, depth, &mut counts);
    counts
}

fn perft_counts_recurse(game_state: &mut GameState, depth: u8, counts: &mut PerftCounts) {
    for mv in generate_pseudo_legal(game_state) {
        if make_move(game_state, mv).is_err() {
            continue;
        }

        if depth == 1 {
            counts.nodes += 1;
            counts.captures += u64::from(mv.is_capture());
            counts.en_passant += u64::from(mv.is_en_passant());
            counts.castles += u64::from(mv.is_castling());
            counts.promotions += u64::from(mv.is_promotion());
            if is_king_in_check(game_state, game_state.side_to_move) {
                counts.checks += 1;
                if !has_legal_move(game_state) {
                    counts.checkmates += 1;
                }
            }
        } else {
            perft_counts_recurse(game_state, depth - 1, counts);
        }

        unmake_move(game_state, mv);
    }
}

/// Per-root-move leaf counts, sorted by move text.
pub fn perft_divide(game_state: &mut GameState, depth: u8) -> Vec<(String, u64)> {
    let mut out = Vec::new();
    if depth == 0 {
        return out;
    }

    for mv in generate_pseudo_legal(game_state) {
        if make_move(game_state, mv).is_err() {
            continue;
        }
        out.push((move_to_long_algebraic(mv), perft(game_state, depth - 1)));
        unmake_move(game_state, mv);
    }
    out.sort();
    out
}
