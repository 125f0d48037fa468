//! Knight and king moves, including castling.

use crate::game_state::chess_rules::CASTLING_MOVES;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::{for_each_square, push_targets};
use crate::move_generation::move_list::MoveList;
use crate::moves::leaper_attacks::{king_attacks, knight_attacks};
use crate::moves::move_descriptions::{Move, FLAG_CASTLING};

pub fn generate_knight_moves(game_state: &GameState, out: &mut MoveList) {
    let side = game_state.side_to_move;
    let knight = Piece::new(side, PieceKind::Knight);
    let own_occ = game_state.occupancy_by_color[side.index()];

    for_each_square(game_state.pieces_of(knight), |from| {
        push_targets(game_state, out, from, knight, knight_attacks(from) & !own_occ);
    });
}

pub fn generate_king_moves(game_state: &GameState, out: &mut MoveList) {
    let side = game_state.side_to_move;
    let king = Piece::new(side, PieceKind::King);
    let own_occ = game_state.occupancy_by_color[side.index()];
    let from = game_state.king_square(side);

    push_targets(game_state, out, from, king, king_attacks(from) & !own_occ);
    generate_castling_moves(game_state, out);
}

/// Castling needs the right, the king and rook on their home squares, an
/// empty gap, and no attacked square on the king's path (start included).
fn generate_castling_moves(game_state: &GameState, out: &mut MoveList) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let king = Piece::new(side, PieceKind::King);
    let rook = Piece::new(side, PieceKind::Rook);

    for castle in CASTLING_MOVES.iter().filter(|c| c.color == side) {
        if game_state.castling_rights & castle.right == 0
            || game_state.king_square(side) != castle.king_from
            || game_state.piece_on(castle.rook_from) != Some(rook)
            || game_state.occupancy_all & castle.between_mask != 0
        {
            continue;
        }
        if castle
            .king_path
            .iter()
            .any(|&sq| is_square_attacked(game_state, sq, enemy))
        {
            continue;
        }
        out.push(Move::new(
            castle.king_from,
            castle.king_to,
            king,
            None,
            None,
            FLAG_CASTLING,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn king_moves(fen: &str) -> MoveList {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mut out = MoveList::new();
        generate_king_moves(&game, &mut out);
        out
    }

    fn castles(moves: &MoveList) -> Vec<Square> {
        moves.iter().filter(|m| m.is_castling()).map(|m| m.to()).collect()
    }

    #[test]
    fn both_castles_available_on_open_back_rank() {
        let moves = king_moves("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(castles(&moves), vec![6, 2]);
    }

    #[test]
    fn castling_through_attacked_square_is_refused() {
        // Dark rook on f8 covers f1.
        let moves = king_moves("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert_eq!(castles(&moves), vec![2]);
    }

    #[test]
    fn castling_out_of_check_is_refused() {
        let moves = king_moves("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1");
        assert!(castles(&moves).is_empty());
    }

    #[test]
    fn queenside_gap_includes_b_file() {
        // b1 occupied blocks queenside even though the king never crosses it.
        let moves = king_moves("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1");
        assert_eq!(castles(&moves), vec![6]);
    }

    #[test]
    fn missing_rook_blocks_castling_even_with_rights() {
        let moves = king_moves("4k3/8/8/8/8/8/8/4K2R w KQ - 0 1");
        assert_eq!(castles(&moves), vec![6]);
    }

    #[test]
    fn knight_moves_skip_own_pieces_and_flag_captures() {
        let game = GameState::from_fen("4k3/8/8/8/8/2p5/8/1N2K3 w - - 0 1").expect("FEN should parse");
        let mut out = MoveList::new();
        generate_knight_moves(&game, &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(out.iter().filter(|m| m.is_capture()).count(), 1);
    }
}
