use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::{for_each_square, push_targets};
use crate::move_generation::move_list::MoveList;
use crate::moves::slider_attacks::{bishop_attacks, queen_attacks, rook_attacks};

/// Bishop, rook and queen moves under the current occupancy.
pub fn generate_slider_moves(game_state: &GameState, out: &mut MoveList) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];
    let occ = game_state.occupancy_all;

    let sliders: [(PieceKind, fn(Square, u64) -> u64); 3] = [
        (PieceKind::Bishop, bishop_attacks),
        (PieceKind::Rook, rook_attacks),
        (PieceKind::Queen, queen_attacks),
    ];

    for (kind, attacks) in sliders {
        let piece = Piece::new(side, kind);
        for_each_square(game_state.pieces_of(piece), |from| {
            push_targets(game_state, out, from, piece, attacks(from, occ) & !own_occ);
        });
    }
}
