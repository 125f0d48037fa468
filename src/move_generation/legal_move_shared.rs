use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::move_list::MoveList;
use crate::moves::move_descriptions::{Move, FLAG_CAPTURE};

/// Emit one move per set bit of `targets`. The capture flag and captured
/// identity come from the mailbox, so `targets` must already exclude own
/// pieces.
#[inline]
pub fn push_targets(
    game_state: &GameState,
    out: &mut MoveList,
    from: Square,
    piece: Piece,
    mut targets: u64,
) {
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        let captured = game_state.piece_on(to);
        let flags = if captured.is_some() { FLAG_CAPTURE } else { 0 };
        out.push(Move::new(from, to, piece, captured, None, flags));
        targets &= targets - 1;
    }
}

/// Run `emit` for each square in `bb`.
#[inline]
pub fn for_each_square(mut bb: u64, mut emit: impl FnMut(Square)) {
    while bb != 0 {
        emit(bb.trailing_zeros() as Square);
        bb &= bb - 1;
    }
}
