use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::for_each_square;
use crate::move_generation::move_list::MoveList;
use crate::moves::leaper_attacks::pawn_attacks;
use crate::moves::move_descriptions::{
    Move, FLAG_CAPTURE, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT, FLAG_PROMOTION,
};

/// Pushes, double pushes, captures, en-passant, and promotions for the side
/// to move.
pub fn generate_pawn_moves(game_state: &GameState, out: &mut MoveList) {
    let side = game_state.side_to_move;
    let pawn = Piece::new(side, PieceKind::Pawn);
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];
    let empty = !game_state.occupancy_all;
    let (start_rank, last_rank) = match side {
        Color::Light => (1, 7),
        Color::Dark => (6, 0),
    };

    for_each_square(game_state.pieces_of(pawn), |from| {
        let one = step_forward(side, from);
        if empty & square_bit(one) != 0 {
            if square_rank(one) == last_rank {
                push_promotions(out, from, one, pawn, None);
            } else {
                out.push(Move::new(from, one, pawn, None, None, 0));
                if square_rank(from) == start_rank {
                    let two = step_forward(side, one);
                    if empty & square_bit(two) != 0 {
                        out.push(Move::new(from, two, pawn, None, None, FLAG_DOUBLE_PAWN_PUSH));
                    }
                }
            }
        }

        let attacks = pawn_attacks(side, from);
        for_each_square(attacks & enemy_occ, |to| {
            let captured = game_state.piece_on(to);
            if square_rank(to) == last_rank {
                push_promotions(out, from, to, pawn, captured);
            } else {
                out.push(Move::new(from, to, pawn, captured, None, FLAG_CAPTURE));
            }
        });

        if let Some(ep) = game_state.en_passant_square {
            if attacks & square_bit(ep) != 0 {
                let victim = Piece::new(side.opposite(), PieceKind::Pawn);
                out.push(Move::new(
                    from,
                    ep,
                    pawn,
                    Some(victim),
                    None,
                    FLAG_CAPTURE | FLAG_EN_PASSANT,
                ));
            }
        }
    });
}

/// Square one step towards the promotion rank.
#[inline]
pub fn step_forward(side: Color, square: Square) -> Square {
    match side {
        Color::Light => square + 8,
        Color::Dark => square - 8,
    }
}

/// Square of the pawn removed by an en-passant capture landing on `target`.
#[inline]
pub fn en_passant_victim_square(side: Color, target: Square) -> Square {
    match side {
        Color::Light => target - 8,
        Color::Dark => target + 8,
    }
}

fn push_promotions(
    out: &mut MoveList,
    from: Square,
    to: Square,
    pawn: Piece,
    captured: Option<Piece>,
) {
    let capture_flag = if captured.is_some() { FLAG_CAPTURE } else { 0 };
    for kind in PieceKind::PROMOTIONS {
        out.push(Move::new(
            from,
            to,
            pawn,
            captured,
            Some(Piece::new(pawn.color, kind)),
            FLAG_PROMOTION | capture_flag,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pawn_moves(fen: &str) -> MoveList {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mut out = MoveList::new();
        generate_pawn_moves(&game, &mut out);
        out
    }

    #[test]
    fn start_position_has_sixteen_pawn_moves() {
        let moves = pawn_moves("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(moves.len(), 16);
        assert_eq!(moves.iter().filter(|m| m.is_double_pawn_push()).count(), 8);
    }

    #[test]
    fn blocked_pawn_cannot_double_push() {
        let moves = pawn_moves("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(moves.is_empty());
    }

    #[test]
    fn promotion_expands_to_four_pieces_per_target() {
        // b7 pawn: push to b8 plus capture on a8.
        let moves = pawn_moves("r3k3/1P6/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|m| m.is_promotion()));
        assert_eq!(moves.iter().filter(|m| m.is_capture()).count(), 4);
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let moves = pawn_moves("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let ep: Vec<_> = moves.iter().filter(|m| m.is_en_passant()).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to(), 43);
        assert_eq!(
            ep[0].captured_piece(),
            Some(Piece::new(Color::Dark, PieceKind::Pawn))
        );
    }

    #[test]
    fn dark_pawns_move_down_the_board() {
        let moves = pawn_moves("4k3/3p4/8/8/8/8/8/4K3 b - - 0 1");
        let targets: Vec<_> = moves.iter().map(|m| m.to()).collect();
        assert_eq!(targets, vec![43, 35]);
    }
}
