//! Attack oracle.
//!
//! Answers "does `by` attack `square`" by looking outward from the target:
//! a piece of kind K on square T is attacked by an enemy K exactly when K's
//! attack pattern from T reaches that enemy. Pawns use the opposite colour's
//! pattern for the same reason.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::leaper_attacks::{king_attacks, knight_attacks, pawn_attacks};
use crate::moves::slider_attacks::{bishop_attacks, rook_attacks};

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    is_square_attacked(game_state, game_state.king_square(color), color.opposite())
}

/// Attack test under the position's current occupancy.
#[inline]
pub fn is_square_attacked(game_state: &GameState, square: Square, by: Color) -> bool {
    is_square_attacked_with_occupancy(game_state, square, by, game_state.occupancy_all)
}

/// Attack test with an explicit occupancy, so callers can ask about a board
/// that differs from the stored one (for example with the king lifted).
pub fn is_square_attacked_with_occupancy(
    game_state: &GameState,
    square: Square,
    by: Color,
    occupancy: u64,
) -> bool {
    let theirs = &game_state.pieces[by.index()];

    if pawn_attacks(by.opposite(), square) & theirs[PieceKind::Pawn.index()] != 0 {
        return true;
    }
    if knight_attacks(square) & theirs[PieceKind::Knight.index()] != 0 {
        return true;
    }
    if king_attacks(square) & theirs[PieceKind::King.index()] != 0 {
        return true;
    }

    let queens = theirs[PieceKind::Queen.index()];
    let diagonal = theirs[PieceKind::Bishop.index()] | queens;
    if diagonal != 0 && bishop_attacks(square, occupancy) & diagonal != 0 {
        return true;
    }
    let straight = theirs[PieceKind::Rook.index()] | queens;
    straight != 0 && rook_attacks(square, occupancy) & straight != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_attack_map() {
        let game = GameState::new_game();
        // f3 is covered by the g1 knight and the e2/g2 pawns.
        assert!(is_square_attacked(&game, 21, Color::Light));
        assert!(!is_square_attacked(&game, 28, Color::Light));
        assert!(is_square_attacked(&game, 45, Color::Dark));
        assert!(!is_king_in_check(&game, Color::Light));
    }

    #[test]
    fn pawn_attacks_are_directional() {
        let game = GameState::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        // Dark pawn on d5 hits c4 and e4, not c6/e6.
        assert!(is_square_attacked(&game, 26, Color::Dark));
        assert!(is_square_attacked(&game, 28, Color::Dark));
        assert!(!is_square_attacked(&game, 42, Color::Dark));
        assert!(!is_square_attacked(&game, 44, Color::Dark));
    }

    #[test]
    fn sliders_respect_supplied_occupancy() {
        let game =
            GameState::from_fen("4k3/8/8/8/R7/8/8/r3K3 w - - 0 1").expect("FEN should parse");
        // The light rook on a4 shields a8 from the dark rook on a1.
        assert!(!is_square_attacked(&game, 56, Color::Dark));
        let lifted = game.occupancy_all & !(1u64 << 24);
        assert!(is_square_attacked_with_occupancy(&game, 56, Color::Dark, lifted));
        assert!(is_king_in_check(&game, Color::Light));
    }
}
