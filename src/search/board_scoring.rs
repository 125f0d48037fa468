//! Pluggable board evaluation.
//!
//! Search only sees the `BoardScorer` trait, so heuristics can be swapped
//! without touching search code. Scores are centipawns from the point of view
//! of the side to move.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::for_each_square;
use crate::moves::leaper_attacks::knight_attacks;
use crate::moves::slider_attacks::{bishop_attacks, queen_attacks, rook_attacks};

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, game_state: &GameState) -> i32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }

    fn material_white_minus_black(game_state: &GameState) -> i32 {
        PieceKind::ALL
            .into_iter()
            .map(|kind| {
                let light = game_state.pieces[Color::Light.index()][kind.index()].count_ones() as i32;
                let dark = game_state.pieces[Color::Dark.index()][kind.index()].count_ones() as i32;
                (light - dark) * Self::piece_value(kind)
            })
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        from_side_to_move(game_state, Self::material_white_minus_black(game_state))
    }
}

/// Material plus piece-square tables, bishop pair, pawn structure, and
/// mobility of the minor and major pieces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceSquareScorer;

impl PieceSquareScorer {
    const BISHOP_PAIR: i32 = 30;
    const DOUBLED_PAWN: i32 = 15;
    const ISOLATED_PAWN: i32 = 10;
    const MOBILITY_WEIGHT: i32 = 2;

    fn placement(game_state: &GameState, color: Color) -> i32 {
        let mut score = 0;
        for kind in PieceKind::ALL {
            let table = &PIECE_SQUARE_TABLES[kind.index()];
            for_each_square(game_state.pieces[color.index()][kind.index()], |sq| {
                score += MaterialScorer::piece_value(kind) + table[pst_index(color, sq)];
            });
        }
        score
    }

    fn pawn_structure(game_state: &GameState, color: Color) -> i32 {
        let pawns = game_state.pieces[color.index()][PieceKind::Pawn.index()];
        let mut per_file = [0i32; 8];
        for_each_square(pawns, |sq| per_file[square_file(sq) as usize] += 1);

        let mut score = 0;
        for file in 0..8 {
            let count = per_file[file];
            if count == 0 {
                continue;
            }
            score -= Self::DOUBLED_PAWN * (count - 1);
            let left = if file > 0 { per_file[file - 1] } else { 0 };
            let right = if file < 7 { per_file[file + 1] } else { 0 };
            if left + right == 0 {
                score -= Self::ISOLATED_PAWN;
            }
        }
        score
    }

    fn mobility(game_state: &GameState, color: Color) -> i32 {
        let own = game_state.occupancy_by_color[color.index()];
        let occ = game_state.occupancy_all;
        let pieces = &game_state.pieces[color.index()];
        let mut squares = 0u32;

        for_each_square(pieces[PieceKind::Knight.index()], |sq| {
            squares += (knight_attacks(sq) & !own).count_ones();
        });
        for_each_square(pieces[PieceKind::Bishop.index()], |sq| {
            squares += (bishop_attacks(sq, occ) & !own).count_ones();
        });
        for_each_square(pieces[PieceKind::Rook.index()], |sq| {
            squares += (rook_attacks(sq, occ) & !own).count_ones();
        });
        for_each_square(pieces[PieceKind::Queen.index()], |sq| {
            squares += (queen_attacks(sq, occ) & !own).count_ones();
        });

        squares as i32 * Self::MOBILITY_WEIGHT
    }

    fn side_total(game_state: &GameState, color: Color) -> i32 {
        let bishops = game_state.pieces[color.index()][PieceKind::Bishop.index()];
        let pair = if bishops.count_ones() >= 2 {
            Self::BISHOP_PAIR
        } else {
            0
        };
        Self::placement(game_state, color)
            + pair
            + Self::pawn_structure(game_state, color)
            + Self::mobility(game_state, color)
    }
}

impl BoardScorer for PieceSquareScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        let white_minus_black =
            Self::side_total(game_state, Color::Light) - Self::side_total(game_state, Color::Dark);
        from_side_to_move(game_state, white_minus_black)
    }
}

#[inline]
fn from_side_to_move(game_state: &GameState, white_minus_black: i32) -> i32 {
    match game_state.side_to_move {
        Color::Light => white_minus_black,
        Color::Dark => -white_minus_black,
    }
}

/// Tables below are written rank 8 first, as seen from light's side, so a
/// light piece on `sq` reads entry `sq ^ 56` and a dark piece reads `sq`.
#[inline]
fn pst_index(color: Color, sq: Square) -> usize {
    match color {
        Color::Light => (sq ^ 56) as usize,
        Color::Dark => sq as usize,
    }
}

#[rustfmt::skip]
const PIECE_SQUARE_TABLES: [[i32; 64]; 6] = [
    // Pawn
    [
          0,   0,   0,   0,   0,   0,   0,   0,
         50,  50,  50,  50,  50,  50,  50,  50,
         10,  10,  20,  30,  30,  20,  10,  10,
          5,   5,  10,  25,  25,  10,   5,   5,
          0,   0,   0,  20,  20,   0,   0,   0,
          5,  -5, -10,   0,   0, -10,  -5,   5,
          5,  10,  10, -20, -20,  10,  10,   5,
          0,   0,   0,   0,   0,   0,   0,   0,
    ],
    // Knight
    [
        -50, -40, -30, -30, -30, -30, -40, -50,
        -40, -20,   0,   0,   0,   0, -20, -40,
        -30,   0,  10,  15,  15,  10,   0, -30,
        -30,   5,  15,  20,  20,  15,   5, -30,
        -30,   0,  15,  20,  20,  15,   0, -30,
        -30,   5,  10,  15,  15,  10,   5, -30,
        -40, -20,   0,   5,   5,   0, -20, -40,
        -50, -40, -30, -30, -30, -30, -40, -50,
    ],
    // Bishop
    [
        -20, -10, -10, -10, -10, -10, -10, -20,
        -10,   0,   0,   0,   0,   0,   0, -10,
        -10,   0,   5,  10,  10,   5,   0, -10,
        -10,   5,   5,  10,  10,   5,   5, -10,
        -10,   0,  10,  10,  10,  10,   0, -10,
        -10,  10,  10,  10,  10,  10,  10, -10,
        -10,   5,   0,   0,   0,   0,   5, -10,
        -20, -10, -10, -10, -10, -10, -10, -20,
    ],
    // Rook
    [
          0,   0,   0,   0,   0,   0,   0,   0,
          5,  10,  10,  10,  10,  10,  10,   5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
          0,   0,   0,   5,   5,   0,   0,   0,
    ],
    // Queen
    [
        -20, -10, -10,  -5,  -5, -10, -10, -20,
        -10,   0,   0,   0,   0,   0,   0, -10,
        -10,   0,   5,   5,   5,   5,   0, -10,
         -5,   0,   5,   5,   5,   5,   0,  -5,
          0,   0,   5,   5,   5,   5,   0,  -5,
        -10,   5,   5,   5,   5,   5,   0, -10,
        -10,   0,   5,   0,   0,   0,   0, -10,
        -20, -10, -10,  -5,  -5, -10, -10, -20,
    ],
    // King
    [
        -30, -40, -40, -50, -50, -40, -40, -30,
        -30, -40, -40, -50, -50, -40, -40, -30,
        -30, -40, -40, -50, -50, -40, -40, -30,
        -30, -40, -40, -50, -50, -40, -40, -30,
        -20, -30, -30, -40, -40, -30, -30, -20,
        -10, -20, -20, -20, -20, -20, -20, -10,
         20,  20,   0,   0,   0,   0,  20,  20,
         20,  30,  10,   0,   0,  10,  30,  20,
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn game(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("FEN should parse")
    }

    #[test]
    fn material_scorer_reflects_side_to_move_perspective() {
        let scorer = MaterialScorer;
        assert_eq!(scorer.score(&game("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1")), 900);
        assert_eq!(scorer.score(&game("4k3/8/8/8/8/8/8/4KQ2 b - - 0 1")), -900);
    }

    #[test]
    fn start_position_is_balanced() {
        let start = GameState::new_game();
        assert_eq!(PieceSquareScorer.score(&start), 0);
        assert_eq!(MaterialScorer.score(&start), 0);
    }

    #[test]
    fn mirrored_positions_score_the_same_for_the_mover() {
        let light = game("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
        let dark = game("rnbqkb1r/pppp1ppp/5n2/4p3/4P3/2N5/PPPP1PPP/R1BQKBNR b KQkq - 2 3");
        assert_eq!(PieceSquareScorer.score(&light), PieceSquareScorer.score(&dark));
    }

    #[test]
    fn central_knight_beats_rim_knight() {
        let center = game("4k3/8/8/3N4/8/8/8/4K3 w - - 0 1");
        let rim = game("4k3/8/8/8/8/8/N7/4K3 w - - 0 1");
        assert!(PieceSquareScorer.score(&center) > PieceSquareScorer.score(&rim));
    }

    #[test]
    fn advanced_light_pawn_uses_light_orientation() {
        // A light pawn on the seventh rank earns the +50 row, not the back row.
        let seventh = game("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let second = game("4k3/8/8/8/8/8/P7/4K3 w - - 0 1");
        assert!(PieceSquareScorer.score(&seventh) > PieceSquareScorer.score(&second));
    }

    #[test]
    fn pawn_structure_penalties_apply() {
        let healthy = game("4k3/8/8/8/8/8/PP6/4K3 w - - 0 1");
        let doubled_isolated = game("4k3/8/8/8/8/P7/P7/4K3 w - - 0 1");
        assert_eq!(
            PieceSquareScorer::pawn_structure(&healthy, Color::Light),
            0
        );
        assert_eq!(
            PieceSquareScorer::pawn_structure(&doubled_isolated, Color::Light),
            -PieceSquareScorer::DOUBLED_PAWN - PieceSquareScorer::ISOLATED_PAWN
        );
    }

    #[test]
    fn bishop_pair_bonus_counts_once() {
        let pair = game("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1");
        let single = game("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1");
        let diff = PieceSquareScorer::side_total(&pair, Color::Light)
            - PieceSquareScorer::side_total(&single, Color::Light);
        let lone_f1 = MaterialScorer::piece_value(PieceKind::Bishop)
            + PIECE_SQUARE_TABLES[PieceKind::Bishop.index()][pst_index(Color::Light, 5)]
            + PieceSquareScorer::mobility(&pair, Color::Light)
            - PieceSquareScorer::mobility(&single, Color::Light);
        assert_eq!(diff, lone_f1 + PieceSquareScorer::BISHOP_PAIR);
    }
}
