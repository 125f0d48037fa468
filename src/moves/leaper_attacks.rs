//! Precomputed attack masks for the leaping pieces.
//!
//! Knight, king, and pawn attacks depend only on the origin square, so the
//! tables are built at compile time and never change afterwards.

use crate::game_state::chess_types::{Color, Square};

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const LIGHT_PAWN_OFFSETS: [(i32, i32); 2] = [(-1, 1), (1, 1)];
const DARK_PAWN_OFFSETS: [(i32, i32); 2] = [(-1, -1), (1, -1)];

pub const KNIGHT_ATTACKS: [u64; 64] = leaper_table(&KNIGHT_OFFSETS);
pub const KING_ATTACKS: [u64; 64] = leaper_table(&KING_OFFSETS);

/// Squares a pawn of the given colour attacks, indexed `[colour][square]`.
pub const PAWN_ATTACKS: [[u64; 64]; 2] = [
    leaper_table(&LIGHT_PAWN_OFFSETS),
    leaper_table(&DARK_PAWN_OFFSETS),
];

#[inline]
pub const fn knight_attacks(square: Square) -> u64 {
    KNIGHT_ATTACKS[square as usize]
}

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square as usize]
}

#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    PAWN_ATTACKS[color.index()][square as usize]
}

const fn leaper_table(offsets: &[(i32, i32)]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;
        let mut i = 0usize;

        while i < offsets.len() {
            let f = file + offsets[i].0;
            let r = rank + offsets[i].1;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                attacks |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_in_centre_and_corner() {
        let d4 = 27u8;
        assert_eq!(knight_attacks(d4).count_ones(), 8);
        // a1 reaches only b3 and c2.
        assert_eq!(knight_attacks(0), (1u64 << 17) | (1u64 << 10));
    }

    #[test]
    fn king_on_edge_does_not_wrap() {
        assert_eq!(king_attacks(0).count_ones(), 3);
        // h4 must not see a5 or a4.
        let h4 = 31u8;
        assert_eq!(king_attacks(h4).count_ones(), 5);
        assert_eq!(king_attacks(h4) & (1u64 << 32), 0);
    }

    #[test]
    fn pawn_attacks_point_forward_for_each_colour() {
        let e2 = 12u8;
        assert_eq!(pawn_attacks(Color::Light, e2), (1u64 << 19) | (1u64 << 21));
        let e7 = 52u8;
        assert_eq!(pawn_attacks(Color::Dark, e7), (1u64 << 43) | (1u64 << 45));
        // a-file pawns only attack towards b.
        assert_eq!(pawn_attacks(Color::Light, 8), 1u64 << 17);
    }
}
