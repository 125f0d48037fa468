//! Coordinate and piece-letter conversions shared by FEN, move text and
//! board rendering.

use crate::game_state::chess_types::*;

/// Parse a coordinate such as `e4` into a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> Option<Square> {
    match square.as_bytes() {
        &[file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Some((rank - b'1') * 8 + (file - b'a')),
        _ => None,
    }
}

/// Render a square index (`0..=63`) as a coordinate such as `e4`.
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    debug_assert!(square < 64, "square index out of bounds: {square}");
    let file = char::from(b'a' + square_file(square));
    let rank = char::from(b'1' + square_rank(square));
    format!("{file}{rank}")
}

/// FEN letter: uppercase for light, lowercase for dark.
pub fn piece_to_char(piece: Piece) -> char {
    let ch = match piece.kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    match piece.color {
        Color::Light => ch.to_ascii_uppercase(),
        Color::Dark => ch,
    }
}

pub fn piece_from_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };
    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };
    Some(Piece::new(color, kind))
}
