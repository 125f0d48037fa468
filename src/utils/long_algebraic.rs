//! Move text in coordinate form: origin, destination, optional promotion
//! letter (`e2e4`, `e7e8q`).

use crate::errors::MoveTextError;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::move_descriptions::Move;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

pub fn move_to_long_algebraic(mv: Move) -> String {
    let mut out = String::with_capacity(5);
    out.push_str(&square_to_algebraic(mv.from()));
    out.push_str(&square_to_algebraic(mv.to()));
    if let Some(promotion) = mv.promotion_piece() {
        out.push(promotion_to_char(promotion.kind));
    }
    out
}

/// Decode `text` against the legal moves of `game_state`.
///
/// Text that is not a well-formed coordinate move is `Malformed`; a
/// well-formed move that no legal move matches is `Illegal`. The position is
/// left as it was either way.
pub fn long_algebraic_to_move(text: &str, game_state: &mut GameState) -> Result<Move, MoveTextError> {
    let malformed = || MoveTextError::Malformed {
        text: text.to_owned(),
    };

    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(malformed());
    }
    let from = algebraic_to_square(&text[0..2]).ok_or_else(malformed)?;
    let to = algebraic_to_square(&text[2..4]).ok_or_else(malformed)?;
    let promotion = match text.as_bytes().get(4) {
        Some(&ch) => Some(char_to_promotion(char::from(ch)).ok_or_else(malformed)?),
        None => None,
    };

    generate_legal_moves(game_state)
        .into_iter()
        .find(|mv| {
            mv.from() == from
                && mv.to() == to
                && mv.promotion_piece().map(|p| p.kind) == promotion
        })
        .ok_or_else(|| MoveTextError::Illegal {
            text: text.to_owned(),
        })
}

fn promotion_to_char(kind: PieceKind) -> char {
    match kind {
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        _ => 'q',
    }
}

fn char_to_promotion(ch: char) -> Option<PieceKind> {
    match ch {
        'n' => Some(PieceKind::Knight),
        'b' => Some(PieceKind::Bishop),
        'r' => Some(PieceKind::Rook),
        'q' => Some(PieceKind::Queen),
        _ => None,
    }
}
