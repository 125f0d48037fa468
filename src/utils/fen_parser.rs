//! FEN-to-GameState parser.
//!
//! Builds a fully populated position from a Forsyth-Edwards Notation string.
//! All six fields are required and the result is only returned once every
//! field has been validated.

use crate::errors::FenError;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_pawn::{en_passant_victim_square, step_forward};
use crate::search::zobrist::compute_zobrist_key;
use crate::utils::algebraic::{algebraic_to_square, piece_from_char};

pub fn parse_fen(fen: &str) -> Result<GameState, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let &[board_part, side_part, castling_part, en_passant_part, halfmove_part, fullmove_part] =
        fields.as_slice()
    else {
        return Err(FenError::FieldCount { found: fields.len() });
    };

    let mut game_state = GameState::default();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square = parse_en_passant_square(en_passant_part, game_state.side_to_move)?;
    game_state.halfmove_clock = parse_counter("halfmove", halfmove_part)?;
    game_state.fullmove_number = parse_counter("fullmove", fullmove_part)?;

    let light_kings = game_state.pieces[Color::Light.index()][PieceKind::King.index()].count_ones();
    let dark_kings = game_state.pieces[Color::Dark.index()][PieceKind::King.index()].count_ones();
    if light_kings != 1 || dark_kings != 1 {
        return Err(FenError::KingCount {
            light: light_kings,
            dark: dark_kings,
        });
    }
    if let Some(square) = game_state.en_passant_square {
        check_double_push(&game_state, square)?;
    }
    if is_king_in_check(&game_state, game_state.side_to_move.opposite()) {
        return Err(FenError::OpponentInCheck);
    }

    game_state.zobrist_key = compute_zobrist_key(&game_state);
    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount { found: ranks.len() });
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx;
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(run) = ch.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(FenError::PieceChar { ch });
                }
                file += run as usize;
                if file > 8 {
                    return Err(FenError::RankWidth { rank: board_rank + 1 });
                }
                continue;
            }

            let piece = piece_from_char(ch).ok_or(FenError::PieceChar { ch })?;
            if file >= 8 {
                return Err(FenError::RankWidth { rank: board_rank + 1 });
            }

            let sq = (board_rank * 8 + file) as Square;
            if piece.kind == PieceKind::Pawn && (board_rank == 0 || board_rank == 7) {
                return Err(FenError::PawnOnBackRank { square: sq });
            }
            game_state.put_piece(sq, piece);
            file += 1;
        }

        if file != 8 {
            return Err(FenError::RankWidth { rank: board_rank + 1 });
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, FenError> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(FenError::SideToMove {
            field: side_part.to_owned(),
        }),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, FenError> {
    if castling_part == "-" {
        return Ok(0);
    }

    let invalid = || FenError::Castling {
        field: castling_part.to_owned(),
    };

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        let flag = match ch {
            'K' => CASTLE_LIGHT_KINGSIDE,
            'Q' => CASTLE_LIGHT_QUEENSIDE,
            'k' => CASTLE_DARK_KINGSIDE,
            'q' => CASTLE_DARK_QUEENSIDE,
            _ => return Err(invalid()),
        };
        if rights & flag != 0 {
            return Err(invalid());
        }
        rights |= flag;
    }

    Ok(rights)
}

/// The target must sit behind a pawn that just double-pushed: rank 6 when
/// light is to move, rank 3 when dark is.
fn parse_en_passant_square(
    en_passant_part: &str,
    side_to_move: Color,
) -> Result<Option<Square>, FenError> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let invalid = || FenError::EnPassant {
        field: en_passant_part.to_owned(),
    };
    let square = algebraic_to_square(en_passant_part).ok_or_else(invalid)?;
    let expected_rank = match side_to_move {
        Color::Light => 5,
        Color::Dark => 2,
    };
    if square_rank(square) != expected_rank {
        return Err(invalid());
    }
    Ok(Some(square))
}

/// The target and the square the pawn left must be empty, and the pushed
/// pawn must stand just beyond the target.
fn check_double_push(game_state: &GameState, target: Square) -> Result<(), FenError> {
    let side = game_state.side_to_move;
    let pushed_pawn = Piece::new(side.opposite(), PieceKind::Pawn);
    let consistent = game_state.piece_on(target).is_none()
        && game_state.piece_on(step_forward(side, target)).is_none()
        && game_state.piece_on(en_passant_victim_square(side, target)) == Some(pushed_pawn);
    if consistent {
        Ok(())
    } else {
        Err(FenError::EnPassantWithoutPush { square: target })
    }
}

fn parse_counter(name: &'static str, field: &str) -> Result<u16, FenError> {
    field.parse::<u16>().map_err(|_| FenError::Counter {
        name,
        field: field.to_owned(),
    })
}
