use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::{piece_to_char, square_to_algebraic};

/// Export the position as a six-field FEN string.
pub fn generate_fen(game_state: &GameState) -> String {
    let side_to_move = match game_state.side_to_move {
        Color::Light => "w",
        Color::Dark => "b",
    };
    let en_passant = game_state
        .en_passant_square
        .map_or_else(|| "-".to_owned(), square_to_algebraic);

    format!(
        "{} {} {} {} {} {}",
        generate_board_field(game_state),
        side_to_move,
        generate_castling_field(game_state.castling_rights),
        en_passant,
        game_state.halfmove_clock,
        game_state.fullmove_number
    )
}

fn generate_board_field(game_state: &GameState) -> String {
    let mut out = String::with_capacity(72);

    for rank in (0..8u8).rev() {
        let mut empty_run = 0u8;

        for file in 0..8u8 {
            match game_state.piece_on(rank * 8 + file) {
                Some(piece) => {
                    if empty_run > 0 {
                        out.push(char::from(b'0' + empty_run));
                        empty_run = 0;
                    }
                    out.push(piece_to_char(piece));
                }
                None => empty_run += 1,
            }
        }

        if empty_run > 0 {
            out.push(char::from(b'0' + empty_run));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(castling_rights: CastlingRights) -> String {
    let field: String = [
        (CASTLE_LIGHT_KINGSIDE, 'K'),
        (CASTLE_LIGHT_QUEENSIDE, 'Q'),
        (CASTLE_DARK_KINGSIDE, 'k'),
        (CASTLE_DARK_QUEENSIDE, 'q'),
    ]
    .into_iter()
    .filter(|(flag, _)| castling_rights & flag != 0)
    .map(|(_, ch)| ch)
    .collect();

    if field.is_empty() {
        "-".to_owned()
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::game_state::GameState;

    #[test]
    fn fen_round_trips_through_parse_and_generate() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k3/8/8/8/8/8/8/4K2R b Kq - 12 40",
        ];
        for fen in fens {
            let game = GameState::from_fen(fen).expect("FEN should parse");
            assert_eq!(generate_fen(&game), fen);
        }
    }
}
