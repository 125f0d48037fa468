//! Terminal-oriented Unicode board renderer, used by the `d` command.

use crate::game_state::{chess_types::*, game_state::GameState};

/// Render the board with rank 8 on top, followed by the side to move and the
/// fingerprint.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");
    for rank in (0..8u8).rev() {
        let rank_char = char::from(b'1' + rank);
        out.push(rank_char);
        out.push(' ');
        for file in 0..8u8 {
            out.push(game_state.piece_on(rank * 8 + file).map_or('·', piece_to_unicode));
            out.push(' ');
        }
        out.push(rank_char);
        out.push('\n');
    }
    out.push_str("  a b c d e f g h\n");

    let side = match game_state.side_to_move {
        Color::Light => "white",
        Color::Dark => "black",
    };
    out.push_str(&format!(
        "{side} to move, key {:016x}",
        game_state.zobrist_key
    ));

    out
}

fn piece_to_unicode(piece: Piece) -> char {
    const GLYPHS: [char; 12] = [
        '♙', '♘', '♗', '♖', '♕', '♔', '♟', '♞', '♝', '♜', '♛', '♚',
    ];
    GLYPHS[piece.index()]
}

#[cfg(test)]
mod tests {
    use super::render_game_state;
    use crate::game_state::game_state::GameState;

    #[test]
    fn start_position_renders_back_ranks() {
        let text = render_game_state(&GameState::new_game());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ 8");
        assert_eq!(lines[5], "4 · · · · · · · · 4");
        assert_eq!(lines[8], "1 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖ 1");
        assert!(lines[10].starts_with("white to move"));
    }
}
