use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;

/// One ply snapshot pushed by `make_move` and consumed by `unmake_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    /// The move this snapshot belongs to; undo checks LIFO pairing against it.
    pub mv: Move,
    pub captured_piece: Option<Piece>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_fullmove_number: u16,

    pub prev_zobrist_key: u64,
}
