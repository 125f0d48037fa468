//! Move ordering heuristics: hash move, MVV-LVA captures, killer moves and
//! the history table.
//!
//! Killers and history live in dense fixed arrays indexed by ply and by
//! piece/destination, since both bounds are known up front.

use crate::game_state::chess_types::*;
use crate::move_generation::move_list::MoveList;
use crate::moves::move_descriptions::Move;

/// Deepest ply the killer table tracks; also caps the search depth.
pub const MAX_SEARCH_PLY: usize = 128;

const HASH_MOVE_SCORE: i32 = 1_000_000;
const CAPTURE_BASE_SCORE: i32 = 900_000;
const FIRST_KILLER_SCORE: i32 = 800_000;
const SECOND_KILLER_SCORE: i32 = 799_000;

/// Ordering weight per piece kind, pawn through king.
const MVV_LVA_VALUE: [i32; 6] = [1, 3, 3, 5, 9, 10];

#[inline]
pub fn mvv_lva(attacker: PieceKind, victim: PieceKind) -> i32 {
    MVV_LVA_VALUE[victim.index()] * 16 - MVV_LVA_VALUE[attacker.index()]
}

/// Two most recent cutoff-causing quiet moves per ply, newest first.
#[derive(Debug, Clone)]
pub struct KillerTable {
    slots: [[Option<Move>; 2]; MAX_SEARCH_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self {
            slots: [[None; 2]; MAX_SEARCH_PLY],
        }
    }
}

impl KillerTable {
    pub fn record(&mut self, ply: usize, mv: Move) {
        let Some(slot) = self.slots.get_mut(ply) else {
            return;
        };
        if slot[0] != Some(mv) {
            slot[1] = slot[0];
            slot[0] = Some(mv);
        }
    }

    #[inline]
    pub fn get(&self, ply: usize) -> [Option<Move>; 2] {
        self.slots.get(ply).copied().unwrap_or([None; 2])
    }

    pub fn clear(&mut self) {
        self.slots = [[None; 2]; MAX_SEARCH_PLY];
    }
}

/// Accumulated depth-squared credit per `(piece, destination)`.
#[derive(Debug, Clone)]
pub struct HistoryTable {
    scores: [[i32; 64]; 12],
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self {
            scores: [[0; 64]; 12],
        }
    }
}

impl HistoryTable {
    #[inline]
    pub fn reward(&mut self, mv: Move, depth: u8) {
        let depth = i32::from(depth);
        let cell = &mut self.scores[mv.moved_piece().index()][mv.to() as usize];
        // Stay below the killer band.
        *cell = cell.saturating_add(depth * depth).min(SECOND_KILLER_SCORE - 1);
    }

    #[inline]
    pub fn score(&self, mv: Move) -> i32 {
        self.scores[mv.moved_piece().index()][mv.to() as usize]
    }

    pub fn clear(&mut self) {
        self.scores = [[0; 64]; 12];
    }
}

/// Ordering score: higher is searched first.
pub fn score_move(
    mv: Move,
    hash_move: Option<Move>,
    killers: [Option<Move>; 2],
    history: &HistoryTable,
) -> i32 {
    if Some(mv) == hash_move {
        return HASH_MOVE_SCORE;
    }
    if mv.is_capture() {
        let victim = mv.captured_piece().map_or(PieceKind::Pawn, |p| p.kind);
        return CAPTURE_BASE_SCORE + mvv_lva(mv.moved_piece().kind, victim);
    }
    if Some(mv) == killers[0] {
        return FIRST_KILLER_SCORE;
    }
    if Some(mv) == killers[1] {
        return SECOND_KILLER_SCORE;
    }
    history.score(mv)
}

/// Sort `moves` best-first. Ties keep generation order, so the result is
/// deterministic.
pub fn order_moves(
    moves: &mut MoveList,
    hash_move: Option<Move>,
    killers: [Option<Move>; 2],
    history: &HistoryTable,
) {
    moves
        .as_mut_slice()
        .sort_by_cached_key(|&mv| std::cmp::Reverse(score_move(mv, hash_move, killers, history)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_generator::generate_pseudo_legal;
    use crate::utils::long_algebraic::move_to_long_algebraic;

    #[test]
    fn mvv_lva_prefers_big_victims_then_small_attackers() {
        assert!(mvv_lva(PieceKind::Pawn, PieceKind::Queen) > mvv_lva(PieceKind::Queen, PieceKind::Queen));
        assert!(mvv_lva(PieceKind::Queen, PieceKind::Queen) > mvv_lva(PieceKind::Pawn, PieceKind::Rook));
        assert!(mvv_lva(PieceKind::Pawn, PieceKind::Knight) > mvv_lva(PieceKind::Rook, PieceKind::Knight));
    }

    #[test]
    fn killer_table_is_most_recent_first_with_two_slots() {
        let mut game = GameState::new_game();
        let moves = crate::move_generation::legal_move_generator::generate_legal_moves(&mut game);
        let (a, b, c) = (moves[0], moves[1], moves[2]);
        let mut killers = KillerTable::default();
        killers.record(3, a);
        killers.record(3, b);
        killers.record(3, b);
        assert_eq!(killers.get(3), [Some(b), Some(a)]);
        killers.record(3, c);
        assert_eq!(killers.get(3), [Some(c), Some(b)]);
        assert_eq!(killers.get(4), [None, None]);
        killers.record(MAX_SEARCH_PLY + 5, a);
        assert_eq!(killers.get(MAX_SEARCH_PLY + 5), [None, None]);
    }

    #[test]
    fn ordering_bands_hash_then_captures_then_killers_then_history() {
        let game = GameState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");
        let mut moves = generate_pseudo_legal(&game);
        let find = |text: &str| {
            moves
                .iter()
                .copied()
                .find(|&m| move_to_long_algebraic(m) == text)
                .expect("move exists")
        };
        let hash = find("a2a3");
        let killer = find("a1b1");
        let quiet = find("e1d1");
        let mut history = HistoryTable::default();
        history.reward(quiet, 5);

        order_moves(&mut moves, Some(hash), [Some(killer), None], &history);

        assert_eq!(moves[0], hash);
        let first_quiet = moves.iter().position(|m| !m.is_capture() && *m != hash).expect("quiet");
        assert!(moves.iter().skip(1).take(first_quiet - 1).all(|m| m.is_capture()));
        assert_eq!(moves[first_quiet], killer);
        assert_eq!(moves[first_quiet + 1], quiet);
        assert!(moves[1].is_capture());
    }

    #[test]
    fn history_accumulates_depth_squared() {
        let mut game = GameState::new_game();
        let mv = crate::move_generation::legal_move_generator::generate_legal_moves(&mut game)[0];
        let mut history = HistoryTable::default();
        history.reward(mv, 3);
        history.reward(mv, 2);
        assert_eq!(history.score(mv), 13);
        history.clear();
        assert_eq!(history.score(mv), 0);
    }
}
