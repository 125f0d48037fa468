//! Iterative deepening over a negamax alpha-beta search.
//!
//! The searcher owns everything that outlives one node: the transposition
//! table, killer and history tables, node counter and the deadline state. The
//! position is borrowed mutably and walked with make/undo, so every frame
//! leaves it exactly as it found it.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_generator::{
    generate_captures, generate_legal_moves, generate_pseudo_legal, is_legal_move,
};
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::BoardScorer;
use crate::search::move_ordering::{order_moves, HistoryTable, KillerTable, MAX_SEARCH_PLY};
use crate::search::time_management::SearchBudget;
use crate::search::transposition_table::{Bound, TranspositionTable};

pub const MATE_SCORE: i32 = 30_000;
pub const INFINITY: i32 = 32_000;

/// Scores beyond this are mates, measured in plies from the root.
const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_SEARCH_PLY as i32;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` only when the side to move has no legal move.
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
    pub principal_variation: Vec<Move>,
    /// Iterations whose aspiration window failed and were searched again.
    pub aspiration_researches: u32,
    pub tt_hits: u64,
}

pub struct Searcher<S: BoardScorer> {
    scorer: S,
    tt: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
    aspiration_window: i32,
    nodes: u64,
    hard_deadline: Option<Instant>,
    time_checks_enabled: bool,
    stopped: bool,
    root_best: Option<Move>,
}

impl<S: BoardScorer> Searcher<S> {
    pub fn new(scorer: S, hash_mb: usize, aspiration_window: i32) -> Self {
        Self::with_table(scorer, TranspositionTable::new_with_mb(hash_mb), aspiration_window)
    }

    pub fn with_table(scorer: S, tt: TranspositionTable, aspiration_window: i32) -> Self {
        Self {
            scorer,
            tt,
            killers: KillerTable::default(),
            history: HistoryTable::default(),
            aspiration_window: aspiration_window.max(1),
            nodes: 0,
            hard_deadline: None,
            time_checks_enabled: false,
            stopped: false,
            root_best: None,
        }
    }

    /// Forget everything learned from earlier games.
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.killers.clear();
        self.history.clear();
    }

    pub fn resize_tt(&mut self, hash_mb: usize) {
        self.tt = TranspositionTable::new_with_mb(hash_mb);
    }

    pub fn search(&mut self, game_state: &mut GameState, budget: &SearchBudget) -> SearchResult {
        let start = Instant::now();
        let soft_deadline = budget.soft_limit.map(|limit| start + limit);
        self.hard_deadline = budget.hard_limit.map(|limit| start + limit);
        self.nodes = 0;
        self.stopped = false;
        let tt_before = self.tt.stats();
        self.killers.clear();
        self.history.clear();

        let root_moves = generate_legal_moves(game_state);
        let Some(&first_legal) = root_moves.iter().next() else {
            let best_score = if game_state.is_in_check(game_state.side_to_move) {
                -MATE_SCORE
            } else {
                0
            };
            return SearchResult {
                best_score,
                elapsed: start.elapsed(),
                ..SearchResult::default()
            };
        };

        let mut result = SearchResult {
            best_move: Some(first_legal),
            ..SearchResult::default()
        };

        for depth in 1..=budget.max_depth.max(1) {
            if depth > 1 && soft_deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                break;
            }
            // Depth 1 always completes so there is a move to report.
            self.time_checks_enabled = depth > 1;
            self.root_best = None;

            let (alpha, beta) = if depth > 1 {
                (
                    result.best_score - self.aspiration_window,
                    result.best_score + self.aspiration_window,
                )
            } else {
                (-INFINITY, INFINITY)
            };

            let mut score = self.negamax(game_state, depth, alpha, beta, 0);
            if !self.stopped && (score <= alpha || score >= beta) {
                trace!(depth, score, alpha, beta, "aspiration window failed, re-searching");
                result.aspiration_researches += 1;
                self.root_best = None;
                score = self.negamax(game_state, depth, -INFINITY, INFINITY, 0);
            }

            if self.stopped {
                debug!(depth, nodes = self.nodes, "hard deadline reached, iteration abandoned");
                break;
            }

            result.best_score = score;
            result.reached_depth = depth;
            result.best_move = Some(self.root_move(game_state, first_legal));

            debug!(
                depth,
                score,
                nodes = self.nodes,
                elapsed_ms = start.elapsed().as_millis() as u64,
                best_move = %result.best_move.map_or_else(String::new, |mv| mv.to_string()),
                "iteration complete"
            );
        }

        result.nodes = self.nodes;
        result.elapsed = start.elapsed();
        let tt_after = self.tt.stats();
        result.tt_hits = tt_after.hits - tt_before.hits;
        debug!(
            nodes = result.nodes,
            tt_probes = tt_after.probes - tt_before.probes,
            tt_hits = result.tt_hits,
            tt_stores = tt_after.stores - tt_before.stores,
            aspiration_researches = result.aspiration_researches,
            "search complete"
        );
        result.principal_variation =
            self.principal_variation(game_state, usize::from(result.reached_depth.max(1)));
        if let Some(best) = result.best_move {
            if result.principal_variation.first() != Some(&best) {
                result.principal_variation = vec![best];
            }
        }
        result
    }

    /// Cached root move if it is still legal here, else the root frame's own
    /// best, else the first legal move.
    fn root_move(&mut self, game_state: &mut GameState, first_legal: Move) -> Move {
        let cached = self
            .tt
            .probe(game_state.zobrist_key)
            .and_then(|entry| entry.best_move());
        match cached {
            Some(mv) if is_legal_move(game_state, mv) => mv,
            _ => self.root_best.unwrap_or(first_legal),
        }
    }

    /// Follow cached best moves from the current position, checking each one
    /// is legal before playing it. The position is restored before returning.
    pub fn principal_variation(&mut self, game_state: &mut GameState, max_len: usize) -> Vec<Move> {
        let mut line = Vec::with_capacity(max_len);
        let mut seen = Vec::with_capacity(max_len);

        while line.len() < max_len {
            let key = game_state.zobrist_key;
            if seen.contains(&key) {
                break;
            }
            let Some(mv) = self.tt.probe(key).and_then(|entry| entry.best_move()) else {
                break;
            };
            if !is_legal_move(game_state, mv) || make_move(game_state, mv).is_err() {
                break;
            }
            seen.push(key);
            line.push(mv);
        }

        for &mv in line.iter().rev() {
            unmake_move(game_state, mv);
        }
        line
    }

    fn out_of_time(&mut self) -> bool {
        if !self.stopped && self.time_checks_enabled {
            if let Some(deadline) = self.hard_deadline {
                self.stopped = Instant::now() >= deadline;
            }
        }
        self.stopped
    }

    fn negamax(
        &mut self,
        game_state: &mut GameState,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        ply: usize,
    ) -> i32 {
        if self.out_of_time() {
            return self.scorer.score(game_state);
        }
        if depth == 0 {
            return self.quiescence(game_state, alpha, beta, ply);
        }
        if ply >= MAX_SEARCH_PLY - 1 {
            return self.scorer.score(game_state);
        }
        self.nodes += 1;

        let key = game_state.zobrist_key;
        let mut hash_move = None;
        if let Some(entry) = self.tt.probe(key) {
            hash_move = entry.best_move();
            if ply > 0 && entry.depth >= depth {
                let score = score_from_tt(entry.score, ply);
                match entry.bound {
                    Bound::Exact => return score,
                    Bound::Lower => alpha = alpha.max(score),
                    Bound::Upper => beta = beta.min(score),
                }
                if alpha >= beta {
                    return score;
                }
            }
        }
        let window_alpha = alpha;

        let mut moves = generate_pseudo_legal(game_state);
        order_moves(&mut moves, hash_move, self.killers.get(ply), &self.history);

        let mut best_score = -INFINITY;
        let mut best_move = None;
        let mut legal_moves = 0u32;

        for mv in moves {
            if make_move(game_state, mv).is_err() {
                continue;
            }
            legal_moves += 1;
            let score = -self.negamax(game_state, depth - 1, -beta, -alpha, ply + 1);
            unmake_move(game_state, mv);

            if self.stopped {
                return best_score.max(score);
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
                if !mv.is_capture() {
                    self.history.reward(mv, depth);
                }
            }
            if alpha >= beta {
                if !mv.is_capture() {
                    self.killers.record(ply, mv);
                }
                break;
            }
        }

        if legal_moves == 0 {
            return if game_state.is_in_check(game_state.side_to_move) {
                -MATE_SCORE + ply as i32
            } else {
                0
            };
        }

        let bound = if best_score <= window_alpha {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt
            .store(key, depth, score_to_tt(best_score, ply), bound, best_move);
        if ply == 0 {
            self.root_best = best_move;
        }

        best_score
    }

    fn quiescence(&mut self, game_state: &mut GameState, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        if self.out_of_time() {
            return self.scorer.score(game_state);
        }
        self.nodes += 1;

        let stand_pat = self.scorer.score(game_state);
        if stand_pat >= beta {
            return beta;
        }
        alpha = alpha.max(stand_pat);
        if ply >= MAX_SEARCH_PLY - 1 {
            return alpha;
        }

        let mut captures = generate_captures(game_state);
        order_moves(&mut captures, None, [None; 2], &self.history);

        for mv in captures {
            if make_move(game_state, mv).is_err() {
                continue;
            }
            let score = -self.quiescence(game_state, -beta, -alpha, ply + 1);
            unmake_move(game_state, mv);

            if self.stopped {
                return alpha;
            }
            if score >= beta {
                return beta;
            }
            alpha = alpha.max(score);
        }

        alpha
    }
}

/// Root-relative mate score to node-relative, for storage.
#[inline]
fn score_to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

#[inline]
fn score_from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}
