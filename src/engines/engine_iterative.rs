//! Engine backed by the iterative deepening searcher.
//!
//! Owns the searcher across `go` commands so the transposition table carries
//! over between moves of one game, and turns each search into a UCI info line.

use tracing::debug;

use crate::engines::engine_config::EngineConfig;
use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::errors::{ConfigError, EngineError};
use crate::game_state::game_state::GameState;
use crate::search::board_scoring::PieceSquareScorer;
use crate::search::iterative_deepening::{SearchResult, Searcher};
use crate::search::time_management::resolve_budget;
use crate::utils::long_algebraic::move_to_long_algebraic;

/// Iterative deepening with the piece-square evaluator.
pub struct IterativeEngine {
    config: EngineConfig,
    fixed_depth: Option<u8>,
    searcher: Searcher<PieceSquareScorer>,
}

impl IterativeEngine {
    pub fn new(config: EngineConfig) -> Self {
        let searcher = Searcher::new(PieceSquareScorer, config.hash_mb, config.aspiration_window);
        Self {
            config,
            fixed_depth: None,
            searcher,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn fixed_depth(&self) -> Option<u8> {
        self.fixed_depth
    }
}

impl Default for IterativeEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine for IterativeEngine {
    fn new_game(&mut self) {
        self.searcher.new_game();
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        if name.eq_ignore_ascii_case("Hash") {
            let hash_mb = value
                .parse::<usize>()
                .map_err(|_| EngineError::MalformedCommand(format!("invalid Hash value '{value}'")))?;
            let config = EngineConfig {
                hash_mb,
                ..self.config.clone()
            }
            .validated()?;
            self.searcher.resize_tt(config.hash_mb);
            self.config = config;
            debug!(hash_mb, "hash resized");
        } else if name.eq_ignore_ascii_case("FixedDepth") {
            let depth = value.parse::<u8>().map_err(|_| {
                EngineError::MalformedCommand(format!("invalid FixedDepth value '{value}'"))
            })?;
            self.fixed_depth = (depth > 0).then_some(depth);
        } else {
            return Err(ConfigError::UnknownOption(name.to_owned()).into());
        }
        Ok(())
    }

    fn choose_move(
        &mut self,
        game_state: &mut GameState,
        params: &GoParams,
    ) -> Result<EngineOutput, EngineError> {
        let mut params = params.clone();
        if params.depth.is_none() {
            params.depth = self.fixed_depth;
        }
        let budget = resolve_budget(game_state.side_to_move, &params, &self.config);
        let result = self.searcher.search(game_state, &budget);

        Ok(EngineOutput {
            best_move: result.best_move,
            info_lines: vec![info_line(&result)],
        })
    }
}

fn info_line(result: &SearchResult) -> String {
    let pv = result
        .principal_variation
        .iter()
        .map(|&mv| move_to_long_algebraic(mv))
        .collect::<Vec<_>>()
        .join(" ");
    let mut line = format!(
        "info depth {} score cp {} nodes {} time {}",
        result.reached_depth,
        result.best_score,
        result.nodes,
        result.elapsed.as_millis()
    );
    if !pv.is_empty() {
        line.push_str(" pv ");
        line.push_str(&pv);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_generator::generate_legal_moves;

    fn small_engine() -> IterativeEngine {
        IterativeEngine::new(EngineConfig {
            hash_mb: 1,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn choose_move_reports_a_legal_move_and_info_line() {
        let mut engine = small_engine();
        let mut game = GameState::new_game();
        let params = GoParams {
            depth: Some(3),
            ..GoParams::default()
        };
        let out = engine.choose_move(&mut game, &params).expect("search runs");
        let mv = out.best_move.expect("start position has moves");
        assert!(generate_legal_moves(&mut game).contains(mv));
        assert_eq!(out.info_lines.len(), 1);
        assert!(out.info_lines[0].starts_with("info depth 3 score cp "));
        assert!(out.info_lines[0].contains(" pv "));
    }

    #[test]
    fn fixed_depth_option_applies_when_go_has_no_depth() {
        let mut engine = small_engine();
        engine.set_option("FixedDepth", "2").expect("valid depth");
        assert_eq!(engine.fixed_depth(), Some(2));

        let mut game = GameState::new_game();
        let out = engine
            .choose_move(&mut game, &GoParams::default())
            .expect("search runs");
        assert!(out.info_lines[0].starts_with("info depth 2 "));

        engine.set_option("FixedDepth", "0").expect("valid depth");
        assert_eq!(engine.fixed_depth(), None);
    }

    #[test]
    fn hash_option_is_validated() {
        let mut engine = small_engine();
        engine.set_option("hash", "4").expect("valid size");
        assert_eq!(engine.config().hash_mb, 4);
        assert!(matches!(
            engine.set_option("Hash", "0"),
            Err(EngineError::Config(ConfigError::OutOfRange { .. }))
        ));
        assert!(matches!(
            engine.set_option("Hash", "lots"),
            Err(EngineError::MalformedCommand(_))
        ));
        assert_eq!(engine.config().hash_mb, 4);
    }

    #[test]
    fn unknown_option_is_reported() {
        let mut engine = small_engine();
        assert!(matches!(
            engine.set_option("Ponder", "true"),
            Err(EngineError::Config(ConfigError::UnknownOption(_)))
        ));
    }

    #[test]
    fn no_legal_move_gives_none() {
        let mut engine = small_engine();
        let mut game = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("valid FEN");
        let out = engine
            .choose_move(&mut game, &GoParams { depth: Some(2), ..GoParams::default() })
            .expect("search runs");
        assert_eq!(out.best_move, None);
    }
}
