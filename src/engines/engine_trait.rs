//! Engine abstraction used by the UCI front-end.
//!
//! The protocol layer owns the position and parses limits into `GoParams`;
//! engines decide how to spend them and report back through `EngineOutput`.

use crate::errors::EngineError;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::Move;

/// Limits from a `go` command. Unset fields mean "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub movestogo: Option<u16>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    /// `None` when the side to move has no legal move.
    pub best_move: Option<Move>,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn new_game(&mut self) {}

    fn set_option(&mut self, _name: &str, _value: &str) -> Result<(), EngineError> {
        Ok(())
    }

    /// Pick a move for the side to move. The position is borrowed mutably for
    /// make/undo during search and is restored before returning.
    fn choose_move(
        &mut self,
        game_state: &mut GameState,
        params: &GoParams,
    ) -> Result<EngineOutput, EngineError>;
}
