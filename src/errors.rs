//! Error taxonomy for the engine.
//!
//! Malformed input and illegal moves are recoverable and reported through
//! these types. Capacity overflows and out-of-order undo are invariant
//! violations and are guarded by debug assertions instead.

use thiserror::Error;

use crate::game_state::chess_types::Square;

/// Board-import failures. The whole parse fails; nothing is partially applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN must have 6 fields, found {found}")]
    FieldCount { found: usize },

    #[error("FEN placement must have 8 ranks, found {found}")]
    RankCount { found: usize },

    #[error("FEN rank {rank} does not describe exactly 8 files")]
    RankWidth { rank: usize },

    #[error("invalid piece character '{ch}' in FEN placement")]
    PieceChar { ch: char },

    #[error("invalid side-to-move field '{field}'")]
    SideToMove { field: String },

    #[error("invalid castling field '{field}'")]
    Castling { field: String },

    #[error("invalid en-passant field '{field}'")]
    EnPassant { field: String },

    #[error("invalid {name} counter '{field}'")]
    Counter { name: &'static str, field: String },

    #[error("each side needs exactly one king ({light} light, {dark} dark)")]
    KingCount { light: u32, dark: u32 },

    #[error("pawn placed on back rank square {square}")]
    PawnOnBackRank { square: Square },

    #[error("en-passant square {square} does not follow a double pawn push")]
    EnPassantWithoutPush { square: Square },

    #[error("side not to move is in check")]
    OpponentInCheck,
}

/// Move-text failures, split so callers can tell typos from rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveTextError {
    #[error("malformed move text '{text}'")]
    Malformed { text: String },

    #[error("move '{text}' is not legal in this position")]
    Illegal { text: String },
}

/// Make rejected the move; the position has already been restored.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveError {
    #[error("move {from}->{to} leaves the mover's king in check")]
    KingLeftInCheck { from: Square, to: Square },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZobristError {
    #[error("zobrist keys already built from seed {active}, cannot rebuild from {requested}")]
    AlreadyInitialised { active: u64, requested: u64 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config value {name} out of range: {value}")]
    OutOfRange { name: &'static str, value: u64 },

    #[error("unknown option '{0}'")]
    UnknownOption(String),
}

/// A broken board invariant, reported by `GameState::validate_invariants`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("board invariant violated: {message}")]
pub struct InvariantViolation {
    pub message: String,
}

/// Umbrella error for the protocol layer.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error(transparent)]
    MoveText(#[from] MoveTextError),

    #[error(transparent)]
    IllegalMove(#[from] IllegalMoveError),

    #[error(transparent)]
    Zobrist(#[from] ZobristError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("malformed command: {0}")]
    MalformedCommand(String),
}
