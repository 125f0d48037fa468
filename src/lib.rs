//! Crate root module declarations for the Sloe Chess engine.
//!
//! Exposes the board model, move generation, search, the engine seam, the UCI
//! front-end and text helpers so the binary, benches and tests share one set
//! of module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod undo_state;
}

pub mod moves {
    pub mod leaper_attacks;
    pub mod move_descriptions;
    pub mod slider_attacks;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_leapers;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliders;
    pub mod move_list;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod time_management;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod engines {
    pub mod engine_config;
    pub mod engine_iterative;
    pub mod engine_trait;
}

pub mod uci {
    pub mod uci_top;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}
