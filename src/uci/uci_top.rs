//! UCI protocol front-end and command loop.
//!
//! Parses UCI commands, keeps the current position, routes `go` to the
//! engine and writes protocol output. Diagnostics go through `tracing` so
//! stdout carries protocol text only.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::engines::engine_config::{max_search_depth, EngineConfig};
use crate::engines::engine_iterative::IterativeEngine;
use crate::engines::engine_trait::{Engine, GoParams};
use crate::errors::EngineError;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::make_move;
use crate::move_generation::perft::perft;
use crate::utils::long_algebraic::{long_algebraic_to_move, move_to_long_algebraic};
use crate::utils::render_game_state::render_game_state;

const UCI_ENGINE_NAME: &str = "Sloe Chess";
const UCI_ENGINE_AUTHOR: &str = "the Sloe Chess developers";

pub fn run_stdio_loop(config: EngineConfig) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_loop(stdin.lock(), &mut stdout, config)
}

/// Drive the protocol over any line source until `quit` or end of input.
pub fn run_loop(input: impl BufRead, out: &mut impl Write, config: EngineConfig) -> io::Result<()> {
    let mut uci = UciState::new(config);

    for line in input.lines() {
        let line = line?;
        let should_quit = uci.handle_command(&line, out)?;
        out.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

struct UciState {
    game_state: GameState,
    engine: Box<dyn Engine>,
    hash_mb: usize,
}

impl UciState {
    fn new(config: EngineConfig) -> Self {
        let hash_mb = config.hash_mb;
        Self {
            game_state: GameState::new_game(),
            engine: Box::new(IterativeEngine::new(config)),
            hash_mb,
        }
    }

    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();

        match cmd {
            "uci" => {
                writeln!(out, "id name {}", UCI_ENGINE_NAME)?;
                writeln!(out, "id author {}", UCI_ENGINE_AUTHOR)?;
                writeln!(
                    out,
                    "option name Hash type spin default {} min 1 max 65536",
                    self.hash_mb
                )?;
                writeln!(
                    out,
                    "option name FixedDepth type spin default 0 min 0 max {}",
                    max_search_depth()
                )?;
                writeln!(out, "uciok")?;
            }
            "isready" => {
                writeln!(out, "readyok")?;
            }
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    warn!(%err, command = trimmed, "setoption rejected");
                    writeln!(out, "info string setoption error: {}", err)?;
                }
            }
            "ucinewgame" => {
                self.game_state = GameState::new_game();
                self.engine.new_game();
            }
            "position" => {
                if let Err(err) = self.handle_position(trimmed) {
                    warn!(%err, command = trimmed, "position rejected, keeping previous position");
                    writeln!(out, "info string position error: {}", err)?;
                }
            }
            "go" => {
                if let Err(err) = self.handle_go(trimmed, out) {
                    warn!(%err, command = trimmed, "go failed");
                    writeln!(out, "info string go error: {}", err)?;
                    writeln!(out, "bestmove 0000")?;
                }
            }
            "stop" => {
                // Search is synchronous; nothing is running when this arrives.
            }
            "perft" => match parts.next().map(str::parse::<u8>) {
                Some(Ok(depth)) => {
                    let nodes = perft(&mut self.game_state, depth);
                    writeln!(out, "perft {} nodes {}", depth, nodes)?;
                }
                _ => {
                    warn!(command = trimmed, "perft needs a depth");
                    writeln!(out, "info string perft error: expected 'perft <depth>'")?;
                }
            },
            "d" => {
                writeln!(out, "{}", render_game_state(&self.game_state))?;
                writeln!(out, "fen {}", self.game_state.get_fen())?;
            }
            "quit" => {
                return Ok(true);
            }
            _ => {
                debug!(%cmd, "ignoring unknown command");
            }
        }

        Ok(false)
    }

    fn handle_setoption(&mut self, line: &str) -> Result<(), EngineError> {
        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in line.split_whitespace().skip(1) {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }

        if name_tokens.is_empty() {
            return Err(EngineError::MalformedCommand(
                "setoption needs 'name <option>'".to_owned(),
            ));
        }
        let name = name_tokens.join(" ");
        let value = value_tokens.join(" ");

        self.engine.set_option(&name, &value)?;
        if name.eq_ignore_ascii_case("Hash") {
            if let Ok(hash_mb) = value.parse() {
                self.hash_mb = hash_mb;
            }
        }
        Ok(())
    }

    /// Apply the whole command to a scratch copy so a bad FEN or move leaves
    /// the current position untouched.
    fn handle_position(&mut self, line: &str) -> Result<(), EngineError> {
        let mut tokens = line.split_whitespace().skip(1).peekable();

        let mut scratch = match tokens.next() {
            Some("startpos") => GameState::new_game(),
            Some("fen") => {
                let mut fen_parts = Vec::<&str>::new();
                while let Some(&next) = tokens.peek() {
                    if next == "moves" {
                        break;
                    }
                    fen_parts.push(next);
                    tokens.next();
                }
                GameState::from_fen(&fen_parts.join(" "))?
            }
            Some(other) => {
                return Err(EngineError::MalformedCommand(format!(
                    "unsupported position token '{}'",
                    other
                )))
            }
            None => {
                return Err(EngineError::MalformedCommand(
                    "incomplete position command".to_owned(),
                ))
            }
        };

        match tokens.next() {
            Some("moves") => {
                for text in tokens {
                    let mv = long_algebraic_to_move(text, &mut scratch)?;
                    make_move(&mut scratch, mv)?;
                    // Replayed moves are never unwound; games may outlast the ply stack.
                    scratch.undo_stack.clear();
                }
            }
            Some(other) => {
                return Err(EngineError::MalformedCommand(format!(
                    "expected 'moves', found '{}'",
                    other
                )))
            }
            None => {}
        }

        self.game_state = scratch;
        Ok(())
    }

    fn handle_go(&mut self, line: &str, out: &mut impl Write) -> Result<(), EngineError> {
        let params = parse_go_params(line)?;
        let result = self.engine.choose_move(&mut self.game_state, &params)?;

        for info in &result.info_lines {
            writeln!(out, "{}", info).map_err(io_to_engine_error)?;
        }

        let best = result
            .best_move
            .map_or_else(|| "0000".to_owned(), move_to_long_algebraic);
        writeln!(out, "bestmove {}", best).map_err(io_to_engine_error)
    }
}

fn io_to_engine_error(err: io::Error) -> EngineError {
    EngineError::MalformedCommand(format!("output failed: {}", err))
}

fn parse_go_params(line: &str) -> Result<GoParams, EngineError> {
    let mut params = GoParams::default();
    let mut tokens = line.split_whitespace().skip(1);

    while let Some(token) = tokens.next() {
        match token {
            "depth" => params.depth = Some(parse_go_value(token, tokens.next())?),
            "movetime" => params.movetime_ms = Some(parse_go_value(token, tokens.next())?),
            "wtime" => params.wtime_ms = Some(parse_go_value(token, tokens.next())?),
            "btime" => params.btime_ms = Some(parse_go_value(token, tokens.next())?),
            "winc" => params.winc_ms = Some(parse_go_value(token, tokens.next())?),
            "binc" => params.binc_ms = Some(parse_go_value(token, tokens.next())?),
            "movestogo" => params.movestogo = Some(parse_go_value(token, tokens.next())?),
            other => debug!(token = other, "ignoring unsupported go token"),
        }
    }

    Ok(params)
}

fn parse_go_value<T: std::str::FromStr>(name: &str, value: Option<&str>) -> Result<T, EngineError> {
    value.and_then(|v| v.parse().ok()).ok_or_else(|| {
        EngineError::MalformedCommand(format!("go {} needs a non-negative number", name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Color;

    fn state() -> UciState {
        UciState::new(EngineConfig {
            hash_mb: 1,
            ..EngineConfig::default()
        })
    }

    fn run(commands: &str) -> String {
        let mut out = Vec::new();
        run_loop(
            commands.as_bytes(),
            &mut out,
            EngineConfig {
                hash_mb: 1,
                ..EngineConfig::default()
            },
        )
        .expect("in-memory io does not fail");
        String::from_utf8(out).expect("protocol output is utf-8")
    }

    #[test]
    fn handshake_and_ready() {
        let out = run("uci\nisready\nquit\n");
        assert!(out.starts_with("id name Sloe Chess\n"));
        assert!(out.contains("option name Hash type spin"));
        assert!(out.contains("uciok\n"));
        assert!(out.ends_with("readyok\n"));
    }

    #[test]
    fn position_startpos_with_moves_updates_state() {
        let mut state = state();
        state
            .handle_position("position startpos moves e2e4 e7e5 g1f3")
            .expect("position command should parse");

        assert_eq!(state.game_state.side_to_move, Color::Dark);
        assert_eq!(
            state.game_state.get_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
        assert!(state.game_state.undo_stack.is_empty());
    }

    #[test]
    fn position_fen_without_moves_updates_state() {
        let mut state = state();
        state
            .handle_position("position fen 4k3/8/8/8/8/8/4P3/4K3 w - - 0 1")
            .expect("position fen should parse");

        assert_eq!(state.game_state.get_fen(), "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
    }

    #[test]
    fn position_replays_games_longer_than_the_ply_stack() {
        let mut command = String::from("position fen 7k/8/8/8/8/8/8/R3K3 w - - 0 1 moves");
        for _ in 0..260 {
            command.push_str(" a1a2 h8h7 a2a1 h7h8");
        }
        let mut state = state();
        state.handle_position(&command).expect("long shuffle is legal");
        assert_eq!(state.game_state.get_fen(), "7k/8/8/8/8/8/8/R3K3 w - - 1040 521");
        assert!(state.game_state.undo_stack.is_empty());
        assert!(state.game_state.validate_invariants().is_ok());
    }

    #[test]
    fn bad_position_leaves_previous_state() {
        let mut state = state();
        state
            .handle_position("position startpos moves e2e4")
            .expect("valid");
        let before = state.game_state.clone();

        let err = state
            .handle_position("position startpos moves e2e4 e7e5 e1e3")
            .expect_err("king cannot jump");
        assert!(matches!(err, EngineError::MoveText(_)));
        assert_eq!(state.game_state, before);

        let err = state
            .handle_position("position fen 8/8/8/8 w - - 0 1")
            .expect_err("short FEN");
        assert!(matches!(err, EngineError::Fen(_)));
        assert_eq!(state.game_state, before);
    }

    #[test]
    fn go_depth_prints_info_and_bestmove() {
        let out = run("position startpos\ngo depth 2\nquit\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("info depth 2 score cp "));
        assert!(lines[1].starts_with("bestmove "));
        assert_ne!(lines[1], "bestmove 0000");
    }

    #[test]
    fn go_without_legal_moves_prints_null_move() {
        let out = run("position fen 7k/5Q2/6K1/8/8/8/8/8 b - - 0 1\ngo depth 3\n");
        assert!(out.ends_with("bestmove 0000\n"));
    }

    #[test]
    fn perft_and_display_commands() {
        let out = run("perft 3\nd\n");
        assert!(out.starts_with("perft 3 nodes 8902\n"));
        assert!(out.contains("white to move"));
        assert!(out.contains("fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
    }

    #[test]
    fn setoption_routes_to_engine() {
        let mut state = state();
        state
            .handle_setoption("setoption name Hash value 2")
            .expect("hash should parse");
        assert_eq!(state.hash_mb, 2);
        state
            .handle_setoption("setoption name FixedDepth value 4")
            .expect("depth should parse");
        assert!(state.handle_setoption("setoption name Bogus value 1").is_err());
        assert!(state.handle_setoption("setoption value 1").is_err());
    }

    #[test]
    fn parse_go_params_reads_clock_fields() {
        let params = parse_go_params("go wtime 120000 btime 60000 winc 1000 binc 500 movestogo 20")
            .expect("go params should parse");
        assert_eq!(params.movetime_ms, None);
        assert_eq!(params.wtime_ms, Some(120_000));
        assert_eq!(params.btime_ms, Some(60_000));
        assert_eq!(params.winc_ms, Some(1_000));
        assert_eq!(params.binc_ms, Some(500));
        assert_eq!(params.movestogo, Some(20));
        assert!(parse_go_params("go depth").is_err());
        assert!(parse_go_params("go movetime -5").is_err());
    }

    #[test]
    fn ucinewgame_resets_position() {
        let out = run("position startpos moves e2e4\nucinewgame\nd\n");
        assert!(out.contains("fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
    }
}
