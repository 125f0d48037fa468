use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sloe_chess::engines::engine_config::EngineConfig;
use sloe_chess::search::zobrist::init_zobrist;
use sloe_chess::uci::uci_top::run_stdio_loop;

fn main() -> ExitCode {
    // Stdout is the protocol channel; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::load_from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                error!(%err, %path, "cannot load engine config");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    if let Err(err) = init_zobrist(config.zobrist_seed) {
        error!(%err, "cannot initialise zobrist keys");
        return ExitCode::FAILURE;
    }
    info!(seed = config.zobrist_seed, hash_mb = config.hash_mb, "engine starting");

    match run_stdio_loop(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "protocol loop failed");
            ExitCode::FAILURE
        }
    }
}
