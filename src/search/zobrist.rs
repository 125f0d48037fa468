//! Zobrist hashing for position identity.
//!
//! The keyspace is drawn once from a seeded `StdRng`, so fingerprints are
//! reproducible across runs. The tables live for the whole process: they are
//! built lazily from the default seed, or eagerly through [`init_zobrist`]
//! before the first position is created.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::errors::ZobristError;
use crate::game_state::{chess_types::*, game_state::GameState};

pub const DEFAULT_ZOBRIST_SEED: u64 = 20_260_202;

/// Index of the "no en-passant target" key.
const NO_EN_PASSANT: usize = 8;

#[derive(Debug, PartialEq, Eq)]
struct ZobristTables {
    seed: u64,
    piece_square: [[u64; 64]; 12],
    castling: [u64; 16],
    en_passant: [u64; 9],
    side_to_move: u64,
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(|| build_tables(DEFAULT_ZOBRIST_SEED))
}

fn build_tables(seed: u64) -> ZobristTables {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut piece_square = [[0u64; 64]; 12];
    for piece in &mut piece_square {
        for key in piece.iter_mut() {
            *key = rng.random::<u64>();
        }
    }

    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = rng.random::<u64>();
    }

    let mut en_passant = [0u64; 9];
    for key in &mut en_passant {
        *key = rng.random::<u64>();
    }

    ZobristTables {
        seed,
        piece_square,
        castling,
        en_passant,
        side_to_move: rng.random::<u64>(),
    }
}

/// Build the keyspace from `seed`. Calling again with the same seed is a
/// no-op; asking for a different seed once keys exist is refused, since
/// every live fingerprint would silently go stale.
pub fn init_zobrist(seed: u64) -> Result<(), ZobristError> {
    let active = TABLES.get_or_init(|| build_tables(seed));
    if active.seed != seed {
        return Err(ZobristError::AlreadyInitialised {
            active: active.seed,
            requested: seed,
        });
    }
    debug!(seed, "zobrist keys ready");
    Ok(())
}

/// Seed the process-wide keyspace was built from.
pub fn active_seed() -> u64 {
    tables().seed
}

#[inline]
pub fn piece_square_key(piece: Piece, square: Square) -> u64 {
    tables().piece_square[piece.index()][square as usize]
}

/// Key for a castling-rights combination (`0..=15`).
#[inline]
pub fn castling_key(castling_rights: CastlingRights) -> u64 {
    tables().castling[(castling_rights & CASTLE_ALL) as usize]
}

/// Key for the en-passant file, or the dedicated "none" key.
#[inline]
pub fn en_passant_key(en_passant_square: Option<Square>) -> u64 {
    let slot = en_passant_square.map_or(NO_EN_PASSANT, |sq| square_file(sq) as usize);
    tables().en_passant[slot]
}

/// Mixed in when dark is to move.
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

/// Recompute a fingerprint from scratch. Make/undo maintain the same value
/// incrementally; the two must always agree.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    let mut key = 0u64;

    for color in Color::ALL {
        for kind in PieceKind::ALL {
            let piece = Piece::new(color, kind);
            let mut bb = game_state.pieces[color.index()][kind.index()];
            while bb != 0 {
                let sq = bb.trailing_zeros() as Square;
                key ^= piece_square_key(piece, sq);
                bb &= bb - 1;
            }
        }
    }

    key ^= castling_key(game_state.castling_rights);
    key ^= en_passant_key(game_state.en_passant_square);

    if game_state.side_to_move == Color::Dark {
        key ^= side_to_move_key();
    }

    key
}
