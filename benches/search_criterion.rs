use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sloe_chess::game_state::game_state::GameState;
use sloe_chess::search::board_scoring::PieceSquareScorer;
use sloe_chess::search::iterative_deepening::Searcher;
use sloe_chess::search::time_management::SearchBudget;

const POSITIONS: &[(&str, &str)] = &[
    ("startpos", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    ("rook_endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
];

fn bench_fixed_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_fixed_depth");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    for &(name, fen) in POSITIONS {
        let mut game = GameState::from_fen(fen).expect("benchmark FEN should parse");
        for depth in [3u8, 4] {
            let budget = SearchBudget::depth_only(depth);
            group.bench_with_input(BenchmarkId::new(name, depth), &budget, |b, budget| {
                b.iter(|| {
                    // Fresh table each run so iterations are comparable.
                    let mut searcher = Searcher::new(PieceSquareScorer, 16, 30);
                    black_box(searcher.search(&mut game, budget).best_move)
                });
            });
        }
    }

    group.finish();
}

criterion_group!(search_benches, bench_fixed_depth);
criterion_main!(search_benches);
