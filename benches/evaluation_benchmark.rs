//! Benchmarks for the static evaluation and the tactical scans that run
//! before every search.

use gomoku::board::player::Player;
use gomoku::board::Board;
use gomoku::evaluate::PositionEvaluator;
use gomoku::pattern::PatternClassifier;
use gomoku::threat::ThreatDetector;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

const MIDGAME: &str = "h8 h9 i9 g7 j10 k11 i8 i7 g9 j7 f10 e11";

fn criterion_benchmark(c: &mut Criterion) {
    let board = Board::from_moves(MIDGAME).unwrap();

    c.bench_function("evaluate board, cold caches", |b| {
        b.iter(|| {
            let mut evaluator = PositionEvaluator::new();
            black_box(evaluator.evaluate_board(&board, Player::Black))
        })
    });

    let mut warm = PositionEvaluator::new();
    c.bench_function("evaluate board, warm caches", |b| {
        b.iter(|| black_box(warm.evaluate_board(&board, Player::Black)))
    });

    c.bench_function("vcf scan depth 6", |b| {
        b.iter(|| {
            let mut board = board.clone();
            let mut classifier = PatternClassifier::new();
            let mut threats = ThreatDetector::new(&mut board, &mut classifier);
            black_box(threats.find_forced_win_vcf(Player::Black, 6))
        })
    });

    c.bench_function("count active threats", |b| {
        b.iter(|| {
            let mut board = board.clone();
            let mut classifier = PatternClassifier::new();
            let mut threats = ThreatDetector::new(&mut board, &mut classifier);
            black_box(threats.count_active_threats())
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
