use criterion::{Criterion, black_box, criterion_group, criterion_main};

use cubedex::cube::{CubePattern, apply_alg, simplify};
use cubedex::engine::{MistakeTracker, project};
use cubedex::notation::token::MoveToken;
use cubedex::notation::{normalize, parse_alg};

const T_PERM: &str = "R U R' U' R' F R2 U' R' U' R U R' F'";

fn t_perm_tokens() -> Vec<MoveToken> {
    parse_alg(T_PERM).unwrap()
}

fn bench_normalize(c: &mut Criterion) {
    // Messy alg-sheet input: run-together moves, brackets, curly quotes.
    let input = "[RUR\u{2019}U\u{2019}](R\u{b4}FR2U'R')RUR'F'".repeat(10);

    c.bench_function("normalize (140 moves, messy input)", |b| {
        b.iter(|| normalize(black_box(&input)))
    });
}

fn bench_project(c: &mut Criterion) {
    let moves = t_perm_tokens();
    let initial = CubePattern::solved();

    c.bench_function("project checkpoints (T perm)", |b| {
        b.iter(|| project(black_box(&initial), black_box(&moves)))
    });
}

fn bench_apply_alg(c: &mut Criterion) {
    let moves: Vec<MoveToken> = (0..50).flat_map(|_| t_perm_tokens()).collect();
    let initial = CubePattern::solved();

    c.bench_function("apply_alg (700 moves)", |b| {
        b.iter(|| apply_alg(black_box(&initial), black_box(&moves)))
    });
}

fn bench_clean_solve(c: &mut Criterion) {
    let moves = t_perm_tokens();

    c.bench_function("tracker feed (clean T perm solve)", |b| {
        b.iter(|| {
            let mut tracker = MistakeTracker::new(CubePattern::solved(), moves.clone());
            for &m in &moves {
                tracker.feed(black_box(m));
            }
            tracker
        })
    });
}

fn bench_messy_solve(c: &mut Criterion) {
    let moves = t_perm_tokens();
    // Every third move: a wrong turn, its undo, then the right move.
    let performed: Vec<MoveToken> = moves
        .iter()
        .enumerate()
        .flat_map(|(i, &m)| {
            if i % 3 == 0 {
                let stray = parse_alg("D").unwrap()[0];
                vec![stray, stray.inverse(), m]
            } else {
                vec![m]
            }
        })
        .collect();

    c.bench_function("tracker feed + classify (solve with detours)", |b| {
        b.iter(|| {
            let mut tracker = MistakeTracker::new(CubePattern::solved(), moves.clone());
            for &m in &performed {
                tracker.feed(black_box(m));
                black_box(tracker.classify(false));
            }
            tracker
        })
    });
}

fn bench_simplify(c: &mut Criterion) {
    // Long buffer with plenty of cancellations and same-axis skips.
    let buffer = parse_alg("R L R' U U' D2 D2 F F2 F' B M M' x x' R R R R")
        .unwrap()
        .repeat(5);

    c.bench_function("simplify (90-move buffer)", |b| {
        b.iter(|| simplify(black_box(&buffer)))
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_project,
    bench_apply_alg,
    bench_clean_solve,
    bench_messy_solve,
    bench_simplify,
);
criterion_main!(benches);
