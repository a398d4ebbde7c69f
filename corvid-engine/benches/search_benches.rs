use std::sync::atomic::AtomicBool;

use criterion::{criterion_group, criterion_main, Criterion};

use corvid_core::position::Position;
use corvid_engine::eval::MaterialEvaluator;
use corvid_engine::search::{iterative_deepening, SearchContext, ThreadData};
use corvid_engine::tt::TranspositionTable;

fn bench_search_startpos(c: &mut Criterion) {
    let pos = Position::start_pos();
    let evaluator = MaterialEvaluator;

    c.bench_function("search_depth_4_startpos", |b| {
        b.iter(|| {
            let tt = TranspositionTable::new(1);
            let stop = AtomicBool::new(false);
            let ctx = SearchContext { tt: &tt, stop: &stop, evaluator: &evaluator, stop_time: None };
            let mut td = ThreadData::new();
            iterative_deepening(&pos, 4, 0, &mut td, &ctx, |_| {})
        })
    });
}

fn bench_search_kiwipete(c: &mut Criterion) {
    let pos = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    let evaluator = MaterialEvaluator;

    c.bench_function("search_depth_4_kiwipete", |b| {
        b.iter(|| {
            let tt = TranspositionTable::new(1);
            let stop = AtomicBool::new(false);
            let ctx = SearchContext { tt: &tt, stop: &stop, evaluator: &evaluator, stop_time: None };
            let mut td = ThreadData::new();
            iterative_deepening(&pos, 4, 0, &mut td, &ctx, |_| {})
        })
    });
}

criterion_group!(benches, bench_search_startpos, bench_search_kiwipete);
criterion_main!(benches);
