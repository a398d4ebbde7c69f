use criterion::{criterion_group, criterion_main, Criterion};

use corvid_core::movegen;
use corvid_core::perft::perft;
use corvid_core::position::Position;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_perft(c: &mut Criterion) {
    let startpos = Position::start_pos();
    c.bench_function("perft_startpos_depth_4", |b| {
        b.iter(|| perft(&startpos, 4))
    });

    let kiwipete = Position::from_fen(KIWIPETE).unwrap();
    c.bench_function("perft_kiwipete_depth_3", |b| {
        b.iter(|| perft(&kiwipete, 3))
    });
}

fn bench_movegen(c: &mut Criterion) {
    let startpos = Position::start_pos();
    c.bench_function("movegen_legal_startpos", |b| {
        b.iter(|| movegen::generate_legal(&startpos))
    });

    let kiwipete = Position::from_fen(KIWIPETE).unwrap();
    c.bench_function("movegen_legal_kiwipete", |b| {
        b.iter(|| movegen::generate_legal(&kiwipete))
    });
}

criterion_group!(benches, bench_perft, bench_movegen);
criterion_main!(benches);
