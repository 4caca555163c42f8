use criterion::{criterion_group, criterion_main, Criterion, black_box};
use cozy_chess::Board;
use castlebot::config::EngineConfig;
use castlebot::search::Searcher;

fn bench_search(c: &mut Criterion) {
    let b = Board::default();
    let mut group = c.benchmark_group("select_move_startpos");
    group.sample_size(10);
    for order_moves in [false, true] {
        let name = if order_moves { "depth_3_ordered" } else { "depth_3_unordered" };
        group.bench_function(name, |ben| {
            ben.iter(|| {
                let cfg = EngineConfig { max_depth: 3, order_moves, ..EngineConfig::default() };
                let mut s = Searcher::new(cfg);
                let r = s.select_move(black_box(&b), None).unwrap();
                black_box(r.stats.nodes)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
