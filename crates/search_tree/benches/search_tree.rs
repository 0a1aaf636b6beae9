use criterion::{Criterion, criterion_group, criterion_main};

mod common;

fn bench(c: &mut Criterion) {
    let mut search = c.benchmark_group("search_tree/search");
    common::bench_all_search(&mut search);
    search.finish();

    let mut range = c.benchmark_group("search_tree/range");
    common::bench_all_range(&mut range);
    range.finish();

    let mut update = c.benchmark_group("search_tree/update");
    common::bench_all_update(&mut update);
    update.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
