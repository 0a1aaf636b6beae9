use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{KeyOrder, apply_medium_runtime_config, apply_small_runtime_config, even_keys};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use search_tree::{AvlTree, BinarySearchTree, SearchMap};

// Ascending order builds a chain in the unbalanced tree, so sizes stay small
// enough for quadratic construction.
const SIZES: [usize; 3] = [1_000, 4_000, 16_000];
const ORDERS: [KeyOrder; 2] = [KeyOrder::Shuffled, KeyOrder::Ascending];
const OPS_PER_ITER: usize = 200;
const SEARCH_HIT_RATE_PERCENT: u64 = 80;
const RANGE_WIDTH: u64 = 64;

#[derive(Clone)]
enum UpdateOp {
    Insert { key: u64, value: u64 },
    Remove { key: u64 },
}

fn build<M>(keys: &[u64]) -> M
where
    M: SearchMap<Key = u64, Value = u64> + Default,
{
    let mut map = M::default();
    for &k in keys {
        black_box(map.insert(k, k ^ SEED_MIX));
    }
    map
}

pub fn bench_search<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    M: SearchMap<Key = u64, Value = u64> + Default,
{
    for order in ORDERS {
        for &size in &SIZES {
            apply_small_runtime_config(group);
            let base_seed = seed_base(1, size as u64);
            let keys = even_keys(size, order, base_seed);
            let mut map: M = build(&keys);

            let id = BenchmarkId::new(format!("{label}/{}", order.label()), size);
            group.bench_function(id, |bencher| {
                bencher.iter_custom(|iters| {
                    let mut total = Duration::ZERO;
                    for iter in 0..iters {
                        let mut rng = StdRng::seed_from_u64(seed_for_iter(base_seed, iter));
                        let queries = generate_search_keys(&keys, &mut rng);
                        let start = Instant::now();
                        let mut comparisons = 0u64;
                        for key in &queries {
                            black_box(map.search(key).ok());
                            comparisons += map.comparisons();
                        }
                        black_box(comparisons);
                        total += start.elapsed();
                    }
                    total
                })
            });
        }
    }
}

pub fn bench_range<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    M: SearchMap<Key = u64, Value = u64> + Default,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let base_seed = seed_base(2, size as u64);
        let keys = even_keys(size, KeyOrder::Shuffled, base_seed);
        let map: M = build(&keys);
        let max_key = 2 * size as u64;

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for iter in 0..iters {
                    let mut rng = StdRng::seed_from_u64(seed_for_iter(base_seed, iter));
                    let lows: Vec<u64> = (0..OPS_PER_ITER)
                        .map(|_| rng.random_range(0..max_key))
                        .collect();
                    let start = Instant::now();
                    for &low in &lows {
                        black_box(map.range_query(&low, &(low + RANGE_WIDTH)).len());
                    }
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

pub fn bench_update<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    M: SearchMap<Key = u64, Value = u64> + Default,
{
    for order in ORDERS {
        for &size in &SIZES {
            apply_medium_runtime_config(group);
            let base_seed = seed_base(3, size as u64);
            let keys = even_keys(size, order, base_seed);
            let mut map: M = build(&keys);

            let id = BenchmarkId::new(format!("{label}/{}", order.label()), size);
            group.bench_function(id, |bencher| {
                bencher.iter_custom(|iters| {
                    let mut total = Duration::ZERO;
                    for iter in 0..iters {
                        let mut rng = StdRng::seed_from_u64(seed_for_iter(base_seed, iter));
                        let ops = generate_update_ops(size, &mut rng);
                        let start = Instant::now();
                        run_update_ops(&mut map, &ops);
                        black_box(map.size());
                        total += start.elapsed();
                    }
                    total
                })
            });
        }
    }
}

fn generate_search_keys(keys: &[u64], rng: &mut StdRng) -> Vec<u64> {
    (0..OPS_PER_ITER)
        .map(|_| {
            let idx = rng.random_range(0..keys.len());
            let hit = rng.random_range(0..100) < SEARCH_HIT_RATE_PERCENT;
            // Stored keys are even; the odd neighbour is always a miss.
            if hit { keys[idx] } else { keys[idx] | 1 }
        })
        .collect()
}

/// Inserts odd keys and removes them again, leaving the stored set as built.
fn generate_update_ops(size: usize, rng: &mut StdRng) -> Vec<UpdateOp> {
    let max_key = 2 * size as u64;
    let mut inserted = Vec::with_capacity(OPS_PER_ITER / 2);
    let mut ops = Vec::with_capacity(OPS_PER_ITER);
    for i in 0..OPS_PER_ITER {
        if i % 2 == 0 {
            let key = rng.random_range(0..max_key) | 1;
            inserted.push(key);
            ops.push(UpdateOp::Insert { key, value: rng.random() });
        } else {
            let idx = rng.random_range(0..inserted.len());
            ops.push(UpdateOp::Remove { key: inserted.swap_remove(idx) });
        }
    }
    ops
}

fn run_update_ops<M>(map: &mut M, ops: &[UpdateOp])
where
    M: SearchMap<Key = u64, Value = u64>,
{
    for op in ops {
        match *op {
            UpdateOp::Insert { key, value } => {
                black_box(map.insert(key, value));
            }
            UpdateOp::Remove { key } => {
                black_box(map.remove(&key).ok());
            }
        }
    }
}

fn seed_base(workload_id: u64, size: u64) -> u64 {
    mix_seed(0x0DDB_A11A_2026_0000_u64 ^ (workload_id << 48) ^ size)
}

fn seed_for_iter(base: u64, iter: u64) -> u64 {
    mix_seed(base ^ iter.wrapping_mul(SEED_MIX))
}

const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

fn mix_seed(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

pub fn bench_all_search<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_search::<BinarySearchTree<u64, u64>, _>(group, "bst");
    bench_search::<AvlTree<u64, u64>, _>(group, "avl");
}

pub fn bench_all_range<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_range::<BinarySearchTree<u64, u64>, _>(group, "bst");
    bench_range::<AvlTree<u64, u64>, _>(group, "avl");
}

pub fn bench_all_update<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_update::<BinarySearchTree<u64, u64>, _>(group, "bst");
    bench_update::<AvlTree<u64, u64>, _>(group, "avl");
}
