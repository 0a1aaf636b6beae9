use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const MEDIUM_RUNTIME_SAMPLE_SIZE: usize = 10;
const MEDIUM_RUNTIME_WARM_UP_MS: u64 = 500;
const MEDIUM_RUNTIME_MEASURE_MS: u64 = 1500;

pub fn apply_small_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
}

/// For workloads whose setup dominates, such as building a degenerate tree.
pub fn apply_medium_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(MEDIUM_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(MEDIUM_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(MEDIUM_RUNTIME_MEASURE_MS));
}

/// Order in which a key set is fed to a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrder {
    /// Uniform permutation; unbalanced trees stay near logarithmic height.
    Shuffled,
    /// Strictly increasing; an unbalanced tree degenerates into a chain.
    Ascending,
}

impl KeyOrder {
    pub fn label(self) -> &'static str {
        match self {
            KeyOrder::Shuffled => "shuffled",
            KeyOrder::Ascending => "ascending",
        }
    }
}

/// Keys `0, 2, 4, ..` so that odd keys are guaranteed misses.
pub fn even_keys(size: usize, order: KeyOrder, seed: u64) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..size as u64).map(|k| k * 2).collect();
    if order == KeyOrder::Shuffled {
        keys.shuffle(&mut StdRng::seed_from_u64(seed));
    }
    keys
}
