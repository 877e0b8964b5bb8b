use core::hash::BuildHasherDefault;
use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::BenchmarkGroup;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::measurement::WallTime;
use lp_hash::HashTable as LpHashTable;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

type HashbrownMap = hashbrown::HashMap<u64, u64>;
type SipHashbrownMap = hashbrown::HashMap<u64, u64, BuildHasherDefault<SipHasher>>;

/// The operations every contender is measured on.
trait BenchTable: Default {
    const NAME: &'static str;

    fn with_capacity(capacity: usize) -> Self;
    fn upsert(&mut self, key: u64, value: u64);
    fn find(&self, key: u64) -> Option<u64>;
    fn remove(&mut self, key: u64) -> Option<u64>;
    fn sum_values(&self) -> u64;
}

impl BenchTable for LpHashTable<u64, u64> {
    const NAME: &'static str = "lp_hash";

    fn with_capacity(capacity: usize) -> Self {
        let mut table = LpHashTable::new();
        table.reserve(capacity);
        table
    }

    fn upsert(&mut self, key: u64, value: u64) {
        let handle = self.insert(key);
        *self.value_mut(handle) = value;
    }

    fn find(&self, key: u64) -> Option<u64> {
        self.get(key)
    }

    fn remove(&mut self, key: u64) -> Option<u64> {
        LpHashTable::remove(self, key)
    }

    fn sum_values(&self) -> u64 {
        self.iter().fold(0, |acc, cell| acc.wrapping_add(cell.value()))
    }
}

impl BenchTable for HashbrownMap {
    const NAME: &'static str = "hashbrown";

    fn with_capacity(capacity: usize) -> Self {
        HashbrownMap::with_capacity(capacity)
    }

    fn upsert(&mut self, key: u64, value: u64) {
        self.insert(key, value);
    }

    fn find(&self, key: u64) -> Option<u64> {
        self.get(&key).copied()
    }

    fn remove(&mut self, key: u64) -> Option<u64> {
        HashbrownMap::remove(self, &key)
    }

    fn sum_values(&self) -> u64 {
        self.values().fold(0, |acc, v| acc.wrapping_add(*v))
    }
}

impl BenchTable for SipHashbrownMap {
    const NAME: &'static str = "hashbrown_siphash";

    fn with_capacity(capacity: usize) -> Self {
        SipHashbrownMap::with_capacity_and_hasher(capacity, Default::default())
    }

    fn upsert(&mut self, key: u64, value: u64) {
        self.insert(key, value);
    }

    fn find(&self, key: u64) -> Option<u64> {
        self.get(&key).copied()
    }

    fn remove(&mut self, key: u64) -> Option<u64> {
        SipHashbrownMap::remove(self, &key)
    }

    fn sum_values(&self) -> u64 {
        self.values().fold(0, |acc, v| acc.wrapping_add(*v))
    }
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
    (1 << 20),
];

fn random_keys(count: usize) -> Vec<u64> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| rng.try_next_u64().unwrap())
        .collect::<Vec<u64>>()
}

fn shuffled(keys: &[u64]) -> Vec<u64> {
    let mut keys = keys.to_vec();
    keys.shuffle(&mut SmallRng::from_os_rng());
    keys
}

fn filled<T: BenchTable>(keys: &[u64]) -> T {
    let mut table = T::default();
    for &key in keys {
        table.upsert(key, key);
    }
    table
}

fn new_group<'a>(c: &'a mut Criterion, name: &str) -> BenchmarkGroup<'a, WallTime> {
    let mut group = c.benchmark_group(name);
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    group
}

fn insert_random<T: BenchTable>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    keys: &[u64],
    preallocate: bool,
) {
    group.bench_function(BenchmarkId::new(T::NAME, keys.len()), |b| {
        b.iter_batched(
            || shuffled(keys),
            |keys| {
                let mut table = if preallocate {
                    T::with_capacity(keys.len())
                } else {
                    T::default()
                };
                for key in keys {
                    table.upsert(key, key);
                }
                black_box(table)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_random(c: &mut Criterion) {
    for preallocate in [false, true] {
        let name = if preallocate {
            "insert_random_preallocated"
        } else {
            "insert_random"
        };
        let mut group = new_group(c, name);
        for &size in SIZES {
            let keys = random_keys(size);
            group.throughput(Throughput::Elements(size as u64));
            insert_random::<LpHashTable<u64, u64>>(&mut group, &keys, preallocate);
            insert_random::<HashbrownMap>(&mut group, &keys, preallocate);
            insert_random::<SipHashbrownMap>(&mut group, &keys, preallocate);
        }
        group.finish();
    }
}

fn find<T: BenchTable>(group: &mut BenchmarkGroup<'_, WallTime>, present: &[u64], probes: &[u64]) {
    let table = filled::<T>(present);
    group.bench_function(BenchmarkId::new(T::NAME, present.len()), |b| {
        b.iter_batched(
            || shuffled(probes),
            |probes| {
                for key in probes {
                    black_box(table.find(key));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find(c: &mut Criterion) {
    for (name, hit_ratio) in [("find_hit", 1.0), ("find_miss", 0.0), ("find_hit_miss", 0.5)] {
        let mut group = new_group(c, name);
        for &size in SIZES {
            // Even keys are present, odd keys never are.
            let present = (0..size as u64).map(|k| k * 2).collect::<Vec<_>>();
            let mut rng = SmallRng::from_os_rng();
            let probes = (0..size)
                .map(|i| {
                    if rng.random_bool(hit_ratio) {
                        present[i]
                    } else {
                        present[i] + 1
                    }
                })
                .collect::<Vec<_>>();

            group.throughput(Throughput::Elements(size as u64));
            find::<LpHashTable<u64, u64>>(&mut group, &present, &probes);
            find::<HashbrownMap>(&mut group, &present, &probes);
            find::<SipHashbrownMap>(&mut group, &present, &probes);
        }
        group.finish();
    }
}

fn remove<T: BenchTable>(group: &mut BenchmarkGroup<'_, WallTime>, keys: &[u64]) {
    group.bench_function(BenchmarkId::new(T::NAME, keys.len()), |b| {
        b.iter_batched(
            || (filled::<T>(keys), shuffled(keys)),
            |(mut table, keys)| {
                for key in keys {
                    black_box(table.remove(key));
                }
                black_box(table)
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_remove(c: &mut Criterion) {
    let mut group = new_group(c, "remove");
    for &size in SIZES {
        let keys = random_keys(size);
        group.throughput(Throughput::Elements(size as u64));
        remove::<LpHashTable<u64, u64>>(&mut group, &keys);
        remove::<HashbrownMap>(&mut group, &keys);
        remove::<SipHashbrownMap>(&mut group, &keys);
    }
    group.finish();
}

fn iteration<T: BenchTable>(group: &mut BenchmarkGroup<'_, WallTime>, keys: &[u64]) {
    let table = filled::<T>(keys);
    group.bench_function(BenchmarkId::new(T::NAME, keys.len()), |b| {
        b.iter(|| black_box(table.sum_values()))
    });
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = new_group(c, "iteration");
    for &size in SIZES {
        let keys = random_keys(size);
        group.throughput(Throughput::Elements(size as u64));
        iteration::<LpHashTable<u64, u64>>(&mut group, &keys);
        iteration::<HashbrownMap>(&mut group, &keys);
        iteration::<SipHashbrownMap>(&mut group, &keys);
    }
    group.finish();
}

fn churn<T: BenchTable>(group: &mut BenchmarkGroup<'_, WallTime>, keys: &[u64]) {
    group.bench_function(BenchmarkId::new(T::NAME, keys.len() / 2), |b| {
        b.iter_batched(
            || shuffled(keys),
            |keys| {
                let mut table = T::default();
                for key in keys {
                    if table.remove(key).is_none() {
                        table.upsert(key, key);
                    }
                }
                black_box(table)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_churn(c: &mut Criterion) {
    let mut group = new_group(c, "churn");
    for &size in SIZES {
        // Every key appears twice: once inserted, once removed.
        let keys = (0..size as u64).flat_map(|k| [k, k]).collect::<Vec<_>>();
        group.throughput(Throughput::Elements(keys.len() as u64));
        churn::<LpHashTable<u64, u64>>(&mut group, &keys);
        churn::<HashbrownMap>(&mut group, &keys);
        churn::<SipHashbrownMap>(&mut group, &keys);
    }
    group.finish();
}

#[derive(Clone, Copy)]
enum Operation {
    Insert(u64),
    Remove(u64),
    Find(u64),
}

fn mixed<T: BenchTable>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    size: usize,
    operations: &[Operation],
) {
    group.bench_function(BenchmarkId::new(T::NAME, size), |b| {
        b.iter(|| {
            let mut table = T::default();
            for operation in operations {
                match *operation {
                    Operation::Insert(key) => table.upsert(key, key),
                    Operation::Remove(key) => {
                        black_box(table.remove(key));
                    }
                    Operation::Find(key) => {
                        black_box(table.find(key));
                    }
                }
            }
            black_box(table)
        })
    });
}

fn bench_mixed_zipf(c: &mut Criterion) {
    const KEY_SPACE_MULTIPLIER: f64 = 2.0;

    for exponent in [1.0, 1.3] {
        let mut group = new_group(c, &format!("mixed_zipf_{exponent:.01}"));
        for &size in SIZES {
            let mut rng = SmallRng::from_os_rng();
            let op_distr = Zipf::new(3.0, exponent).unwrap();
            let key_distr = Zipf::new(size as f64 * KEY_SPACE_MULTIPLIER, 1.0).unwrap();

            let operations = (0..size * 3)
                .map(|_| {
                    let op: f64 = rng.sample(op_distr);
                    let key = rng.sample(key_distr) as u64;
                    if op <= 1.0 {
                        Operation::Find(key)
                    } else if op <= 2.0 {
                        Operation::Insert(key)
                    } else {
                        Operation::Remove(key)
                    }
                })
                .collect::<Vec<_>>();

            group.throughput(Throughput::Elements(operations.len() as u64));
            mixed::<LpHashTable<u64, u64>>(&mut group, size, &operations);
            mixed::<HashbrownMap>(&mut group, size, &operations);
            mixed::<SipHashbrownMap>(&mut group, size, &operations);
        }
        group.finish();
    }
}

fn bench_compact(c: &mut Criterion) {
    let mut group = new_group(c, "compact");
    for &size in SIZES {
        let keys = random_keys(size);
        group.throughput(Throughput::Elements(size as u64 / 8));
        group.bench_function(BenchmarkId::new(LpHashTable::<u64, u64>::NAME, size), |b| {
            b.iter_batched(
                || {
                    let mut table = filled::<LpHashTable<u64, u64>>(&keys);
                    for &key in keys.iter().skip(size / 8) {
                        table.delete_key(key);
                    }
                    table
                },
                |mut table| {
                    table.compact();
                    black_box(table)
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random,
    bench_find,
    bench_remove,
    bench_iteration,
    bench_churn,
    bench_mixed_zipf,
    bench_compact,
);

criterion_main!(benches);
