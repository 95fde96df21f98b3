// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_ordered_tree::{Tree, TreeConfig};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

fn gen_random_keys(count: usize) -> Vec<u64> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count).map(|_| rng.next_u64()).collect()
}

fn build(keys: &[u64], config: TreeConfig) -> Tree<u64, u64> {
    let mut tree = Tree::with_config(config);
    for &k in keys {
        tree.insert(k, k);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[1_000usize, 10_000, 100_000] {
        let keys = gen_random_keys(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("random_plain_n{}", n), |b| {
            b.iter(|| black_box(build(&keys, TreeConfig::default()).len()));
        });
        group.bench_function(format!("random_avl_n{}", n), |b| {
            b.iter(|| black_box(build(&keys, TreeConfig::AVL).len()));
        });
    }
    // Sorted input degenerates without rebalancing; keep it small.
    let sorted: Vec<u64> = (0..2_000).collect();
    group.bench_function("sorted_plain_n2000", |b| {
        b.iter(|| black_box(build(&sorted, TreeConfig::default()).tree_height()));
    });
    group.bench_function("sorted_avl_n2000", |b| {
        b.iter(|| black_box(build(&sorted, TreeConfig::AVL).tree_height()));
    });
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let keys = gen_random_keys(100_000);
    let tree = build(&keys, TreeConfig::AVL);
    group.throughput(Throughput::Elements(1_000));
    group.bench_function("find_hit_1k", |b| {
        b.iter(|| {
            let hits = keys[..1_000].iter().filter(|k| tree.find(*k).is_some()).count();
            black_box(hits);
        });
    });
    group.bench_function("iter_full", |b| {
        b.iter(|| black_box(tree.iter().count()));
    });
    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");
    let keys = gen_random_keys(10_000);
    group.throughput(Throughput::Elements(keys.len() as u64));
    for (name, config) in [("plain", TreeConfig::default()), ("avl", TreeConfig::AVL)] {
        group.bench_function(format!("drain_{}_n10000", name), |b| {
            b.iter_batched(
                || build(&keys, config),
                |mut tree| {
                    while let Some(root) = tree.root() {
                        tree.delete(root);
                    }
                    black_box(tree.len());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_global_rebalance(c: &mut Criterion) {
    let mut group = c.benchmark_group("global_rebalance");
    for &n in &[1_000usize, 10_000, 100_000] {
        let keys = gen_random_keys(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("dsw_random_n{}", n), |b| {
            b.iter_batched(
                || build(&keys, TreeConfig::default()),
                |mut tree| {
                    tree.rebalance_global().unwrap();
                    black_box(tree.tree_height());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_lookup,
    bench_delete,
    bench_global_rebalance
);
criterion_main!(benches);
