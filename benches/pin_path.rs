//! Benchmarks for the pin hot paths.

use std::hint::black_box;
use std::sync::Arc;

use blockpool::{BufferPool, FileBlockStore};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_pin_hit(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileBlockStore::open(dir.path()).unwrap());
    let blk = store.allocate("bench.tbl").unwrap();
    let pool = BufferPool::new(8, Arc::clone(&store));

    c.bench_function("pin_hit", |b| {
        b.iter(|| {
            let buf = pool.pin(&blk).unwrap();
            black_box(buf.page().as_slice()[0]);
        })
    });
}

fn bench_pin_miss_with_eviction(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileBlockStore::open(dir.path()).unwrap());
    let blocks: Vec<_> = (0..4).map(|_| store.allocate("bench.tbl").unwrap()).collect();
    // 2 slots, 4 blocks round-robin: every pin is a miss with a clean victim.
    let pool = BufferPool::new(2, Arc::clone(&store));

    let mut next = 0usize;
    c.bench_function("pin_miss_evict_clean", |b| {
        b.iter(|| {
            let buf = pool.pin(&blocks[next]).unwrap();
            next = (next + 1) % blocks.len();
            black_box(buf.id());
        })
    });
}

criterion_group!(benches, bench_pin_hit, bench_pin_miss_with_eviction);
criterion_main!(benches);
