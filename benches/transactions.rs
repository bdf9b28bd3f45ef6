// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Benchmarks for transaction operations.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use lithiumdb::{Database, DatabaseConfig, IsolationLevel, Key, Value};

fn bench_begin(c: &mut Criterion) {
    let db = Database::new();

    c.bench_function("txn::begin", |b| {
        b.iter(|| {
            let txn = db.begin();
            black_box(txn)
        })
    });
}

fn bench_set(c: &mut Criterion) {
    let db = Database::new();
    let counter = std::sync::atomic::AtomicU64::new(0);

    c.bench_function("txn::set", |b| {
        b.iter_batched(
            || {
                let i = counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                let txn = db.begin();
                (txn, Key::from(format!("key{}", i)), Value::from("value"))
            },
            |(txn, key, value)| {
                db.set(txn, key, value).unwrap();
                black_box(txn)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get(c: &mut Criterion) {
    let db = Database::new();

    // Pre-populate committed versions.
    for i in 0..1000 {
        let txn = db.begin();
        db.set(txn, Key::from(format!("prekey{:04}", i)), Value::from("value"))
            .unwrap();
        db.commit(txn).unwrap();
    }

    c.bench_function("txn::get_hit", |b| {
        b.iter_batched(
            || {
                let i = rand::random::<u32>() % 1000;
                (db.begin(), Key::from(format!("prekey{:04}", i)))
            },
            |(txn, key)| {
                let result = db.get(txn, &key).unwrap();
                black_box(result)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("txn::get_miss", |b| {
        b.iter_batched(
            || (db.begin(), Key::from("absent")),
            |(txn, key)| {
                let result = db.get(txn, &key).unwrap();
                black_box(result)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_commit(c: &mut Criterion) {
    let counter = std::sync::atomic::AtomicU64::new(0);

    let mut group = c.benchmark_group("txn");
    group.throughput(Throughput::Elements(1));

    // Read Committed commits skip the conflict scan entirely.
    let db = Database::new();
    group.bench_function("commit_read_committed", |b| {
        b.iter_batched(
            || {
                let i = counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                let txn = db.begin();
                db.set(txn, Key::from(format!("rckey{}", i)), Value::from("value"))
                    .unwrap();
                txn
            },
            |txn| {
                let result = db.commit(txn);
                black_box(result)
            },
            BatchSize::SmallInput,
        )
    });

    // Snapshot commits pay for the scan; disjoint keys keep them succeeding.
    let db = Database::with_config(
        DatabaseConfig::new().with_default_isolation(IsolationLevel::Snapshot),
    );
    group.bench_function("commit_snapshot", |b| {
        b.iter_batched(
            || {
                let i = counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                let txn = db.begin();
                db.set(txn, Key::from(format!("snapkey{}", i)), Value::from("value"))
                    .unwrap();
                txn
            },
            |txn| {
                let result = db.commit(txn);
                black_box(result)
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_full_transaction(c: &mut Criterion) {
    let db = Database::new();

    for i in 0..100 {
        let txn = db.begin();
        db.set(txn, Key::from(format!("data{:03}", i)), Value::from("value"))
            .unwrap();
        db.commit(txn).unwrap();
    }

    let counter = std::sync::atomic::AtomicU64::new(0);

    c.bench_function("txn::full_read_write_commit", |b| {
        b.iter(|| {
            let i = counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            let txn = db.begin();

            let read_key = Key::from(format!("data{:03}", i % 100));
            let _ = db.get(txn, &read_key);

            db.set(txn, Key::from(format!("newdata{}", i)), Value::from("value"))
                .unwrap();

            let result = db.commit(txn);
            black_box(result)
        })
    });
}

criterion_group!(
    benches,
    bench_begin,
    bench_set,
    bench_get,
    bench_commit,
    bench_full_transaction,
);
criterion_main!(benches);
