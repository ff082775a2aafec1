// ABOUTME: Criterion benchmarks for the in-memory session store
// ABOUTME: Measures report writes, hits, misses and eviction under a full store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for session store operations.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use eva_server::session::memory::SessionStoreConfig;
use eva_server::session::{CachedReport, InMemorySessionStore, SessionId, SessionStore};
use serde_json::json;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Report with `improvements` entries in each list
fn report(improvements: usize) -> CachedReport {
    CachedReport {
        match_index: 42,
        prediction: json!({"predicted": "Win", "probability": 0.71, "real": "Win"}),
        top_statistics: vec![
            ("boost_usage".to_owned(), 1.284),
            ("saves".to_owned(), -0.513),
            ("demos".to_owned(), 0.207),
        ],
        to_improve: (0..improvements).map(|i| format!("stat_{i}")).collect(),
        strengths: (0..improvements).map(|i| format!("strength_{i}")).collect(),
    }
}

fn store(max_entries: usize) -> InMemorySessionStore {
    InMemorySessionStore::new(&SessionStoreConfig {
        max_entries,
        ttl: Duration::from_secs(3600),
        cleanup_interval: Duration::from_secs(3600),
        enable_background_cleanup: false,
    })
}

fn bench_session_set(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("session_set");

    for improvements in [3_usize, 18] {
        let sessions = store(10_000);
        let cached = report(improvements);
        let ids: Vec<SessionId> = (0..1000).map(|_| SessionId::generate()).collect();

        group.bench_with_input(
            BenchmarkId::new("memory", improvements),
            &cached,
            |b, cached| {
                let mut index = 0_usize;
                b.iter(|| {
                    let id = ids[index % ids.len()];
                    index = index.wrapping_add(1);
                    rt.block_on(async {
                        sessions
                            .set(black_box(&id), black_box(cached.clone()))
                            .await
                            .unwrap();
                    });
                });
            },
        );
    }

    group.finish();
}

fn bench_session_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("session_get");

    let sessions = store(10_000);
    let ids: Vec<SessionId> = (0..1000).map(|_| SessionId::generate()).collect();
    rt.block_on(async {
        for id in &ids {
            sessions.set(id, report(3)).await.unwrap();
        }
    });

    group.bench_function("memory_hit", |b| {
        let mut index = 0_usize;
        b.iter(|| {
            let id = ids[index % ids.len()];
            index = index.wrapping_add(1);
            rt.block_on(async {
                black_box(sessions.get(black_box(&id)).await.unwrap());
            });
        });
    });

    group.bench_function("memory_miss", |b| {
        b.iter(|| {
            let id = SessionId::generate();
            rt.block_on(async {
                black_box(sessions.get(black_box(&id)).await.unwrap());
            });
        });
    });

    group.finish();
}

fn bench_session_eviction(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("session_eviction");

    let sessions = store(100);
    rt.block_on(async {
        for _ in 0..100 {
            sessions.set(&SessionId::generate(), report(3)).await.unwrap();
        }
    });

    group.bench_function("memory_full_store", |b| {
        b.iter(|| {
            let id = SessionId::generate();
            rt.block_on(async {
                sessions.set(black_box(&id), report(3)).await.unwrap();
            });
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_session_set,
    bench_session_get,
    bench_session_eviction
);
criterion_main!(benches);
