//! Performance benchmarks for loft-monitor
//!
//! Measures the hot paths of the recorder, report generation, the loft cache
//! and a full health check cycle over the in-memory store.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use loft_monitor::config::{Config, PerformanceConfig};
use loft_monitor::core::traits::CacheStatsSource;
use loft_monitor::monitoring::PerformanceSample;
use loft_monitor::{ChannelSignalSource, InMemoryStore, LoftMonitor, PerformanceMonitor};
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

const OPERATIONS: [&str; 4] = [
    "loft_search",
    "availability_check",
    "reservation_creation",
    "cache_lookup",
];

fn filled_monitor(samples: usize) -> PerformanceMonitor {
    let monitor = PerformanceMonitor::new(PerformanceConfig {
        max_samples: samples,
        ..PerformanceConfig::default()
    });
    for i in 0..samples {
        let operation = OPERATIONS[i % OPERATIONS.len()];
        let mut sample = PerformanceSample::new(operation, (i % 700) as u64, i % 17 != 0);
        if operation == "cache_lookup" {
            sample = sample.with_context("cache_hit", i % 3 != 0);
        }
        monitor.record_metric(sample);
    }
    monitor
}

/// Benchmark recording samples
fn bench_recording(c: &mut Criterion) {
    let mut group = c.benchmark_group("recording");
    group.throughput(Throughput::Elements(1));

    let monitor = filled_monitor(10_000);
    group.bench_function("record_metric_full_buffer", |b| {
        b.iter(|| {
            monitor.record_metric(black_box(PerformanceSample::new("loft_search", 120, true)));
        })
    });

    group.bench_function("start_end_timing", |b| {
        b.iter(|| {
            let timer = monitor.start_timing("loft_details", Default::default());
            black_box(monitor.end_timing(&timer, "loft_details", true, None, None))
        })
    });

    group.finish();
}

/// Benchmark report generation over different buffer sizes
fn bench_reports(c: &mut Criterion) {
    let mut group = c.benchmark_group("reports");

    for samples in [1_000, 10_000, 50_000] {
        let monitor = filled_monitor(samples);
        group.throughput(Throughput::Elements(samples as u64));
        group.bench_with_input(
            BenchmarkId::new("get_performance_report", samples),
            &samples,
            |b, _| b.iter(|| black_box(monitor.get_performance_report(Duration::from_secs(3600)))),
        );
    }

    let monitor = filled_monitor(10_000);
    group.bench_function("get_real_time_stats", |b| {
        b.iter(|| black_box(monitor.get_real_time_stats()))
    });

    group.finish();
}

fn seeded_store(lofts: usize) -> InMemoryStore {
    let store = InMemoryStore::new();
    store.create_table("loft_availability");
    for i in 0..lofts {
        store.insert("lofts", json!({"id": format!("loft-{}", i), "name": format!("Loft {}", i)}));
        store.insert(
            "reservations",
            json!({"id": format!("res-{}", i), "loft_id": format!("loft-{}", i)}),
        );
    }
    store
}

/// Benchmark loft cache lookups and a full health check cycle
fn bench_monitoring(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("monitoring");

    let (signals, _trigger) = ChannelSignalSource::new();
    let monitor = LoftMonitor::with_store(Config::default(), seeded_store(1_000), Arc::new(signals));
    let ids: Vec<String> = (0..100).map(|i| format!("loft-{}", i)).collect();
    rt.block_on(monitor.cache().warm_up_cache(&ids)).unwrap();

    group.bench_function("loft_cache_hit", |b| {
        b.iter(|| rt.block_on(async { black_box(monitor.cache().get("loft-42").await) }))
    });

    group.bench_function("health_check_cycle", |b| {
        b.iter(|| rt.block_on(async { black_box(monitor.health().perform_health_check().await) }))
    });

    group.finish();
}

criterion_group!(benches, bench_recording, bench_reports, bench_monitoring);
criterion_main!(benches);
