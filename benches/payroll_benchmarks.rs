//! Performance benchmarks for the Field Operations Engine.
//!
//! This benchmark suite tracks the cost of payroll aggregation:
//! - Report over a single session
//! - Reports over growing ledgers (10 / 100 / 1000 sessions)
//! - End-to-end report request through the HTTP router
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use fieldops_engine::api::{AppState, create_router};
use fieldops_engine::config::{Directory, DirectoryLoader};
use fieldops_engine::models::{GeoSample, SessionStatus, TimeSession};
use fieldops_engine::payroll::{DateRange, compute_report};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

const WORKERS: [&str; 3] = ["w_001", "w_002", "w_003"];

fn load_directory() -> Directory {
    DirectoryLoader::load("./config/fieldops").expect("Failed to load directory")
}

/// Builds an approved 8-hour session for the i-th slot, cycling workers and
/// spreading clock-ins across the report month.
fn approved_session(i: usize) -> TimeSession {
    let day = 1 + (i % 28) as u32;
    let clock_in = Utc
        .with_ymd_and_hms(2026, 3, day, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let clock_out = clock_in + Duration::hours(8);

    TimeSession {
        id: Uuid::new_v4(),
        worker_id: WORKERS[i % WORKERS.len()].to_string(),
        building_id: "bld_7".to_string(),
        work_order_id: Some("wo_101".to_string()),
        schedule_id: None,
        clock_in_time: clock_in,
        clock_out_time: Some(clock_out),
        break_minutes: 30,
        paused_at: None,
        status: SessionStatus::Approved,
        check_in: GeoSample::new(40.71, -74.0, 8.0, clock_in).expect("valid sample"),
        check_out: Some(GeoSample::new(40.71, -74.0, 8.0, clock_out).expect("valid sample")),
        notes: None,
        photos: vec![],
        rejection_reason: None,
        override_rate: None,
        adjusted_hours: None,
        correction_reason: None,
    }
}

fn sessions(count: usize) -> Vec<TimeSession> {
    (0..count).map(approved_session).collect()
}

fn march() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(2026, 3, 31).expect("valid date"),
    )
    .expect("valid range")
}

/// Benchmark: report over a single session.
fn bench_single_session(c: &mut Criterion) {
    let directory = load_directory();
    let sessions = sessions(1);
    let range = march();

    c.bench_function("report_single_session", |b| {
        b.iter(|| {
            let report =
                compute_report(black_box(&sessions), &directory, &range, None).unwrap();
            black_box(report)
        })
    });
}

/// Benchmark: report cost across growing ledgers.
fn bench_report_scaling(c: &mut Criterion) {
    let directory = load_directory();
    let range = march();

    let mut group = c.benchmark_group("report_scaling");
    for count in [10usize, 100, 1000] {
        let sessions = sessions(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("sessions", count), &count, |b, _| {
            b.iter(|| {
                let report =
                    compute_report(black_box(&sessions), &directory, &range, None).unwrap();
                black_box(report)
            })
        });
    }
    group.finish();
}

/// Benchmark: report filtered to a single worker over a large ledger.
fn bench_worker_filter(c: &mut Criterion) {
    let directory = load_directory();
    let sessions = sessions(1000);
    let range = march();

    c.bench_function("report_worker_filter_1000", |b| {
        b.iter(|| {
            let report =
                compute_report(black_box(&sessions), &directory, &range, Some("w_001")).unwrap();
            black_box(report)
        })
    });
}

/// Benchmark: full report request through the HTTP router.
fn bench_report_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = AppState::new(load_directory());
    let router = create_router(state);

    c.bench_function("report_endpoint", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .uri("/reports/payroll?start=2026-03-01&end=2026-03-31")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_single_session,
    bench_report_scaling,
    bench_worker_filter,
    bench_report_endpoint,
);
criterion_main!(benches);
