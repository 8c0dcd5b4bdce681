//! Performance benchmarks for the construction-management backend.
//!
//! This benchmark suite verifies that the hot paths stay cheap:
//! - Single estimate through the full HTTP stack: < 1ms mean
//! - Batch of 100 estimates: < 100ms mean
//! - Attendance event through the full HTTP stack: < 1ms mean
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use buildtrack::api::{AppState, create_router};
use buildtrack::auth::IdentityProvider;
use buildtrack::catalog::SeedCatalog;
use buildtrack::store::DocumentStore;

use axum::{body::Body, http::Request};
use serde_json::json;
use tower::ServiceExt;

/// Creates a state with the seed catalog applied.
fn create_test_state(rt: &tokio::runtime::Runtime) -> AppState {
    let store = DocumentStore::new();
    let seed = SeedCatalog::load("./config/seed").expect("Failed to load seed");
    rt.block_on(seed.apply(&store)).expect("Failed to apply seed");
    AppState::new(store, IdentityProvider::new())
}

fn estimate_body(area_sqft: i64, location: &str) -> String {
    json!({
        "projectType": "residential",
        "areaSqft": area_sqft,
        "floors": 2,
        "quality": "standard",
        "location": location,
    })
    .to_string()
}

fn post(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// Benchmark: Single estimate through the router.
///
/// Target: < 1ms mean
fn bench_single_estimate(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state(&rt);
    let router = create_router(state);
    let body = estimate_body(2000, "Riyadh");

    c.bench_function("single_estimate", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(post("/estimateMaterialCost", body.clone()))
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Batch of 100 estimates with varying inputs.
///
/// Target: < 100ms mean
fn bench_batch_100_estimates(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state(&rt);

    let locations = ["Riyadh", "Jeddah", "Dammam", "Abha"];
    let bodies: Vec<String> = (0..100)
        .map(|i| estimate_body(500 + i * 37, locations[i as usize % locations.len()]))
        .collect();

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));

    group.bench_function("batch_100_estimates", |b| {
        b.to_async(&rt).iter(|| async {
            let mut results = Vec::with_capacity(100);
            for body in &bodies {
                let router = create_router(state.clone());
                let response = router
                    .oneshot(post("/estimateMaterialCost", body.clone()))
                    .await
                    .unwrap();
                results.push(response.status());
            }
            black_box(results)
        })
    });

    group.finish();
}

/// Benchmark: Attendance event through the router.
///
/// Target: < 1ms mean
fn bench_attendance_event(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state(&rt);

    let (labour_id, project_id) = rt.block_on(async {
        let labour_id = state
            .store()
            .add(
                buildtrack::store::collections::LABOURS,
                json!({
                    "userId": "bench",
                    "name": "Ravi",
                    "contact": "9876543210",
                    "adhaarNo": "1234-5678-9012",
                    "role": "mason",
                    "isLoggedIn": false,
                    "attendance": [],
                    "createdAt": "2026-01-10T08:00:00Z"
                }),
            )
            .await
            .unwrap();
        let project_id = state
            .store()
            .add(
                buildtrack::store::collections::PROJECTS,
                json!({
                    "uid": "bench",
                    "projectName": "Villa",
                    "location": "Riyadh",
                    "description": "",
                    "startDate": "2026-01-10T08:00:00Z",
                    "endDate": "2026-01-10T08:00:00Z",
                    "isCompleted": false,
                    "projectLabours": [],
                    "projectMaterials": [],
                    "createdAt": "2026-01-10T08:00:00Z"
                }),
            )
            .await
            .unwrap();
        (labour_id, project_id)
    });

    let body = json!({
        "labourId": labour_id,
        "attendance": {"projectId": project_id, "isLogin": true}
    })
    .to_string();

    c.bench_function("attendance_event", |b| {
        b.to_async(&rt).iter(|| async {
            let router = create_router(state.clone());
            let response = router
                .oneshot(post("/addLabourAttendance", body.clone()))
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_single_estimate,
    bench_batch_100_estimates,
    bench_attendance_event
);
criterion_main!(benches);
