//! Benchmarks for running complete sessions.
//!
//! This benchmarks the full headless session loop used by `survey`.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use mountain_climber::SimConfig;
use mountain_climber::engine::resolve_move;
use mountain_climber::expedition::{RouteParams, SessionConfig, generate_route, run_session};

fn bench_single_session(c: &mut Criterion) {
    let session = SessionConfig::default();
    let rules = SimConfig::default();

    c.bench_function("session_4_climbers", |b| {
        b.iter(|| black_box(run_session(black_box(42), &session, &rules)));
    });
}

fn bench_large_session(c: &mut Criterion) {
    let session = SessionConfig {
        climbers: 64,
        segments: 500,
        max_turns: 1_000,
        ..SessionConfig::default()
    };
    let rules = SimConfig::default();

    c.bench_function("session_64_climbers_500_segments", |b| {
        b.iter(|| black_box(run_session(black_box(7), &session, &rules)));
    });
}

fn bench_long_move(c: &mut Criterion) {
    let Ok(path) = generate_route(3, 10_000, &RouteParams::default()) else {
        return;
    };
    let rules = SimConfig::default().movement;

    c.bench_function("move_10k_steps", |b| {
        b.iter(|| black_box(resolve_move(&path, path.start(), black_box(10_000), &rules)));
    });
}

criterion_group!(benches, bench_single_session, bench_large_session, bench_long_move);
criterion_main!(benches);
