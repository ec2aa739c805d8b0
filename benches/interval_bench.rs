// ABOUTME: Criterion benchmarks for interval refresh and raw engine computation
// ABOUTME: Compares sequential and rayon-parallel metric evaluation over ride slices
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for interval metric computation.
//!
//! Measures slicing, a full engine pass, and refreshing a store of intervals
//! for rides of different lengths.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

mod common;

use common::fixtures::{generate_ride, standard_engine, RideLength};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pierre_interval_engine::interval::{Color, IntervalBounds, IntervalType};
use pierre_interval_engine::ride::{Athlete, RideFile, RideItem};
use pierre_interval_engine::store::IntervalStore;
use std::sync::Arc;

/// Benchmark slicing a 20 minute window out of a ride
fn bench_slice(c: &mut Criterion) {
    let engine = standard_engine(false);
    let mut group = c.benchmark_group("slice");

    for length in [RideLength::Hour, RideLength::Long] {
        let ride = generate_ride(length, &engine);
        group.bench_with_input(BenchmarkId::from_parameter(length.name()), &ride, |b, ride| {
            b.iter(|| ride.slice(black_box(600.0), black_box(1800.0)));
        });
    }
    group.finish();
}

/// Benchmark one engine pass over a whole ride, sequential vs parallel
fn bench_compute(c: &mut Criterion) {
    let athlete = Athlete::default();
    let mut group = c.benchmark_group("compute");

    for parallel in [false, true] {
        let engine = standard_engine(parallel);
        let label = if parallel { "parallel" } else { "sequential" };
        for length in [RideLength::Hour, RideLength::Long] {
            let ride = generate_ride(length, &engine);
            group.throughput(Throughput::Elements(u64::from(length.seconds())));
            group.bench_with_input(BenchmarkId::new(label, length.name()), &ride, |b, ride| {
                b.iter(|| engine.compute(black_box(ride), &athlete.power_zones, &athlete.hr_zones));
            });
        }
    }
    group.finish();
}

/// Benchmark refreshing a store holding one interval per 10 minutes of ride
fn bench_refresh_all(c: &mut Criterion) {
    let engine = standard_engine(true);
    let mut group = c.benchmark_group("refresh_all");
    group.sample_size(20);

    for length in [RideLength::Hour, RideLength::Long] {
        let samples = generate_ride(length, &engine);
        let ride = RideItem::new(Some(RideFile::new(samples)), Arc::new(Athlete::default()));
        let mut store = IntervalStore::new(ride, Arc::clone(&engine));
        for start in (0..length.seconds()).step_by(600) {
            let bounds =
                IntervalBounds::from_secs(f64::from(start), f64::from(start + 600)).unwrap();
            store
                .add_interval("Block", IntervalType::Lap, bounds, Color::BLACK)
                .unwrap();
        }

        group.bench_function(BenchmarkId::from_parameter(length.name()), |b| {
            b.iter(|| black_box(store.refresh_all()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_slice, bench_compute, bench_refresh_all);
criterion_main!(benches);
