// ABOUTME: Shared test utilities and fixtures for interval engine integration tests
// ABOUTME: Provides ride generators, engine construction, and custom test metrics
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `pierre_interval_engine`
//!
//! This module provides common ride and engine setup to reduce duplication
//! across integration tests.

use pierre_core::units::UnitConversion;
use pierre_interval_engine::config::EngineConfig;
use pierre_interval_engine::engine::{ComputeContext, MetricComputationEngine, MetricComputator};
use pierre_interval_engine::metrics::{register_standard_metrics, standard_registry};
use pierre_interval_engine::registry::{MetricDescriptor, MetricRegistry};
use pierre_interval_engine::ride::{Athlete, RideFile, RideItem};
use pierre_interval_engine::samples::{Sample, SampleSequence};
use std::sync::Arc;

/// Sequential engine config so tests are deterministic in their logging order
pub fn sequential_config() -> EngineConfig {
    EngineConfig {
        parallel_metrics: false,
        ..EngineConfig::default()
    }
}

/// Engine over the standard registry
pub fn standard_engine() -> Arc<MetricComputationEngine> {
    Arc::new(MetricComputationEngine::new(
        Arc::new(standard_registry().unwrap()),
        &sequential_config(),
    ))
}

/// Samples at `0..count` seconds, 1 Hz, 10 m per second, constant power and heart rate
pub fn steady_samples(count: u32, watts: f64, bpm: f64) -> SampleSequence {
    SampleSequence::from_samples(
        1.0,
        (0..count).map(|t| {
            Sample::new(f64::from(t), f64::from(t) * 0.01)
                .with_power(watts)
                .with_heart_rate(bpm)
                .with_cadence(90.0)
        }),
    )
    .unwrap()
}

/// Ride item with loaded samples and a default athlete
pub fn loaded_ride(samples: SampleSequence) -> RideItem {
    RideItem::new(Some(RideFile::new(samples)), Arc::new(Athlete::default()))
}

/// Ride item whose data is not loaded
pub fn unloaded_ride() -> RideItem {
    RideItem::new(None, Arc::new(Athlete::default()))
}

/// Computator that always reports the same value
#[derive(Debug, Clone, Copy)]
pub struct ConstantMetric(pub f64);

impl MetricComputator for ConstantMetric {
    fn reset(&mut self) {}

    fn consume(&mut self, _sample: &Sample) {}

    fn value(&self) -> Option<f64> {
        Some(self.0)
    }
}

/// Computator that never has enough data
#[derive(Debug, Clone, Copy)]
pub struct OptOutMetric;

impl MetricComputator for OptOutMetric {
    fn reset(&mut self) {}

    fn consume(&mut self, _sample: &Sample) {}

    fn value(&self) -> Option<f64> {
        None
    }
}

/// Standard registry plus three test metrics:
/// `always_infinite`, `always_nan` and `never_ready`
pub fn engine_with_test_metrics() -> Arc<MetricComputationEngine> {
    let mut builder = MetricRegistry::builder();
    register_standard_metrics(&mut builder).unwrap();
    builder
        .register(
            MetricDescriptor::new("always_infinite", "Infinite").with_conversion(
                UnitConversion::KM_TO_MILES,
                "km",
                "miles",
            ),
            |_: &ComputeContext<'_>| Box::new(ConstantMetric(f64::INFINITY)),
        )
        .unwrap();
    builder
        .register(
            MetricDescriptor::new("always_nan", "Not a number").with_precision(1),
            |_: &ComputeContext<'_>| Box::new(ConstantMetric(f64::NAN)),
        )
        .unwrap();
    builder
        .register(
            MetricDescriptor::new("never_ready", "Never ready"),
            |_: &ComputeContext<'_>| Box::new(OptOutMetric),
        )
        .unwrap();
    Arc::new(MetricComputationEngine::new(
        Arc::new(builder.build()),
        &sequential_config(),
    ))
}

/// Whether two floats agree to within `1e-9`
pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
