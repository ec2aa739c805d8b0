// ABOUTME: Integration tests for the metric registry and computation engine
// ABOUTME: Covers registration errors, opt-outs, non-finite clamping and parallel evaluation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{approx, engine_with_test_metrics, sequential_config, steady_samples, ConstantMetric};
use pierre_core::errors::ErrorCode;
use pierre_core::units::UnitSystem;
use pierre_core::zones::{HeartRateZones, PowerZones};
use pierre_interval_engine::config::EngineConfig;
use pierre_interval_engine::engine::{ComputeContext, MetricComputationEngine};
use pierre_interval_engine::metrics::standard_registry;
use pierre_interval_engine::registry::{format_duration, MetricDescriptor, MetricRegistry};
use std::sync::Arc;

#[test]
fn test_duplicate_symbol_is_rejected() {
    let mut builder = MetricRegistry::builder();
    let first = builder
        .register(MetricDescriptor::new("watts", "Watts"), |_: &ComputeContext<'_>| {
            Box::new(ConstantMetric(1.0))
        })
        .unwrap();
    assert_eq!(first, 0);

    let err = builder
        .register(MetricDescriptor::new("watts", "Watts again"), |_: &ComputeContext<'_>| {
            Box::new(ConstantMetric(2.0))
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(builder.len(), 1);
}

#[test]
fn test_empty_symbol_is_rejected() {
    let mut builder = MetricRegistry::builder();
    let err = builder
        .register(MetricDescriptor::new("", "Nameless"), |_: &ComputeContext<'_>| {
            Box::new(ConstantMetric(1.0))
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(builder.is_empty());
}

#[test]
fn test_registry_indices_follow_registration_order() {
    let registry = standard_registry().unwrap();

    assert_eq!(registry.descriptor("workout_time").unwrap().index(), 0);
    let np = registry.descriptor("coggan_np").unwrap();
    assert_eq!(registry.descriptor_at(np.index()), Some(np));
    assert!(registry.descriptor("no_such_metric").is_none());
}

#[test]
fn test_opted_out_metrics_are_absent() {
    let engine = engine_with_test_metrics();
    let samples = steady_samples(10, 200.0, 140.0);

    let computed = engine.compute(&samples, &PowerZones::default(), &HeartRateZones::default());

    assert!(computed.get("never_ready").is_none());
    // ten seconds is shorter than the normalized power window
    assert!(computed.get("coggan_np").is_none());
    assert!(approx(computed.value("average_power").unwrap(), 200.0));
}

#[test]
fn test_non_finite_results_are_clamped_to_zero() {
    let engine = engine_with_test_metrics();
    let samples = steady_samples(10, 200.0, 140.0);

    let computed = engine.compute(&samples, &PowerZones::default(), &HeartRateZones::default());

    let infinite = computed.get("always_infinite").unwrap();
    assert!(approx(infinite.value(), 0.0));
    assert_eq!(
        infinite.index(),
        engine.registry().descriptor("always_infinite").unwrap().index()
    );
    assert!(approx(computed.value("always_nan").unwrap(), 0.0));
    assert!(computed.iter().all(|(_, metric)| metric.value().is_finite()));
}

#[test]
fn test_parallel_and_sequential_results_match() {
    let registry = Arc::new(standard_registry().unwrap());
    let sequential = MetricComputationEngine::new(Arc::clone(&registry), &sequential_config());
    let parallel = MetricComputationEngine::new(
        registry,
        &EngineConfig {
            parallel_metrics: true,
            ..EngineConfig::default()
        },
    );
    let samples = steady_samples(600, 230.0, 150.0);
    let power_zones = PowerZones::from_ftp(260.0).unwrap();
    let hr_zones = HeartRateZones::default();

    let a = sequential.compute(&samples, &power_zones, &hr_zones);
    let b = parallel.compute(&samples, &power_zones, &hr_zones);

    assert_eq!(a, b);
}

#[test]
fn test_standard_metrics_over_steady_hour() {
    let engine = common::standard_engine();
    let samples = steady_samples(3600, 250.0, 150.0);
    let power_zones = PowerZones::from_ftp(250.0).unwrap();

    let computed = engine.compute(&samples, &power_zones, &HeartRateZones::default());

    assert!(approx(computed.value("workout_time").unwrap(), 3600.0));
    assert!((computed.value("total_distance").unwrap() - 35.99).abs() < 1e-6);
    assert!((computed.value("coggan_np").unwrap() - 250.0).abs() < 1e-6);
    assert!((computed.value("coggan_if").unwrap() - 1.0).abs() < 1e-9);
    assert!((computed.value("coggan_tss").unwrap() - 100.0).abs() < 1e-6);
    assert!(approx(computed.value("total_work").unwrap(), 900.0));
    assert!(approx(computed.value("average_cad").unwrap(), 90.0));
    assert!(approx(computed.value("time_in_zone_L4").unwrap(), 3600.0));
    assert!(approx(computed.value("time_in_zone_L1").unwrap(), 0.0));
    // no altitude or temperature in the recording
    assert!(computed.get("elevation_gain").is_none());
    assert!(computed.get("average_temp").is_none());
}

#[test]
fn test_descriptor_formatting() {
    let registry = standard_registry().unwrap();

    let distance = registry.descriptor("total_distance").unwrap();
    assert_eq!(distance.format_value(10.0, UnitSystem::Metric), "10.00 km");
    assert_eq!(distance.format_value(10.0, UnitSystem::Imperial), "6.21 miles");
    assert_eq!(distance.format_value(f64::NAN, UnitSystem::Metric), "0.00 km");

    let duration = registry.descriptor("workout_time").unwrap();
    assert_eq!(duration.format_value(3725.0, UnitSystem::Imperial), "1:02:05");

    let temperature = registry.descriptor("average_temp").unwrap();
    assert_eq!(temperature.format_value(20.0, UnitSystem::Imperial), "68.0 F");
}

#[test]
fn test_format_duration_edges() {
    assert_eq!(format_duration(0.0), "0:00:00");
    assert_eq!(format_duration(59.6), "0:01:00");
    assert_eq!(format_duration(-5.0), "0:00:00");
    assert_eq!(format_duration(f64::INFINITY), "0:00:00");
}
