// ABOUTME: Benchmark fixtures generating deterministic ride recordings
// ABOUTME: Produces power, heart rate, cadence and altitude streams of configurable length
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Benchmark fixtures for generating realistic ride data.
//!
//! Data is deterministic so that runs are comparable.

use pierre_interval_engine::config::EngineConfig;
use pierre_interval_engine::engine::MetricComputationEngine;
use pierre_interval_engine::metrics::standard_registry;
use pierre_interval_engine::samples::{Sample, SampleSequence};
use std::sync::Arc;

/// Predefined ride lengths for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum RideLength {
    /// One hour at 1 Hz
    Hour,
    /// Five hours at 1 Hz
    Long,
}

impl RideLength {
    #[must_use]
    pub const fn seconds(self) -> u32 {
        match self {
            Self::Hour => 3_600,
            Self::Long => 18_000,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hour => "1h",
            Self::Long => "5h",
        }
    }
}

/// Generate a 1 Hz ride with derived fields already computed
#[must_use]
pub fn generate_ride(length: RideLength, engine: &MetricComputationEngine) -> SampleSequence {
    let samples = (0..length.seconds()).map(|t| {
        let secs = f64::from(t);
        // 4 minute surges on top of an endurance base
        let surge = if (t / 240) % 3 == 2 { 120.0 } else { 0.0 };
        let watts = 30.0f64.mul_add((secs / 45.0).sin(), 190.0) + surge;
        Sample::new(secs, secs * 0.009)
            .with_power(watts)
            .with_heart_rate(140.0 + surge / 8.0 + 5.0 * (secs / 300.0).sin())
            .with_cadence(88.0)
            .with_altitude(200.0 + 50.0 * (secs / 900.0).sin())
            .with_speed(32.4)
    });

    let mut sequence = SampleSequence::from_samples(1.0, samples).unwrap();
    engine.derive_fields(&mut sequence);
    sequence
}

/// Engine over the standard registry
#[must_use]
pub fn standard_engine(parallel: bool) -> Arc<MetricComputationEngine> {
    let config = EngineConfig {
        parallel_metrics: parallel,
        ..EngineConfig::default()
    };
    let registry = Arc::new(standard_registry().unwrap());
    Arc::new(MetricComputationEngine::new(registry, &config))
}
