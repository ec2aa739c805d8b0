// ABOUTME: Runs every registered metric computator over a sample slice in a single call
// ABOUTME: Defines the computator capability trait and the per-call result mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Metric Computation Engine
//!
//! The engine owns nothing mutable. Each [`MetricComputationEngine::compute`]
//! call instantiates a fresh computator per registered metric, drives it through
//! `reset` / `consume` / `finalize`, and collects the values into a
//! [`ComputedMetrics`] map built for that call alone. Because no computator
//! outlives its call, computations over different slices can run concurrently
//! against the same engine.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pierre_core::zones::{HeartRateZones, PowerZones};
//! use pierre_interval_engine::config::EngineConfig;
//! use pierre_interval_engine::engine::MetricComputationEngine;
//! use pierre_interval_engine::metrics::standard_registry;
//! use pierre_interval_engine::samples::{Sample, SampleSequence};
//!
//! let registry = Arc::new(standard_registry()?);
//! let engine = MetricComputationEngine::new(registry, &EngineConfig::default());
//! let samples = SampleSequence::from_samples(
//!     1.0,
//!     (0..60).map(|t| Sample::new(f64::from(t), 0.0).with_power(200.0)),
//! )?;
//! let metrics = engine.compute(&samples, &PowerZones::default(), &HeartRateZones::default());
//! println!("average power: {:?}", metrics.value("average_power"));
//! # Ok::<(), pierre_core::errors::AppError>(())
//! ```

use crate::config::EngineConfig;
use crate::registry::{MetricFactory, MetricRegistry};
use crate::samples::{Sample, SampleSequence};
use pierre_core::zones::{HeartRateZones, PowerZones};
use rayon::prelude::*;
use std::collections::hash_map::Iter;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Capability shared by every metric computator.
///
/// A computator is created for one engine call, reset, fed every sample of the
/// slice in time order, finalized, and then asked for its value.
pub trait MetricComputator {
    /// Clear accumulated state
    fn reset(&mut self);

    /// Accumulate one sample
    fn consume(&mut self, sample: &Sample);

    /// Called once after the last sample
    fn finalize(&mut self) {}

    /// Final value in metric units, or `None` when the slice lacks the data
    /// this metric needs
    fn value(&self) -> Option<f64>;
}

/// Read-only inputs shared by every computator of one engine call
#[derive(Debug, Clone, Copy)]
pub struct ComputeContext<'a> {
    /// Recording interval of the slice (s)
    pub recording_interval: f64,
    /// Athlete power zones
    pub power_zones: &'a PowerZones,
    /// Athlete heart rate zones
    pub hr_zones: &'a HeartRateZones,
    /// Normalized power rolling window (s)
    pub np_window_secs: u32,
    /// xPower smoothing window (s)
    pub xpower_window_secs: u32,
}

/// One computed value and the registry index it belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedMetric {
    index: usize,
    value: f64,
}

impl ComputedMetric {
    /// Registry index of the metric
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Finite value in metric units
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }
}

/// Symbol to value mapping produced by one engine call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedMetrics {
    values: HashMap<String, ComputedMetric>,
}

impl ComputedMetrics {
    /// Computed metric for `symbol`, absent when the computator opted out
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&ComputedMetric> {
        self.values.get(symbol)
    }

    /// Value for `symbol`
    #[must_use]
    pub fn value(&self, symbol: &str) -> Option<f64> {
        self.values.get(symbol).map(ComputedMetric::value)
    }

    /// Number of metrics that produced a value
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no metric produced a value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(symbol, metric)` pairs in arbitrary order
    pub fn iter(&self) -> Iter<'_, String, ComputedMetric> {
        self.values.iter()
    }
}

impl<'a> IntoIterator for &'a ComputedMetrics {
    type Item = (&'a String, &'a ComputedMetric);
    type IntoIter = Iter<'a, String, ComputedMetric>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Replace NaN and infinities with zero
#[must_use]
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Computes the full registered metric set over a slice
#[derive(Debug, Clone)]
pub struct MetricComputationEngine {
    registry: Arc<MetricRegistry>,
    np_window_secs: u32,
    xpower_window_secs: u32,
    parallel: bool,
}

impl MetricComputationEngine {
    /// Create an engine over a frozen registry
    #[must_use]
    pub fn new(registry: Arc<MetricRegistry>, config: &EngineConfig) -> Self {
        Self {
            registry,
            np_window_secs: config.np_window_secs,
            xpower_window_secs: config.xpower_window_secs,
            parallel: config.parallel_metrics,
        }
    }

    /// Registry this engine evaluates
    #[must_use]
    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    /// Compute a ride's derived fields with this engine's algorithm windows
    pub fn derive_fields(&self, samples: &mut SampleSequence) {
        samples.derive_fields(self.np_window_secs, self.xpower_window_secs);
    }

    /// Run every registered metric over `slice`
    ///
    /// Metrics whose computator returns `None` are absent from the result.
    /// Non-finite values are stored as zero.
    #[must_use]
    pub fn compute(
        &self,
        slice: &SampleSequence,
        power_zones: &PowerZones,
        hr_zones: &HeartRateZones,
    ) -> ComputedMetrics {
        let context = ComputeContext {
            recording_interval: slice.recording_interval(),
            power_zones,
            hr_zones,
            np_window_secs: self.np_window_secs,
            xpower_window_secs: self.xpower_window_secs,
        };

        let run = |index: usize| self.run_metric(index, &context, slice);
        let count = self.registry.metric_count();
        let values: HashMap<String, ComputedMetric> = if self.parallel {
            (0..count).into_par_iter().filter_map(run).collect()
        } else {
            (0..count).filter_map(run).collect()
        };

        debug!(
            samples = slice.len(),
            registered = count,
            computed = values.len(),
            "Computed interval metrics"
        );

        ComputedMetrics { values }
    }

    fn run_metric(
        &self,
        index: usize,
        context: &ComputeContext<'_>,
        slice: &SampleSequence,
    ) -> Option<(String, ComputedMetric)> {
        let descriptor = self.registry.descriptor_at(index)?;
        let factory: &MetricFactory = self.registry.factory_at(index)?;

        let mut computator = factory(context);
        computator.reset();
        for sample in slice {
            computator.consume(sample);
        }
        computator.finalize();

        let raw = computator.value()?;
        if !raw.is_finite() {
            debug!(
                symbol = descriptor.symbol(),
                value = raw,
                "Non-finite metric value clamped to zero"
            );
        }

        Some((
            descriptor.symbol().to_owned(),
            ComputedMetric {
                index,
                value: sanitize(raw),
            },
        ))
    }
}
