// ABOUTME: Main library entry point for the Pierre interval metrics engine
// ABOUTME: Slices ride samples by interval bounds and caches per-interval metric values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Interval Engine
//!
//! Computes performance metrics over arbitrary sub-ranges ("intervals") of a
//! recorded activity and caches them per interval.
//!
//! ## Architecture
//!
//! - **Samples**: ordered sensor readings with derived per-sample fields
//! - **Registry**: immutable catalog of metric descriptors and factories
//! - **Engine**: runs every registered metric over a slice in one call
//! - **Interval**: cached metric array with lifecycle and unit-aware lookup
//! - **Store**: owner of a ride and its intervals, the entry point for editors
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pierre_interval_engine::config::EngineConfig;
//! use pierre_interval_engine::engine::MetricComputationEngine;
//! use pierre_interval_engine::interval::{Color, IntervalBounds, IntervalType};
//! use pierre_interval_engine::metrics::standard_registry;
//! use pierre_interval_engine::ride::{Athlete, RideFile, RideItem};
//! use pierre_interval_engine::samples::{Sample, SampleSequence};
//! use pierre_interval_engine::store::IntervalStore;
//!
//! let config = EngineConfig::from_env();
//! let engine = Arc::new(MetricComputationEngine::new(
//!     Arc::new(standard_registry()?),
//!     &config,
//! ));
//!
//! let mut samples = SampleSequence::from_samples(
//!     1.0,
//!     (0..600).map(|t| Sample::new(f64::from(t), f64::from(t) * 0.01).with_power(220.0)),
//! )?;
//! engine.derive_fields(&mut samples);
//!
//! let ride = RideItem::new(Some(RideFile::new(samples)), Arc::new(Athlete::from_env()));
//! let mut store = IntervalStore::new(ride, engine);
//! let index = store.add_interval(
//!     "Effort",
//!     IntervalType::User,
//!     IntervalBounds::from_secs(60.0, 360.0)?,
//!     Color::BLACK,
//! )?;
//!
//! if let Some(interval) = store.interval(index) {
//!     println!("NP: {}", interval.string_for("coggan_np", config.default_units.is_imperial()));
//! }
//! # Ok::<(), pierre_core::errors::AppError>(())
//! ```

/// Engine configuration from environment
pub mod config;

/// Metric computation engine and computator trait
pub mod engine;

/// Interval records and their cached metrics
pub mod interval;

/// Structured logging setup
pub mod logging;

/// Standard metric catalog
pub mod metrics;

/// Metric descriptors and registry
pub mod registry;

/// Ride container, athlete context and saved interval bounds
pub mod ride;

/// Samples and sample sequences
pub mod samples;

/// Owner of a ride and its intervals
pub mod store;

pub use engine::{ComputedMetrics, MetricComputationEngine, MetricComputator};
pub use interval::{IntervalBounds, IntervalRecord, IntervalState, IntervalType};
pub use pierre_core::errors::{AppError, AppResult, ErrorCode};
pub use registry::{MetricDescriptor, MetricRegistry};
pub use samples::{Sample, SampleSequence};
pub use store::IntervalStore;
