// ABOUTME: Named, bounded region of a ride caching one value per registered metric
// ABOUTME: Handles refresh from sample slices, bound write-through, and unit-aware lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Interval Records
//!
//! An [`IntervalRecord`] caches a dense array of metric values, one slot per
//! registry index, for a time range of its ride. The cache never holds NaN or
//! infinity: every write passes through [`sanitize`].
//!
//! Records do not own their ride. Operations that need the samples or the
//! saved interval bounds take the [`RideItem`] as a parameter, and the link to
//! a saved bound is an [`IntervalBoundKey`] resolved on each use.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized -> Populated -> Stale -> Refreshed -> Stale -> ...
//! ```
//!
//! A refresh that finds no samples, or whose slice is empty, changes nothing:
//! the cached values and the state stay as they were.

use crate::engine::{sanitize, MetricComputationEngine};
use crate::registry::{MetricDescriptor, PLACEHOLDER};
use crate::ride::{IntervalBoundKey, RideFileInterval, RideItem};
use pierre_core::errors::{AppError, AppResult};
use pierre_core::units::UnitSystem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Origin of an interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalType {
    /// Drawn or edited by the athlete; the only type whose bounds are saved back
    #[default]
    User,
    /// Device lap
    Lap,
    /// Best effort over a fixed duration
    Peak,
    /// Detected climb
    Climb,
    /// Detected sustained effort
    Effort,
    /// Continuous time in a single zone
    Zone,
}

impl IntervalType {
    /// Whether edits to this interval are written back to the ride file
    #[must_use]
    pub const fn is_user_defined(self) -> bool {
        matches!(self, Self::User)
    }
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::User => "user",
            Self::Lap => "lap",
            Self::Peak => "peak",
            Self::Climb => "climb",
            Self::Effort => "effort",
            Self::Zone => "zone",
        };
        f.write_str(label)
    }
}

/// RGB display color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Color {
    /// Black, the default for new intervals
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create a color from its components
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Lifecycle state of an interval's cached values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalState {
    /// Default-constructed, no bounds assigned yet
    #[default]
    Uninitialized,
    /// Constructed with bounds; cache not computed yet
    Populated,
    /// Bounds or samples changed since the last refresh
    Stale,
    /// Cache matches the current bounds and samples
    Refreshed,
}

/// Time and distance range of an interval
///
/// Only built through [`IntervalBounds::new`] or [`IntervalBounds::from_secs`],
/// so every value is finite and each start is at or before its stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IntervalBounds {
    start: f64,
    stop: f64,
    start_km: f64,
    stop_km: f64,
}

impl IntervalBounds {
    /// Create bounds, validating their order
    ///
    /// # Errors
    ///
    /// Returns an error if any value is not finite or a start exceeds its stop
    pub fn new(start: f64, stop: f64, start_km: f64, stop_km: f64) -> AppResult<Self> {
        let bounds = Self {
            start,
            stop,
            start_km,
            stop_km,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Time-only bounds with zero distance
    ///
    /// # Errors
    ///
    /// Returns an error if the times are not finite or `start > stop`
    pub fn from_secs(start: f64, stop: f64) -> AppResult<Self> {
        Self::new(start, stop, 0.0, 0.0)
    }

    /// Check ordering and finiteness
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violation
    pub fn validate(&self) -> AppResult<()> {
        let values = [self.start, self.stop, self.start_km, self.stop_km];
        if values.iter().any(|value| !value.is_finite()) {
            return Err(AppError::invalid_input("interval bounds must be finite"));
        }
        if self.start > self.stop {
            return Err(AppError::out_of_range(format!(
                "interval start {}s is after stop {}s",
                self.start, self.stop
            )));
        }
        if self.start_km > self.stop_km {
            return Err(AppError::out_of_range(format!(
                "interval start {}km is after stop {}km",
                self.start_km, self.stop_km
            )));
        }
        Ok(())
    }

    /// Start offset (s)
    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    /// Stop offset (s)
    #[must_use]
    pub const fn stop(&self) -> f64 {
        self.stop
    }

    /// Distance at start (km)
    #[must_use]
    pub const fn start_km(&self) -> f64 {
        self.start_km
    }

    /// Distance at stop (km)
    #[must_use]
    pub const fn stop_km(&self) -> f64 {
        self.stop_km
    }

    /// Length in seconds
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }
}

/// A named, bounded region of a ride with cached metric values
#[derive(Debug, Clone)]
pub struct IntervalRecord {
    engine: Arc<MetricComputationEngine>,
    name: String,
    kind: IntervalType,
    bounds: IntervalBounds,
    metrics: Vec<f64>,
    persisted: Option<IntervalBoundKey>,
    state: IntervalState,
    /// Display color
    pub color: Color,
    /// Position in the interval list
    pub display_sequence: usize,
    /// Whether the interval is selected in the host's list
    pub selected: bool,
}

impl IntervalRecord {
    /// Create a record with explicit bounds; its cache starts at zero
    #[must_use]
    pub fn new(
        engine: Arc<MetricComputationEngine>,
        name: impl Into<String>,
        kind: IntervalType,
        bounds: IntervalBounds,
        display_sequence: usize,
        color: Color,
    ) -> Self {
        let metric_count = engine.registry().metric_count();
        Self {
            engine,
            name: name.into(),
            kind,
            bounds,
            metrics: vec![0.0; metric_count],
            persisted: None,
            state: IntervalState::Populated,
            color,
            display_sequence,
            selected: false,
        }
    }

    /// Create an empty user interval to be populated later
    #[must_use]
    pub fn unpopulated(engine: Arc<MetricComputationEngine>) -> Self {
        let mut record = Self::new(
            engine,
            String::new(),
            IntervalType::User,
            IntervalBounds::default(),
            0,
            Color::BLACK,
        );
        record.state = IntervalState::Uninitialized;
        record
    }

    /// Interval name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interval type
    #[must_use]
    pub const fn kind(&self) -> IntervalType {
        self.kind
    }

    /// Current bounds
    #[must_use]
    pub const fn bounds(&self) -> IntervalBounds {
        self.bounds
    }

    /// Lifecycle state
    #[must_use]
    pub const fn state(&self) -> IntervalState {
        self.state
    }

    /// Cached values in registry index order
    #[must_use]
    pub fn metrics(&self) -> &[f64] {
        &self.metrics
    }

    /// Engine used to refresh this record
    #[must_use]
    pub const fn engine(&self) -> &Arc<MetricComputationEngine> {
        &self.engine
    }

    /// Handle of the saved bound this record writes through to
    #[must_use]
    pub const fn persisted_bound(&self) -> Option<IntervalBoundKey> {
        self.persisted
    }

    /// Link this record to a saved bound
    pub fn link_persisted(&mut self, key: IntervalBoundKey) {
        self.persisted = Some(key);
    }

    /// Drop the link to the saved bound
    pub fn unlink_persisted(&mut self) -> Option<IntervalBoundKey> {
        self.persisted.take()
    }

    /// Mark the cache out of date, e.g. after the ride's samples changed
    pub fn mark_stale(&mut self) {
        if self.state != IntervalState::Uninitialized {
            self.state = IntervalState::Stale;
        }
    }

    /// Change the name
    ///
    /// Linked user intervals also rename their saved bound and mark the ride
    /// dirty.
    pub fn rename(&mut self, ride: &mut RideItem, name: impl Into<String>) {
        self.name = name.into();
        if let Some(saved) = self.write_through_target(ride) {
            saved.name.clone_from(&self.name);
            ride.set_dirty(true);
        }
    }

    /// Replace name and bounds, then refresh
    ///
    /// For a user interval linked to a saved bound, the start and stop times
    /// are also written to the saved bound and the ride is marked dirty.
    /// Distance bounds stay in memory only.
    pub fn set_bounds(
        &mut self,
        ride: &mut RideItem,
        name: impl Into<String>,
        bounds: IntervalBounds,
    ) {
        self.name = name.into();
        self.bounds = bounds;

        if let Some(saved) = self.write_through_target(ride) {
            saved.start = bounds.start();
            saved.stop = bounds.stop();
            ride.set_dirty(true);
        }

        self.state = IntervalState::Stale;
        self.refresh(ride);
    }

    /// Recompute the cache from the ride's samples
    ///
    /// Returns whether the cache was recomputed. Without sample data, or when
    /// the bounds select no samples, the record is left untouched.
    pub fn refresh(&mut self, ride: &RideItem) -> bool {
        let Some(samples) = ride.samples() else {
            debug!(interval = %self.name, "No sample data, refresh skipped");
            return false;
        };
        let Some(slice) = samples.slice(self.bounds.start, self.bounds.stop) else {
            debug!(
                interval = %self.name,
                start = self.bounds.start,
                stop = self.bounds.stop,
                "Empty slice, refresh skipped"
            );
            return false;
        };

        let athlete = ride.athlete();
        let computed = self
            .engine
            .compute(&slice, &athlete.power_zones, &athlete.hr_zones);

        self.metrics.fill(0.0);
        for (_, metric) in &computed {
            self.store_value(metric.index(), metric.value());
        }
        self.state = IntervalState::Refreshed;

        trace!(
            interval = %self.name,
            samples = slice.len(),
            computed = computed.len(),
            "Interval refreshed"
        );
        true
    }

    /// Write a value into a cache slot, replacing non-finite values with zero
    ///
    /// Out-of-range indices are ignored.
    pub fn store_value(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.metrics.get_mut(index) {
            *slot = sanitize(value);
        }
    }

    /// Cached value for `symbol`, converted to imperial when requested
    ///
    /// Unknown symbols read as zero.
    #[must_use]
    pub fn value_for(&self, symbol: &str, imperial: bool) -> f64 {
        let Some((descriptor, value)) = self.lookup(symbol) else {
            return 0.0;
        };
        descriptor.convert(value, UnitSystem::from_imperial_flag(imperial))
    }

    /// Formatted value for `symbol`, with its unit suffix
    ///
    /// Unknown symbols render as the placeholder dash.
    #[must_use]
    pub fn string_for(&self, symbol: &str, imperial: bool) -> String {
        let Some((descriptor, value)) = self.lookup(symbol) else {
            return PLACEHOLDER.to_owned();
        };
        descriptor.format_value(value, UnitSystem::from_imperial_flag(imperial))
    }

    /// Copy every field of `other` except the saved-bound link and selection
    pub fn set_from(&mut self, other: &Self) {
        self.clone_from(other);
        self.persisted = None;
        self.selected = false;
    }

    fn lookup(&self, symbol: &str) -> Option<(&MetricDescriptor, f64)> {
        let Some(descriptor) = self.engine.registry().descriptor(symbol) else {
            trace!(symbol, "Unknown metric symbol");
            return None;
        };
        let value = self.metrics.get(descriptor.index()).copied().unwrap_or(0.0);
        Some((descriptor, sanitize(value)))
    }

    fn write_through_target<'r>(
        &self,
        ride: &'r mut RideItem,
    ) -> Option<&'r mut RideFileInterval> {
        if !self.kind.is_user_defined() {
            return None;
        }
        let key = self.persisted?;
        ride.ride_mut()?.interval_mut(key)
    }
}

impl PartialEq for IntervalRecord {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.engine, &other.engine)
            && self.name == other.name
            && self.kind == other.kind
            && self.bounds == other.bounds
            && self.metrics == other.metrics
            && self.persisted == other.persisted
            && self.state == other.state
            && self.color == other.color
            && self.display_sequence == other.display_sequence
            && self.selected == other.selected
    }
}
