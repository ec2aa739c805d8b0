// ABOUTME: Ride container handed to interval records: samples, persisted bounds, athlete context
// ABOUTME: Persisted interval bounds are addressed by stable handles rather than references
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Ride Model
//!
//! A [`RideItem`] is the in-memory activity an interval belongs to. It may or
//! may not have its sample data loaded ([`RideFile`]); when it does, the file
//! also holds the interval bounds that are saved with the activity.
//!
//! Records refer to a saved bound through an [`IntervalBoundKey`]. Removing a
//! saved bound leaves a tombstone so that keys held by other records never
//! alias a different bound.

use crate::interval::IntervalType;
use crate::samples::SampleSequence;
use pierre_core::errors::{AppError, AppResult};
use pierre_core::zones::{HeartRateZones, PowerZones};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tracing::debug;

/// Athlete context: training zones used by zone-relative metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    /// Display name
    pub name: String,
    /// Power zones
    pub power_zones: PowerZones,
    /// Heart rate zones
    pub hr_zones: HeartRateZones,
}

impl Athlete {
    /// Create an athlete with explicit zones
    #[must_use]
    pub fn new(name: impl Into<String>, power_zones: PowerZones, hr_zones: HeartRateZones) -> Self {
        Self {
            name: name.into(),
            power_zones,
            hr_zones,
        }
    }

    /// Load zones from the `ATHLETE_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            name: env::var("ATHLETE_NAME").unwrap_or_default(),
            power_zones: PowerZones::from_env(),
            hr_zones: HeartRateZones::from_env(),
        }
    }
}

/// Interval bound saved with the activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideFileInterval {
    /// Interval name
    pub name: String,
    /// Start offset (s)
    pub start: f64,
    /// Stop offset (s)
    pub stop: f64,
    /// Interval type tag
    pub kind: IntervalType,
}

/// Stable handle to a [`RideFileInterval`] inside a [`RideFile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalBoundKey(usize);

/// Loaded activity data: samples plus the saved interval bounds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RideFile {
    samples: SampleSequence,
    intervals: Vec<Option<RideFileInterval>>,
}

impl RideFile {
    /// Wrap a sample sequence with no saved intervals
    #[must_use]
    pub fn new(samples: SampleSequence) -> Self {
        Self {
            samples,
            intervals: Vec::new(),
        }
    }

    /// Sample data
    #[must_use]
    pub const fn samples(&self) -> &SampleSequence {
        &self.samples
    }

    /// Mutable sample data
    pub fn samples_mut(&mut self) -> &mut SampleSequence {
        &mut self.samples
    }

    /// Recording interval of the samples (s)
    #[must_use]
    pub const fn recording_interval(&self) -> f64 {
        self.samples.recording_interval()
    }

    /// Whether the file holds any samples
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Save a new interval bound and return its handle
    pub fn add_interval(&mut self, interval: RideFileInterval) -> IntervalBoundKey {
        self.intervals.push(Some(interval));
        IntervalBoundKey(self.intervals.len() - 1)
    }

    /// Saved bound behind `key`, if it still exists
    #[must_use]
    pub fn interval(&self, key: IntervalBoundKey) -> Option<&RideFileInterval> {
        self.intervals.get(key.0).and_then(Option::as_ref)
    }

    /// Mutable saved bound behind `key`, if it still exists
    pub fn interval_mut(&mut self, key: IntervalBoundKey) -> Option<&mut RideFileInterval> {
        self.intervals.get_mut(key.0).and_then(Option::as_mut)
    }

    /// Remove the saved bound behind `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the bound does not exist or was already removed
    pub fn remove_interval(&mut self, key: IntervalBoundKey) -> AppResult<RideFileInterval> {
        self.intervals
            .get_mut(key.0)
            .and_then(Option::take)
            .ok_or_else(|| AppError::not_found(format!("interval bound {}", key.0)))
    }

    /// Saved bounds still present, in insertion order
    pub fn intervals(&self) -> impl Iterator<Item = (IntervalBoundKey, &RideFileInterval)> {
        self.intervals
            .iter()
            .enumerate()
            .filter_map(|(slot, interval)| interval.as_ref().map(|i| (IntervalBoundKey(slot), i)))
    }
}

/// An activity as seen by interval records
#[derive(Debug, Clone)]
pub struct RideItem {
    ride: Option<RideFile>,
    athlete: Arc<Athlete>,
    dirty: bool,
}

impl RideItem {
    /// Create a ride item, optionally with loaded data
    #[must_use]
    pub fn new(ride: Option<RideFile>, athlete: Arc<Athlete>) -> Self {
        Self {
            ride,
            athlete,
            dirty: false,
        }
    }

    /// Loaded ride data
    #[must_use]
    pub const fn ride(&self) -> Option<&RideFile> {
        self.ride.as_ref()
    }

    /// Mutable loaded ride data
    pub fn ride_mut(&mut self) -> Option<&mut RideFile> {
        self.ride.as_mut()
    }

    /// Sample data, present only when the ride is loaded and non-empty
    #[must_use]
    pub fn samples(&self) -> Option<&SampleSequence> {
        self.ride
            .as_ref()
            .filter(|ride| ride.has_data())
            .map(RideFile::samples)
    }

    /// Athlete context
    #[must_use]
    pub const fn athlete(&self) -> &Arc<Athlete> {
        &self.athlete
    }

    /// Whether unsaved changes exist
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flag or clear unsaved changes
    pub fn set_dirty(&mut self, dirty: bool) {
        if dirty && !self.dirty {
            debug!("Ride marked dirty");
        }
        self.dirty = dirty;
    }
}
