// ABOUTME: Owner of one ride and its interval records, exposing the entry points editors call
// ABOUTME: Validates edits, keeps saved bounds in step with user intervals, and refreshes caches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Interval Store
//!
//! The store is the single owner of a [`RideItem`] and its
//! [`IntervalRecord`]s. Editors never touch records and the ride at the same
//! time themselves; they call the store, which passes the ride into each
//! record operation.

use crate::engine::MetricComputationEngine;
use crate::interval::{Color, IntervalBounds, IntervalRecord, IntervalType};
use crate::ride::{RideFileInterval, RideItem};
use crate::samples::SampleSequence;
use pierre_core::errors::{AppError, AppResult};
use std::sync::Arc;
use tracing::{debug, info};

/// One ride and the intervals defined over it
#[derive(Debug)]
pub struct IntervalStore {
    ride: RideItem,
    engine: Arc<MetricComputationEngine>,
    intervals: Vec<IntervalRecord>,
}

impl IntervalStore {
    /// Create a store with no intervals
    #[must_use]
    pub fn new(ride: RideItem, engine: Arc<MetricComputationEngine>) -> Self {
        Self {
            ride,
            engine,
            intervals: Vec::new(),
        }
    }

    /// The ride
    #[must_use]
    pub const fn ride(&self) -> &RideItem {
        &self.ride
    }

    /// Mutable ride, e.g. to clear the dirty flag after saving
    pub fn ride_mut(&mut self) -> &mut RideItem {
        &mut self.ride
    }

    /// Engine shared by every record
    #[must_use]
    pub const fn engine(&self) -> &Arc<MetricComputationEngine> {
        &self.engine
    }

    /// Records in display order
    #[must_use]
    pub fn intervals(&self) -> &[IntervalRecord] {
        &self.intervals
    }

    /// Record at `index`
    #[must_use]
    pub fn interval(&self, index: usize) -> Option<&IntervalRecord> {
        self.intervals.get(index)
    }

    /// Mutable record at `index`, for presentation fields
    pub fn interval_mut(&mut self, index: usize) -> Option<&mut IntervalRecord> {
        self.intervals.get_mut(index)
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether the store has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Add an interval, compute its metrics, and return its index
    ///
    /// User intervals on a loaded ride are also saved to the ride file, which
    /// marks the ride dirty.
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds are invalid
    pub fn add_interval(
        &mut self,
        name: impl Into<String>,
        kind: IntervalType,
        bounds: IntervalBounds,
        color: Color,
    ) -> AppResult<usize> {
        bounds.validate()?;
        let index = self.intervals.len();
        let mut record =
            IntervalRecord::new(Arc::clone(&self.engine), name, kind, bounds, index, color);

        if kind.is_user_defined() {
            if let Some(file) = self.ride.ride_mut() {
                let key = file.add_interval(RideFileInterval {
                    name: record.name().to_owned(),
                    start: bounds.start(),
                    stop: bounds.stop(),
                    kind,
                });
                record.link_persisted(key);
                self.ride.set_dirty(true);
            }
        }

        record.refresh(&self.ride);
        debug!(index, name = record.name(), %kind, "Interval added");
        self.intervals.push(record);
        Ok(index)
    }

    /// Edit an interval's name and bounds, then refresh it
    ///
    /// # Errors
    ///
    /// Returns an error if the index is unknown or the bounds are invalid
    pub fn set_interval_bounds(
        &mut self,
        index: usize,
        name: impl Into<String>,
        start: f64,
        stop: f64,
        start_km: f64,
        stop_km: f64,
    ) -> AppResult<()> {
        let bounds = IntervalBounds::new(start, stop, start_km, stop_km)?;
        let record = self
            .intervals
            .get_mut(index)
            .ok_or_else(|| interval_not_found(index))?;
        record.set_bounds(&mut self.ride, name, bounds);
        Ok(())
    }

    /// Rename one interval
    ///
    /// # Errors
    ///
    /// Returns an error if the index is unknown
    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> AppResult<()> {
        let record = self
            .intervals
            .get_mut(index)
            .ok_or_else(|| interval_not_found(index))?;
        record.rename(&mut self.ride, name);
        Ok(())
    }

    /// Rename every selected interval to `"{name} {n}"`, numbering from 1 in
    /// display order, and return how many were renamed
    pub fn rename_selected(&mut self, name: &str) -> usize {
        let mut renamed = 0;
        for record in self.intervals.iter_mut().filter(|record| record.selected) {
            renamed += 1;
            record.rename(&mut self.ride, format!("{name} {renamed}"));
        }
        debug!(renamed, "Renamed selected intervals");
        renamed
    }

    /// Refresh every record and return how many were recomputed
    pub fn refresh_all(&mut self) -> usize {
        let refreshed = self
            .intervals
            .iter_mut()
            .map(|record| record.refresh(&self.ride))
            .filter(|done| *done)
            .count();
        info!(
            refreshed,
            total = self.intervals.len(),
            "Refreshed intervals"
        );
        refreshed
    }

    /// Remove an interval and its saved bound, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the index is unknown
    pub fn remove_interval(&mut self, index: usize) -> AppResult<IntervalRecord> {
        if index >= self.intervals.len() {
            return Err(interval_not_found(index));
        }
        let mut record = self.intervals.remove(index);

        if let Some(key) = record.unlink_persisted() {
            if let Some(file) = self.ride.ride_mut() {
                if file.remove_interval(key).is_ok() {
                    self.ride.set_dirty(true);
                }
            }
        }

        for (position, remaining) in self.intervals.iter_mut().enumerate().skip(index) {
            remaining.display_sequence = position;
        }
        Ok(record)
    }

    /// Append an unlinked, unselected copy of an interval and return its index
    ///
    /// # Errors
    ///
    /// Returns an error if the index is unknown
    pub fn duplicate_interval(&mut self, index: usize) -> AppResult<usize> {
        let source = self
            .intervals
            .get(index)
            .ok_or_else(|| interval_not_found(index))?;
        let mut copy = IntervalRecord::unpopulated(Arc::clone(&self.engine));
        copy.set_from(source);
        let new_index = self.intervals.len();
        copy.display_sequence = new_index;
        self.intervals.push(copy);
        Ok(new_index)
    }

    /// Replace the ride's samples, recompute derived fields, and refresh
    /// every interval
    ///
    /// # Errors
    ///
    /// Returns an error if the ride has no loaded file
    pub fn replace_samples(&mut self, mut samples: SampleSequence) -> AppResult<usize> {
        let file = self
            .ride
            .ride_mut()
            .ok_or_else(|| AppError::not_found("ride file"))?;
        self.engine.derive_fields(&mut samples);
        *file.samples_mut() = samples;

        for record in &mut self.intervals {
            record.mark_stale();
        }
        Ok(self.refresh_all())
    }
}

fn interval_not_found(index: usize) -> AppError {
    AppError::not_found(format!("interval {index}"))
}
