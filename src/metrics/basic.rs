// ABOUTME: Duration, distance, speed and elevation computators over a sample slice
// ABOUTME: Values are produced in metric units and converted by the descriptor on read
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::engine::MetricComputator;
use crate::samples::{reading, Sample};
use pierre_core::constants::time::SECONDS_PER_HOUR;

/// Elapsed time covered by the slice (s)
///
/// Each sample accounts for one recording interval, so a single-sample slice
/// lasts one interval rather than zero.
#[derive(Debug, Clone)]
pub struct WorkoutTime {
    recording_interval: f64,
    first: Option<f64>,
    last: Option<f64>,
}

impl WorkoutTime {
    /// Create for a slice recorded at `recording_interval`
    #[must_use]
    pub const fn new(recording_interval: f64) -> Self {
        Self {
            recording_interval,
            first: None,
            last: None,
        }
    }
}

impl MetricComputator for WorkoutTime {
    fn reset(&mut self) {
        self.first = None;
        self.last = None;
    }

    fn consume(&mut self, sample: &Sample) {
        if self.first.is_none() {
            self.first = Some(sample.secs);
        }
        self.last = Some(sample.secs);
    }

    fn value(&self) -> Option<f64> {
        let (first, last) = (self.first?, self.last?);
        Some(last - first + self.recording_interval)
    }
}

/// Distance covered by the slice (km)
#[derive(Debug, Clone, Default)]
pub struct TotalDistance {
    first: Option<f64>,
    last: Option<f64>,
}

impl MetricComputator for TotalDistance {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn consume(&mut self, sample: &Sample) {
        if let Some(km) = reading(sample.km) {
            if self.first.is_none() {
                self.first = Some(km);
            }
            self.last = Some(km);
        }
    }

    fn value(&self) -> Option<f64> {
        Some((self.last? - self.first?).max(0.0))
    }
}

/// Mean speed over the slice (km/h)
///
/// Uses the speed channel when present; otherwise derives speed from distance
/// over moving time.
#[derive(Debug, Clone)]
pub struct AverageSpeed {
    recording_interval: f64,
    speed_sum: f64,
    speed_count: u32,
    distance: TotalDistance,
    samples: u32,
}

impl AverageSpeed {
    /// Create for a slice recorded at `recording_interval`
    #[must_use]
    pub fn new(recording_interval: f64) -> Self {
        Self {
            recording_interval,
            speed_sum: 0.0,
            speed_count: 0,
            distance: TotalDistance::default(),
            samples: 0,
        }
    }
}

impl MetricComputator for AverageSpeed {
    fn reset(&mut self) {
        self.speed_sum = 0.0;
        self.speed_count = 0;
        self.distance.reset();
        self.samples = 0;
    }

    fn consume(&mut self, sample: &Sample) {
        self.samples += 1;
        self.distance.consume(sample);
        if let Some(kph) = reading(sample.speed_kph) {
            self.speed_sum += kph;
            self.speed_count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        if self.speed_count > 0 {
            return Some(self.speed_sum / f64::from(self.speed_count));
        }
        let hours = f64::from(self.samples) * self.recording_interval / SECONDS_PER_HOUR;
        let km = self.distance.value()?;
        (hours > 0.0).then(|| km / hours)
    }
}

/// Total climbing over the slice (m)
///
/// Only ascents count; descents and missing altitude are ignored.
#[derive(Debug, Clone, Default)]
pub struct ElevationGain {
    previous: Option<f64>,
    gain: f64,
    seen: bool,
}

impl MetricComputator for ElevationGain {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn consume(&mut self, sample: &Sample) {
        let Some(altitude) = reading(sample.altitude) else {
            return;
        };
        self.seen = true;
        if let Some(previous) = self.previous {
            if altitude > previous {
                self.gain += altitude - previous;
            }
        }
        self.previous = Some(altitude);
    }

    fn value(&self) -> Option<f64> {
        self.seen.then_some(self.gain)
    }
}
