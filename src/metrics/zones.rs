// ABOUTME: Time spent in one power or heart rate zone across a sample slice
// ABOUTME: The zone's range is resolved from the athlete's zones when the computator is created
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::engine::{ComputeContext, MetricComputator};
use crate::samples::{reading, Sample};
use pierre_core::zones::ZoneRange;

/// Which channel and zone model a [`TimeInZone`] reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    /// Power against the athlete's power zones
    Power,
    /// Heart rate against the athlete's heart rate zones
    HeartRate,
}

/// Seconds spent in a single zone
///
/// Opts out when the athlete defines fewer zones than `zone + 1` or when the
/// slice never reports the channel.
#[derive(Debug, Clone)]
pub struct TimeInZone {
    kind: ZoneKind,
    range: Option<ZoneRange>,
    recording_interval: f64,
    seconds: f64,
    seen: bool,
}

impl TimeInZone {
    /// Create for `zone` (0-based) of the given model
    #[must_use]
    pub fn new(kind: ZoneKind, zone: usize, ctx: &ComputeContext<'_>) -> Self {
        let range = match kind {
            ZoneKind::Power => ctx.power_zones.zone_range(zone),
            ZoneKind::HeartRate => ctx.hr_zones.zone_range(zone),
        };
        Self {
            kind,
            range,
            recording_interval: ctx.recording_interval,
            seconds: 0.0,
            seen: false,
        }
    }
}

impl MetricComputator for TimeInZone {
    fn reset(&mut self) {
        self.seconds = 0.0;
        self.seen = false;
    }

    fn consume(&mut self, sample: &Sample) {
        let raw = match self.kind {
            ZoneKind::Power => sample.power,
            ZoneKind::HeartRate => sample.heart_rate,
        };
        let Some(value) = reading(raw) else {
            return;
        };
        if self.kind == ZoneKind::HeartRate && value <= 0.0 {
            return;
        }
        self.seen = true;
        if self.range.is_some_and(|range| range.contains(value)) {
            self.seconds += self.recording_interval;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.seen && self.range.is_some()).then_some(self.seconds)
    }
}
