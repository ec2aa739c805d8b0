// ABOUTME: Banister training impulse computed from heart rate reserve per sample
// ABOUTME: Resting and maximum heart rate come from the athlete's heart rate zones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::engine::{ComputeContext, MetricComputator};
use crate::samples::{reading, Sample};
use pierre_core::constants::physiology::{TRIMP_BASE_MULTIPLIER, TRIMP_WEIGHTING_FACTOR};
use pierre_core::constants::time::SECONDS_PER_MINUTE;

/// Banister TRIMP over the slice
///
/// Each sample contributes `minutes x HRr x 0.64 x e^(1.92 x HRr)` where HRr is
/// the fraction of heart rate reserve, clamped to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct Trimp {
    minutes_per_sample: f64,
    resting_hr: f64,
    reserve: f64,
    points: f64,
    seen: bool,
}

impl Trimp {
    /// Create using the athlete's resting and maximum heart rate
    #[must_use]
    pub fn from_context(ctx: &ComputeContext<'_>) -> Self {
        Self {
            minutes_per_sample: ctx.recording_interval / SECONDS_PER_MINUTE,
            resting_hr: ctx.hr_zones.resting_hr,
            reserve: ctx.hr_zones.max_hr - ctx.hr_zones.resting_hr,
            points: 0.0,
            seen: false,
        }
    }
}

impl MetricComputator for Trimp {
    fn reset(&mut self) {
        self.points = 0.0;
        self.seen = false;
    }

    fn consume(&mut self, sample: &Sample) {
        let Some(bpm) = reading(sample.heart_rate).filter(|bpm| *bpm > 0.0) else {
            return;
        };
        self.seen = true;
        let fraction = ((bpm - self.resting_hr) / self.reserve).clamp(0.0, 1.0);
        self.points += self.minutes_per_sample
            * fraction
            * TRIMP_BASE_MULTIPLIER
            * (TRIMP_WEIGHTING_FACTOR * fraction).exp();
    }

    fn value(&self) -> Option<f64> {
        (self.seen && self.reserve > 0.0).then_some(self.points)
    }
}
