// ABOUTME: Power-based computators: work, normalized power, intensity, stress and xPower
// ABOUTME: Threshold-relative metrics read FTP from the athlete's power zones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Power metrics.
//!
//! Normalized power follows Coggan: a rolling mean over a fixed window, raised
//! to the fourth power, averaged, and reduced by a fourth root. xPower (Skiba)
//! replaces the rolling mean with an exponentially weighted one. Missing power
//! counts as zero watts in both, which matches how coasting is recorded.

use crate::engine::{ComputeContext, MetricComputator};
use crate::samples::{reading, window_samples, Sample};
use pierre_core::constants::physiology::TSS_BASE_MULTIPLIER;
use pierre_core::constants::time::SECONDS_PER_HOUR;
use std::collections::VecDeque;

/// Mechanical work over the slice (kJ)
#[derive(Debug, Clone)]
pub struct TotalWork {
    recording_interval: f64,
    joules: f64,
    seen: bool,
}

impl TotalWork {
    /// Create for a slice recorded at `recording_interval`
    #[must_use]
    pub const fn new(recording_interval: f64) -> Self {
        Self {
            recording_interval,
            joules: 0.0,
            seen: false,
        }
    }
}

impl MetricComputator for TotalWork {
    fn reset(&mut self) {
        self.joules = 0.0;
        self.seen = false;
    }

    fn consume(&mut self, sample: &Sample) {
        if let Some(watts) = reading(sample.power) {
            self.seen = true;
            self.joules += watts.max(0.0) * self.recording_interval;
        }
    }

    fn value(&self) -> Option<f64> {
        self.seen.then(|| self.joules / 1000.0)
    }
}

/// Rolling-window fourth-power accumulator shared by the Coggan metrics
#[derive(Debug, Clone)]
struct RollingFourthPower {
    window_len: usize,
    window: VecDeque<f64>,
    window_sum: f64,
    fourth_sum: f64,
    rolled: u32,
    samples: u32,
    power_sum: f64,
    power_seen: bool,
}

impl RollingFourthPower {
    fn new(window_len: usize) -> Self {
        Self {
            window_len: window_len.max(1),
            window: VecDeque::with_capacity(window_len),
            window_sum: 0.0,
            fourth_sum: 0.0,
            rolled: 0,
            samples: 0,
            power_sum: 0.0,
            power_seen: false,
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.window_len);
    }

    fn consume(&mut self, sample: &Sample) {
        let watts = match reading(sample.power) {
            Some(watts) => {
                self.power_seen = true;
                watts.max(0.0)
            }
            None => 0.0,
        };
        self.samples += 1;
        self.power_sum += watts;

        self.window.push_back(watts);
        self.window_sum += watts;
        if self.window.len() > self.window_len {
            self.window_sum -= self.window.pop_front().unwrap_or(0.0);
        }
        if self.window.len() == self.window_len {
            let rolling = self.window_sum / self.window_len as f64;
            self.fourth_sum += rolling.powi(4);
            self.rolled += 1;
        }
    }

    /// Normalized power, or `None` when the slice is shorter than one window
    /// or carries no power at all
    fn normalized_power(&self) -> Option<f64> {
        if !self.power_seen || self.rolled == 0 {
            return None;
        }
        Some((self.fourth_sum / f64::from(self.rolled)).powf(0.25))
    }

    fn average_power(&self) -> Option<f64> {
        (self.power_seen && self.samples > 0).then(|| self.power_sum / f64::from(self.samples))
    }
}

/// Coggan normalized power (W)
#[derive(Debug, Clone)]
pub struct NormalizedPower {
    inner: RollingFourthPower,
}

impl NormalizedPower {
    /// Create using the configured rolling window
    #[must_use]
    pub fn from_context(ctx: &ComputeContext<'_>) -> Self {
        Self {
            inner: RollingFourthPower::new(window_samples(
                ctx.np_window_secs,
                ctx.recording_interval,
            )),
        }
    }
}

impl MetricComputator for NormalizedPower {
    fn reset(&mut self) {
        self.inner.reset();
    }

    fn consume(&mut self, sample: &Sample) {
        self.inner.consume(sample);
    }

    fn value(&self) -> Option<f64> {
        self.inner.normalized_power()
    }
}

/// Coggan intensity factor: normalized power over FTP
#[derive(Debug, Clone)]
pub struct IntensityFactor {
    np: NormalizedPower,
    ftp: f64,
}

impl IntensityFactor {
    /// Create using the athlete's FTP
    #[must_use]
    pub fn from_context(ctx: &ComputeContext<'_>) -> Self {
        Self {
            np: NormalizedPower::from_context(ctx),
            ftp: ctx.power_zones.ftp,
        }
    }
}

impl MetricComputator for IntensityFactor {
    fn reset(&mut self) {
        self.np.reset();
    }

    fn consume(&mut self, sample: &Sample) {
        self.np.consume(sample);
    }

    fn value(&self) -> Option<f64> {
        let np = self.np.value()?;
        (self.ftp > 0.0).then(|| np / self.ftp)
    }
}

/// Coggan training stress score
///
/// `TSS = duration_h x IF^2 x 100`, with duration taken from the sample count.
#[derive(Debug, Clone)]
pub struct TrainingStressScore {
    intensity: IntensityFactor,
    recording_interval: f64,
    samples: u32,
}

impl TrainingStressScore {
    /// Create using the athlete's FTP and the configured window
    #[must_use]
    pub fn from_context(ctx: &ComputeContext<'_>) -> Self {
        Self {
            intensity: IntensityFactor::from_context(ctx),
            recording_interval: ctx.recording_interval,
            samples: 0,
        }
    }
}

impl MetricComputator for TrainingStressScore {
    fn reset(&mut self) {
        self.intensity.reset();
        self.samples = 0;
    }

    fn consume(&mut self, sample: &Sample) {
        self.samples += 1;
        self.intensity.consume(sample);
    }

    fn value(&self) -> Option<f64> {
        let intensity = self.intensity.value()?;
        let hours = f64::from(self.samples) * self.recording_interval / SECONDS_PER_HOUR;
        Some(hours * intensity * intensity * TSS_BASE_MULTIPLIER)
    }
}

/// Normalized power divided by average power
#[derive(Debug, Clone)]
pub struct VariabilityIndex {
    inner: RollingFourthPower,
}

impl VariabilityIndex {
    /// Create using the configured rolling window
    #[must_use]
    pub fn from_context(ctx: &ComputeContext<'_>) -> Self {
        Self {
            inner: RollingFourthPower::new(window_samples(
                ctx.np_window_secs,
                ctx.recording_interval,
            )),
        }
    }
}

impl MetricComputator for VariabilityIndex {
    fn reset(&mut self) {
        self.inner.reset();
    }

    fn consume(&mut self, sample: &Sample) {
        self.inner.consume(sample);
    }

    fn value(&self) -> Option<f64> {
        let np = self.inner.normalized_power()?;
        let average = self.inner.average_power()?;
        (average > 0.0).then(|| np / average)
    }
}

/// Skiba xPower (W)
#[derive(Debug, Clone)]
pub struct XPower {
    smoothing: f64,
    ewma: f64,
    fourth_sum: f64,
    samples: u32,
    power_seen: bool,
}

impl XPower {
    /// Create using the configured smoothing window
    #[must_use]
    pub fn from_context(ctx: &ComputeContext<'_>) -> Self {
        Self {
            smoothing: (ctx.recording_interval / f64::from(ctx.xpower_window_secs.max(1)))
                .min(1.0),
            ewma: 0.0,
            fourth_sum: 0.0,
            samples: 0,
            power_seen: false,
        }
    }
}

impl MetricComputator for XPower {
    fn reset(&mut self) {
        self.ewma = 0.0;
        self.fourth_sum = 0.0;
        self.samples = 0;
        self.power_seen = false;
    }

    fn consume(&mut self, sample: &Sample) {
        let watts = reading(sample.power).map_or(0.0, |watts| {
            self.power_seen = true;
            watts.max(0.0)
        });
        self.ewma += self.smoothing * (watts - self.ewma);
        self.fourth_sum += self.ewma.powi(4);
        self.samples += 1;
    }

    fn value(&self) -> Option<f64> {
        (self.power_seen && self.samples > 0)
            .then(|| (self.fourth_sum / f64::from(self.samples)).powf(0.25))
    }
}
