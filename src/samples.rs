// ABOUTME: Timestamped sensor samples and the ordered sequence that holds one ride's recording
// ABOUTME: Provides time lookup, slicing by interval bounds, and derived-field computation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Sample Sequences
//!
//! A [`SampleSequence`] is the in-memory recording of one ride: samples ordered
//! by non-decreasing time offset at a fixed recording interval. Raw channels a
//! sensor did not report hold [`NO_DATA`] rather than being omitted, so every
//! sample has the same shape.
//!
//! Derived fields (running normalized power, xPower, altitude power) are
//! computed once over the whole ride by [`SampleSequence::derive_fields`].
//! Slices copy them from the parent instead of recomputing them: a running
//! value depends on every sample that preceded the slice.

use pierre_core::constants::altitude::{BASSETT_A, BASSETT_B, BASSETT_C};
use pierre_core::constants::samples::{DEFAULT_RECORDING_INTERVAL_SECS, NO_DATA};
use pierre_core::errors::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::slice::Iter;

/// Read a raw channel value, treating the sentinel and non-finite values as absent
#[must_use]
pub fn reading(value: f64) -> Option<f64> {
    // Exact comparison is intended: the sentinel is only ever assigned, never computed
    #[allow(clippy::float_cmp)]
    let is_sentinel = value == NO_DATA;
    (!is_sentinel && value.is_finite()).then_some(value)
}

/// Per-side pedal dynamics reported by dual-sided power meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PedalDynamics {
    /// Torque effectiveness (%)
    pub torque_effectiveness: f64,
    /// Pedal smoothness (%)
    pub pedal_smoothness: f64,
    /// Platform center offset (mm)
    pub platform_center_offset: f64,
    /// Power phase start angle (degrees)
    pub power_phase_begin: f64,
    /// Power phase end angle (degrees)
    pub power_phase_end: f64,
    /// Peak power phase start angle (degrees)
    pub peak_power_phase_begin: f64,
    /// Peak power phase end angle (degrees)
    pub peak_power_phase_end: f64,
}

impl Default for PedalDynamics {
    fn default() -> Self {
        Self {
            torque_effectiveness: NO_DATA,
            pedal_smoothness: NO_DATA,
            platform_center_offset: NO_DATA,
            power_phase_begin: NO_DATA,
            power_phase_end: NO_DATA,
            peak_power_phase_begin: NO_DATA,
            peak_power_phase_end: NO_DATA,
        }
    }
}

/// Values derived from the whole ride and stored per sample
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedFields {
    /// Running normalized power up to and including this sample (W)
    pub normalized_power: f64,
    /// Running xPower up to and including this sample (W)
    pub xpower: f64,
    /// Power adjusted to its sea-level equivalent for the sample's altitude (W)
    pub altitude_power: f64,
}

/// One timestamped reading from every channel of an activity recording
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Time offset from ride start (s)
    pub secs: f64,
    /// Cumulative distance (km)
    pub km: f64,
    /// Cadence (rpm)
    pub cadence: f64,
    /// Heart rate (bpm)
    pub heart_rate: f64,
    /// Speed (km/h)
    pub speed_kph: f64,
    /// Crank torque (Nm)
    pub torque_nm: f64,
    /// Power (W)
    pub power: f64,
    /// Altitude (m)
    pub altitude: f64,
    /// Longitude (degrees)
    pub longitude: f64,
    /// Latitude (degrees)
    pub latitude: f64,
    /// Headwind (km/h)
    pub headwind: f64,
    /// Slope (%)
    pub slope: f64,
    /// Temperature (°C)
    pub temperature: f64,
    /// Left/right power balance (% left)
    pub lr_balance: f64,
    /// Left pedal dynamics
    pub left: PedalDynamics,
    /// Right pedal dynamics
    pub right: PedalDynamics,
    /// Muscle oxygen saturation (%)
    pub smo2: f64,
    /// Total hemoglobin (g/dL)
    pub thb: f64,
    /// Running vertical oscillation (cm)
    pub vertical_oscillation: f64,
    /// Running cadence (spm)
    pub run_cadence: f64,
    /// Ground contact time (ms)
    pub ground_contact: f64,
    /// Derived per-sample values
    pub derived: DerivedFields,
}

impl Sample {
    /// Create a sample at the given offset with every raw channel absent
    #[must_use]
    pub fn new(secs: f64, km: f64) -> Self {
        Self {
            secs,
            km,
            cadence: NO_DATA,
            heart_rate: NO_DATA,
            speed_kph: NO_DATA,
            torque_nm: NO_DATA,
            power: NO_DATA,
            altitude: NO_DATA,
            longitude: NO_DATA,
            latitude: NO_DATA,
            headwind: NO_DATA,
            slope: NO_DATA,
            temperature: NO_DATA,
            lr_balance: NO_DATA,
            left: PedalDynamics::default(),
            right: PedalDynamics::default(),
            smo2: NO_DATA,
            thb: NO_DATA,
            vertical_oscillation: NO_DATA,
            run_cadence: NO_DATA,
            ground_contact: NO_DATA,
            derived: DerivedFields::default(),
        }
    }

    /// Set power (W)
    #[must_use]
    pub fn with_power(mut self, watts: f64) -> Self {
        self.power = watts;
        self
    }

    /// Set heart rate (bpm)
    #[must_use]
    pub fn with_heart_rate(mut self, bpm: f64) -> Self {
        self.heart_rate = bpm;
        self
    }

    /// Set cadence (rpm)
    #[must_use]
    pub fn with_cadence(mut self, rpm: f64) -> Self {
        self.cadence = rpm;
        self
    }

    /// Set speed (km/h)
    #[must_use]
    pub fn with_speed(mut self, kph: f64) -> Self {
        self.speed_kph = kph;
        self
    }

    /// Set altitude (m)
    #[must_use]
    pub fn with_altitude(mut self, meters: f64) -> Self {
        self.altitude = meters;
        self
    }

    /// Set temperature (°C)
    #[must_use]
    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature = celsius;
        self
    }

    /// Set GPS position
    #[must_use]
    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }
}

/// Ordered samples for one activity, recorded at a fixed interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSequence {
    samples: Vec<Sample>,
    recording_interval: f64,
}

impl Default for SampleSequence {
    fn default() -> Self {
        Self::new(DEFAULT_RECORDING_INTERVAL_SECS)
    }
}

impl SampleSequence {
    /// Create an empty sequence with the given recording interval (s)
    ///
    /// A non-positive or non-finite interval is replaced by the default.
    #[must_use]
    pub fn new(recording_interval: f64) -> Self {
        let recording_interval = if recording_interval.is_finite() && recording_interval > 0.0 {
            recording_interval
        } else {
            DEFAULT_RECORDING_INTERVAL_SECS
        };
        Self {
            samples: Vec::new(),
            recording_interval,
        }
    }

    /// Build a sequence from samples, validating their order
    ///
    /// # Errors
    ///
    /// Returns an error if any sample's time offset precedes its predecessor's
    pub fn from_samples(
        recording_interval: f64,
        samples: impl IntoIterator<Item = Sample>,
    ) -> AppResult<Self> {
        let mut sequence = Self::new(recording_interval);
        for sample in samples {
            sequence.push(sample)?;
        }
        Ok(sequence)
    }

    /// Append a sample at the end of the sequence
    ///
    /// # Errors
    ///
    /// Returns an error if the sample's time offset is not finite or precedes
    /// the last sample's offset
    pub fn push(&mut self, sample: Sample) -> AppResult<()> {
        if !sample.secs.is_finite() {
            return Err(AppError::invalid_input("sample time offset must be finite"));
        }
        if let Some(last) = self.samples.last() {
            if sample.secs < last.secs {
                return Err(AppError::new(
                    ErrorCode::OutOfOrder,
                    format!(
                        "sample at {}s appended after sample at {}s",
                        sample.secs, last.secs
                    ),
                ));
            }
        }
        self.samples.push(sample);
        Ok(())
    }

    /// Fixed recording interval (s)
    #[must_use]
    pub const fn recording_interval(&self) -> f64 {
        self.recording_interval
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the sequence holds no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// Iterate samples in time order
    pub fn iter(&self) -> Iter<'_, Sample> {
        self.samples.iter()
    }

    /// All samples as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    /// Index of the first sample whose time offset is at or after `secs`
    #[must_use]
    pub fn first_index_at_or_after(&self, secs: f64) -> Option<usize> {
        let index = self.samples.partition_point(|sample| sample.secs < secs);
        (index < self.samples.len()).then_some(index)
    }

    /// Copy out the samples covering `[start, stop)`
    ///
    /// A sample at offset `t` is included when `start <= t` and
    /// `t + recording_interval <= stop`. Every field, derived values included,
    /// is copied verbatim. Returns `None` when no sample qualifies.
    #[must_use]
    pub fn slice(&self, start: f64, stop: f64) -> Option<Self> {
        let begin = self.first_index_at_or_after(start)?;
        let samples: Vec<Sample> = self.samples[begin..]
            .iter()
            .take_while(|sample| sample.secs + self.recording_interval <= stop)
            .copied()
            .collect();

        if samples.is_empty() {
            return None;
        }

        Some(Self {
            samples,
            recording_interval: self.recording_interval,
        })
    }

    /// Compute the derived fields of every sample over the whole ride
    ///
    /// Absent power counts as zero watts. Window lengths are converted to a
    /// sample count using the recording interval, with a minimum of one sample.
    pub fn derive_fields(&mut self, np_window_secs: u32, xpower_window_secs: u32) {
        let np_samples = window_samples(np_window_secs, self.recording_interval);
        let xpower_smoothing =
            (self.recording_interval / f64::from(xpower_window_secs.max(1))).min(1.0);

        let mut window: VecDeque<f64> = VecDeque::with_capacity(np_samples);
        let mut window_sum = 0.0;
        let mut np_fourth_sum = 0.0;
        let mut xp_ewma = 0.0;
        let mut xp_fourth_sum = 0.0;
        let mut count = 0.0;

        for sample in &mut self.samples {
            let watts = reading(sample.power).unwrap_or(0.0).max(0.0);

            window.push_back(watts);
            window_sum += watts;
            if window.len() > np_samples {
                window_sum -= window.pop_front().unwrap_or(0.0);
            }
            let rolling = window_sum / window.len() as f64;

            xp_ewma += xpower_smoothing * (watts - xp_ewma);

            count += 1.0;
            np_fourth_sum += rolling.powi(4);
            xp_fourth_sum += xp_ewma.powi(4);

            sample.derived = DerivedFields {
                normalized_power: (np_fourth_sum / count).powf(0.25),
                xpower: (xp_fourth_sum / count).powf(0.25),
                altitude_power: altitude_adjusted_power(watts, sample.altitude),
            };
        }
    }
}

impl<'a> IntoIterator for &'a SampleSequence {
    type Item = &'a Sample;
    type IntoIter = Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Convert a window length in seconds to a sample count
#[must_use]
pub fn window_samples(window_secs: u32, recording_interval: f64) -> usize {
    let samples = (f64::from(window_secs) / recording_interval).round();
    if samples.is_finite() && samples >= 1.0 {
        samples as usize
    } else {
        1
    }
}

/// Sea-level equivalent power for a reading taken at `altitude_m`
fn altitude_adjusted_power(watts: f64, altitude_m: f64) -> f64 {
    let Some(altitude) = reading(altitude_m) else {
        return watts;
    };
    let km = altitude.max(0.0) / 1000.0;
    let fraction = BASSETT_A.mul_add(km * km, BASSETT_B.mul_add(km, BASSETT_C)) / 100.0;
    if fraction > 0.0 {
        watts / fraction
    } else {
        watts
    }
}
