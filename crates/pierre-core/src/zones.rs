// ABOUTME: Athlete power and heart-rate zone definitions consumed by zone-based metrics
// ABOUTME: Zones are validated on construction and loadable from JSON or environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Training zone configuration.
//!
//! Both zone types store ascending lower bounds in absolute units (watts or bpm).
//! A value belongs to the highest zone whose lower bound it reaches.

use crate::constants::physiology::{
    DEFAULT_FTP_WATTS, DEFAULT_LTHR, DEFAULT_MAX_HR, DEFAULT_RESTING_HR,
};
use crate::constants::zone_percentages::{HR_ZONE_LOWER_BOUNDS, POWER_ZONE_LOWER_BOUNDS};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::env;
use tracing::warn;

/// Power zones anchored on functional threshold power
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerZones {
    /// Functional threshold power in watts
    pub ftp: f64,
    /// Ascending zone lower bounds in watts; the first bound is always 0
    pub lower_bounds: Vec<f64>,
}

impl PowerZones {
    /// Build zones from explicit lower bounds
    ///
    /// # Errors
    ///
    /// Returns an error if FTP is not positive or the bounds are empty, do not
    /// start at zero, or are not strictly ascending.
    pub fn new(ftp: f64, lower_bounds: Vec<f64>) -> AppResult<Self> {
        let zones = Self { ftp, lower_bounds };
        zones.validate()?;
        Ok(zones)
    }

    /// Build the standard seven Coggan zones from FTP
    ///
    /// # Errors
    ///
    /// Returns an error if FTP is not positive
    pub fn from_ftp(ftp: f64) -> AppResult<Self> {
        Self::new(
            ftp,
            POWER_ZONE_LOWER_BOUNDS.iter().map(|pct| pct * ftp).collect(),
        )
    }

    /// Parse zones from a JSON document
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the zones fail validation
    pub fn from_json(json: &str) -> AppResult<Self> {
        let zones: Self = serde_json::from_str(json)?;
        zones.validate()?;
        Ok(zones)
    }

    /// Load zones from `ATHLETE_FTP`, falling back to the default FTP
    #[must_use]
    pub fn from_env() -> Self {
        let ftp = env::var("ATHLETE_FTP")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|ftp| *ftp > 0.0)
            .unwrap_or(DEFAULT_FTP_WATTS);
        Self {
            ftp,
            lower_bounds: POWER_ZONE_LOWER_BOUNDS.iter().map(|pct| pct * ftp).collect(),
        }
    }

    /// Check the zone invariants
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated invariant
    pub fn validate(&self) -> AppResult<()> {
        if !self.ftp.is_finite() || self.ftp <= 0.0 {
            return Err(AppError::out_of_range("FTP must be greater than zero"));
        }
        validate_bounds("power", &self.lower_bounds)
    }

    /// Number of zones
    #[must_use]
    pub fn count(&self) -> usize {
        self.lower_bounds.len()
    }

    /// Zone index (0-based) containing the given wattage
    #[must_use]
    pub fn zone_for(&self, watts: f64) -> Option<usize> {
        zone_index(&self.lower_bounds, watts)
    }

    /// Wattage range covered by `zone`
    #[must_use]
    pub fn zone_range(&self, zone: usize) -> Option<ZoneRange> {
        zone_span(&self.lower_bounds, zone)
    }
}

impl Default for PowerZones {
    fn default() -> Self {
        Self {
            ftp: DEFAULT_FTP_WATTS,
            lower_bounds: POWER_ZONE_LOWER_BOUNDS
                .iter()
                .map(|pct| pct * DEFAULT_FTP_WATTS)
                .collect(),
        }
    }
}

/// Heart rate zones anchored on lactate threshold heart rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateZones {
    /// Lactate threshold heart rate (bpm)
    pub lthr: f64,
    /// Maximum heart rate (bpm)
    pub max_hr: f64,
    /// Resting heart rate (bpm)
    pub resting_hr: f64,
    /// Ascending zone lower bounds in bpm; the first bound is always 0
    pub lower_bounds: Vec<f64>,
}

impl HeartRateZones {
    /// Build zones from explicit lower bounds
    ///
    /// # Errors
    ///
    /// Returns an error if the heart rates are inconsistent or the bounds are invalid
    pub fn new(lthr: f64, max_hr: f64, resting_hr: f64, lower_bounds: Vec<f64>) -> AppResult<Self> {
        let zones = Self {
            lthr,
            max_hr,
            resting_hr,
            lower_bounds,
        };
        zones.validate()?;
        Ok(zones)
    }

    /// Build the standard five zones from LTHR
    ///
    /// # Errors
    ///
    /// Returns an error if the heart rates are inconsistent
    pub fn from_lthr(lthr: f64, max_hr: f64, resting_hr: f64) -> AppResult<Self> {
        Self::new(
            lthr,
            max_hr,
            resting_hr,
            HR_ZONE_LOWER_BOUNDS.iter().map(|pct| pct * lthr).collect(),
        )
    }

    /// Parse zones from a JSON document
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the zones fail validation
    pub fn from_json(json: &str) -> AppResult<Self> {
        let zones: Self = serde_json::from_str(json)?;
        zones.validate()?;
        Ok(zones)
    }

    /// Load zones from `ATHLETE_LTHR`, `ATHLETE_MAX_HR` and `ATHLETE_RESTING_HR`
    ///
    /// Inconsistent values fall back to the defaults as a whole.
    #[must_use]
    pub fn from_env() -> Self {
        let read = |name: &str, default: f64| {
            env::var(name)
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .unwrap_or(default)
        };
        Self::from_lthr(
            read("ATHLETE_LTHR", DEFAULT_LTHR),
            read("ATHLETE_MAX_HR", DEFAULT_MAX_HR),
            read("ATHLETE_RESTING_HR", DEFAULT_RESTING_HR),
        )
        .unwrap_or_else(|error| {
            warn!(%error, "Inconsistent athlete heart rates in environment, using defaults");
            Self::default()
        })
    }

    /// Check the zone invariants
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated invariant
    pub fn validate(&self) -> AppResult<()> {
        if self.resting_hr <= 0.0 || self.resting_hr >= self.max_hr {
            return Err(AppError::out_of_range(
                "resting heart rate must be positive and below max heart rate",
            ));
        }
        if self.lthr <= self.resting_hr || self.lthr > self.max_hr {
            return Err(AppError::out_of_range(
                "LTHR must lie between resting and max heart rate",
            ));
        }
        validate_bounds("heart rate", &self.lower_bounds)
    }

    /// Number of zones
    #[must_use]
    pub fn count(&self) -> usize {
        self.lower_bounds.len()
    }

    /// Zone index (0-based) containing the given heart rate
    #[must_use]
    pub fn zone_for(&self, bpm: f64) -> Option<usize> {
        zone_index(&self.lower_bounds, bpm)
    }

    /// Heart rate range covered by `zone`
    #[must_use]
    pub fn zone_range(&self, zone: usize) -> Option<ZoneRange> {
        zone_span(&self.lower_bounds, zone)
    }
}

impl Default for HeartRateZones {
    fn default() -> Self {
        Self {
            lthr: DEFAULT_LTHR,
            max_hr: DEFAULT_MAX_HR,
            resting_hr: DEFAULT_RESTING_HR,
            lower_bounds: HR_ZONE_LOWER_BOUNDS
                .iter()
                .map(|pct| pct * DEFAULT_LTHR)
                .collect(),
        }
    }
}

fn validate_bounds(kind: &str, bounds: &[f64]) -> AppResult<()> {
    match bounds.first() {
        None => return Err(AppError::invalid_input(format!("{kind} zones are empty"))),
        Some(first) if first.abs() > f64::EPSILON => {
            return Err(AppError::invalid_input(format!(
                "{kind} zones must start at zero"
            )))
        }
        Some(_) => {}
    }
    if bounds
        .windows(2)
        .any(|pair| pair[1].partial_cmp(&pair[0]) != Some(Ordering::Greater))
    {
        return Err(AppError::invalid_input(format!(
            "{kind} zone bounds must be strictly ascending"
        )));
    }
    Ok(())
}

/// Half-open `[lower, upper)` range of one zone; the top zone has no upper bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRange {
    /// Inclusive lower bound
    pub lower: f64,
    /// Exclusive upper bound, infinite for the top zone
    pub upper: f64,
}

impl ZoneRange {
    /// Whether `value` falls in this zone, with the same rules as `zone_for`
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= 0.0 && value >= self.lower && value < self.upper
    }
}

fn zone_index(bounds: &[f64], value: f64) -> Option<usize> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    bounds.iter().rposition(|lower| value >= *lower)
}

fn zone_span(bounds: &[f64], zone: usize) -> Option<ZoneRange> {
    let lower = *bounds.get(zone)?;
    let upper = bounds.get(zone + 1).copied().unwrap_or(f64::INFINITY);
    Some(ZoneRange { lower, upper })
}
