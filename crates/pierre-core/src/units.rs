// ABOUTME: Metric/imperial unit conversion rules applied to cached metric values
// ABOUTME: Conversions are pure functions over a rule and a value, with no shared state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Unit conversion rules.
//!
//! Every metric value is computed and cached in metric units. Consumers that
//! want imperial output ask for it at lookup time, and the descriptor's
//! [`UnitConversion`] rule maps the stored value through [`convert`].

use crate::constants::units::{
    FAHRENHEIT_OFFSET, FAHRENHEIT_PER_CELSIUS, FEET_PER_METER, MILES_PER_KM, MPH_PER_KPH,
};
use serde::{Deserialize, Serialize};

/// Measurement system requested by a consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// SI units, the storage format for every cached value
    #[default]
    Metric,
    /// Imperial units (miles, feet, mph, Fahrenheit, pounds)
    Imperial,
}

impl UnitSystem {
    /// Build from the boolean flag used by lookup APIs
    #[must_use]
    pub const fn from_imperial_flag(use_imperial: bool) -> Self {
        if use_imperial {
            Self::Imperial
        } else {
            Self::Metric
        }
    }

    /// Whether this system is imperial
    #[must_use]
    pub const fn is_imperial(self) -> bool {
        matches!(self, Self::Imperial)
    }
}

/// How a metric value maps from metric to imperial units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum UnitConversion {
    /// Unitless or identical in both systems (watts, bpm, seconds)
    #[default]
    None,
    /// `imperial = metric * factor`
    Scale {
        /// Multiplicative factor
        factor: f64,
    },
    /// `imperial = metric * factor + offset`
    Affine {
        /// Multiplicative factor
        factor: f64,
        /// Additive offset applied after scaling
        offset: f64,
    },
}

impl UnitConversion {
    /// Kilometers to miles
    pub const KM_TO_MILES: Self = Self::Scale {
        factor: MILES_PER_KM,
    };
    /// Kilometers per hour to miles per hour
    pub const KPH_TO_MPH: Self = Self::Scale {
        factor: MPH_PER_KPH,
    };
    /// Meters to feet
    pub const METERS_TO_FEET: Self = Self::Scale {
        factor: FEET_PER_METER,
    };
    /// Celsius to Fahrenheit
    pub const CELSIUS_TO_FAHRENHEIT: Self = Self::Affine {
        factor: FAHRENHEIT_PER_CELSIUS,
        offset: FAHRENHEIT_OFFSET,
    };

    /// Apply the rule to a metric-unit value
    #[must_use]
    pub fn to_imperial(self, value: f64) -> f64 {
        match self {
            Self::None => value,
            Self::Scale { factor } => value * factor,
            Self::Affine { factor, offset } => value.mul_add(factor, offset),
        }
    }

    /// Invert the rule, mapping an imperial value back to metric units
    #[must_use]
    pub fn to_metric(self, value: f64) -> f64 {
        match self {
            Self::None => value,
            Self::Scale { factor } => value / factor,
            Self::Affine { factor, offset } => (value - offset) / factor,
        }
    }
}

/// Convert a stored metric-unit value into the requested unit system
#[must_use]
pub fn convert(rule: UnitConversion, value: f64, system: UnitSystem) -> f64 {
    match system {
        UnitSystem::Metric => value,
        UnitSystem::Imperial => rule.to_imperial(value),
    }
}
