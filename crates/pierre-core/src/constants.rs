// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Sample sentinels, unit conversion factors, and physiological defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large list.

/// Sample channel constants
pub mod samples {
    /// Sentinel stored in a raw channel when the sensor did not report a value
    pub const NO_DATA: f64 = -255.0;

    /// Default recording interval in seconds when a file does not declare one
    pub const DEFAULT_RECORDING_INTERVAL_SECS: f64 = 1.0;
}

/// Unit conversion factors (metric to imperial)
pub mod units {
    /// Kilometers to statute miles
    pub const MILES_PER_KM: f64 = 0.621_371;
    /// Kilometers per hour to miles per hour
    pub const MPH_PER_KPH: f64 = MILES_PER_KM;
    /// Meters to feet
    pub const FEET_PER_METER: f64 = 3.280_84;
    /// Celsius to Fahrenheit scale factor
    pub const FAHRENHEIT_PER_CELSIUS: f64 = 1.8;
    /// Celsius to Fahrenheit offset
    pub const FAHRENHEIT_OFFSET: f64 = 32.0;
}

/// Time constants
pub mod time {
    /// Seconds in one hour
    pub const SECONDS_PER_HOUR: f64 = 3600.0;
    /// Seconds in one minute
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
}

/// Physiological defaults and algorithm windows
pub mod physiology {
    /// Rolling window used for normalized power (Coggan)
    pub const NORMALIZED_POWER_WINDOW_SECS: u32 = 30;
    /// Exponential smoothing window used for xPower (Skiba)
    pub const XPOWER_WINDOW_SECS: u32 = 25;
    /// Multiplier applied to duration x IF^2 to get TSS
    pub const TSS_BASE_MULTIPLIER: f64 = 100.0;
    /// Default functional threshold power when the athlete has none configured
    pub const DEFAULT_FTP_WATTS: f64 = 250.0;
    /// Default maximum heart rate
    pub const DEFAULT_MAX_HR: f64 = 190.0;
    /// Default resting heart rate
    pub const DEFAULT_RESTING_HR: f64 = 60.0;
    /// Default lactate threshold heart rate
    pub const DEFAULT_LTHR: f64 = 170.0;
    /// Banister TRIMP weighting constant (male coefficient)
    pub const TRIMP_WEIGHTING_FACTOR: f64 = 1.92;
    /// Banister TRIMP base multiplier
    pub const TRIMP_BASE_MULTIPLIER: f64 = 0.64;
}

/// Zone boundary percentages
pub mod zone_percentages {
    /// Coggan power zone lower bounds as a fraction of FTP (L1..L7)
    pub const POWER_ZONE_LOWER_BOUNDS: [f64; 7] = [0.0, 0.55, 0.75, 0.90, 1.05, 1.20, 1.50];
    /// Heart rate zone lower bounds as a fraction of LTHR (H1..H5)
    pub const HR_ZONE_LOWER_BOUNDS: [f64; 5] = [0.0, 0.81, 0.90, 0.94, 1.00];
}

/// Altitude power adjustment (Bassett et al. 1999, non-acclimatized athletes)
pub mod altitude {
    /// Quadratic coefficient, altitude in kilometers
    pub const BASSETT_A: f64 = -1.1219;
    /// Linear coefficient
    pub const BASSETT_B: f64 = -1.8991;
    /// Constant term (percent of sea-level VO2max)
    pub const BASSETT_C: f64 = 99.921;
}
