// ABOUTME: Engine configuration loaded from environment variables with documented defaults
// ABOUTME: Controls algorithm windows, parallel metric evaluation, and default display units
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::constants::physiology::{NORMALIZED_POWER_WINDOW_SECS, XPOWER_WINDOW_SECS};
use pierre_core::errors::{AppError, AppResult};
use pierre_core::units::UnitSystem;
use serde::{Deserialize, Serialize};
use std::env;

/// Interval engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rolling window for normalized power, in seconds
    pub np_window_secs: u32,
    /// Smoothing window for xPower, in seconds
    pub xpower_window_secs: u32,
    /// Evaluate registered metrics on the rayon pool instead of sequentially
    pub parallel_metrics: bool,
    /// Unit system used when a consumer does not say otherwise
    pub default_units: UnitSystem,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            np_window_secs: NORMALIZED_POWER_WINDOW_SECS,
            xpower_window_secs: XPOWER_WINDOW_SECS,
            parallel_metrics: true,
            default_units: UnitSystem::Metric,
        }
    }
}

impl EngineConfig {
    /// Load engine configuration from environment
    ///
    /// Unparseable or zero windows fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            np_window_secs: env::var("INTERVAL_ENGINE_NP_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(NORMALIZED_POWER_WINDOW_SECS),
            xpower_window_secs: env::var("INTERVAL_ENGINE_XPOWER_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(XPOWER_WINDOW_SECS),
            parallel_metrics: env::var("INTERVAL_ENGINE_PARALLEL_METRICS")
                .map_or(true, |v| v != "false" && v != "0"),
            default_units: UnitSystem::from_imperial_flag(
                env::var("INTERVAL_ENGINE_IMPERIAL_UNITS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
            ),
        }
    }

    /// Parse configuration from a JSON document
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a window is zero
    pub fn from_json(json: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that both algorithm windows are non-zero
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the invalid window
    pub fn validate(&self) -> AppResult<()> {
        if self.np_window_secs == 0 {
            return Err(AppError::config_invalid(
                "normalized power window must be at least one second",
            ));
        }
        if self.xpower_window_secs == 0 {
            return Err(AppError::config_invalid(
                "xPower window must be at least one second",
            ));
        }
        Ok(())
    }
}
