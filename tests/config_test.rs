// ABOUTME: Tests for environment-driven configuration of the engine, athlete zones and logging
// ABOUTME: Runs serially because every test mutates process environment variables
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pierre_core::errors::ErrorCode;
use pierre_core::units::UnitSystem;
use pierre_core::zones::{HeartRateZones, PowerZones};
use pierre_interval_engine::config::EngineConfig;
use pierre_interval_engine::logging::{LogFormat, LoggingConfig, SERVICE_NAME};
use pierre_interval_engine::ride::Athlete;
use serial_test::serial;
use std::env;

const ENGINE_VARS: [&str; 4] = [
    "INTERVAL_ENGINE_NP_WINDOW_SECS",
    "INTERVAL_ENGINE_XPOWER_WINDOW_SECS",
    "INTERVAL_ENGINE_PARALLEL_METRICS",
    "INTERVAL_ENGINE_IMPERIAL_UNITS",
];

const ATHLETE_VARS: [&str; 5] = [
    "ATHLETE_NAME",
    "ATHLETE_FTP",
    "ATHLETE_LTHR",
    "ATHLETE_MAX_HR",
    "ATHLETE_RESTING_HR",
];

fn clear(vars: &[&str]) {
    for var in vars {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_engine_config_defaults() {
    clear(&ENGINE_VARS);

    let config = EngineConfig::from_env();

    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.np_window_secs, 30);
    assert_eq!(config.xpower_window_secs, 25);
    assert!(config.parallel_metrics);
    assert_eq!(config.default_units, UnitSystem::Metric);
}

#[test]
#[serial]
fn test_engine_config_from_env() {
    env::set_var("INTERVAL_ENGINE_NP_WINDOW_SECS", "20");
    env::set_var("INTERVAL_ENGINE_XPOWER_WINDOW_SECS", "0");
    env::set_var("INTERVAL_ENGINE_PARALLEL_METRICS", "false");
    env::set_var("INTERVAL_ENGINE_IMPERIAL_UNITS", "true");

    let config = EngineConfig::from_env();

    assert_eq!(config.np_window_secs, 20);
    // zero falls back to the default
    assert_eq!(config.xpower_window_secs, 25);
    assert!(!config.parallel_metrics);
    assert!(config.default_units.is_imperial());

    clear(&ENGINE_VARS);
}

#[test]
fn test_engine_config_from_json() {
    let json = r#"{
        "np_window_secs": 45,
        "xpower_window_secs": 25,
        "parallel_metrics": false,
        "default_units": "imperial"
    }"#;
    let config = EngineConfig::from_json(json).unwrap();
    assert_eq!(config.np_window_secs, 45);
    assert_eq!(config.default_units, UnitSystem::Imperial);

    let zero = json.replace("45", "0");
    assert_eq!(
        EngineConfig::from_json(&zero).unwrap_err().code,
        ErrorCode::ConfigInvalid
    );
    assert_eq!(
        EngineConfig::from_json("{").unwrap_err().code,
        ErrorCode::SerializationError
    );
}

#[test]
#[serial]
fn test_athlete_from_env() {
    env::set_var("ATHLETE_NAME", "Test Rider");
    env::set_var("ATHLETE_FTP", "300");
    env::set_var("ATHLETE_LTHR", "165");
    env::set_var("ATHLETE_MAX_HR", "185");
    env::set_var("ATHLETE_RESTING_HR", "50");

    let athlete = Athlete::from_env();

    assert_eq!(athlete.name, "Test Rider");
    assert!((athlete.power_zones.ftp - 300.0).abs() < f64::EPSILON);
    assert_eq!(athlete.power_zones.zone_for(310.0), Some(3));
    assert!((athlete.hr_zones.lthr - 165.0).abs() < f64::EPSILON);
    assert!((athlete.hr_zones.resting_hr - 50.0).abs() < f64::EPSILON);

    clear(&ATHLETE_VARS);
}

#[test]
#[serial]
fn test_inconsistent_heart_rates_fall_back_to_defaults() {
    env::set_var("ATHLETE_LTHR", "200");
    env::set_var("ATHLETE_MAX_HR", "180");
    env::set_var("ATHLETE_FTP", "not a number");

    assert_eq!(HeartRateZones::from_env(), HeartRateZones::default());
    assert_eq!(PowerZones::from_env(), PowerZones::default());

    clear(&ATHLETE_VARS);
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    env::set_var("RUST_LOG", "debug");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("LOG_INCLUDE_LOCATION", "1");

    let config = LoggingConfig::from_env();

    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Json);
    assert!(config.include_location);
    assert!(!config.include_thread);
    assert_eq!(config.service_name, SERVICE_NAME);

    env::remove_var("RUST_LOG");
    env::remove_var("LOG_FORMAT");
    env::remove_var("LOG_INCLUDE_LOCATION");
}

#[test]
#[serial]
fn test_default_logging_config() {
    env::remove_var("LOG_FORMAT");

    let config = LoggingConfig::default();

    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.service_version, env!("CARGO_PKG_VERSION"));
    assert!(matches!(LoggingConfig::from_env().format, LogFormat::Pretty));
}
