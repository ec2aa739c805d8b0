// ABOUTME: Core types and constants for the Pierre interval engine
// ABOUTME: Foundation crate with error handling, unit conversion, athlete zones, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Core
//!
//! Foundation crate providing shared types and constants for the Pierre interval
//! engine. This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Sample sentinels, unit factors, and physiological defaults
//! - **units**: Metric/imperial conversion rules as pure functions
//! - **zones**: Athlete power and heart-rate zone definitions

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Unit conversion rules between metric and imperial systems
pub mod units;

/// Athlete training zone configuration (power and heart rate)
pub mod zones;
