// ABOUTME: Common benchmark utilities and test fixtures for performance testing
// ABOUTME: Provides reusable ride generators and engine setup for Criterion benchmarks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Common benchmark utilities and test fixtures.
//!
//! Provides reusable ride generators and engine setup for Criterion benchmarks.

pub mod fixtures;
