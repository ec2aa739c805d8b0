// ABOUTME: Catalog of metric descriptors and computator factories with dense indices
// ABOUTME: Built once through a builder, then shared read-only across every computation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Metric Registry
//!
//! Each registered metric pairs an immutable [`MetricDescriptor`] with a
//! factory that creates a fresh computator per engine call. Registration order
//! assigns the dense index every interval uses to address its cached value.
//!
//! The registry is assembled with [`MetricRegistryBuilder`] and frozen by
//! [`MetricRegistryBuilder::build`]; there is no way to mutate it afterwards,
//! so an `Arc<MetricRegistry>` can be read from any thread.

use crate::engine::{ComputeContext, MetricComputator};
use pierre_core::errors::{AppError, AppResult};
use pierre_core::units::{convert, UnitConversion, UnitSystem};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Placeholder text returned for values that cannot be looked up
pub const PLACEHOLDER: &str = "-";

/// Creates a computator for one engine call
pub type MetricFactory =
    Arc<dyn Fn(&ComputeContext<'_>) -> Box<dyn MetricComputator> + Send + Sync>;

/// How a metric value is rendered as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ValueFormat {
    /// Fixed-point number followed by the unit label
    Decimal {
        /// Digits after the decimal point
        precision: usize,
    },
    /// Seconds rendered as `h:mm:ss`
    Duration,
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self::Decimal { precision: 0 }
    }
}

/// Immutable identity and presentation rules of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDescriptor {
    symbol: String,
    name: String,
    conversion: UnitConversion,
    metric_units: String,
    imperial_units: String,
    format: ValueFormat,
    index: usize,
}

impl MetricDescriptor {
    /// Describe a unitless metric; the index is assigned on registration
    #[must_use]
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            conversion: UnitConversion::None,
            metric_units: String::new(),
            imperial_units: String::new(),
            format: ValueFormat::default(),
            index: 0,
        }
    }

    /// Same unit label in both systems, no conversion
    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        let units = units.into();
        self.metric_units.clone_from(&units);
        self.imperial_units = units;
        self.conversion = UnitConversion::None;
        self
    }

    /// Distinct unit labels joined by a conversion rule
    #[must_use]
    pub fn with_conversion(
        mut self,
        conversion: UnitConversion,
        metric_units: impl Into<String>,
        imperial_units: impl Into<String>,
    ) -> Self {
        self.conversion = conversion;
        self.metric_units = metric_units.into();
        self.imperial_units = imperial_units.into();
        self
    }

    /// Render with a fixed number of decimals
    #[must_use]
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.format = ValueFormat::Decimal { precision };
        self
    }

    /// Render as a duration
    #[must_use]
    pub fn as_duration(mut self) -> Self {
        self.format = ValueFormat::Duration;
        self
    }

    /// Unique symbol
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dense index into every interval's cached value array
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Metric-to-imperial conversion rule
    #[must_use]
    pub const fn conversion(&self) -> UnitConversion {
        self.conversion
    }

    /// Text rendering rule
    #[must_use]
    pub const fn format(&self) -> ValueFormat {
        self.format
    }

    /// Unit label for the requested system
    #[must_use]
    pub fn units(&self, system: UnitSystem) -> &str {
        match system {
            UnitSystem::Metric => &self.metric_units,
            UnitSystem::Imperial => &self.imperial_units,
        }
    }

    /// Convert a stored metric-unit value into the requested system
    #[must_use]
    pub fn convert(&self, value: f64, system: UnitSystem) -> f64 {
        convert(self.conversion, value, system)
    }

    /// Format a stored metric-unit value, converting it first
    ///
    /// Non-finite values render as zero.
    #[must_use]
    pub fn format_value(&self, value: f64, system: UnitSystem) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        let converted = self.convert(value, system);
        match self.format {
            ValueFormat::Duration => format_duration(converted),
            ValueFormat::Decimal { precision } => {
                let units = self.units(system);
                if units.is_empty() {
                    format!("{converted:.precision$}")
                } else {
                    format!("{converted:.precision$} {units}")
                }
            }
        }
    }
}

/// Render seconds as `h:mm:ss`
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() {
        seconds.max(0.0).round() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

/// Read-only catalog of registered metrics
pub struct MetricRegistry {
    descriptors: Vec<MetricDescriptor>,
    factories: Vec<MetricFactory>,
    by_symbol: HashMap<String, usize>,
}

impl MetricRegistry {
    /// Start building a registry
    #[must_use]
    pub fn builder() -> MetricRegistryBuilder {
        MetricRegistryBuilder::default()
    }

    /// Number of registered metrics, which is also every cached array's length
    #[must_use]
    pub fn metric_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no metric is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor registered under `symbol`
    #[must_use]
    pub fn descriptor(&self, symbol: &str) -> Option<&MetricDescriptor> {
        self.by_symbol
            .get(symbol)
            .and_then(|index| self.descriptors.get(*index))
    }

    /// Descriptor at a dense index
    #[must_use]
    pub fn descriptor_at(&self, index: usize) -> Option<&MetricDescriptor> {
        self.descriptors.get(index)
    }

    /// All descriptors in index order
    #[must_use]
    pub fn descriptors(&self) -> &[MetricDescriptor] {
        &self.descriptors
    }

    /// Factory for the metric at a dense index
    #[must_use]
    pub fn factory_at(&self, index: usize) -> Option<&MetricFactory> {
        self.factories.get(index)
    }
}

impl fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricRegistry")
            .field("descriptors", &self.descriptors)
            .finish_non_exhaustive()
    }
}

/// Accumulates metric registrations before freezing them into a registry
#[derive(Default)]
pub struct MetricRegistryBuilder {
    descriptors: Vec<MetricDescriptor>,
    factories: Vec<MetricFactory>,
    by_symbol: HashMap<String, usize>,
}

impl MetricRegistryBuilder {
    /// Register a metric and return its dense index
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is empty or already registered
    pub fn register<F>(&mut self, descriptor: MetricDescriptor, factory: F) -> AppResult<usize>
    where
        F: Fn(&ComputeContext<'_>) -> Box<dyn MetricComputator> + Send + Sync + 'static,
    {
        if descriptor.symbol.is_empty() {
            return Err(AppError::invalid_input("metric symbol must not be empty"));
        }
        if self.by_symbol.contains_key(&descriptor.symbol) {
            return Err(AppError::already_exists(format!(
                "metric '{}'",
                descriptor.symbol
            )));
        }

        let index = self.descriptors.len();
        let mut descriptor = descriptor;
        descriptor.index = index;
        self.by_symbol.insert(descriptor.symbol.clone(), index);
        self.descriptors.push(descriptor);
        self.factories.push(Arc::new(factory));
        Ok(index)
    }

    /// Number of metrics registered so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether nothing has been registered yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Freeze the registrations
    #[must_use]
    pub fn build(self) -> MetricRegistry {
        info!(metric_count = self.descriptors.len(), "Metric registry built");
        MetricRegistry {
            descriptors: self.descriptors,
            factories: self.factories,
            by_symbol: self.by_symbol,
        }
    }
}
