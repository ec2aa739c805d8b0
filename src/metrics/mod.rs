// ABOUTME: Standard catalog of interval metrics registered with every host registry
// ABOUTME: Groups duration, distance, power, heart rate, and time-in-zone computators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Built-in metric computators.
//!
//! [`standard_registry`] builds the catalog used by the host application.
//! Hosts that add their own metrics start from [`register_standard_metrics`]
//! on a builder and register extras afterwards.

/// Time, distance, speed, elevation, cadence and temperature metrics
pub mod basic;
/// Heart rate averages and training impulse
pub mod heart_rate;
/// Power averages, work, normalized power and derived stress scores
pub mod power;
/// Time spent in each power and heart rate zone
pub mod zones;

use crate::engine::{ComputeContext, MetricComputator};
use crate::registry::{MetricDescriptor, MetricRegistry, MetricRegistryBuilder};
use crate::samples::{reading, Sample};
use pierre_core::errors::AppResult;
use pierre_core::units::UnitConversion;
use zones::{TimeInZone, ZoneKind};

/// Number of time-in-zone metrics registered for power (Coggan L1..L7)
pub const POWER_ZONE_METRICS: usize = 7;
/// Number of time-in-zone metrics registered for heart rate (H1..H5)
pub const HR_ZONE_METRICS: usize = 5;

/// Build the standard registry
///
/// # Errors
///
/// Returns an error if two standard metrics share a symbol
pub fn standard_registry() -> AppResult<MetricRegistry> {
    let mut builder = MetricRegistry::builder();
    register_standard_metrics(&mut builder)?;
    Ok(builder.build())
}

/// Register every standard metric on an existing builder
///
/// # Errors
///
/// Returns an error if a standard symbol is already registered
pub fn register_standard_metrics(builder: &mut MetricRegistryBuilder) -> AppResult<()> {
    register_basic(builder)?;
    register_power(builder)?;
    register_heart_rate(builder)?;
    register_zones(builder)
}

fn register_basic(builder: &mut MetricRegistryBuilder) -> AppResult<()> {
    builder.register(
        MetricDescriptor::new("workout_time", "Duration").as_duration(),
        |ctx: &ComputeContext<'_>| boxed(basic::WorkoutTime::new(ctx.recording_interval)),
    )?;
    builder.register(
        MetricDescriptor::new("total_distance", "Distance")
            .with_conversion(UnitConversion::KM_TO_MILES, "km", "miles")
            .with_precision(2),
        |_: &ComputeContext<'_>| boxed(basic::TotalDistance::default()),
    )?;
    builder.register(
        MetricDescriptor::new("average_speed", "Average Speed")
            .with_conversion(UnitConversion::KPH_TO_MPH, "kph", "mph")
            .with_precision(1),
        |ctx: &ComputeContext<'_>| boxed(basic::AverageSpeed::new(ctx.recording_interval)),
    )?;
    builder.register(
        MetricDescriptor::new("elevation_gain", "Elevation Gain")
            .with_conversion(UnitConversion::METERS_TO_FEET, "meters", "feet"),
        |_: &ComputeContext<'_>| boxed(basic::ElevationGain::default()),
    )?;
    builder.register(
        MetricDescriptor::new("average_cad", "Average Cadence").with_units("rpm"),
        |_: &ComputeContext<'_>| boxed(ChannelAverage::nonzero(|s| s.cadence)),
    )?;
    builder.register(
        MetricDescriptor::new("average_temp", "Average Temp")
            .with_conversion(UnitConversion::CELSIUS_TO_FAHRENHEIT, "C", "F")
            .with_precision(1),
        |_: &ComputeContext<'_>| boxed(ChannelAverage::all(|s| s.temperature)),
    )?;
    Ok(())
}

fn register_power(builder: &mut MetricRegistryBuilder) -> AppResult<()> {
    builder.register(
        MetricDescriptor::new("average_power", "Average Power").with_units("watts"),
        |_: &ComputeContext<'_>| boxed(ChannelAverage::all(|s| s.power)),
    )?;
    builder.register(
        MetricDescriptor::new("max_power", "Max Power").with_units("watts"),
        |_: &ComputeContext<'_>| boxed(ChannelMax::new(|s| s.power)),
    )?;
    builder.register(
        MetricDescriptor::new("total_work", "Work").with_units("kJ"),
        |ctx: &ComputeContext<'_>| boxed(power::TotalWork::new(ctx.recording_interval)),
    )?;
    builder.register(
        MetricDescriptor::new("coggan_np", "Normalized Power").with_units("watts"),
        |ctx: &ComputeContext<'_>| boxed(power::NormalizedPower::from_context(ctx)),
    )?;
    builder.register(
        MetricDescriptor::new("coggan_if", "Intensity Factor").with_precision(3),
        |ctx: &ComputeContext<'_>| boxed(power::IntensityFactor::from_context(ctx)),
    )?;
    builder.register(
        MetricDescriptor::new("coggan_tss", "Training Stress Score"),
        |ctx: &ComputeContext<'_>| boxed(power::TrainingStressScore::from_context(ctx)),
    )?;
    builder.register(
        MetricDescriptor::new("coggan_variability_index", "Variability Index").with_precision(3),
        |ctx: &ComputeContext<'_>| boxed(power::VariabilityIndex::from_context(ctx)),
    )?;
    builder.register(
        MetricDescriptor::new("skiba_xpower", "xPower").with_units("watts"),
        |ctx: &ComputeContext<'_>| boxed(power::XPower::from_context(ctx)),
    )?;
    builder.register(
        MetricDescriptor::new("average_apower", "Altitude Power").with_units("watts"),
        |_: &ComputeContext<'_>| boxed(ChannelAverage::all(|s| s.derived.altitude_power)),
    )?;
    Ok(())
}

fn register_heart_rate(builder: &mut MetricRegistryBuilder) -> AppResult<()> {
    builder.register(
        MetricDescriptor::new("average_hr", "Average Heart Rate").with_units("bpm"),
        |_: &ComputeContext<'_>| boxed(ChannelAverage::nonzero(|s| s.heart_rate)),
    )?;
    builder.register(
        MetricDescriptor::new("max_heartrate", "Max Heartrate").with_units("bpm"),
        |_: &ComputeContext<'_>| boxed(ChannelMax::new(|s| s.heart_rate)),
    )?;
    builder.register(
        MetricDescriptor::new("trimp_points", "TRIMP").with_precision(1),
        |ctx: &ComputeContext<'_>| boxed(heart_rate::Trimp::from_context(ctx)),
    )?;
    Ok(())
}

fn register_zones(builder: &mut MetricRegistryBuilder) -> AppResult<()> {
    for zone in 0..POWER_ZONE_METRICS {
        builder.register(
            MetricDescriptor::new(
                format!("time_in_zone_L{}", zone + 1),
                format!("L{} Time in Zone", zone + 1),
            )
            .as_duration(),
            move |ctx: &ComputeContext<'_>| boxed(TimeInZone::new(ZoneKind::Power, zone, ctx)),
        )?;
    }
    for zone in 0..HR_ZONE_METRICS {
        builder.register(
            MetricDescriptor::new(
                format!("time_in_zone_H{}", zone + 1),
                format!("H{} Time in Zone", zone + 1),
            )
            .as_duration(),
            move |ctx: &ComputeContext<'_>| {
                boxed(TimeInZone::new(ZoneKind::HeartRate, zone, ctx))
            },
        )?;
    }
    Ok(())
}

fn boxed<C: MetricComputator + 'static>(computator: C) -> Box<dyn MetricComputator> {
    Box::new(computator)
}

/// Reads one channel from a sample
pub type ChannelReader = fn(&Sample) -> f64;

/// Mean of a channel over the samples that report it
#[derive(Debug, Clone)]
pub struct ChannelAverage {
    channel: ChannelReader,
    skip_zero: bool,
    sum: f64,
    count: u32,
}

impl ChannelAverage {
    /// Average every present reading, zeros included (power, temperature)
    #[must_use]
    pub fn all(channel: ChannelReader) -> Self {
        Self {
            channel,
            skip_zero: false,
            sum: 0.0,
            count: 0,
        }
    }

    /// Average present, non-zero readings (cadence, heart rate)
    #[must_use]
    pub fn nonzero(channel: ChannelReader) -> Self {
        Self {
            skip_zero: true,
            ..Self::all(channel)
        }
    }
}

impl MetricComputator for ChannelAverage {
    fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }

    fn consume(&mut self, sample: &Sample) {
        if let Some(value) = reading((self.channel)(sample)) {
            if self.skip_zero && value <= 0.0 {
                return;
            }
            self.sum += value;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

/// Maximum of a channel over the samples that report it
#[derive(Debug, Clone)]
pub struct ChannelMax {
    channel: ChannelReader,
    max: Option<f64>,
}

impl ChannelMax {
    /// Track the maximum of `channel`
    #[must_use]
    pub fn new(channel: ChannelReader) -> Self {
        Self { channel, max: None }
    }
}

impl MetricComputator for ChannelMax {
    fn reset(&mut self) {
        self.max = None;
    }

    fn consume(&mut self, sample: &Sample) {
        if let Some(value) = reading((self.channel)(sample)) {
            self.max = Some(self.max.map_or(value, |max| max.max(value)));
        }
    }

    fn value(&self) -> Option<f64> {
        self.max
    }
}

/// Drive a computator through one full reset/consume/finalize cycle
#[cfg(test)]
pub(crate) fn run_over(computator: &mut dyn MetricComputator, samples: &[Sample]) -> Option<f64> {
    computator.reset();
    for sample in samples {
        computator.consume(sample);
    }
    computator.finalize();
    computator.value()
}
