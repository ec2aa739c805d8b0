// ABOUTME: Integration tests for the interval store entry points used by editors
// ABOUTME: Covers saved-bound write-through, renames, removal, duplication and sample reloads
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{approx, loaded_ride, standard_engine, steady_samples, unloaded_ride};
use pierre_core::errors::ErrorCode;
use pierre_interval_engine::interval::{Color, IntervalBounds, IntervalState, IntervalType};
use pierre_interval_engine::store::IntervalStore;

fn store_with_ride(seconds: u32) -> IntervalStore {
    IntervalStore::new(
        loaded_ride(steady_samples(seconds, 200.0, 140.0)),
        standard_engine(),
    )
}

fn secs(start: f64, stop: f64) -> IntervalBounds {
    IntervalBounds::from_secs(start, stop).unwrap()
}

#[test]
fn test_user_interval_is_saved_with_the_ride() {
    let mut store = store_with_ride(600);

    let index = store
        .add_interval("Climb", IntervalType::User, secs(60.0, 180.0), Color::BLACK)
        .unwrap();

    let interval = store.interval(index).unwrap();
    let key = interval.persisted_bound().unwrap();
    let saved = store.ride().ride().unwrap().interval(key).unwrap();
    assert_eq!(saved.name, "Climb");
    assert_eq!(saved.kind, IntervalType::User);
    assert!(store.ride().is_dirty());
    assert_eq!(interval.state(), IntervalState::Refreshed);
    assert!(approx(interval.value_for("workout_time", false), 120.0));
}

#[test]
fn test_bounds_edit_writes_through_for_user_intervals() {
    let mut store = store_with_ride(600);
    let index = store
        .add_interval("Effort", IntervalType::User, secs(10.0, 100.0), Color::BLACK)
        .unwrap();
    store.ride_mut().set_dirty(false);

    store
        .set_interval_bounds(index, "Effort", 100.0, 200.0, 1.0, 2.0)
        .unwrap();

    let interval = store.interval(index).unwrap();
    let saved = store
        .ride()
        .ride()
        .unwrap()
        .interval(interval.persisted_bound().unwrap())
        .unwrap();
    assert!(approx(saved.start, 100.0));
    assert!(approx(saved.stop, 200.0));
    assert!(store.ride().is_dirty());
    // distance bounds live in memory only
    assert!(approx(interval.bounds().start_km(), 1.0));
    assert!(approx(interval.bounds().stop_km(), 2.0));
    assert!(approx(interval.value_for("workout_time", false), 100.0));
}

#[test]
fn test_bounds_edit_on_system_interval_stays_in_memory() {
    let mut store = store_with_ride(600);
    let index = store
        .add_interval("Lap 1", IntervalType::Lap, secs(0.0, 300.0), Color::BLACK)
        .unwrap();
    assert!(store.interval(index).unwrap().persisted_bound().is_none());
    assert!(!store.ride().is_dirty());

    store
        .set_interval_bounds(index, "Lap 1", 0.0, 120.0, 0.0, 1.2)
        .unwrap();

    assert!(!store.ride().is_dirty());
    assert_eq!(store.ride().ride().unwrap().intervals().count(), 0);
    let interval = store.interval(index).unwrap();
    assert!(approx(interval.value_for("workout_time", false), 120.0));
}

#[test]
fn test_invalid_edits_are_rejected() {
    let mut store = store_with_ride(60);
    let index = store
        .add_interval("Lap", IntervalType::Lap, secs(0.0, 30.0), Color::BLACK)
        .unwrap();

    let err = store
        .set_interval_bounds(index, "Lap", 40.0, 20.0, 0.0, 0.0)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    assert!(approx(store.interval(index).unwrap().bounds().stop(), 30.0));

    let err = store
        .set_interval_bounds(7, "Lap", 0.0, 20.0, 0.0, 0.0)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(store.rename(7, "Nope").is_err());
}

#[test]
fn test_rename_writes_through_for_linked_user_intervals() {
    let mut store = store_with_ride(120);
    let index = store
        .add_interval("Old", IntervalType::User, secs(0.0, 60.0), Color::BLACK)
        .unwrap();
    store.ride_mut().set_dirty(false);

    store.rename(index, "New").unwrap();

    let interval = store.interval(index).unwrap();
    assert_eq!(interval.name(), "New");
    let saved = store
        .ride()
        .ride()
        .unwrap()
        .interval(interval.persisted_bound().unwrap())
        .unwrap();
    assert_eq!(saved.name, "New");
    assert!(store.ride().is_dirty());
}

#[test]
fn test_rename_selected_numbers_in_display_order() {
    let mut store = store_with_ride(600);
    for start in [0.0, 100.0, 200.0] {
        store
            .add_interval("Lap", IntervalType::Lap, secs(start, start + 50.0), Color::BLACK)
            .unwrap();
    }
    store.interval_mut(0).unwrap().selected = true;
    store.interval_mut(2).unwrap().selected = true;

    let renamed = store.rename_selected("Sprint");

    assert_eq!(renamed, 2);
    let names: Vec<&str> = store.intervals().iter().map(|i| i.name()).collect();
    assert_eq!(names, ["Sprint 1", "Lap", "Sprint 2"]);
}

#[test]
fn test_remove_interval_drops_saved_bound_and_renumbers() {
    let mut store = store_with_ride(600);
    let first = store
        .add_interval("A", IntervalType::User, secs(0.0, 60.0), Color::BLACK)
        .unwrap();
    store
        .add_interval("B", IntervalType::Lap, secs(60.0, 120.0), Color::BLACK)
        .unwrap();

    let removed = store.remove_interval(first).unwrap();

    assert_eq!(removed.name(), "A");
    assert!(removed.persisted_bound().is_none());
    assert_eq!(store.ride().ride().unwrap().intervals().count(), 0);
    assert_eq!(store.len(), 1);
    assert_eq!(store.interval(0).unwrap().display_sequence, 0);
    assert!(store.remove_interval(5).is_err());
}

#[test]
fn test_duplicate_interval_is_unlinked_copy() {
    let mut store = store_with_ride(600);
    let index = store
        .add_interval("Original", IntervalType::User, secs(0.0, 60.0), Color::rgb(1, 2, 3))
        .unwrap();
    store.interval_mut(index).unwrap().selected = true;

    let copy_index = store.duplicate_interval(index).unwrap();

    let original = store.interval(index).unwrap();
    let copy = store.interval(copy_index).unwrap();
    assert_eq!(copy.name(), "Original");
    assert_eq!(copy.metrics(), original.metrics());
    assert_eq!(copy.color, Color::rgb(1, 2, 3));
    assert_eq!(copy.display_sequence, 1);
    assert!(copy.persisted_bound().is_none());
    assert!(!copy.selected);
    assert!(store.duplicate_interval(9).is_err());
}

#[test]
fn test_replace_samples_refreshes_every_interval() {
    let mut store = store_with_ride(600);
    let index = store
        .add_interval("Block", IntervalType::Lap, secs(0.0, 300.0), Color::BLACK)
        .unwrap();
    assert!(approx(
        store.interval(index).unwrap().value_for("average_power", false),
        200.0
    ));

    let refreshed = store
        .replace_samples(steady_samples(600, 300.0, 160.0))
        .unwrap();

    assert_eq!(refreshed, 1);
    let interval = store.interval(index).unwrap();
    assert_eq!(interval.state(), IntervalState::Refreshed);
    assert!(approx(interval.value_for("average_power", false), 300.0));
    let first = store.ride().samples().unwrap().get(0).unwrap();
    assert!(first.derived.normalized_power > 0.0);
}

#[test]
fn test_store_without_ride_data() {
    let mut store = IntervalStore::new(unloaded_ride(), standard_engine());

    let index = store
        .add_interval("Planned", IntervalType::User, secs(0.0, 60.0), Color::BLACK)
        .unwrap();

    let interval = store.interval(index).unwrap();
    assert!(interval.persisted_bound().is_none());
    assert_eq!(interval.state(), IntervalState::Populated);
    assert!(!store.ride().is_dirty());
    assert_eq!(store.refresh_all(), 0);
    assert!(store.replace_samples(steady_samples(10, 1.0, 1.0)).is_err());
}
