// Host-side tests for the sort dispatch protocol and worker message shape.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod sort {
    include!("../src/sort.rs");
}

use glam::Mat4;
use sort::*;

#[test]
fn fresh_coordinator_needs_initial_sort() {
    let mut c = SortCoordinator::new();
    assert!(c.needs_update());
    assert!(c.should_dispatch(true));
    assert!(!c.needs_update());
    assert!(c.in_flight());
}

#[test]
fn dispatch_fires_exactly_once_per_dirty() {
    let mut c = SortCoordinator::new();
    assert!(c.should_dispatch(true));
    assert!(!c.should_dispatch(true));
    c.complete();
    // clean and idle: still nothing to do
    assert!(!c.should_dispatch(true));
}

#[test]
fn small_rotation_stays_clean() {
    let mut c = SortCoordinator::new();
    c.should_dispatch(true);
    c.complete();
    // identical view direction
    c.observe(&Mat4::IDENTITY);
    assert!(!c.needs_update());
    // well under the threshold
    c.observe(&Mat4::from_rotation_x(0.001));
    assert!(!c.needs_update());
}

#[test]
fn large_rotation_marks_dirty() {
    let mut c = SortCoordinator::new();
    c.should_dispatch(true);
    c.complete();
    c.observe(&Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2));
    assert!(c.needs_update());
    assert!(c.should_dispatch(true));
}

#[test]
fn dirtying_during_flight_coalesces_into_one_followup() {
    let mut c = SortCoordinator::new();
    assert!(c.should_dispatch(true));

    // several dirtying rotations while the worker is busy
    c.observe(&Mat4::from_rotation_x(0.5));
    c.observe(&Mat4::from_rotation_x(1.0));
    c.observe(&Mat4::from_rotation_x(1.5));
    assert!(!c.should_dispatch(true));

    c.complete();
    assert!(c.should_dispatch(true));
    assert!(!c.should_dispatch(true));
}

#[test]
fn no_dispatch_until_the_cloud_is_loaded() {
    let mut c = SortCoordinator::new();
    // scene still downloading: dispatching now would never complete
    assert!(!c.should_dispatch(false));
    assert!(!c.in_flight());
    // the need is not forgotten while refused
    assert!(c.needs_update());
    c.observe(&Mat4::from_rotation_x(1.0));
    assert!(!c.should_dispatch(false));

    // first frame after the load dispatches normally
    assert!(c.should_dispatch(true));
    assert!(c.in_flight());
}

#[test]
fn request_serializes_with_contract_field_names() {
    let request = SortRequest {
        view_matrix: [0.0; 16],
        max_gaussians: 250_000,
        sorting_algorithm: SortAlgorithm::CountSort,
    };
    let value = serde_json::to_value(&request).unwrap();
    assert!(value.get("viewMatrix").is_some());
    assert_eq!(value["maxGaussians"], 250_000);
    assert_eq!(value["sortingAlgorithm"], "count sort");

    let quick = serde_json::to_value(SortAlgorithm::QuickSort).unwrap();
    assert_eq!(quick, "quick sort");
}
