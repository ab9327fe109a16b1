// Host-side tests for the progressive-resolution ramp.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod scheduler {
    include!("../src/scheduler.rs");
}

use constants::BASE_RENDER_RESOLUTION;
use scheduler::{next_resolution, should_refine};

#[test]
fn ramp_from_base_reaches_full_resolution() {
    // 0.2 quantizes to 0.25 but that step is too small, so it jumps to 0.5
    let mut r = BASE_RENDER_RESOLUTION;
    let mut steps = Vec::new();
    while should_refine(next_resolution(r), false, false) {
        r = next_resolution(r);
        steps.push(r);
    }
    assert_eq!(steps, vec![0.5, 0.75, 1.0]);
}

#[test]
fn ramp_is_strictly_increasing() {
    for r in [0.1_f32, 0.2, 0.25, 0.3, 0.5, 0.75, 0.9] {
        assert!(next_resolution(r) > r, "ramp stalled at {r}");
    }
}

#[test]
fn tiny_increment_gets_bumped_a_full_step() {
    // 0.24 -> 0.25 would only gain 0.01; bump to 0.5 instead
    assert_eq!(next_resolution(0.24), 0.5);
    // 0.3 -> 0.5 is already a worthwhile increment
    assert_eq!(next_resolution(0.3), 0.5);
}

#[test]
fn refinement_stops_at_full_resolution() {
    assert!(should_refine(1.0, false, false));
    assert!(!should_refine(next_resolution(1.0), false, false));
}

#[test]
fn refinement_waits_for_sort_to_settle() {
    assert!(!should_refine(0.5, true, false));
    assert!(!should_refine(0.5, false, true));
    assert!(!should_refine(0.5, true, true));
    assert!(should_refine(0.5, false, false));
}
