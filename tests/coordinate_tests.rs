// Host-side tests for the coordinate frame and boundary math.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod coords {
    include!("../src/coords.rs");
}

use coords::*;
use glam::Vec3;

fn assert_close(a: Vec3, b: Vec3, eps: f32) {
    assert!(
        (a - b).length() < eps,
        "expected {b:?}, got {a:?} (eps {eps})"
    );
}

#[test]
fn basis_is_orthonormal() {
    let frame = CoordinateFrame::build(
        Vec3::new(-0.34, -0.48, -1.8853),
        Vec3::new(-1.2407, -0.295, 3.021),
        -1.3962634,
    );
    assert!((frame.front.length() - 1.0).abs() < 1e-5);
    assert!((frame.left.length() - 1.0).abs() < 1e-5);
    assert!((frame.above.length() - 1.0).abs() < 1e-5);
    assert!(frame.front.dot(frame.left).abs() < 1e-5);
    assert!(frame.front.dot(frame.above).abs() < 1e-5);
    assert!(frame.left.dot(frame.above).abs() < 1e-5);
}

#[test]
fn near_vertical_front_uses_fallback_axis() {
    // front almost exactly +Z; the Z cross product would be degenerate
    let frame = CoordinateFrame::build(Vec3::ZERO, Vec3::new(0.0001, 0.0, 1.0), 0.0);
    assert!((frame.left.length() - 1.0).abs() < 1e-5);
    assert!(frame.front.dot(frame.left).abs() < 1e-4);
}

#[test]
fn roll_rotates_left_about_front() {
    let no_roll = CoordinateFrame::build(Vec3::ZERO, Vec3::X, 0.0);
    let rolled = CoordinateFrame::build(Vec3::ZERO, Vec3::X, std::f32::consts::FRAC_PI_2);
    // quarter-turn roll maps the unrolled left onto (minus) the unrolled above
    assert_close(rolled.left, -no_roll.above, 1e-5);
    assert_close(rolled.front, no_roll.front, 1e-6);
}

#[test]
fn local_global_round_trip() {
    let frame = CoordinateFrame::build(
        Vec3::new(1.5227, -0.30686, -0.6966),
        Vec3::new(1.2345, -0.318449, 0.0922),
        -1.7453293,
    );
    for p in [
        Vec3::ZERO,
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(-4.2, 0.0, 17.0),
    ] {
        assert_close(frame.convert_to_global(frame.convert_to_local(p)), p, 1e-4);
        assert_close(frame.convert_to_local(frame.convert_to_global(p)), p, 1e-4);
    }
}

#[test]
fn frame_origin_maps_to_local_zero() {
    let origin = Vec3::new(-2.035, -0.5125, -2.3918);
    let frame = CoordinateFrame::build(origin, Vec3::new(1.9, 0.565, 2.159), 1.5707964);
    assert_close(frame.convert_to_local(origin), Vec3::ZERO, 1e-5);
}

#[test]
fn boundary_edges_are_inclusive() {
    let b = Boundary {
        min: [-1.0, -1.0, -1.0],
        max: [1.0, 1.0, 1.0],
    };
    assert!(b.contains(Vec3::new(1.0, -1.0, 0.0)));
    assert!(b.contains(Vec3::new(0.5, 0.5, 0.5)));
    assert!(!b.contains(Vec3::new(2.0, 0.0, 0.0)));
    assert!(!b.contains(Vec3::new(0.0, 0.0, -1.0001)));
}

#[test]
fn any_boundary_accepts() {
    let boxes = [
        Boundary {
            min: [0.0, 0.0, 0.0],
            max: [1.0, 1.0, 1.0],
        },
        Boundary {
            min: [5.0, 5.0, 5.0],
            max: [6.0, 6.0, 6.0],
        },
    ];
    assert!(accepts_any(&boxes, Vec3::new(0.5, 0.5, 0.5)));
    assert!(accepts_any(&boxes, Vec3::new(5.5, 5.5, 5.5)));
    assert!(!accepts_any(&boxes, Vec3::new(3.0, 3.0, 3.0)));
}

#[test]
fn empty_boundary_list_rejects_everything() {
    assert!(!accepts_any(&[], Vec3::ZERO));
}
