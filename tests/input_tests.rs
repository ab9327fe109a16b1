// Host-side tests for polled input snapshots.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use input::*;

#[test]
fn movement_codes_map_to_flags() {
    let mut keys = KeyState::default();
    assert!(keys.set_code("KeyW", true));
    assert!(keys.forward);
    assert!(keys.set_code("KeyS", true));
    assert!(keys.back);
    assert!(keys.set_code("KeyA", true));
    assert!(keys.left);
    assert!(keys.set_code("KeyD", true));
    assert!(keys.right);
    assert!(keys.set_code("KeyQ", true));
    assert!(keys.roll_left);
    assert!(keys.set_code("KeyR", true));
    assert!(keys.roll_right);
    assert!(keys.set_code("ShiftLeft", true));
    assert!(keys.rise);
    assert!(keys.set_code("Space", true));
    assert!(keys.sink);

    assert!(keys.set_code("KeyW", false));
    assert!(!keys.forward);
}

#[test]
fn unmapped_codes_are_reported() {
    let mut keys = KeyState::default();
    assert!(!keys.set_code("KeyZ", true));
    assert!(!keys.set_code("Escape", true));
    assert!(!keys.any_down());
}

#[test]
fn any_down_and_clear() {
    let mut keys = KeyState::default();
    assert!(!keys.any_down());
    keys.set_code("Space", true);
    assert!(keys.any_down());
    keys.clear();
    assert!(!keys.any_down());
}
