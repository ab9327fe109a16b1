// Host-side tests for the embedded scene registry.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod coords {
    include!("../src/coords.rs");
}
mod calibrate {
    include!("../src/calibrate.rs");
}
mod input {
    include!("../src/input.rs");
}
mod sort {
    include!("../src/sort.rs");
}
mod camera {
    include!("../src/camera.rs");
}
mod scene {
    include!("../src/scene.rs");
}

use camera::CameraMode;
use scene::SceneRegistry;

#[test]
fn builtin_registry_parses() {
    let registry = SceneRegistry::builtin().unwrap();
    let mut names: Vec<_> = registry.names().collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec!["kit_lobby", "pizza", "sagajo_canon", "sagajo_outside"]
    );
}

#[test]
fn lookup_strips_display_size_suffix() {
    let registry = SceneRegistry::builtin().unwrap();
    let plain = registry.get("pizza").unwrap();
    let suffixed = registry.get("pizza (70mb)").unwrap();
    assert_eq!(plain.url, suffixed.url);
}

#[test]
fn unknown_scene_is_an_error() {
    let registry = SceneRegistry::builtin().unwrap();
    assert!(registry.get("atlantis").is_err());
}

#[test]
fn entry_maps_into_camera_config() {
    let registry = SceneRegistry::builtin().unwrap();
    let config = registry.get("kit_lobby").unwrap().camera_config();
    assert_eq!(config.mode, CameraMode::Freefly);
    assert_eq!(config.boundaries.len(), 1);
    assert!((config.psi - (-1.3962634)).abs() < 1e-6);
    assert!((config.origin.x - (-0.34)).abs() < 1e-6);
}
