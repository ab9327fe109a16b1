use std::collections::HashMap;

use anyhow::{anyhow, Result};
use glam::Vec3;
use serde::Deserialize;

use super::camera::{CameraConfig, CameraMode};
use super::coords::Boundary;

static SCENES_JSON: &str = include_str!("../assets/scenes.json");

fn default_camera_min() -> [f32; 3] {
    [-100.0, -100.0, -100.0]
}

fn default_camera_max() -> [f32; 3] {
    [100.0, 100.0, 100.0]
}

/// One named scene: where to fetch the .ply from plus the camera
/// parameters anchored to that capture.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEntry {
    pub url: String,
    pub origin: [f32; 3],
    pub origin_x: [f32; 3],
    #[serde(default)]
    pub psi: f32,
    #[serde(default)]
    pub boundaries: Vec<Boundary>,
    #[serde(default = "default_camera_min")]
    pub camera_min: [f32; 3],
    #[serde(default = "default_camera_max")]
    pub camera_max: [f32; 3],
    pub default_camera_mode: CameraMode,
}

impl SceneEntry {
    pub fn camera_config(&self) -> CameraConfig {
        CameraConfig {
            origin: Vec3::from_array(self.origin),
            origin_x: Vec3::from_array(self.origin_x),
            psi: self.psi,
            boundaries: self.boundaries.clone(),
            camera_min: Vec3::from_array(self.camera_min),
            camera_max: Vec3::from_array(self.camera_max),
            mode: self.default_camera_mode,
        }
    }
}

/// Named scene registry, parsed from the embedded configuration.
pub struct SceneRegistry {
    scenes: HashMap<String, SceneEntry>,
}

impl SceneRegistry {
    pub fn builtin() -> Result<Self> {
        let scenes: HashMap<String, SceneEntry> = serde_json::from_str(SCENES_JSON)
            .map_err(|e| anyhow!("scene registry parse error: {e}"))?;
        Ok(Self { scenes })
    }

    /// Look up a scene by display name; a missing scene is a fatal
    /// configuration error, not retried. Display names may carry a
    /// parenthesized size suffix which is stripped before lookup.
    pub fn get(&self, name: &str) -> Result<&SceneEntry> {
        let key = name.split('(').next().unwrap_or(name).trim();
        self.scenes
            .get(key)
            .ok_or_else(|| anyhow!("unknown scene '{key}'"))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }
}
