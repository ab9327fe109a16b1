use glam::Vec3;

/// Main-thread view of the loaded splat cloud.
///
/// The attribute buffers proper live on the GPU (uploaded straight from the
/// sort worker's response); positions and opacities are mirrored here in
/// sorted order because the calibration raycast walks them on the main
/// thread.
#[derive(Clone, Debug, Default)]
pub struct SplatCloud {
    pub count: usize,
    pub positions: Vec<f32>,
    pub opacities: Vec<f32>,
    pub scene_min: Vec3,
    pub scene_max: Vec3,
}

impl SplatCloud {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
