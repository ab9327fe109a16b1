use glam::{Mat3, Mat4, Quat, Vec3};

use super::calibrate::rotate_align;
use super::constants::*;
use super::coords::{accepts_any, Boundary, CoordinateFrame};
use super::input::KeyState;
use super::sort::SortCoordinator;

/// Movement mode, fixed at configuration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    /// Drag rotates around the lookat point, wheel zooms.
    Orbit,
    /// Mouse look plus WASD movement along the camera's own basis.
    Freefly,
}

/// Per-scene camera configuration: the reference frame, movement
/// boundaries, orbit-angle limits, and the default mode.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub origin: Vec3,
    pub origin_x: Vec3,
    pub psi: f32,
    pub boundaries: Vec<Boundary>,
    pub camera_min: Vec3,
    pub camera_max: Vec3,
    pub mode: CameraMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            origin_x: Vec3::X,
            psi: 0.0,
            boundaries: Vec::new(),
            camera_min: Vec3::splat(-100.0),
            camera_max: Vec3::splat(100.0),
            mode: CameraMode::Freefly,
        }
    }
}

/// The dual-mode camera: owns the scene's coordinate frame, the current
/// pose, and the derived matrices handed to the renderer each frame.
///
/// `position` is stored in local space so boundary checks are a plain box
/// test; everything the renderer sees is world space.
pub struct Camera {
    frame: CoordinateFrame,
    boundaries: Vec<Boundary>,

    pub position: Vec3,
    pub theta: f32,
    pub phi: f32,
    pub psi: f32,
    pub radius: f32,
    angle_min: Vec3,
    angle_max: Vec3,

    pub free_fly: bool,
    pub movement_locked: bool,

    // Live basis; orbit rotation and roll keys rotate these as a rigid set
    pub front: Vec3,
    pub left: Vec3,
    pub above: Vec3,

    pub up: Vec3,
    pub lookat: Vec3,
    pub scene_rotation: Mat3,

    view_matrix: Mat4,
    proj_matrix: Mat4,
    /// Renderer-facing view matrix (axis convention already applied).
    pub vm: Mat4,
    /// Renderer-facing view-projection matrix.
    pub vpm: Mat4,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        let frame = CoordinateFrame::build(config.origin, config.origin_x, config.psi);
        let up = Vec3::Z;
        Self {
            boundaries: config.boundaries.clone(),
            position: Vec3::ZERO,
            theta: -std::f32::consts::FRAC_PI_2,
            phi: std::f32::consts::FRAC_PI_2,
            psi: config.psi,
            radius: DEFAULT_ORBIT_RADIUS,
            angle_min: config.camera_min,
            angle_max: config.camera_max,
            free_fly: config.mode != CameraMode::Orbit,
            movement_locked: false,
            front: frame.front,
            left: frame.left,
            above: frame.above,
            up,
            lookat: Vec3::ZERO,
            scene_rotation: rotate_align(up, Vec3::Z),
            view_matrix: Mat4::IDENTITY,
            proj_matrix: Mat4::IDENTITY,
            vm: Mat4::IDENTITY,
            vpm: Mat4::IDENTITY,
            frame,
        }
    }

    #[inline]
    pub fn frame(&self) -> &CoordinateFrame {
        &self.frame
    }

    /// Orbit rotation from a pointer delta. Each angle is bounds-checked
    /// against the configured limits independently; phi is additionally
    /// kept off the poles. Accepted deltas rotate the basis itself so the
    /// view actually follows the angles.
    pub fn rotate_orbit(&mut self, d_theta: f32, d_phi: f32) {
        if self.movement_locked {
            return;
        }
        let theta = self.theta + d_theta;
        if self.angle_min.x <= theta && theta <= self.angle_max.x {
            self.theta = theta;
            self.rotate_about_above(d_theta);
        }
        let phi = (self.phi + d_phi).clamp(PHI_EPSILON, std::f32::consts::PI - PHI_EPSILON);
        let applied = phi - self.phi;
        if self.angle_min.y <= phi && phi <= self.angle_max.y {
            self.phi = phi;
            self.rotate_about_left(applied);
        }
    }

    /// Wheel zoom, orbit mode only. Radius never drops below 1.
    pub fn zoom(&mut self, delta_y: f32) {
        if self.free_fly || self.movement_locked {
            return;
        }
        self.radius = (self.radius + delta_y * WHEEL_ZOOM_SENSITIVITY).max(MIN_ORBIT_RADIUS);
    }

    fn rotate_basis(&mut self, axis: Vec3, angle: f32) {
        let r = Quat::from_axis_angle(axis, angle);
        self.front = (r * self.front).normalize();
        self.left = (r * self.left).normalize();
        self.above = (r * self.above).normalize();
    }

    pub fn rotate_about_above(&mut self, angle: f32) {
        self.rotate_basis(self.above, angle);
    }

    pub fn rotate_about_left(&mut self, angle: f32) {
        self.rotate_basis(self.left, angle);
    }

    pub fn rotate_about_front(&mut self, angle: f32) {
        self.rotate_basis(self.front, angle);
    }

    /// One fixed-rate tick of free-fly movement: advance the position along
    /// the current basis for every held key, then accept or reject the
    /// whole candidate against the boundaries. Rejection is all-or-nothing;
    /// no partial per-axis moves are attempted.
    ///
    /// Returns true when any key was held, i.e. a redraw is wanted even if
    /// the move itself was rejected.
    pub fn integrate_keys(&mut self, keys: &KeyState, speed: f32) -> bool {
        if !keys.any_down() || self.movement_locked {
            return false;
        }

        let front = self.front * speed;
        let left = self.left * speed;
        let above = self.above * speed;
        let mut position = self.frame.convert_to_global(self.position);

        if keys.forward {
            position += front;
        }
        if keys.back {
            position -= front;
        }
        if keys.left {
            position -= left;
        }
        if keys.right {
            position += left;
        }
        if keys.roll_right {
            self.psi += ROLL_STEP_RAD;
            self.rotate_about_front(-ROLL_STEP_RAD);
        }
        if keys.roll_left {
            self.psi -= ROLL_STEP_RAD;
            self.rotate_about_front(ROLL_STEP_RAD);
        }
        if keys.rise {
            position += above;
        }
        if keys.sink {
            position -= above;
        }

        let candidate = self.frame.convert_to_local(position);
        if accepts_any(&self.boundaries, candidate) {
            self.position = candidate;
        }
        true
    }

    /// Rebuild the per-frame matrices and run the sort-dirty check.
    ///
    /// The raw look-at/perspective pair is converted into the axis
    /// convention the splatting pipeline expects by negating rows 1 and 2
    /// of the view matrix and row 1 of the combined matrix, then row 0 of
    /// both for the left/right handedness flip of the raster target. This
    /// row-sign pattern is part of the renderer contract.
    pub fn update(&mut self, width: f32, height: f32, sort: &mut SortCoordinator) {
        let position = self.frame.convert_to_global(self.position);
        self.lookat = position + self.front * self.radius;

        self.view_matrix = Mat4::look_at_rh(position, self.lookat, self.above);
        let aspect = width / height;
        self.proj_matrix = Mat4::perspective_rh_gl(FOV_Y, aspect, NEAR_PLANE, FAR_PLANE);

        self.vm = self.view_matrix;
        self.vpm = self.proj_matrix * self.view_matrix;

        invert_row(&mut self.vm, 1);
        invert_row(&mut self.vm, 2);
        invert_row(&mut self.vpm, 1);

        invert_row(&mut self.vm, 0);
        invert_row(&mut self.vpm, 0);

        sort.observe(&self.vpm);
    }

    /// Replace the up reference after calibration and realign the scene so
    /// the chosen up maps onto the canonical vertical.
    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
        self.scene_rotation = rotate_align(up, Vec3::Y);
    }
}

/// Negate one row of a column-major matrix in place.
pub fn invert_row(m: &mut Mat4, row: usize) {
    let mut cols = m.to_cols_array_2d();
    for col in cols.iter_mut() {
        col[row] = -col[row];
    }
    *m = Mat4::from_cols_array_2d(&cols);
}
