/// Viewer tuning constants.
///
/// These express intended behavior (projection setup, input sensitivities,
/// protocol thresholds) and keep magic numbers out of the code.
// Camera projection
pub const FOV_Y: f32 = 0.820176; // vertical field of view, radians
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

// Orbit state
pub const MIN_ORBIT_RADIUS: f32 = 1.0;
pub const DEFAULT_ORBIT_RADIUS: f32 = 3.0;
pub const PHI_EPSILON: f32 = 1e-6; // keeps phi off the poles

// Input mapping
pub const MOUSE_ROTATE_SENSITIVITY: f32 = 0.005;
pub const TOUCH_THETA_SENSITIVITY: f32 = 0.0015;
pub const TOUCH_PHI_SENSITIVITY: f32 = 0.005;
pub const WHEEL_ZOOM_SENSITIVITY: f32 = 0.01;
pub const ROLL_STEP_RAD: f32 = 0.05;
pub const KEY_TICK_MS: i32 = 16; // ~60 Hz free-fly integration
pub const DEFAULT_FLY_SPEED: f32 = 0.07;

// Coordinate frame construction
pub const DEGENERATE_CROSS_EPSILON: f32 = 0.01;

// Sort dirty tracking: |dot - 1| on the view-direction row of the
// view-projection matrix (~8 degrees of rotation)
pub const SORT_DIRTY_THRESHOLD: f32 = 0.01;

// Progressive resolution
pub const BASE_RENDER_RESOLUTION: f32 = 0.2;
pub const MIN_RESOLUTION_INCREMENT: f32 = 0.1;
pub const REFINE_DEBOUNCE_MS: i32 = 200;

// Calibration picking
pub const PICK_OPACITY_MIN: f32 = 0.1;
pub const PICK_SPHERE_RADIUS: f32 = 0.1;
pub const PICK_MIN_T: f32 = 0.4; // rejects self-hits near the ray origin
pub const CALIBRATION_POINT_COUNT: usize = 3;

// Worker defaults
pub const DEFAULT_MAX_SPLATS: u32 = 1_000_000;
pub const SORT_WORKER_URL: &str = "worker-sort.js";
