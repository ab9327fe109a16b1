use glam::{Mat3, Mat4, Vec3};

use super::constants::{
    CALIBRATION_POINT_COUNT, PICK_MIN_T, PICK_OPACITY_MIN, PICK_SPHERE_RADIUS,
};

/// Nearest intersection distance between a ray and a sphere, or `None` when
/// the ray misses. The near root may be negative (origin inside or past the
/// sphere); callers filter with a minimum parametric distance.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let a = ray_dir.dot(ray_dir);
    let b = 2.0 * oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    Some((-b - disc.sqrt()) / (2.0 * a))
}

/// World-space pick ray for a mouse position, derived from the inverse of
/// the renderer-facing view-projection matrix. The ray starts at the
/// current lookat point and passes through the unprojected far-plane point.
pub fn pick_ray(
    view_proj: &Mat4,
    lookat: Vec3,
    x: f32,
    y: f32,
    viewport_w: f32,
    viewport_h: f32,
) -> (Vec3, Vec3) {
    let px = x / viewport_w * 2.0 - 1.0;
    let py = -(y / viewport_h * 2.0 - 1.0);
    let camera_to_world = view_proj.inverse();
    let origin_unproj = camera_to_world.project_point3(lookat);
    let far_unproj = camera_to_world.project_point3(Vec3::new(px, py, 1.0));
    let dir = (far_unproj - origin_unproj).normalize();
    (lookat, dir)
}

/// Nearest splat hit along a ray. Splats below the opacity threshold are
/// skipped; hits closer than `PICK_MIN_T` are rejected as self-intersections
/// near the ray origin. Returns the hit's world position.
pub fn raycast_splats(
    ray_origin: Vec3,
    ray_dir: Vec3,
    positions: &[f32],
    opacities: &[f32],
) -> Option<Vec3> {
    let count = opacities.len().min(positions.len() / 3);
    let mut best = f32::MAX;
    let mut found = false;
    for i in 0..count {
        if opacities[i] < PICK_OPACITY_MIN {
            continue;
        }
        let center = Vec3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]);
        if let Some(t) = ray_sphere(ray_origin, ray_dir, center, PICK_SPHERE_RADIUS) {
            if t > PICK_MIN_T && t < best {
                best = t;
                found = true;
            }
        }
    }
    found.then(|| ray_origin + ray_dir * best)
}

/// Rotation matrix aligning unit vector `v1` onto unit vector `v2`
/// (Rodrigues closed form). The antiparallel case diverges in the closed
/// form, so it is handled as a 180-degree rotation about an arbitrary axis
/// perpendicular to `v1`.
pub fn rotate_align(v1: Vec3, v2: Vec3) -> Mat3 {
    let cos_a = v1.dot(v2);
    if cos_a < -1.0 + 1e-6 {
        return Mat3::from_axis_angle(v1.any_orthonormal_vector(), std::f32::consts::PI);
    }
    let axis = v1.cross(v2);
    let k = 1.0 / (1.0 + cos_a);

    Mat3::from_cols(
        Vec3::new(
            axis.x * axis.x * k + cos_a,
            axis.x * axis.y * k + axis.z,
            axis.x * axis.z * k - axis.y,
        ),
        Vec3::new(
            axis.y * axis.x * k - axis.z,
            axis.y * axis.y * k + cos_a,
            axis.y * axis.z * k + axis.x,
        ),
        Vec3::new(
            axis.z * axis.x * k + axis.y,
            axis.z * axis.y * k - axis.x,
            axis.z * axis.z * k + cos_a,
        ),
    )
}

/// Unit normal of the plane through three points.
#[inline]
pub fn plane_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize()
}

/// Accumulates up to three picked world-space points; exactly three define
/// the calibration plane. The session is transient: finishing or resetting
/// discards it.
#[derive(Clone, Debug, Default)]
pub struct CalibrationSession {
    points: Vec<Vec3>,
    active: bool,
}

impl CalibrationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.active = true;
        self.points.clear();
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.points.clear();
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.points.len() == CALIBRATION_POINT_COUNT
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Record a pick hit. Ignored when the session is inactive or already
    /// holds three points; returns whether the point was accepted.
    pub fn push_hit(&mut self, hit: Vec3) -> bool {
        if !self.active || self.points.len() >= CALIBRATION_POINT_COUNT {
            return false;
        }
        self.points.push(hit);
        true
    }

    /// Plane normal once three points are collected.
    pub fn fitted_normal(&self) -> Option<Vec3> {
        self.is_complete()
            .then(|| plane_normal(self.points[0], self.points[1], self.points[2]))
    }
}

/// Seam for the plane/gizmo visualization: the viewer emits calibration
/// events and the gizmo renderer (external) subscribes.
pub trait CalibrationObserver {
    fn plane_points_changed(&self, points: &[Vec3]);
    fn up_changed(&self, up: Vec3);
}

/// Default observer when no gizmo renderer is attached.
pub struct LoggingObserver;

impl CalibrationObserver for LoggingObserver {
    fn plane_points_changed(&self, points: &[Vec3]) {
        log::info!("[calibrate] plane points: {}", points.len());
    }

    fn up_changed(&self, up: Vec3) {
        log::info!("[calibrate] up vector -> ({:.3},{:.3},{:.3})", up.x, up.y, up.z);
    }
}
