use glam::{Mat4, Quat, Vec3};

use super::constants::DEGENERATE_CROSS_EPSILON;

/// World <-> local rigid transform derived from a scene's configured origin,
/// a second point fixing the primary axis, and a roll angle about that axis.
///
/// The basis is re-orthonormalized on every build: `front` first, then `left`
/// by cross product (with a fallback axis when `front` is nearly vertical),
/// then `above` from the other two. Immutable between rebuilds.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateFrame {
    pub front: Vec3,
    pub left: Vec3,
    pub above: Vec3,
    to_local: Mat4,
    to_global: Mat4,
}

impl CoordinateFrame {
    pub fn build(origin: Vec3, origin_x: Vec3, roll: f32) -> Self {
        let front = (origin_x - origin).normalize();

        let mut left = front.cross(Vec3::Z);
        if left.length() < DEGENERATE_CROSS_EPSILON {
            // front is nearly vertical; cross with Z would be degenerate
            left = front.cross(Vec3::Y);
        }
        left = left.normalize();

        // Roll twists the frame about its primary axis without moving it
        left = (Quat::from_axis_angle(front, roll) * left).normalize();

        let above = front.cross(left).normalize();

        // Rows {front, left, above} plus the translation that places the
        // origin at local zero. glam matrices are column-major, so each
        // basis vector contributes one component per column.
        let to_local = Mat4::from_cols(
            glam::Vec4::new(front.x, left.x, above.x, 0.0),
            glam::Vec4::new(front.y, left.y, above.y, 0.0),
            glam::Vec4::new(front.z, left.z, above.z, 0.0),
            glam::Vec4::new(
                -front.dot(origin),
                -left.dot(origin),
                -above.dot(origin),
                1.0,
            ),
        );
        let to_global = to_local.inverse();

        Self {
            front,
            left,
            above,
            to_local,
            to_global,
        }
    }

    #[inline]
    pub fn convert_to_local(&self, global_point: Vec3) -> Vec3 {
        self.to_local.transform_point3(global_point)
    }

    #[inline]
    pub fn convert_to_global(&self, local_point: Vec3) -> Vec3 {
        self.to_global.transform_point3(local_point)
    }
}

impl Default for CoordinateFrame {
    fn default() -> Self {
        Self::build(Vec3::ZERO, Vec3::X, 0.0)
    }
}

/// Inclusive axis-aligned box in local space. The camera may occupy a point
/// if at least one configured boundary contains it.
#[derive(Clone, Copy, Debug, serde::Deserialize)]
pub struct Boundary {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Boundary {
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        self.min[0] <= p.x
            && p.x <= self.max[0]
            && self.min[1] <= p.y
            && p.y <= self.max[1]
            && self.min[2] <= p.z
            && p.z <= self.max[2]
    }
}

/// True when some boundary accepts the candidate. An empty list rejects
/// everything, which freezes the camera in place rather than letting it
/// wander unbounded.
#[inline]
pub fn accepts_any(boundaries: &[Boundary], candidate: Vec3) -> bool {
    boundaries.iter().any(|b| b.contains(candidate))
}
