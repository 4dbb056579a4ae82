/// Vector Operations - Pure DOP Functions
///
/// Free functions over 3-component vectors. No state, no side effects.
use glam::Vec3;

use super::error::{GeometryError, GeometryResult};

/// Standard 3D cross product
#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

/// Component-wise difference `a - b`
#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x - b.x, a.y - b.y, a.z - b.z)
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Euclidean length
#[inline]
pub fn length(v: Vec3) -> f32 {
    dot(v, v).sqrt()
}

/// Divide by Euclidean length.
///
/// A zero-length input produces NaN components. Callers that cannot
/// guarantee non-degenerate input use [`try_normalize`].
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    v / length(v)
}

/// Normalize, rejecting vectors whose length is at or below `epsilon`
pub fn try_normalize(v: Vec3, epsilon: f32) -> GeometryResult<Vec3> {
    let len = length(v);
    if !len.is_finite() {
        return Err(GeometryError::NonFinite);
    }
    if len <= epsilon {
        return Err(GeometryError::ZeroLength {
            length: len,
            epsilon,
        });
    }
    Ok(v / len)
}

/// Unit normal of the triangle `(v0, v1, v2)` following its winding
#[inline]
pub fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    normalize(cross(sub(v1, v0), sub(v2, v0)))
}
