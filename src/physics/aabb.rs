/// Data-Oriented Axis-Aligned Bounding Box
///
/// Bounding boxes arrive with every mesh registration as broad-phase hints.
/// Pure functions only - no methods, just data transformations.
use glam::Vec3;

use crate::error::{EngineError, EngineResult};

/// Axis-Aligned Bounding Box - pure data structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Create new AABB from min/max corners
pub fn create_aabb(min: Vec3, max: Vec3) -> Aabb {
    Aabb { min, max }
}

/// Smallest AABB enclosing every point, `None` for an empty set
pub fn aabb_from_points(points: &[Vec3]) -> Option<Aabb> {
    let (first, rest) = points.split_first()?;
    let mut aabb = Aabb {
        min: *first,
        max: *first,
    };
    for point in rest {
        aabb.min = aabb.min.min(*point);
        aabb.max = aabb.max.max(*point);
    }
    Some(aabb)
}

/// Reject boxes the simulator's broad-phase cannot use.
/// Corners must be finite and `min <= max` on every axis; flat boxes are allowed.
pub fn validate_aabb(aabb: &Aabb) -> EngineResult<()> {
    if !aabb.min.is_finite() || !aabb.max.is_finite() {
        return Err(EngineError::InvalidInput {
            field: "bounds".to_string(),
            reason: format!("non-finite corner in {:?}", aabb),
        });
    }
    if aabb.min.cmpgt(aabb.max).any() {
        return Err(EngineError::InvalidInput {
            field: "bounds".to_string(),
            reason: format!("min {:?} exceeds max {:?}", aabb.min, aabb.max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let aabb = aabb_from_points(&[
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 3.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
        ])
        .expect("non-empty point set");
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 4.0));
        assert!(aabb_from_points(&[]).is_none());
    }

    #[test]
    fn test_validate() {
        assert!(validate_aabb(&create_aabb(Vec3::splat(-1.0), Vec3::splat(1.0))).is_ok());
        assert!(validate_aabb(&create_aabb(Vec3::ZERO, Vec3::ZERO)).is_ok());
        assert!(validate_aabb(&create_aabb(Vec3::X, Vec3::ZERO)).is_err());
        assert!(validate_aabb(&create_aabb(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ONE)).is_err());
    }
}
