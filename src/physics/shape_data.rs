//! Shape Data - Pure DOP
//!
//! Plain records shared by the builders, the shape slot table and the simulator backends.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::constants::{flags, shapes};

/// Mesh shape kinds, numbered as in the simulator's flag word.
/// Kinds 0-2 and 5 are the simulator's analytic shapes and are never produced here.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    ConvexMesh = 3,
    TriangleMesh = 4,
}

impl ShapeKind {
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits & flags::TYPE_MASK {
            3 => Some(ShapeKind::ConvexMesh),
            4 => Some(ShapeKind::TriangleMesh),
            _ => None,
        }
    }
}

/// Packed shape flags for GPU storage
/// Uses 32 bits per shape:
/// - Bits 0-2: Shape kind
/// - Bit 3: Dynamic
/// - Bits 4-31: Reserved
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct ShapeFlags(pub u32);

impl ShapeFlags {
    #[inline]
    pub fn new(kind: ShapeKind, dynamic: bool) -> Self {
        let mut packed = kind as u32 & flags::TYPE_MASK;
        if dynamic {
            packed |= flags::DYNAMIC;
        }
        Self(packed)
    }

    #[inline]
    pub fn kind(&self) -> Option<ShapeKind> {
        ShapeKind::from_bits(self.0)
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.0 & flags::DYNAMIC != 0
    }
}

/// Opaque mesh identifier issued by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

impl MeshHandle {
    /// Placeholder stored in slots that have not been assigned yet
    pub const INVALID: Self = Self(u32::MAX);

    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

/// Geometry descriptor held in each slot: the referenced mesh plus per-axis scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryDescriptor {
    pub kind: ShapeKind,
    pub mesh: MeshHandle,
    pub scale: [f32; 3],
}

impl Default for GeometryDescriptor {
    fn default() -> Self {
        Self {
            kind: ShapeKind::ConvexMesh,
            mesh: MeshHandle::INVALID,
            scale: shapes::DEFAULT_SCALE,
        }
    }
}

/// Plane equation in the simulator's convention.
///
/// `normal` holds the negated outward normal and `offset` the distance of the
/// face from the origin along the outward normal, so interior points satisfy
/// `dot(point, normal) + offset >= 0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Plane {
    pub normal: [f32; 3],
    pub offset: f32,
}

impl Plane {
    /// Build from an outward unit normal and its offset
    #[inline]
    pub fn from_outward(normal: Vec3, offset: f32) -> Self {
        Self {
            normal: [-normal.x, -normal.y, -normal.z],
            offset,
        }
    }

    #[inline]
    pub fn outward_normal(&self) -> Vec3 {
        -Vec3::from_array(self.normal)
    }

    /// Signed distance of `point` outside the plane (positive = outside)
    #[inline]
    pub fn distance(&self, point: Vec3) -> f32 {
        self.outward_normal().dot(point) - self.offset
    }
}

static_assertions::assert_eq_size!(ShapeFlags, u32);
static_assertions::assert_eq_size!(Plane, [f32; 4]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_flags_packing() {
        let flags = ShapeFlags::new(ShapeKind::TriangleMesh, true);
        assert_eq!(flags.0, 4 | 0x8);
        assert_eq!(flags.kind(), Some(ShapeKind::TriangleMesh));
        assert!(flags.is_dynamic());

        let flags = ShapeFlags::new(ShapeKind::ConvexMesh, false);
        assert_eq!(flags.0, 3);
        assert_eq!(flags.kind(), Some(ShapeKind::ConvexMesh));
        assert!(!flags.is_dynamic());
    }

    #[test]
    fn test_unknown_kind_bits() {
        assert_eq!(ShapeFlags(7).kind(), None);
        // unassigned rows carry no kind
        assert_eq!(ShapeFlags::default().kind(), None);
    }

    #[test]
    fn test_plane_sign_convention() {
        let plane = Plane::from_outward(Vec3::Y, 2.0);
        assert_eq!(plane.normal, [-0.0, -1.0, -0.0]);
        assert_eq!(plane.outward_normal(), Vec3::Y);
        assert!(plane.distance(Vec3::new(0.0, 3.0, 0.0)) > 0.0);
        assert!(plane.distance(Vec3::ZERO) < 0.0);
        assert_eq!(plane.distance(Vec3::new(5.0, 2.0, -1.0)), 0.0);
    }
}
