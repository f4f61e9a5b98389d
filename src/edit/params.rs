//! Authoring parameters for the primitive currently being shaped.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Signed-distance shape of a primitive.
///
/// Discriminants are the shape codes the ray marcher switches on.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Sphere = 0,
    Box = 1,
    Plane = 2,
    Cone = 3,
    Pyramid = 4,
    Torus = 5,
    Cylinder = 6,
    Capsule = 7,
    Disk = 8,
}

impl ShapeKind {
    /// All shapes in code order.
    pub const ALL: [ShapeKind; 9] = [
        Self::Sphere,
        Self::Box,
        Self::Plane,
        Self::Cone,
        Self::Pyramid,
        Self::Torus,
        Self::Cylinder,
        Self::Capsule,
        Self::Disk,
    ];

    /// Shape for a code, if valid.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Renderer-side code.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Previous shape, clamped at the first.
    pub fn prev(self) -> Self {
        Self::ALL[(self as usize).saturating_sub(1)]
    }

    /// Next shape, clamped at the last.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1).min(Self::ALL.len() - 1)]
    }
}

/// How a primitive combines with everything before it in the stack.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendKind {
    #[default]
    Union = 0,
    Difference = 1,
    Intersection = 2,
    SmoothUnion = 3,
    SmoothDifference = 4,
    SmoothIntersection = 5,
}

impl BlendKind {
    /// All blend modes in code order.
    pub const ALL: [BlendKind; 6] = [
        Self::Union,
        Self::Difference,
        Self::Intersection,
        Self::SmoothUnion,
        Self::SmoothDifference,
        Self::SmoothIntersection,
    ];

    /// Blend mode for a code, if valid.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Whether the blend uses the smoothness radius.
    pub fn is_smooth(self) -> bool {
        matches!(self, Self::SmoothUnion | Self::SmoothDifference | Self::SmoothIntersection)
    }

    /// Previous blend mode, clamped at the first.
    pub fn prev(self) -> Self {
        Self::ALL[(self as usize).saturating_sub(1)]
    }

    /// Next blend mode, clamped at the last.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1).min(Self::ALL.len() - 1)]
    }
}

/// Description of one edit: transform, shape, blend and surface.
///
/// Plain value, copied every frame. Field ranges (`material_id` below the
/// material count, positive `smoothness` and `uv_scale`) are kept by the
/// producer; nothing downstream validates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditParameters {
    pub translation: Vec3,
    /// Euler angles in radians: x = pitch, y = yaw, z = roll.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub shape: ShapeKind,
    pub blend: BlendKind,
    pub material_id: u32,
    pub smoothness: f32,
    pub uv_scale: f32,
}

impl Default for EditParameters {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            shape: ShapeKind::Sphere,
            blend: BlendKind::Union,
            material_id: 0,
            smoothness: 0.5,
            uv_scale: 1.0,
        }
    }
}

impl EditParameters {
    /// Check field ranges against a material count.
    pub fn is_valid(&self, material_count: u32) -> bool {
        self.material_id < material_count
            && self.smoothness > 0.0
            && self.uv_scale > 0.0
            && self.translation.is_finite()
            && self.rotation.is_finite()
            && self.scale.is_finite()
    }
}
