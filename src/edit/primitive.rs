//! GPU-facing primitive record.
//!
//! Fixed 96-byte layout shared with the ray marcher:
//! ```text
//! offset  0: mat4  inverse_transform   (world -> primitive local, column-major)
//! offset 64: vec4  shape_params        (shape, blend, smoothness, material_id)
//! offset 80: vec4  identity_params     (object_id, uv_scale, 0, 0)
//! ```

use bytemuck::{Pod, Zeroable};
use std::fmt;

use super::params::{BlendKind, ShapeKind};

/// Largest object id the `f32` identity block stores exactly (2^24).
pub const MAX_OBJECT_ID: u32 = 1 << 24;

/// Process-unique identifier assigned to a primitive at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectId(pub u32);

impl ObjectId {
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Renderer record for one signed-distance edit.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Primitive {
    pub inverse_transform: [[f32; 4]; 4],
    pub shape_params: [f32; 4],
    pub identity_params: [f32; 4],
}

/// Size of one record in the scene buffer.
pub const PRIMITIVE_SIZE: usize = std::mem::size_of::<Primitive>();

impl Primitive {
    /// Object id stored in the identity block.
    #[inline]
    pub fn object_id(&self) -> ObjectId {
        ObjectId(self.identity_params[0] as u32)
    }

    pub fn shape(&self) -> Option<ShapeKind> {
        ShapeKind::from_code(self.shape_params[0] as u32)
    }

    pub fn blend(&self) -> Option<BlendKind> {
        BlendKind::from_code(self.shape_params[1] as u32)
    }

    #[inline]
    pub fn smoothness(&self) -> f32 {
        self.shape_params[2]
    }

    #[inline]
    pub fn material_id(&self) -> u32 {
        self.shape_params[3] as u32
    }

    #[inline]
    pub fn uv_scale(&self) -> f32 {
        self.identity_params[1]
    }

    /// Record as raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive")
            .field("object_id", &self.object_id())
            .field("shape", &self.shape())
            .field("blend", &self.blend())
            .field("smoothness", &self.smoothness())
            .field("material_id", &self.material_id())
            .field("uv_scale", &self.uv_scale())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(PRIMITIVE_SIZE, 96);
        assert_eq!(std::mem::align_of::<Primitive>(), 4);
    }

    #[test]
    fn test_accessors_decode_blocks() {
        let mut p = Primitive::zeroed();
        p.shape_params = [5.0, 3.0, 0.25, 2.0];
        p.identity_params = [17.0, 1.5, 0.0, 0.0];

        assert_eq!(p.shape(), Some(ShapeKind::Torus));
        assert_eq!(p.blend(), Some(BlendKind::SmoothUnion));
        assert_eq!(p.smoothness(), 0.25);
        assert_eq!(p.material_id(), 2);
        assert_eq!(p.object_id(), ObjectId(17));
        assert_eq!(p.uv_scale(), 1.5);
        assert_eq!(&p.as_bytes()[80..84], &17.0f32.to_ne_bytes());
    }
}
