//! Conversion from authoring parameters to renderer records.

use glam::{EulerRot, Mat4, Quat};

use crate::util::{Error, Result};
use super::params::EditParameters;
use super::primitive::{ObjectId, Primitive, MAX_OBJECT_ID};

/// Builds [`Primitive`] records and owns the object id counter.
///
/// The counter starts at zero, advances once per [`build`](Self::build) and
/// is never rewound, so ids stay unique for the lifetime of the factory.
/// Ids stop at [`MAX_OBJECT_ID`]; past it `build` fails with
/// [`Error::IdsExhausted`].
/// Pass the factory by reference to whatever commits edits; separate
/// factories give independent id sequences.
#[derive(Debug, Default)]
pub struct PrimitiveFactory {
    next_object_id: u32,
}

impl PrimitiveFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory whose first `build` assigns `first`.
    pub fn starting_at(first: ObjectId) -> Self {
        Self { next_object_id: first.get() }
    }

    /// Id the next [`build`](Self::build) will assign.
    #[inline]
    pub fn peek_next_id(&self) -> ObjectId {
        ObjectId(self.next_object_id)
    }

    /// Build a record and consume a fresh object id.
    pub fn build(&mut self, params: &EditParameters) -> Result<Primitive> {
        let id = self.allocate_id()?;
        Ok(Self::build_with_id(params, id))
    }

    fn allocate_id(&mut self) -> Result<ObjectId> {
        let id = self.next_object_id;
        let exhausted = Error::IdsExhausted { next: id, max: MAX_OBJECT_ID };
        if id > MAX_OBJECT_ID {
            return Err(exhausted);
        }
        self.next_object_id = id.checked_add(1).ok_or(exhausted)?;
        Ok(ObjectId(id))
    }

    /// Build a record carrying `id` without touching the counter.
    pub fn build_with_id(params: &EditParameters, id: ObjectId) -> Primitive {
        Primitive {
            inverse_transform: inverse_transform(params).to_cols_array_2d(),
            shape_params: [
                params.shape.code() as f32,
                params.blend.code() as f32,
                params.smoothness,
                params.material_id as f32,
            ],
            identity_params: [id.get() as f32, params.uv_scale, 0.0, 0.0],
        }
    }
}

/// Orientation from yaw (y), pitch (x) and roll (z).
pub fn rotation(params: &EditParameters) -> Quat {
    let r = params.rotation;
    Quat::from_euler(EulerRot::YXZ, r.y, r.x, r.z)
}

/// Inverse of translate * rotate * scale, mapping world points into
/// primitive-local space.
pub fn inverse_transform(params: &EditParameters) -> Mat4 {
    Mat4::from_scale_rotation_translation(params.scale, rotation(params), params.translation)
        .inverse()
}
