//! Edit representation: authoring parameters, renderer records, the id
//! factory, the committed stack and the input mapping that drives it.
//!
//! ## Flow
//! ```text
//! input events → InputMapper → EditParameters → EditStack (preview / commit / undo)
//!                                                   ↑
//!                                           PrimitiveFactory (object ids)
//! ```

pub mod factory;
pub mod input;
pub mod params;
pub mod primitive;
pub mod stack;

pub use factory::PrimitiveFactory;
pub use input::{EditAction, EditCommand, InputMapper, InputSteps, MappedInput};
pub use params::{BlendKind, EditParameters, ShapeKind};
pub use primitive::{ObjectId, Primitive, MAX_OBJECT_ID, PRIMITIVE_SIZE};
pub use stack::{EditStack, PreviewMode, SceneSnapshot};
