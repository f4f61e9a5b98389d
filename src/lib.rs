//! # sdfedit
//!
//! Edit stack and progressive accumulation core for an interactive
//! signed-distance-field scene editor. The scene is an ordered list of SDF
//! primitives ("edits") that an external ray marcher evaluates every frame;
//! this crate owns that list, its undo history, its upload into the
//! renderer's buffer and the sample counter that drives progressive
//! refinement.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math helpers
//! - [`edit`] - Parameters, primitive records, id factory, edit stack, input mapping
//! - [`sync`] - Scene buffer upload
//! - [`accumulation`] - Sample index and reset detection
//! - [`camera`] - Orbit camera producing the compared pose
//! - [`uniforms`] - Per-frame uniform block
//! - [`frame`] - Frame timing
//! - [`scene`] - Startup material table and primitive list
//! - [`settings`] - Persistent configuration
//! - [`session`] - Per-frame orchestration
//! - `gpu` - wgpu buffers (feature `gpu`)
//!
//! ## Example
//!
//! ```ignore
//! use sdfedit::prelude::*;
//!
//! let settings = Settings::load(None)?;
//! let camera = OrbitCamera::look_at(settings.camera_eye, settings.camera_target);
//! let mut session = EditSession::new(&settings, settings.material_count, camera.pose())?;
//! let mut buffer = HostSceneBuffer::new();
//!
//! let report = session.frame(FrameInput::from_camera(&camera, &[EditCommand::Commit]), &mut buffer)?;
//! assert_eq!(report.sample_index, 2);
//! ```

pub mod util;
pub mod edit;
pub mod sync;
pub mod accumulation;
pub mod camera;
pub mod uniforms;
pub mod frame;
pub mod scene;
pub mod settings;
pub mod session;

#[cfg(feature = "gpu")]
pub mod gpu;

// Re-export commonly used types
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::edit::*;
    pub use crate::sync::{HostSceneBuffer, SceneBuffer, SceneSync, SyncReport};
    pub use crate::accumulation::{AccumulationController, AccumulationOutcome, CameraPose, ResetReason};
    pub use crate::camera::OrbitCamera;
    pub use crate::uniforms::FrameUniforms;
    pub use crate::frame::FrameClock;
    pub use crate::scene::{MaterialTable, StartupScene};
    pub use crate::settings::Settings;
    pub use crate::session::{EditSession, FrameInput, FrameReport};
}
