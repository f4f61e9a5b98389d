//! Per-frame orchestration of the editor core.
//!
//! ## Frame order
//! ```text
//! input events → InputMapper → commit / undo → preview → SceneSync → AccumulationController
//! ```
//! Everything runs on the caller's thread between input polling and the
//! renderer dispatch.

use glam::Vec3;

use crate::accumulation::{AccumulationController, AccumulationOutcome, CameraPose};
use crate::camera::OrbitCamera;
use crate::edit::{
    EditAction, EditCommand, EditStack, InputMapper, ObjectId, PrimitiveFactory,
};
use crate::scene::StartupScene;
use crate::settings::Settings;
use crate::sync::{SceneBuffer, SceneSync, SyncReport};
use crate::uniforms::{FrameUniforms, SeedSequence};
use crate::util::Result;

/// Inputs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Keys that went down this frame.
    pub events: &'a [EditCommand],
    pub pose: CameraPose,
    /// View direction, used to place the brush.
    pub forward: Vec3,
}

impl<'a> FrameInput<'a> {
    /// Frame input read off a camera.
    pub fn from_camera(camera: &OrbitCamera, events: &'a [EditCommand]) -> Self {
        Self {
            events,
            pose: camera.pose(),
            forward: camera.forward(),
        }
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub committed: Vec<ObjectId>,
    pub undone: Vec<ObjectId>,
    /// An undo command arrived, whether or not anything was removed.
    pub undo_requested: bool,
    pub preview_changed: bool,
    pub sync: SyncReport,
    pub accumulation: AccumulationOutcome,
    pub sample_index: u32,
}

/// Owns every core component for one editing session.
#[derive(Debug)]
pub struct EditSession {
    factory: PrimitiveFactory,
    stack: EditStack,
    mapper: InputMapper,
    sync: SceneSync,
    accumulation: AccumulationController,
    seeds: SeedSequence,
    frame: u64,
}

impl EditSession {
    /// Build a session from settings. `material_count` bounds material cycling.
    pub fn new(settings: &Settings, material_count: u32, initial_pose: CameraPose) -> Result<Self> {
        settings.validate()?;
        let accumulation = AccumulationController::with_limits(
            initial_pose,
            settings.reset_sample_index,
            settings.max_samples,
        )?;
        Ok(Self {
            factory: PrimitiveFactory::new(),
            stack: EditStack::new(settings.initial_capacity).with_preview_mode(settings.preview_mode),
            mapper: InputMapper::new(material_count, settings.input_steps()),
            sync: SceneSync::new(),
            accumulation,
            seeds: SeedSequence::new(0x5d_f3_d1_7e),
            frame: 0,
        })
    }

    /// Replace the jitter seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seeds = SeedSequence::new(seed);
        self
    }

    /// Commit the startup edits. Call before the first frame.
    pub fn load_startup(&mut self, scene: &StartupScene, material_count: u32) -> Result<Vec<ObjectId>> {
        let ids = scene.apply(&mut self.stack, &mut self.factory, material_count)?;
        if !ids.is_empty() {
            tracing::info!("committed {} startup edits", ids.len());
        }
        Ok(ids)
    }

    /// Run one frame and upload the result into `buffer`.
    pub fn frame<B: SceneBuffer + ?Sized>(
        &mut self,
        input: FrameInput<'_>,
        buffer: &mut B,
    ) -> Result<FrameReport> {
        let frame = self.frame;

        self.mapper.place_at(input.pose.eye, input.forward);
        let mapped = self.mapper.map(input.events);

        let mut committed = Vec::new();
        let mut undone = Vec::new();
        let mut undo_requested = false;
        for action in &mapped.actions {
            match action {
                EditAction::Commit => committed.push(self.stack.commit(&mut self.factory, &mapped.params)?),
                EditAction::Undo => {
                    undo_requested = true;
                    undone.extend(self.stack.undo().map(|p| p.object_id()));
                }
            }
        }
        let preview_changed = self.stack.update_preview(&self.factory, &mapped.params);

        let sync = self.sync.sync(frame, self.stack.snapshot(), buffer)?;

        let preview_visible = self.stack.snapshot().preview.is_some();
        let edited = !committed.is_empty() || undo_requested || (preview_changed && preview_visible);
        let accumulation = self.accumulation.update(input.pose, edited);

        self.frame += 1;
        Ok(FrameReport {
            frame,
            committed,
            undone,
            undo_requested,
            preview_changed,
            sync,
            accumulation,
            sample_index: self.accumulation.sample_index(),
        })
    }

    /// Uniform block for the frame just run.
    pub fn frame_uniforms(&self, camera: &OrbitCamera, size: (u32, u32)) -> FrameUniforms {
        let aspect = size.0 as f32 / size.1.max(1) as f32;
        FrameUniforms::new(
            camera.inverse_view_projection(aspect),
            camera.eye(),
            camera.near,
            camera.far,
            size,
            self.seeds.jitter(self.frame),
            self.accumulation.sample_index(),
        )
    }

    /// Restart accumulation on the next frame (e.g. viewport resize).
    pub fn reset_accumulation(&mut self) {
        self.accumulation.reset();
    }

    pub fn stack(&self) -> &EditStack {
        &self.stack
    }

    pub fn factory(&self) -> &PrimitiveFactory {
        &self.factory
    }

    pub fn mapper(&self) -> &InputMapper {
        &self.mapper
    }

    pub fn accumulation(&self) -> &AccumulationController {
        &self.accumulation
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulation::ResetReason;
    use crate::edit::PreviewMode;
    use crate::sync::HostSceneBuffer;

    fn pose() -> CameraPose {
        CameraPose::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
    }

    fn input(events: &[EditCommand]) -> FrameInput<'_> {
        FrameInput { events, pose: pose(), forward: Vec3::NEG_Z }
    }

    fn session(mode: PreviewMode) -> EditSession {
        let settings = Settings { initial_capacity: 2, preview_mode: mode, ..Default::default() };
        EditSession::new(&settings, 3, pose()).unwrap()
    }

    #[test]
    fn test_first_frame_shows_preview_and_resets() {
        let mut s = session(PreviewMode::Live);
        let mut buffer = HostSceneBuffer::new();
        let report = s.frame(input(&[]), &mut buffer).unwrap();

        assert!(report.preview_changed);
        assert_eq!(report.sync.count, 1);
        assert_eq!(report.accumulation, AccumulationOutcome::Reset(ResetReason::SceneEdited));
        assert_eq!(buffer.records()[0].object_id(), ObjectId(0));
        // Brush sits in front of the camera.
        let inv = glam::Mat4::from_cols_array_2d(&buffer.records()[0].inverse_transform);
        assert!(inv.transform_point3(Vec3::ZERO).length() < 1e-5);
    }

    #[test]
    fn test_idle_frames_accumulate() {
        let mut s = session(PreviewMode::Live);
        let mut buffer = HostSceneBuffer::new();
        s.frame(input(&[]), &mut buffer).unwrap();
        let r1 = s.frame(input(&[]), &mut buffer).unwrap();
        let r2 = s.frame(input(&[]), &mut buffer).unwrap();
        assert_eq!(r1.accumulation, AccumulationOutcome::Accumulating);
        assert_eq!(r2.sample_index, r1.sample_index + 1);
    }

    #[test]
    fn test_commit_and_undo_reset() {
        let mut s = session(PreviewMode::Hidden);
        let mut buffer = HostSceneBuffer::new();
        for _ in 0..5 {
            s.frame(input(&[]), &mut buffer).unwrap();
        }
        assert!(s.accumulation().sample_index() > 2);

        let r = s.frame(input(&[EditCommand::Commit]), &mut buffer).unwrap();
        assert_eq!(r.committed, vec![ObjectId(0)]);
        assert_eq!(r.sample_index, 2);
        assert_eq!(buffer.count(), 1);

        s.frame(input(&[]), &mut buffer).unwrap();
        let r = s.frame(input(&[EditCommand::Undo]), &mut buffer).unwrap();
        assert_eq!(r.undone, vec![ObjectId(0)]);
        assert_eq!(r.sample_index, 2);
        assert_eq!(buffer.count(), 0);

        // Undo on empty still counts as edit activity.
        s.frame(input(&[]), &mut buffer).unwrap();
        let r = s.frame(input(&[EditCommand::Undo]), &mut buffer).unwrap();
        assert!(r.undone.is_empty());
        assert!(r.undo_requested);
        assert!(r.accumulation.is_reset());
    }

    #[test]
    fn test_hidden_preview_change_does_not_reset() {
        let mut s = session(PreviewMode::Hidden);
        let mut buffer = HostSceneBuffer::new();
        s.frame(input(&[]), &mut buffer).unwrap();
        let r = s.frame(input(&[EditCommand::CycleShapeNext]), &mut buffer).unwrap();
        assert!(r.preview_changed);
        assert_eq!(r.accumulation, AccumulationOutcome::Accumulating);
    }

    #[test]
    fn test_preview_id_tracks_next_commit() {
        let mut s = session(PreviewMode::Live);
        let mut buffer = HostSceneBuffer::new();
        s.frame(input(&[EditCommand::Commit]), &mut buffer).unwrap();
        s.frame(input(&[EditCommand::Commit]), &mut buffer).unwrap();
        let ids: Vec<u32> = buffer.records().iter().map(|p| p.object_id().get()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(s.factory().peek_next_id(), ObjectId(2));
    }

    #[test]
    fn test_uniforms_carry_sample_index() {
        let mut s = session(PreviewMode::Live);
        let mut buffer = HostSceneBuffer::new();
        let camera = OrbitCamera::default();
        for _ in 0..4 {
            s.frame(FrameInput::from_camera(&camera, &[]), &mut buffer).unwrap();
        }
        let u = s.frame_uniforms(&camera, (640, 480));
        assert_eq!(u.sample_index(), s.accumulation().sample_index());
        assert_eq!(u.near_far_size, [camera.near, camera.far, 640.0, 480.0]);
    }
}
