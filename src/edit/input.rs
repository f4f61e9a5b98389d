//! Discrete input commands and their effect on the authoring parameters.
//!
//! Device polling lives outside the core; this module only receives the
//! keys that went down during the frame and turns them into parameter
//! deltas plus the commit/undo actions.

use glam::Vec3;

use super::params::EditParameters;

/// Closed set of editor input commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditCommand {
    CycleShapePrev,
    CycleShapeNext,
    CycleBlendPrev,
    CycleBlendNext,
    DecreaseSmoothness,
    IncreaseSmoothness,
    GrowScale,
    ShrinkScale,
    MaterialPrev,
    MaterialNext,
    Commit,
    Undo,
}

/// Lower bound keeping smoothness positive under repeated decreases.
const MIN_SMOOTHNESS: f32 = 1e-4;
/// Lower bound keeping the transform invertible under repeated shrinks.
const MIN_SCALE: f32 = 1e-3;

/// Fixed key bindings, in binding name order.
const BINDINGS: [(&str, EditCommand); 12] = [
    ("1", EditCommand::CycleShapePrev),
    ("2", EditCommand::CycleShapeNext),
    ("3", EditCommand::CycleBlendPrev),
    ("4", EditCommand::CycleBlendNext),
    ("5", EditCommand::DecreaseSmoothness),
    ("6", EditCommand::IncreaseSmoothness),
    ("Up", EditCommand::GrowScale),
    ("Down", EditCommand::ShrinkScale),
    ("Left", EditCommand::MaterialPrev),
    ("Right", EditCommand::MaterialNext),
    ("MouseLeft", EditCommand::Commit),
    ("Z", EditCommand::Undo),
];

impl EditCommand {
    /// Look up the command bound to a key name (case-insensitive).
    pub fn from_binding(key: &str) -> Option<Self> {
        BINDINGS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|&(_, cmd)| cmd)
    }

    /// Key name bound to this command.
    pub fn binding(self) -> &'static str {
        BINDINGS
            .iter()
            .find(|&&(_, cmd)| cmd == self)
            .map(|&(name, _)| name)
            .unwrap_or("?")
    }
}

/// Stack-level action produced by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Commit,
    Undo,
}

/// Output of one frame of input mapping.
#[derive(Debug, Clone)]
pub struct MappedInput {
    /// Parameters after this frame's adjustments.
    pub params: EditParameters,
    /// Commit/undo actions in delivery order.
    pub actions: Vec<EditAction>,
    /// Any command was applied this frame.
    pub changed: bool,
}

/// Factors for the multiplicative nudges, shared by scale and smoothness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSteps {
    pub nudge_up: f32,
    pub nudge_down: f32,
    /// Distance in front of the camera where the brush sits.
    pub brush_distance: f32,
}

impl Default for InputSteps {
    fn default() -> Self {
        Self { nudge_up: 1.1, nudge_down: 0.9, brush_distance: 5.0 }
    }
}

/// Accumulates input commands into valid [`EditParameters`].
#[derive(Debug, Clone)]
pub struct InputMapper {
    params: EditParameters,
    material_count: u32,
    steps: InputSteps,
}

impl InputMapper {
    /// Create a mapper; `material_count` of zero is treated as one.
    pub fn new(material_count: u32, steps: InputSteps) -> Self {
        Self {
            params: EditParameters::default(),
            material_count: material_count.max(1),
            steps,
        }
    }

    #[inline]
    pub fn params(&self) -> &EditParameters {
        &self.params
    }

    /// Place the brush `brush_distance` along the view direction.
    pub fn place_at(&mut self, eye: Vec3, forward: Vec3) {
        self.params.translation = eye + forward.normalize_or_zero() * self.steps.brush_distance;
    }

    /// Apply the keys pressed this frame.
    ///
    /// A command repeated within one frame's events counts once.
    pub fn map(&mut self, events: &[EditCommand]) -> MappedInput {
        let mut seen: Vec<EditCommand> = Vec::with_capacity(events.len());
        let mut actions = Vec::new();

        for &cmd in events {
            if seen.contains(&cmd) {
                continue;
            }
            seen.push(cmd);
            if let Some(action) = self.apply(cmd) {
                actions.push(action);
            }
        }

        MappedInput {
            params: self.params,
            actions,
            changed: !seen.is_empty(),
        }
    }

    fn apply(&mut self, cmd: EditCommand) -> Option<EditAction> {
        let p = &mut self.params;
        match cmd {
            EditCommand::CycleShapePrev => p.shape = p.shape.prev(),
            EditCommand::CycleShapeNext => p.shape = p.shape.next(),
            EditCommand::CycleBlendPrev => p.blend = p.blend.prev(),
            EditCommand::CycleBlendNext => p.blend = p.blend.next(),
            EditCommand::DecreaseSmoothness => {
                p.smoothness = (p.smoothness * self.steps.nudge_down).max(MIN_SMOOTHNESS)
            }
            EditCommand::IncreaseSmoothness => p.smoothness *= self.steps.nudge_up,
            EditCommand::GrowScale => p.scale *= self.steps.nudge_up,
            EditCommand::ShrinkScale => {
                p.scale = (p.scale * self.steps.nudge_down).max(Vec3::splat(MIN_SCALE))
            }
            EditCommand::MaterialPrev => p.material_id = p.material_id.saturating_sub(1),
            EditCommand::MaterialNext => {
                p.material_id = (p.material_id + 1).min(self.material_count - 1)
            }
            EditCommand::Commit => return Some(EditAction::Commit),
            EditCommand::Undo => return Some(EditAction::Undo),
        }
        None
    }
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(3, InputSteps::default())
    }
}
