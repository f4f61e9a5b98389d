//! Progressive accumulation counter.
//!
//! The renderer blends each new frame into its running average weighted by
//! the sample index, so the index must snap back whenever the visible scene
//! changes. Evaluated once per frame:
//!
//! 1. camera eye or target moved (exact comparison) → reset
//! 2. otherwise, edit activity this frame → reset
//! 3. otherwise → `sample_index = min(sample_index + 1, max_samples)`
//!
//! The stored pose is refreshed after every evaluation.

use glam::Vec3;

use crate::util::{exactly_equal, Error, Result};

/// Sample index a freshly created controller starts at.
pub const INITIAL_SAMPLE_INDEX: u32 = 1;
/// Sample index after a reset.
pub const DEFAULT_RESET_SAMPLE_INDEX: u32 = 2;
/// Upper bound for the sample index; below 2^24 so it survives `f32`.
pub const DEFAULT_MAX_SAMPLES: u32 = 10_000_000;
/// Largest `max_samples` whose sample index the uniform block's `f32` holds exactly.
pub const SAMPLE_LIMIT: u32 = 1 << 24;

/// Camera position and look-at point, copied by value each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target }
    }

    /// Exact equality of both points.
    pub fn same_as(&self, other: &CameraPose) -> bool {
        exactly_equal(self.eye, other.eye) && exactly_equal(self.target, other.target)
    }
}

/// Why accumulation restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    CameraMoved,
    SceneEdited,
    /// Explicit request, e.g. after a viewport resize.
    Forced,
}

/// Result of one frame's evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulationOutcome {
    Accumulating,
    Reset(ResetReason),
}

impl AccumulationOutcome {
    #[inline]
    pub fn is_reset(self) -> bool {
        matches!(self, Self::Reset(_))
    }
}

/// Tracks camera pose and edit activity and derives the sample index.
#[derive(Debug, Clone)]
pub struct AccumulationController {
    sample_index: u32,
    reset_value: u32,
    max_samples: u32,
    last_pose: CameraPose,
    pending_reset: bool,
}

impl AccumulationController {
    /// Controller with the default reset value and bound.
    pub fn new(initial_pose: CameraPose) -> Self {
        Self {
            sample_index: INITIAL_SAMPLE_INDEX,
            reset_value: DEFAULT_RESET_SAMPLE_INDEX,
            max_samples: DEFAULT_MAX_SAMPLES,
            last_pose: initial_pose,
            pending_reset: false,
        }
    }

    /// Controller with a custom reset value and bound.
    ///
    /// Requires `1 <= reset_value <= max_samples <= SAMPLE_LIMIT`.
    pub fn with_limits(initial_pose: CameraPose, reset_value: u32, max_samples: u32) -> Result<Self> {
        if reset_value == 0 {
            return Err(Error::config("reset sample index must be at least 1"));
        }
        if max_samples > SAMPLE_LIMIT {
            return Err(Error::config(format!(
                "max samples {max_samples} exceeds {SAMPLE_LIMIT}"
            )));
        }
        if reset_value > max_samples {
            return Err(Error::config(format!(
                "reset sample index {reset_value} exceeds max samples {max_samples}"
            )));
        }
        Ok(Self {
            reset_value,
            max_samples,
            ..Self::new(initial_pose)
        })
    }

    #[inline]
    pub fn sample_index(&self) -> u32 {
        self.sample_index
    }

    #[inline]
    pub fn reset_value(&self) -> u32 {
        self.reset_value
    }

    #[inline]
    pub fn max_samples(&self) -> u32 {
        self.max_samples
    }

    /// Pose recorded at the end of the last update.
    #[inline]
    pub fn last_pose(&self) -> CameraPose {
        self.last_pose
    }

    /// Force the next update to reset.
    pub fn reset(&mut self) {
        self.pending_reset = true;
    }

    /// Advance one frame.
    pub fn update(&mut self, pose: CameraPose, edited: bool) -> AccumulationOutcome {
        let outcome = if !pose.same_as(&self.last_pose) {
            AccumulationOutcome::Reset(ResetReason::CameraMoved)
        } else if edited {
            AccumulationOutcome::Reset(ResetReason::SceneEdited)
        } else if self.pending_reset {
            AccumulationOutcome::Reset(ResetReason::Forced)
        } else {
            AccumulationOutcome::Accumulating
        };

        match outcome {
            AccumulationOutcome::Accumulating => {
                self.sample_index = self.sample_index.saturating_add(1).min(self.max_samples);
            }
            AccumulationOutcome::Reset(reason) => {
                tracing::trace!("accumulation reset ({reason:?}) at sample {}", self.sample_index);
                self.sample_index = self.reset_value;
            }
        }

        self.pending_reset = false;
        self.last_pose = pose;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose() -> CameraPose {
        CameraPose::new(Vec3::new(-1.0, 4.0, 10.0), Vec3::ZERO)
    }

    fn warmed_up(frames: u32) -> AccumulationController {
        let mut acc = AccumulationController::new(pose());
        for _ in 0..frames {
            acc.update(pose(), false);
        }
        acc
    }

    #[test]
    fn test_starts_at_one_and_accumulates() {
        let mut acc = AccumulationController::new(pose());
        assert_eq!(acc.sample_index(), 1);
        assert_eq!(acc.update(pose(), false), AccumulationOutcome::Accumulating);
        assert_eq!(acc.sample_index(), 2);
        acc.update(pose(), false);
        assert_eq!(acc.sample_index(), 3);
    }

    #[test]
    fn test_reset_on_any_eye_or_target_component() {
        for axis in 0..6 {
            let mut acc = warmed_up(10);
            assert_eq!(acc.sample_index(), 11);

            let mut moved = pose();
            match axis {
                0 => moved.eye.x += 1e-3,
                1 => moved.eye.y -= 1e-3,
                2 => moved.eye.z += 1e-3,
                3 => moved.target.x += 1e-3,
                4 => moved.target.y -= 1e-3,
                _ => moved.target.z += 1e-3,
            }
            let outcome = acc.update(moved, false);
            assert_eq!(outcome, AccumulationOutcome::Reset(ResetReason::CameraMoved));
            assert_eq!(acc.sample_index(), acc.reset_value());
            assert_eq!(acc.last_pose(), moved);
        }
    }

    #[test]
    fn test_reset_on_edit() {
        let mut acc = warmed_up(100);
        let outcome = acc.update(pose(), true);
        assert_eq!(outcome, AccumulationOutcome::Reset(ResetReason::SceneEdited));
        assert_eq!(acc.sample_index(), DEFAULT_RESET_SAMPLE_INDEX);

        // Accumulation resumes from the reset value.
        acc.update(pose(), false);
        assert_eq!(acc.sample_index(), DEFAULT_RESET_SAMPLE_INDEX + 1);
    }

    #[test]
    fn test_camera_takes_precedence_over_edit() {
        let mut acc = warmed_up(3);
        let moved = CameraPose::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(
            acc.update(moved, true),
            AccumulationOutcome::Reset(ResetReason::CameraMoved)
        );
    }

    #[test]
    fn test_clamps_at_max() {
        let mut acc = AccumulationController::with_limits(pose(), 1, 5).unwrap();
        for _ in 0..10 {
            acc.update(pose(), false);
        }
        assert_eq!(acc.sample_index(), 5);
    }

    #[test]
    fn test_forced_reset_is_one_shot() {
        let mut acc = warmed_up(5);
        acc.reset();
        assert_eq!(acc.update(pose(), false), AccumulationOutcome::Reset(ResetReason::Forced));
        assert_eq!(acc.update(pose(), false), AccumulationOutcome::Accumulating);
    }

    #[test]
    fn test_invalid_limits() {
        assert!(AccumulationController::with_limits(pose(), 0, 10).is_err());
        assert!(AccumulationController::with_limits(pose(), 11, 10).is_err());
        assert!(AccumulationController::with_limits(pose(), 3, 3).is_ok());
        assert!(AccumulationController::with_limits(pose(), 2, SAMPLE_LIMIT).is_ok());
        assert!(AccumulationController::with_limits(pose(), 2, SAMPLE_LIMIT + 1).is_err());
    }
}
