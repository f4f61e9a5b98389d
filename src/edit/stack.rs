//! Committed edit history plus the live preview slot.
//!
//! ## Layout
//! ```text
//! committed: [p0][p1]...[pN-1]   (append / pop at tail only)
//! preview:   [pN?]               (rebuilt every frame, id = factory.peek_next_id())
//! ```
//!
//! The renderer never aliases this storage: [`EditStack::snapshot`] hands out
//! a borrowed view that the sync stage copies into the renderer buffer.

use serde::{Deserialize, Serialize};

use crate::util::{Error, Result};
use super::factory::PrimitiveFactory;
use super::params::EditParameters;
use super::primitive::{ObjectId, Primitive, PRIMITIVE_SIZE};

/// Whether the in-progress edit is uploaded with the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewMode {
    /// Preview is drawn as the record after the committed ones.
    #[default]
    Live,
    /// Only committed edits reach the renderer.
    Hidden,
}

/// Ordered, growable stack of committed primitives.
#[derive(Debug)]
pub struct EditStack {
    committed: Vec<Primitive>,
    /// Logical capacity; doubles on growth, never shrinks.
    capacity: usize,
    preview: Option<Primitive>,
    preview_mode: PreviewMode,
}

impl EditStack {
    /// Create an empty stack with room for `initial_capacity` commits.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            committed: Vec::with_capacity(initial_capacity),
            capacity: initial_capacity,
            preview: None,
            preview_mode: PreviewMode::default(),
        }
    }

    pub fn with_preview_mode(mut self, mode: PreviewMode) -> Self {
        self.preview_mode = mode;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn committed(&self) -> &[Primitive] {
        &self.committed
    }

    #[inline]
    pub fn preview(&self) -> Option<&Primitive> {
        self.preview.as_ref()
    }

    #[inline]
    pub fn preview_mode(&self) -> PreviewMode {
        self.preview_mode
    }

    pub fn set_preview_mode(&mut self, mode: PreviewMode) {
        self.preview_mode = mode;
    }

    /// Rebuild the preview from the latest parameters.
    ///
    /// The preview carries the id the next commit will receive and consumes
    /// nothing from the factory. Returns true when the record changed.
    pub fn update_preview(&mut self, factory: &PrimitiveFactory, params: &EditParameters) -> bool {
        let next = PrimitiveFactory::build_with_id(params, factory.peek_next_id());
        if self.preview.as_ref() == Some(&next) {
            return false;
        }
        self.preview = Some(next);
        true
    }

    /// Append a new primitive built from `params`, growing first if full.
    pub fn commit(&mut self, factory: &mut PrimitiveFactory, params: &EditParameters) -> Result<ObjectId> {
        if self.committed.len() == self.capacity {
            self.grow()?;
        }
        let id = factory.peek_next_id();
        let primitive = factory.build(params)?;
        self.committed.push(primitive);
        tracing::debug!(
            "commit {id}: {:?}/{:?} material {} ({} of {})",
            params.shape,
            params.blend,
            params.material_id,
            self.committed.len(),
            self.capacity
        );
        Ok(id)
    }

    /// Remove the most recent commit. Empty stack is a no-op.
    pub fn undo(&mut self) -> Option<Primitive> {
        let removed = self.committed.pop();
        match &removed {
            Some(p) => tracing::debug!("undo {} ({} left)", p.object_id(), self.committed.len()),
            None => tracing::trace!("undo on empty stack"),
        }
        removed
    }

    /// Read-only view of what the renderer should see this frame.
    pub fn snapshot(&self) -> SceneSnapshot<'_> {
        let preview = match self.preview_mode {
            PreviewMode::Live => self.preview.as_ref(),
            PreviewMode::Hidden => None,
        };
        SceneSnapshot {
            committed: &self.committed,
            preview,
            capacity: self.capacity,
        }
    }

    /// Double the logical capacity (0 grows to 1) and reserve storage.
    fn grow(&mut self) -> Result<()> {
        let requested = if self.capacity == 0 { 1 } else { self.capacity * 2 };
        let additional = requested - self.committed.len();
        self.committed
            .try_reserve_exact(additional)
            .map_err(|_| Error::Capacity { requested })?;
        tracing::info!("edit buffer grown: {} -> {requested}", self.capacity);
        self.capacity = requested;
        Ok(())
    }
}

impl Default for EditStack {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Borrowed view of the stack for one upload.
#[derive(Debug, Clone, Copy)]
pub struct SceneSnapshot<'a> {
    pub committed: &'a [Primitive],
    pub preview: Option<&'a Primitive>,
    capacity: usize,
}

impl<'a> SceneSnapshot<'a> {
    /// Records the renderer iterates over (committed + visible preview).
    pub fn count(&self) -> usize {
        self.committed.len() + usize::from(self.preview.is_some())
    }

    /// Records the renderer buffer must hold: stack capacity plus the preview slot.
    pub fn record_capacity(&self) -> usize {
        self.capacity + 1
    }

    pub fn committed_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.committed)
    }

    pub fn preview_bytes(&self) -> Option<&'a [u8]> {
        self.preview.map(bytemuck::bytes_of)
    }

    /// Total bytes a full upload writes.
    pub fn byte_len(&self) -> usize {
        self.count() * PRIMITIVE_SIZE
    }
}
