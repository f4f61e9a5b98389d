//! Upload of the edit stack into the renderer's scene buffer.
//!
//! ## Usage
//! ```ignore
//! let mut sync = SceneSync::new();
//! // after commit/undo/preview for this frame, before the dispatch:
//! let report = sync.sync(frame, stack.snapshot(), &mut buffer)?;
//! ```
//!
//! The renderer receives a copied byte image every frame plus a separate
//! record count; the buffer's physical size may exceed the count.

use crate::edit::{SceneSnapshot, PRIMITIVE_SIZE};
use crate::util::{Error, Result};

/// Renderer-side destination for scene records.
pub trait SceneBuffer {
    /// Make room for at least `records` primitives. Returns true if the
    /// underlying storage was reallocated.
    fn reserve_records(&mut self, records: usize) -> Result<bool>;

    /// Write packed records starting at record index `first_record`.
    fn write_records(&mut self, first_record: usize, bytes: &[u8]) -> Result<()>;

    /// Publish the number of records the renderer should iterate.
    fn set_count(&mut self, count: u32) -> Result<()>;
}

/// Record capacity after doubling `current` (0 counts as 1) until it holds
/// `required`. `None` when the capacity or its byte size overflows.
pub fn grown_record_capacity(current: usize, required: usize) -> Option<usize> {
    let mut capacity = current.max(1);
    while capacity < required {
        capacity = capacity.checked_mul(2)?;
    }
    capacity.checked_mul(PRIMITIVE_SIZE)?;
    Some(capacity)
}

/// Summary of one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub count: u32,
    pub bytes_written: usize,
    pub reallocated: bool,
}

/// Pushes stack snapshots into a [`SceneBuffer`], at most once per frame.
#[derive(Debug, Default)]
pub struct SceneSync {
    last_frame: Option<u64>,
}

impl SceneSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame of the most recent successful sync.
    pub fn last_frame(&self) -> Option<u64> {
        self.last_frame
    }

    /// Copy `snapshot` into `buffer` and publish its count.
    #[tracing::instrument(skip(self, snapshot, buffer))]
    pub fn sync<B: SceneBuffer + ?Sized>(
        &mut self,
        frame: u64,
        snapshot: SceneSnapshot<'_>,
        buffer: &mut B,
    ) -> Result<SyncReport> {
        if self.last_frame == Some(frame) {
            return Err(Error::DuplicateSync { frame });
        }

        let count = u32::try_from(snapshot.count())
            .map_err(|_| Error::Upload(format!("{} records exceed u32", snapshot.count())))?;
        let reallocated = buffer.reserve_records(snapshot.record_capacity())?;

        let committed = snapshot.committed_bytes();
        let mut bytes_written = 0;
        if !committed.is_empty() {
            buffer.write_records(0, committed)?;
            bytes_written += committed.len();
        }
        if let Some(preview) = snapshot.preview_bytes() {
            buffer.write_records(snapshot.committed.len(), preview)?;
            bytes_written += preview.len();
        }
        buffer.set_count(count)?;

        if reallocated {
            tracing::debug!(
                "scene buffer reallocated for {} records",
                snapshot.record_capacity()
            );
        }
        tracing::trace!("synced {count} records ({bytes_written} bytes)");

        self.last_frame = Some(frame);
        Ok(SyncReport { count, bytes_written, reallocated })
    }
}

/// Scene buffer in host memory.
///
/// Mirrors what a GPU storage buffer would hold; used headless and in tests.
#[derive(Debug, Default, Clone)]
pub struct HostSceneBuffer {
    bytes: Vec<u8>,
    count: u32,
    reallocations: usize,
}

impl HostSceneBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Physical size in records.
    pub fn record_capacity(&self) -> usize {
        self.bytes.len() / PRIMITIVE_SIZE
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Bytes the renderer would read (the first `count` records).
    pub fn visible_bytes(&self) -> &[u8] {
        &self.bytes[..self.count as usize * PRIMITIVE_SIZE]
    }

    /// Visible records decoded back into primitives.
    pub fn records(&self) -> Vec<crate::edit::Primitive> {
        bytemuck::pod_collect_to_vec(self.visible_bytes())
    }
}

impl SceneBuffer for HostSceneBuffer {
    fn reserve_records(&mut self, records: usize) -> Result<bool> {
        let needed = records
            .checked_mul(PRIMITIVE_SIZE)
            .ok_or_else(|| Error::Upload(format!("{records} records overflow the address space")))?;
        if needed <= self.bytes.len() {
            return Ok(false);
        }
        self.bytes
            .try_reserve_exact(needed - self.bytes.len())
            .map_err(|e| Error::Upload(e.to_string()))?;
        self.bytes.resize(needed, 0);
        self.reallocations += 1;
        Ok(true)
    }

    fn write_records(&mut self, first_record: usize, bytes: &[u8]) -> Result<()> {
        let start = first_record * PRIMITIVE_SIZE;
        let end = start + bytes.len();
        let dst = self.bytes.get_mut(start..end).ok_or_else(|| {
            Error::Upload(format!("write of {} bytes at record {first_record} past buffer end", bytes.len()))
        })?;
        dst.copy_from_slice(bytes);
        Ok(())
    }

    fn set_count(&mut self, count: u32) -> Result<()> {
        if count as usize * PRIMITIVE_SIZE > self.bytes.len() {
            return Err(Error::Upload(format!("count {count} exceeds buffer capacity")));
        }
        self.count = count;
        Ok(())
    }
}
